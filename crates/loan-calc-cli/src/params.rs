use serde::Deserialize;
use std::path::Path;

use loan_calc_core::parameters::{
    CalculationParameters, FallbackProvider, ParameterProvider, ParameterResolver,
};
use loan_calc_core::{BusinessPath, LoanCalcError, LoanCalcResult};

use crate::input::file;

/// A parameter file holds either one parameter set or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum ParameterFile {
    Many(Vec<CalculationParameters>),
    One(CalculationParameters),
}

impl ParameterFile {
    fn into_vec(self) -> Vec<CalculationParameters> {
        match self {
            ParameterFile::Many(all) => all,
            ParameterFile::One(one) => vec![one],
        }
    }
}

/// Reads parameters from a JSON or YAML file on every load.
pub struct FileProvider {
    path: String,
}

impl FileProvider {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> LoanCalcResult<Vec<CalculationParameters>> {
        let (resolved, contents) =
            file::read_text(&self.path).map_err(|e| LoanCalcError::Configuration(e.to_string()))?;
        let parsed = parse(&contents, is_yaml(&resolved))
            .map_err(|e| LoanCalcError::Configuration(format!("{}: {e}", resolved.display())))?;
        Ok(parsed.into_vec())
    }
}

impl ParameterProvider for FileProvider {
    fn name(&self) -> &str {
        &self.path
    }

    fn load(&self, path: BusinessPath) -> LoanCalcResult<CalculationParameters> {
        self.read()?
            .into_iter()
            .find(|p| p.business_path == path)
            .ok_or_else(|| LoanCalcError::Configuration(format!("{}: no parameters for {path}", self.path)))
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn parse(contents: &str, yaml: bool) -> Result<ParameterFile, String> {
    if yaml {
        serde_yaml::from_str(contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    }
}

/// Parameter file first (when given), compiled-in defaults last.
pub fn build_resolver(params_path: Option<&str>) -> ParameterResolver {
    let mut providers: Vec<Box<dyn ParameterProvider>> = Vec::new();
    if let Some(path) = params_path {
        tracing::debug!(path, "using parameter file");
        providers.push(Box::new(FileProvider::new(path)));
    }
    providers.push(Box::new(FallbackProvider));
    ParameterResolver::from_providers(providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_json_list() {
        let json = r#"[
            {"business_path": "mortgage", "current_interest_rate": "4.25"},
            {"business_path": "credit", "current_interest_rate": "9.9"}
        ]"#;
        let all = parse(json, false).unwrap().into_vec();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].current_interest_rate, dec!(9.9));
    }

    #[test]
    fn test_parse_yaml_single() {
        let yaml = "business_path: mortgage\ncurrent_interest_rate: '4.6'\nltv:\n  no_property: '80'\n  has_property: '50'\n  selling_property: '70'\n";
        let all = parse(yaml, true).unwrap().into_vec();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].ltv.no_property, dec!(80));
        assert!(!all[0].is_fallback);
    }

    #[test]
    fn test_yaml_extension_detection() {
        assert!(is_yaml(Path::new("rates.yaml")));
        assert!(is_yaml(Path::new("/etc/loancalc/rates.yml")));
        assert!(!is_yaml(Path::new("rates.json")));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let resolver = build_resolver(Some("/nonexistent/loancalc-params.json"));
        let params = resolver.resolve(BusinessPath::Mortgage);
        assert!(params.is_fallback);
        assert_eq!(params.current_interest_rate, dec!(5.0));
    }

    #[test]
    fn test_file_provider_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("loancalc-params-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"business_path": "credit", "current_interest_rate": "7.25"}"#,
        )
        .unwrap();
        let provider = FileProvider::new(path.to_string_lossy().to_string());
        assert_eq!(provider.load(BusinessPath::Credit).unwrap().current_interest_rate, dec!(7.25));
        assert!(provider.load(BusinessPath::Mortgage).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
