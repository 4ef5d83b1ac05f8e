use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{types::Percent, LoanCalcError, LoanCalcResult};

/// Whether the borrower already owns a property, which caps how much of the
/// new property's value can be financed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum PropertyOwnership {
    #[default]
    NoProperty,
    HasProperty,
    SellingProperty,
}

impl PropertyOwnership {
    pub const ALL: [PropertyOwnership; 3] = [
        PropertyOwnership::NoProperty,
        PropertyOwnership::HasProperty,
        PropertyOwnership::SellingProperty,
    ];

    /// Parse a form value. Anything unrecognised is treated as `NoProperty`.
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "has_property" => PropertyOwnership::HasProperty,
            "selling_property" => PropertyOwnership::SellingProperty,
            _ => PropertyOwnership::NoProperty,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyOwnership::NoProperty => "no_property",
            PropertyOwnership::HasProperty => "has_property",
            PropertyOwnership::SellingProperty => "selling_property",
        }
    }
}

impl From<String> for PropertyOwnership {
    fn from(value: String) -> Self {
        PropertyOwnership::parse_lossy(&value)
    }
}

impl std::fmt::Display for PropertyOwnership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum financing, as a percent of property value, per ownership category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LtvTable {
    pub no_property: Percent,
    pub has_property: Percent,
    pub selling_property: Percent,
}

impl Default for LtvTable {
    fn default() -> Self {
        Self {
            no_property: dec!(75),
            has_property: dec!(50),
            selling_property: dec!(70),
        }
    }
}

impl LtvTable {
    pub fn ratio(&self, ownership: PropertyOwnership) -> Percent {
        match ownership {
            PropertyOwnership::NoProperty => self.no_property,
            PropertyOwnership::HasProperty => self.has_property,
            PropertyOwnership::SellingProperty => self.selling_property,
        }
    }

    /// Every ceiling must be a percentage in [0, 100].
    pub fn validate(&self) -> LoanCalcResult<()> {
        for ownership in PropertyOwnership::ALL {
            let ltv = self.ratio(ownership);
            if ltv < Decimal::ZERO || ltv > dec!(100) {
                return Err(LoanCalcError::InvalidInput {
                    field: format!("ltv.{ownership}"),
                    reason: format!("LTV ceiling {ltv}% must be between 0% and 100%."),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = LtvTable::default();
        assert_eq!(table.ratio(PropertyOwnership::NoProperty), dec!(75));
        assert_eq!(table.ratio(PropertyOwnership::HasProperty), dec!(50));
        assert_eq!(table.ratio(PropertyOwnership::SellingProperty), dec!(70));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_parse_lossy_falls_back_to_no_property() {
        assert_eq!(PropertyOwnership::parse_lossy("has_property"), PropertyOwnership::HasProperty);
        assert_eq!(PropertyOwnership::parse_lossy("Selling-Property"), PropertyOwnership::SellingProperty);
        assert_eq!(PropertyOwnership::parse_lossy("option_2"), PropertyOwnership::NoProperty);
        assert_eq!(PropertyOwnership::parse_lossy(""), PropertyOwnership::NoProperty);
    }

    #[test]
    fn test_serde_round_trip_and_unknown_value() {
        let json = serde_json::to_string(&PropertyOwnership::SellingProperty).unwrap();
        assert_eq!(json, "\"selling_property\"");
        let parsed: PropertyOwnership = serde_json::from_str("\"has_property\"").unwrap();
        assert_eq!(parsed, PropertyOwnership::HasProperty);
        let unknown: PropertyOwnership = serde_json::from_str("\"inherited\"").unwrap();
        assert_eq!(unknown, PropertyOwnership::NoProperty);
    }

    #[test]
    fn test_validate_rejects_out_of_range_ceiling() {
        let table = LtvTable {
            has_property: dec!(120),
            ..LtvTable::default()
        };
        match table.validate().unwrap_err() {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "ltv.has_property"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
