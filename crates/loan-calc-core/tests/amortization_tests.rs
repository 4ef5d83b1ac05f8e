use loan_calc_core::amortization::payment::{calculate_payment, PaymentInput};
use loan_calc_core::amortization::period::{calculate_period, PeriodInput};
use loan_calc_core::amortization::{credit_annuity_payment, loan_period, monthly_payment, remaining_amount};
use loan_calc_core::loan_limits::{max_loan_amount, min_down_payment, PropertyOwnership};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Calculator scenarios
// ===========================================================================

#[test]
fn test_standard_mortgage_scenario() {
    assert_eq!(monthly_payment(dec!(1_000_000), dec!(4), 25), Some(dec!(5278)));
}

#[test]
fn test_zero_rate_mortgage_scenario() {
    assert_eq!(monthly_payment(dec!(1_000_000), Decimal::ZERO, 25), Some(dec!(3333)));
}

#[test]
fn test_ownership_drives_max_loan_and_payment() {
    // 1M property, 20 years at 5%, borrowing the full ceiling in each category
    let pv = dec!(1_000_000);
    let cases = [
        (PropertyOwnership::NoProperty, dec!(750_000), dec!(250_000), dec!(4950)),
        (PropertyOwnership::HasProperty, dec!(500_000), dec!(500_000), dec!(3300)),
        (PropertyOwnership::SellingProperty, dec!(700_000), dec!(300_000), dec!(4620)),
    ];
    for (ownership, max_loan, min_down, payment) in cases {
        assert_eq!(max_loan_amount(pv, ownership), max_loan, "{ownership}");
        assert_eq!(min_down_payment(pv, ownership), min_down, "{ownership}");
        assert_eq!(monthly_payment(max_loan, dec!(5), 20), Some(payment), "{ownership}");
    }
}

#[test]
fn test_payment_then_period_recovers_term() {
    let payment = monthly_payment(dec!(1_000_000), dec!(4), 25).unwrap();
    let years = loan_period(dec!(1_000_000), dec!(4), payment).unwrap();
    assert!((years - dec!(25)).abs() < dec!(0.01), "got {years}");
}

#[test]
fn test_payment_below_interest_has_no_term() {
    assert_eq!(loan_period(dec!(1_000_000), dec!(6), dec!(4000)), None);

    let input = PeriodInput {
        loan_amount: dec!(1_000_000),
        interest_rate: dec!(6),
        monthly_payment: dec!(4000),
    };
    assert!(calculate_period(&input).is_err());
}

#[test]
fn test_credit_payment_and_payoff_amount() {
    assert_eq!(credit_annuity_payment(dec!(100_000), dec!(5), dec!(8.5)), Some(dec!(2052)));
    assert_eq!(remaining_amount(dec!(500_000), dec!(10), dec!(5)), Some(dec!(750_000)));
}

#[test]
fn test_payment_envelope_serializes_decimals_as_strings() {
    let input = PaymentInput {
        loan_amount: dec!(750_000),
        interest_rate: dec!(5),
        term_years: 20,
    };
    let out = calculate_payment(&input).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["monthly_payment"], "4950");
    assert_eq!(json["result"]["number_of_payments"], 240);
    assert_eq!(json["metadata"]["precision"], "rust_decimal_128bit");
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_zero_rate_payment_is_linear(
        loan in 10_000i64..10_000_000,
        term in 1u32..=30
    ) {
        let loan = Decimal::from(loan);
        let n = Decimal::from(term * 12);
        let payment = monthly_payment(loan, Decimal::ZERO, term).unwrap();
        // rounding moves each instalment by at most half a unit
        prop_assert!((payment * n - loan).abs() <= n / dec!(2));
    }

    #[test]
    fn prop_period_inverts_payment(
        loan in 200_000i64..5_000_000,
        rate_bp in 100i64..=1000,
        term in 5u32..=30
    ) {
        let loan = Decimal::from(loan);
        let rate = Decimal::new(rate_bp, 2);
        let payment = monthly_payment(loan, rate, term).unwrap();
        let years = loan_period(loan, rate, payment).unwrap();
        prop_assert!(
            (years - Decimal::from(term)).abs() <= dec!(0.1),
            "loan {} rate {} term {} solved {}", loan, rate, term, years
        );
    }

    #[test]
    fn prop_max_loan_and_min_down_cover_property(
        cents in 1i64..100_000_000_000,
        idx in 0usize..3
    ) {
        let pv = Decimal::new(cents, 2);
        let ownership = PropertyOwnership::ALL[idx];
        let gap = max_loan_amount(pv, ownership) + min_down_payment(pv, ownership) - pv;
        prop_assert!(gap.abs() <= Decimal::ONE, "pv {} gap {}", pv, gap);
    }

    #[test]
    fn prop_higher_rate_never_cheaper(
        loan in 10_000i64..10_000_000,
        low_bp in 0i64..1000,
        extra_bp in 1i64..1000,
        term in 1u32..=30
    ) {
        let loan = Decimal::from(loan);
        let low = monthly_payment(loan, Decimal::new(low_bp, 2), term).unwrap();
        let high = monthly_payment(loan, Decimal::new(low_bp + extra_bp, 2), term).unwrap();
        prop_assert!(high >= low);
    }
}
