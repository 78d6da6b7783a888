use debt_cost_core::cost_of_debt::{calculate_cost_of_debt, compose, evaluate, CostOfDebtInput};
use debt_cost_core::market_data::{BondYield, BondYieldTable};
use debt_cost_core::rating::{CompanyProfile, CoverageInput, RatingTableEntry, RatingTables};
use debt_cost_core::{CostOfDebtError, RatingCategory};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn tables() -> RatingTables {
    let rows = |b: Decimal, a: Decimal| {
        vec![
            RatingTableEntry::new(dec!(-100000), b, "Caa/CCC", dec!(0.0885)),
            RatingTableEntry::new(b, a, "Baa2/BBB", dec!(0.0162)),
            RatingTableEntry::new(a, dec!(100000), "Aaa/AAA", dec!(0.0045)),
        ]
    };
    RatingTables::from_entries(
        rows(dec!(1.25), dec!(8.5)),
        rows(dec!(1.5), dec!(12.5)),
        rows(dec!(0.3), dec!(3)),
    )
    .unwrap()
}

fn large_cap_input() -> CostOfDebtInput {
    CostOfDebtInput {
        company: Some("MSFT".into()),
        profile: CompanyProfile::new(Some(dec!(3_000_000_000_000)), false),
        coverage: CoverageInput {
            ebit: dec!(123_000),
            interest_expense: dec!(3_000),
        },
        risk_free_rate: dec!(0.045),
        tax_rate: dec!(0.21),
        tables: tables(),
    }
}

// ===========================================================================
// End-to-end scenarios
// ===========================================================================

#[test]
fn test_scenario_large_cap_aaa() {
    let out = calculate_cost_of_debt(&large_cap_input()).unwrap();
    let r = &out.result;
    assert_eq!(r.interest_coverage, dec!(41));
    assert_eq!(r.rating, "Aaa/AAA");
    assert_eq!(r.spread, dec!(0.0045));
    assert_eq!(r.pre_tax_cost_of_debt, dec!(0.0495));
    assert!(
        (r.after_tax_cost_of_debt - dec!(0.0391)).abs() < dec!(0.0001),
        "after-tax Kd ~3.91%, got {}",
        r.after_tax_cost_of_debt
    );
    assert!(out.warnings.is_empty());
}

#[test]
fn test_scenario_no_interest_top_bucket() {
    for ebit in [dec!(1), dec!(500_000_000)] {
        let mut input = large_cap_input();
        input.coverage = CoverageInput {
            ebit,
            interest_expense: Decimal::ZERO,
        };
        let out = calculate_cost_of_debt(&input).unwrap();
        assert_eq!(out.result.interest_coverage, dec!(20));
        assert_eq!(out.result.rating, "Aaa/AAA");
    }
}

#[test]
fn test_evaluate_matches_envelope() {
    let input = large_cap_input();
    let direct = evaluate(
        &input.profile,
        &input.coverage,
        input.risk_free_rate,
        input.tax_rate,
        &input.tables,
    )
    .unwrap();
    let wrapped = calculate_cost_of_debt(&input).unwrap().result;
    assert_eq!(direct.after_tax_cost, wrapped.after_tax_cost_of_debt);
    assert_eq!(direct.pre_tax_cost, wrapped.pre_tax_cost_of_debt);
    assert_eq!(direct, compose(dec!(0.045), dec!(0.0045), dec!(0.21)));
}

#[test]
fn test_bank_uses_financial_grid() {
    // 3x is BBB on the large-cap grid; the financial grid tops out there.
    let mut input = large_cap_input();
    input.profile = CompanyProfile::from_sector(
        Some(dec!(400_000_000_000)),
        "Financial Services",
        "Banks - Diversified",
    );
    input.coverage.ebit = dec!(9_000);
    let out = calculate_cost_of_debt(&input).unwrap();
    assert_eq!(out.result.category, RatingCategory::FinancialServices);
    assert_eq!(out.result.rating, "Aaa/AAA");
}

#[test]
fn test_risk_free_from_bond_table() {
    let yields = BondYieldTable::from_rows(vec![BondYield {
        country: "United States".into(),
        yield_10y: dec!(4.5),
    }])
    .unwrap();
    let mut input = large_cap_input();
    input.risk_free_rate = yields.risk_free_rate("USA").unwrap();
    let out = calculate_cost_of_debt(&input).unwrap();
    assert_eq!(out.result.risk_free_rate, dec!(0.045));
    assert_eq!(out.result.pre_tax_cost_of_debt, dec!(0.0495));
}

#[test]
fn test_input_from_json() {
    let json = serde_json::json!({
        "company": "ACME",
        "profile": { "market_cap": "1200000000" },
        "coverage": { "ebit": 5000, "interest_expense": 1000 },
        "risk_free_rate": "0.04",
        "tax_rate": "0.25",
        "tables": serde_json::to_value(tables()).unwrap(),
    });
    let input: CostOfDebtInput = serde_json::from_value(json).unwrap();
    assert!(!input.profile.is_financial_services);
    let out = calculate_cost_of_debt(&input).unwrap();
    assert_eq!(out.result.category, RatingCategory::SmallCap);
    assert_eq!(out.result.rating, "Baa2/BBB");
    // (0.04 + 0.0162) * 0.75
    assert_eq!(out.result.after_tax_cost_of_debt, dec!(0.04215));
}

#[test]
fn test_negative_interest_is_invalid_input() {
    let mut input = large_cap_input();
    input.coverage.interest_expense = dec!(-1);
    match calculate_cost_of_debt(&input).unwrap_err() {
        CostOfDebtError::InvalidInput { field, .. } => assert_eq!(field, "interest_expense"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

// ===========================================================================
// Shared tables across threads
// ===========================================================================

#[test]
fn test_concurrent_evaluations_share_tables() {
    let tables = tables();
    let ebits = [dec!(100), dec!(600), dec!(5_000), dec!(-200)];
    let results: Vec<Decimal> = std::thread::scope(|s| {
        let handles: Vec<_> = ebits
            .iter()
            .map(|ebit| {
                let tables = &tables;
                s.spawn(move || {
                    evaluate(
                        &CompanyProfile::new(Some(dec!(7_000_000_000)), false),
                        &CoverageInput {
                            ebit: *ebit,
                            interest_expense: dec!(100),
                        },
                        dec!(0.04),
                        dec!(0.2),
                        tables,
                    )
                    .unwrap()
                    .spread
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(
        results,
        vec![dec!(0.0885), dec!(0.0162), dec!(0.0045), dec!(0.0885)]
    );
}
