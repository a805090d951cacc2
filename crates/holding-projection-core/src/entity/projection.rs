use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::holding::{Entity, EntityInput};
use crate::accounting::{income_statement, IncomeStatement};
use crate::config::MAX_HORIZON_YEARS;
use crate::error::ProjectionError;
use crate::treasury::{cash_flow_from_statement, CashFlowStatement};
use crate::types::{with_metadata, ComputationOutput, Money, Year};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One year of the projection: income statement and treasury side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub year: Year,
    pub revenue: Money,
    pub operating_charges: Money,
    pub exceptional_charges: Money,
    pub depreciation: Money,
    pub operating_result: Money,
    pub interest: Money,
    pub pre_tax_result: Money,
    pub corporate_tax: Money,
    pub net_result: Money,
    pub cash_inflow: Money,
    pub cash_outflow: Money,
    pub debt_service: Money,
    pub outstanding_debt: Money,
    pub cash_flow: Money,
    pub initial_contribution: Money,
    pub realized_treasury: Money,
    pub prior_reserve: Money,
    pub updated_reserve: Money,
}

impl ProjectionRow {
    fn merge(statement: IncomeStatement, cash: CashFlowStatement) -> Self {
        Self {
            year: statement.year,
            revenue: statement.revenue,
            operating_charges: statement.operating_charges,
            exceptional_charges: statement.exceptional_charges,
            depreciation: statement.depreciation,
            operating_result: statement.operating_result,
            interest: statement.interest,
            pre_tax_result: statement.pre_tax_result,
            corporate_tax: statement.corporate_tax,
            net_result: statement.net_result,
            cash_inflow: cash.cash_inflow,
            cash_outflow: cash.cash_outflow,
            debt_service: cash.debt_service,
            outstanding_debt: cash.outstanding_debt,
            cash_flow: cash.cash_flow,
            initial_contribution: cash.initial_contribution,
            realized_treasury: cash.realized_treasury,
            prior_reserve: cash.prior_reserve,
            updated_reserve: cash.updated_reserve,
        }
    }
}

/// Static, per-property recap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySummaryRow {
    pub name: String,
    pub purchase_year: Year,
    pub total_cost: Money,
    pub borrowed_capital: Money,
    pub loan_term_years: u32,
    pub deferral: String,
    pub unit_count: usize,
    pub annual_revenue: Money,
    pub annual_charges: Money,
    pub property_tax: Money,
    /// Percent, 2 decimals
    pub gross_yield: Decimal,
    /// Percent, 2 decimals
    pub net_yield: Decimal,
}

/// Headline figures over the whole horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionOverview {
    pub first_year: Year,
    pub last_year: Year,
    pub total_revenue: Money,
    pub total_corporate_tax: Money,
    pub total_net_result: Money,
    pub final_reserve: Money,
    pub cumulative_realized_treasury: Money,
    pub total_acquisition_cost: Money,
    pub total_borrowed: Money,
    /// Borrowed capital over acquisition cost, in percent
    pub debt_ratio: Decimal,
    /// First year where cumulative realized treasury is non-negative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treasury_breakeven_year: Option<Year>,
}

/// Complete result of a projection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub entity: String,
    pub rows: Vec<ProjectionRow>,
    pub properties: Vec<PropertySummaryRow>,
    pub overview: ProjectionOverview,
}

// ---------------------------------------------------------------------------
// Projection fold
// ---------------------------------------------------------------------------

/// Calendar years of the horizon. Stops early rather than wrapping past
/// `i32::MAX`.
fn years(entity: &Entity, horizon_years: u32) -> impl Iterator<Item = Year> {
    let first = entity.creation_year();
    (0..horizon_years).map_while(move |offset| {
        i32::try_from(offset)
            .ok()
            .and_then(|offset| first.checked_add(offset))
    })
}

/// Project `entity` from its creation year over `horizon_years` years.
///
/// The reserve starts at zero and each year's updated reserve becomes the
/// next year's prior reserve, so years are processed strictly in order.
pub fn project(entity: &Entity, horizon_years: u32) -> Vec<ProjectionRow> {
    let mut rows = Vec::with_capacity(horizon_years.min(MAX_HORIZON_YEARS) as usize);
    let mut reserve = Decimal::ZERO;

    for year in years(entity, horizon_years) {
        let statement = income_statement(entity, year);
        let cash = cash_flow_from_statement(entity, &statement, reserve);
        reserve = cash.updated_reserve;

        tracing::debug!(
            year,
            net_result = %statement.net_result,
            reserve = %reserve,
            "projected year"
        );
        rows.push(ProjectionRow::merge(statement, cash));
    }

    rows
}

/// Income statements alone over the horizon.
pub fn income_statements(entity: &Entity, horizon_years: u32) -> Vec<IncomeStatement> {
    years(entity, horizon_years)
        .map(|year| income_statement(entity, year))
        .collect()
}

/// Cash statements alone over the horizon, reserve threaded as in [`project`].
pub fn treasury(entity: &Entity, horizon_years: u32) -> Vec<CashFlowStatement> {
    let mut reserve = Decimal::ZERO;
    years(entity, horizon_years)
        .map(|year| {
            let statement = income_statement(entity, year);
            let cash = cash_flow_from_statement(entity, &statement, reserve);
            reserve = cash.updated_reserve;
            cash
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// One recap row per property, in ownership order.
pub fn property_summary(entity: &Entity) -> Vec<PropertySummaryRow> {
    entity
        .properties()
        .iter()
        .map(|p| PropertySummaryRow {
            name: p.name().to_string(),
            purchase_year: p.purchase_year(),
            total_cost: p.total_cost(),
            borrowed_capital: p.borrowed_capital(),
            loan_term_years: p.loan().map_or(0, |l| l.term_years()),
            deferral: p.deferral_description(),
            unit_count: p.units().len(),
            annual_revenue: p.annual_revenue(),
            annual_charges: p.annual_charges(),
            property_tax: p.property_tax(),
            gross_yield: p.gross_yield().round_dp(2),
            net_yield: p.net_yield().round_dp(2),
        })
        .collect()
}

/// Horizon totals of a projection.
pub fn projection_overview(entity: &Entity, rows: &[ProjectionRow]) -> ProjectionOverview {
    let total_acquisition_cost = entity.total_acquisition_cost();
    let total_borrowed = entity.total_borrowed();
    let debt_ratio = if total_acquisition_cost.is_zero() {
        Decimal::ZERO
    } else {
        (total_borrowed / total_acquisition_cost * dec!(100)).round_dp(2)
    };

    let mut cumulative = Decimal::ZERO;
    let mut treasury_breakeven_year = None;
    for row in rows {
        cumulative += row.realized_treasury;
        if treasury_breakeven_year.is_none() && cumulative >= Decimal::ZERO {
            treasury_breakeven_year = Some(row.year);
        }
    }

    ProjectionOverview {
        first_year: rows.first().map_or(entity.creation_year(), |r| r.year),
        last_year: rows.last().map_or(entity.creation_year(), |r| r.year),
        total_revenue: rows.iter().map(|r| r.revenue).sum(),
        total_corporate_tax: rows.iter().map(|r| r.corporate_tax).sum(),
        total_net_result: rows.iter().map(|r| r.net_result).sum(),
        final_reserve: rows.last().map_or(Decimal::ZERO, |r| r.updated_reserve),
        cumulative_realized_treasury: cumulative,
        total_acquisition_cost,
        total_borrowed,
        debt_ratio,
        treasury_breakeven_year,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

fn resolve_horizon(entity: &Entity, horizon_years: Option<u32>) -> ProjectionResult<u32> {
    let horizon = horizon_years.unwrap_or(entity.config().horizon_years);
    if horizon == 0 {
        return Err(ProjectionError::InvalidInput {
            field: "horizon_years".into(),
            reason: "Projection horizon must be at least 1 year".into(),
        });
    }
    if horizon > MAX_HORIZON_YEARS {
        return Err(ProjectionError::InvalidInput {
            field: "horizon_years".into(),
            reason: format!("Projection horizon cannot exceed {MAX_HORIZON_YEARS} years"),
        });
    }
    Ok(horizon)
}

fn collect_warnings(entity: &Entity, rows: &[ProjectionRow]) -> Vec<String> {
    let mut warnings = Vec::new();

    for p in entity.properties() {
        if p.purchase_year() < entity.creation_year() {
            warnings.push(format!(
                "{}: bought in {}, before the entity was created in {}",
                p.name(),
                p.purchase_year(),
                entity.creation_year()
            ));
        }
        if p.net_yield() < Decimal::ZERO {
            warnings.push(format!(
                "{}: debt service and charges exceed rents (net yield {:.2}%)",
                p.name(),
                p.net_yield()
            ));
        }
    }

    let deficit_years: Vec<String> = rows
        .iter()
        .filter(|r| r.realized_treasury < Decimal::ZERO)
        .map(|r| r.year.to_string())
        .collect();
    if !deficit_years.is_empty() {
        warnings.push(format!(
            "Negative realized treasury in {}",
            deficit_years.join(", ")
        ));
    }

    warnings
}

/// Validate, build and project an entity, returning rows, the property recap
/// and horizon totals. `horizon_years` falls back to the configured default.
pub fn run_projection(
    input: &EntityInput,
    horizon_years: Option<u32>,
) -> ProjectionResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();

    let entity = Entity::new(input.clone())?;
    let horizon = resolve_horizon(&entity, horizon_years)?;

    let rows = project(&entity, horizon);
    let properties = property_summary(&entity);
    let overview = projection_overview(&entity, &rows);
    let warnings = collect_warnings(&entity, &rows);

    let output = ProjectionOutput {
        entity: entity.name().to_string(),
        rows,
        properties,
        overview,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Holding Entity Projection (Income Statement, Corporate Tax, Treasury)",
        &serde_json::json!({
            "entity": entity.name(),
            "creation_year": entity.creation_year(),
            "horizon_years": horizon,
            "config": entity.config(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Income statements only.
pub fn run_income_statements(
    input: &EntityInput,
    horizon_years: Option<u32>,
) -> ProjectionResult<ComputationOutput<Vec<IncomeStatement>>> {
    let start = Instant::now();
    let entity = Entity::new(input.clone())?;
    let horizon = resolve_horizon(&entity, horizon_years)?;
    let statements = income_statements(&entity, horizon);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Holding Entity Income Statements",
        &serde_json::json!({ "entity": entity.name(), "horizon_years": horizon }),
        Vec::new(),
        elapsed,
        statements,
    ))
}

/// Cash statements only.
pub fn run_treasury(
    input: &EntityInput,
    horizon_years: Option<u32>,
) -> ProjectionResult<ComputationOutput<Vec<CashFlowStatement>>> {
    let start = Instant::now();
    let entity = Entity::new(input.clone())?;
    let horizon = resolve_horizon(&entity, horizon_years)?;
    let statements = treasury(&entity, horizon);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Holding Entity Treasury",
        &serde_json::json!({ "entity": entity.name(), "horizon_years": horizon }),
        Vec::new(),
        elapsed,
        statements,
    ))
}

/// Property recap only.
pub fn run_property_summary(
    input: &EntityInput,
) -> ProjectionResult<ComputationOutput<Vec<PropertySummaryRow>>> {
    let start = Instant::now();
    let entity = Entity::new(input.clone())?;
    let summary = property_summary(&entity);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Property Summary (Cost, Financing, Gross and Net Yield)",
        &serde_json::json!({ "entity": entity.name() }),
        Vec::new(),
        elapsed,
        summary,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::LoanInput;
    use crate::property::{PropertyInput, RentalUnit};

    fn input() -> EntityInput {
        EntityInput {
            name: "SCI Horizon".into(),
            creation_year: 2025,
            share_capital: dec!(1000),
            partner_count: 3,
            crl_rate: dec!(0.025),
            accounting_fee: dec!(1500),
            banking_fee: dec!(500),
            properties: vec![PropertyInput {
                number: 1,
                name: "Grange".into(),
                purchase_year: 2026,
                purchase_price: dec!(90000),
                agency_fee: dec!(4000),
                notary_fee: dec!(7000),
                renovation_cost: dec!(10000),
                furniture_cost: dec!(3500),
                capital_contribution: dec!(12000),
                loan: Some(LoanInput {
                    principal: dec!(95000),
                    annual_rate: dec!(0.04),
                    term_years: 15,
                    partial_deferral_months: 6,
                    total_deferral_months: 0,
                    origination_fee: dec!(500),
                    guarantee_fee: dec!(900),
                }),
                units: vec![
                    RentalUnit::new(1, dec!(480), Some(dec!(30))),
                    RentalUnit::new(2, dec!(520), Some(dec!(34))),
                ],
                pno_insurance_rate: dec!(0.008),
                borrower_insurance_rate: dec!(0.003),
                property_tax: dec!(850),
                condo_charges: Decimal::ZERO,
                other_charges: dec!(300),
            }],
            contributions: Vec::new(),
            config: Default::default(),
        }
    }

    #[test]
    fn test_rows_cover_horizon_in_order() {
        let entity = Entity::new(input()).unwrap();
        let rows = project(&entity, 5);
        let years: Vec<Year> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2025, 2026, 2027, 2028, 2029]);
    }

    #[test]
    fn test_reserve_is_running_sum_of_net_results() {
        let entity = Entity::new(input()).unwrap();
        let rows = project(&entity, 12);
        let mut running = Decimal::ZERO;
        for row in &rows {
            assert_eq!(row.prior_reserve, running);
            running += row.net_result;
            assert_eq!(row.updated_reserve, running);
        }
    }

    #[test]
    fn test_year_before_first_purchase_only_has_fixed_fees() {
        let entity = Entity::new(input()).unwrap();
        let first = &project(&entity, 1)[0];
        assert_eq!(first.revenue, Decimal::ZERO);
        assert_eq!(first.operating_charges, dec!(2000));
        assert_eq!(first.pre_tax_result, dec!(-2000));
        assert_eq!(first.corporate_tax, Decimal::ZERO);
        assert_eq!(first.debt_service, Decimal::ZERO);
        assert_eq!(first.initial_contribution, dec!(1000));
    }

    #[test]
    fn test_split_views_match_merged_rows() {
        let entity = Entity::new(input()).unwrap();
        let rows = project(&entity, 8);
        let statements = income_statements(&entity, 8);
        let cash = treasury(&entity, 8);
        for ((row, s), c) in rows.iter().zip(&statements).zip(&cash) {
            assert_eq!(row.net_result, s.net_result);
            assert_eq!(row.interest, s.interest);
            assert_eq!(row.realized_treasury, c.realized_treasury);
            assert_eq!(row.updated_reserve, c.updated_reserve);
        }
    }

    #[test]
    fn test_property_summary_row() {
        let entity = Entity::new(input()).unwrap();
        let summary = property_summary(&entity);
        assert_eq!(summary.len(), 1);
        let row = &summary[0];
        assert_eq!(row.name, "Grange");
        assert_eq!(row.total_cost, dec!(114500));
        assert_eq!(row.borrowed_capital, dec!(95000));
        assert_eq!(row.loan_term_years, 15);
        assert_eq!(row.deferral, "Partial (6 months)");
        assert_eq!(row.unit_count, 2);
        assert_eq!(row.annual_revenue, dec!(12000));
        // 12,000 / 114,500 = 10.48%
        assert_eq!(row.gross_yield, dec!(10.48));
    }

    #[test]
    fn test_overview_totals() {
        let entity = Entity::new(input()).unwrap();
        let rows = project(&entity, 10);
        let overview = projection_overview(&entity, &rows);
        assert_eq!(overview.first_year, 2025);
        assert_eq!(overview.last_year, 2034);
        assert_eq!(overview.final_reserve, rows[9].updated_reserve);
        assert_eq!(
            overview.total_net_result,
            rows.iter().map(|r| r.net_result).sum::<Decimal>()
        );
        // 95,000 / 114,500
        assert_eq!(overview.debt_ratio, dec!(82.97));
    }

    #[test]
    fn test_run_projection_envelope() {
        let out = run_projection(&input(), Some(3)).unwrap();
        assert_eq!(out.result.rows.len(), 3);
        assert_eq!(out.result.entity, "SCI Horizon");
        assert!(out.methodology.contains("Projection"));
        // Creation year has no rent but pays fixed fees
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("Negative realized treasury")));
    }

    #[test]
    fn test_default_horizon_from_config() {
        let out = run_projection(&input(), None).unwrap();
        assert_eq!(out.result.rows.len(), 20);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        assert!(matches!(
            run_projection(&input(), Some(0)),
            Err(ProjectionError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_oversized_horizon_rejected() {
        for horizon in [MAX_HORIZON_YEARS + 1, u32::MAX] {
            match run_projection(&input(), Some(horizon)) {
                Err(ProjectionError::InvalidInput { field, .. }) => {
                    assert_eq!(field, "horizon_years")
                }
                other => panic!("expected horizon rejection, got {other:?}"),
            }
        }
        let out = run_projection(&input(), Some(MAX_HORIZON_YEARS)).unwrap();
        assert_eq!(out.result.rows.len(), MAX_HORIZON_YEARS as usize);
        assert_eq!(out.result.overview.last_year, 2124);
    }

    #[test]
    fn test_validation_runs_before_projection() {
        let mut bad = input();
        bad.properties[0].units.clear();
        assert!(matches!(
            run_projection(&bad, Some(5)),
            Err(ProjectionError::Validation(_))
        ));
    }
}
