use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounting::{income_statement, IncomeStatement};
use crate::entity::Entity;
use crate::property::Property;
use crate::types::{Money, Year};

/// Cash movements of one year and the carried accounting reserve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub year: Year,
    pub cash_inflow: Money,
    pub cash_outflow: Money,
    /// Loan instalments included in `cash_outflow`
    pub debt_service: Money,
    /// Loan capital still owed at year end
    pub outstanding_debt: Money,
    pub cash_flow: Money,
    /// Capital and partner advances, creation year only
    pub initial_contribution: Money,
    /// Entity capital put into properties bought this year
    pub property_capital_outflow: Money,
    pub realized_treasury: Money,
    pub prior_reserve: Money,
    pub net_result: Money,
    /// Prior reserve plus net result; accumulates results, not cash
    pub updated_reserve: Money,
}

/// Twelve instalments of every loan on properties owned during `year`.
pub fn annual_debt_service(entity: &Entity, year: Year) -> Money {
    entity
        .active_properties(year)
        .map(Property::annual_debt_service)
        .sum()
}

/// Capital still owed on every loan of properties owned during `year`.
pub fn outstanding_debt(entity: &Entity, year: Year) -> Money {
    entity
        .active_properties(year)
        .map(|p| p.outstanding_debt_in(year))
        .sum()
}

/// Share capital, partner advances and property contributions, counted only
/// in the creation year.
pub fn initial_contribution(entity: &Entity, year: Year) -> Money {
    if year != entity.creation_year() {
        return Decimal::ZERO;
    }
    entity.share_capital() + entity.contributions_in(year) + property_capital_outflow(entity, year)
}

/// Capital the entity contributes to properties bought in exactly `year`.
pub fn property_capital_outflow(entity: &Entity, year: Year) -> Money {
    entity
        .acquisitions_in(year)
        .map(Property::capital_contribution)
        .sum()
}

/// Derive the cash statement from an already computed income statement.
pub fn cash_flow_from_statement(
    entity: &Entity,
    statement: &IncomeStatement,
    prior_reserve: Money,
) -> CashFlowStatement {
    let year = statement.year;
    let debt_service = annual_debt_service(entity, year);

    let cash_inflow = statement.revenue;
    let cash_outflow = statement.operating_charges
        + statement.exceptional_charges
        + statement.corporate_tax
        + debt_service;

    let initial_contribution = initial_contribution(entity, year);
    let property_capital_outflow = property_capital_outflow(entity, year);

    let cash_flow = cash_inflow - cash_outflow;
    let realized_treasury = cash_flow + initial_contribution - property_capital_outflow;
    let updated_reserve = prior_reserve + statement.net_result;

    CashFlowStatement {
        year,
        cash_inflow,
        cash_outflow,
        debt_service,
        outstanding_debt: outstanding_debt(entity, year),
        cash_flow,
        initial_contribution,
        property_capital_outflow,
        realized_treasury,
        prior_reserve,
        net_result: statement.net_result,
        updated_reserve,
    }
}

/// Cash movements of `entity` for `year`, carrying `prior_reserve` forward.
pub fn cash_flow_for_year(entity: &Entity, year: Year, prior_reserve: Money) -> CashFlowStatement {
    let statement = income_statement(entity, year);
    cash_flow_from_statement(entity, &statement, prior_reserve)
}
