use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::depreciation::depreciation_for_year;
use crate::config::CorporateTaxRules;
use crate::entity::Entity;
use crate::property::Property;
use crate::types::{Money, Year};

/// Income statement of the whole entity for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub year: Year,
    /// Rents of properties owned during the year
    pub revenue: Money,
    /// Fixed fees, property charges and the revenue levy
    pub operating_charges: Money,
    /// Loan fees of properties bought this year
    pub exceptional_charges: Money,
    pub depreciation: Money,
    pub operating_result: Money,
    pub interest: Money,
    pub pre_tax_result: Money,
    pub corporate_tax: Money,
    pub net_result: Money,
}

/// Progressive corporate tax: reduced rate up to the threshold, standard rate
/// on the excess. Losses are not taxed.
pub fn corporate_tax(pre_tax_result: Money, rules: &CorporateTaxRules) -> Money {
    if pre_tax_result <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if pre_tax_result <= rules.threshold {
        return pre_tax_result * rules.reduced_rate;
    }
    rules.threshold * rules.reduced_rate + (pre_tax_result - rules.threshold) * rules.standard_rate
}

/// Rental revenue of the properties owned during `year`.
pub fn revenue(entity: &Entity, year: Year) -> Money {
    entity
        .active_properties(year)
        .map(Property::annual_revenue)
        .sum()
}

/// Operating charges excluding depreciation and interest.
pub fn operating_charges(entity: &Entity, year: Year) -> Money {
    let property_charges: Money = entity
        .active_properties(year)
        .map(Property::annual_charges)
        .sum();
    entity.fixed_annual_charges() + property_charges + revenue(entity, year) * entity.crl_rate()
}

/// Depreciation of every asset base of every property owned during `year`.
pub fn depreciation(entity: &Entity, year: Year) -> Money {
    let durations = &entity.config().depreciation;
    entity
        .active_properties(year)
        .map(|p| depreciation_for_year(p, year, durations).total())
        .sum()
}

/// Loan fees, booked once in the purchase year.
pub fn exceptional_charges(entity: &Entity, year: Year) -> Money {
    entity.acquisitions_in(year).map(Property::loan_fees).sum()
}

/// Loan interest of the year, taken from the 12-month block matching each
/// loan's age.
pub fn interest(entity: &Entity, year: Year) -> Money {
    entity
        .active_properties(year)
        .map(|p| p.interest_in(year))
        .sum()
}

/// Build the income statement of `entity` for `year`.
pub fn income_statement(entity: &Entity, year: Year) -> IncomeStatement {
    let revenue = revenue(entity, year);
    let operating_charges = operating_charges(entity, year);
    let depreciation = depreciation(entity, year);
    let exceptional_charges = exceptional_charges(entity, year);
    let interest = interest(entity, year);

    let operating_result = revenue - operating_charges - depreciation - exceptional_charges;
    let pre_tax_result = operating_result - interest;
    let corporate_tax = corporate_tax(pre_tax_result, &entity.config().tax);
    let net_result = pre_tax_result - corporate_tax;

    IncomeStatement {
        year,
        revenue,
        operating_charges,
        exceptional_charges,
        depreciation,
        operating_result,
        interest,
        pre_tax_result,
        corporate_tax,
        net_result,
    }
}
