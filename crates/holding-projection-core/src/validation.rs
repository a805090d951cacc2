//! Input checks run before any projection.
//!
//! Every problem is reported as a human-readable message; nothing here
//! returns early, so callers get the full list in one pass.

use rust_decimal::Decimal;

use crate::config::{MAX_YEAR, MIN_YEAR};
use crate::entity::EntityInput;
use crate::financing::loan::{MAX_ANNUAL_RATE, MAX_TERM_YEARS};
use crate::property::PropertyInput;
use crate::types::Year;

fn year_in_range(year: Year) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Collect validation messages for an entity and all of its properties.
pub fn validate_entity(input: &EntityInput) -> Vec<String> {
    let mut messages = Vec::new();

    if input.partner_count == 0 {
        messages.push("The entity must have at least one partner.".to_string());
    }
    if !year_in_range(input.creation_year) {
        messages.push(format!(
            "Creation year {} must lie between {MIN_YEAR} and {MAX_YEAR}.",
            input.creation_year
        ));
    }
    if input.share_capital < Decimal::ZERO {
        messages.push("Share capital cannot be negative.".to_string());
    }
    if input.crl_rate < Decimal::ZERO {
        messages.push("CRL rate cannot be negative.".to_string());
    }
    if input.accounting_fee < Decimal::ZERO || input.banking_fee < Decimal::ZERO {
        messages.push("Accounting and banking fees cannot be negative.".to_string());
    }
    if input.properties.is_empty() {
        messages.push("The entity must own at least one property to be analysed.".to_string());
    }

    for contribution in &input.contributions {
        if contribution.amount < Decimal::ZERO {
            messages.push(format!(
                "Contribution from {} in {} cannot be negative.",
                contribution.partner, contribution.year
            ));
        }
    }

    for property in &input.properties {
        messages.extend(validate_property(property));
    }

    messages
}

/// Collect validation messages for a single property.
pub fn validate_property(input: &PropertyInput) -> Vec<String> {
    let mut messages = Vec::new();
    let name = &input.name;

    if !year_in_range(input.purchase_year) {
        messages.push(format!(
            "{name}: purchase year {} must lie between {MIN_YEAR} and {MAX_YEAR}.",
            input.purchase_year
        ));
    }
    if input.purchase_price <= Decimal::ZERO {
        messages.push(format!("{name}: purchase price must be greater than zero."));
    }
    if input.notary_fee < Decimal::ZERO || input.agency_fee < Decimal::ZERO {
        messages.push(format!("{name}: fees cannot be negative."));
    }
    if input.renovation_cost < Decimal::ZERO || input.furniture_cost < Decimal::ZERO {
        messages.push(format!("{name}: renovation and furniture costs cannot be negative."));
    }
    if input.capital_contribution < Decimal::ZERO {
        messages.push(format!("{name}: capital contribution cannot be negative."));
    }
    if input.pno_insurance_rate < Decimal::ZERO || input.borrower_insurance_rate < Decimal::ZERO {
        messages.push(format!("{name}: insurance rates cannot be negative."));
    }
    if input.property_tax < Decimal::ZERO
        || input.condo_charges < Decimal::ZERO
        || input.other_charges < Decimal::ZERO
    {
        messages.push(format!("{name}: charges cannot be negative."));
    }

    if input.units.is_empty() {
        messages.push(format!("{name}: at least one rental unit is required."));
    }
    for unit in &input.units {
        if unit.monthly_rent <= Decimal::ZERO {
            messages.push(format!(
                "{name}: unit {} must have a positive monthly rent.",
                unit.number
            ));
        }
    }

    if let Some(loan) = &input.loan {
        if loan.principal < Decimal::ZERO {
            messages.push(format!("{name}: borrowed capital cannot be negative."));
        }
        if loan.annual_rate < Decimal::ZERO {
            messages.push(format!("{name}: loan rate cannot be negative."));
        } else if loan.annual_rate > MAX_ANNUAL_RATE {
            messages.push(format!(
                "{name}: loan rate {} exceeds the {MAX_ANNUAL_RATE} ceiling.",
                loan.annual_rate
            ));
        }
        if loan.term_years > MAX_TERM_YEARS {
            messages.push(format!(
                "{name}: loan term of {} years exceeds {MAX_TERM_YEARS} years.",
                loan.term_years
            ));
        }
        if loan.origination_fee < Decimal::ZERO || loan.guarantee_fee < Decimal::ZERO {
            messages.push(format!("{name}: loan fees cannot be negative."));
        }
    }

    messages
}
