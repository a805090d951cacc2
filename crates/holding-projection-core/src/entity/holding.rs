use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::ProjectionConfig;
use crate::error::ProjectionError;
use crate::property::{Property, PropertyInput};
use crate::types::{Money, Rate, Year};
use crate::validation::validate_entity;
use crate::ProjectionResult;

fn default_crl_rate() -> Rate {
    dec!(0.025)
}

fn default_accounting_fee() -> Money {
    dec!(1500)
}

fn default_banking_fee() -> Money {
    dec!(500)
}

/// A partner's current-account advance to the entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerContribution {
    pub year: Year,
    pub partner: String,
    pub amount: Money,
    #[serde(default)]
    pub interest_rate: Rate,
}

/// Holding entity description as received from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityInput {
    pub name: String,
    pub creation_year: Year,
    pub share_capital: Money,
    pub partner_count: u32,
    /// Rental revenue levy
    #[serde(default = "default_crl_rate")]
    pub crl_rate: Rate,
    #[serde(default = "default_accounting_fee")]
    pub accounting_fee: Money,
    #[serde(default = "default_banking_fee")]
    pub banking_fee: Money,
    #[serde(default)]
    pub properties: Vec<PropertyInput>,
    #[serde(default)]
    pub contributions: Vec<PartnerContribution>,
    #[serde(default)]
    pub config: ProjectionConfig,
}

impl EntityInput {
    pub fn add_property(&mut self, property: PropertyInput) {
        self.properties.push(property);
    }

    pub fn add_contribution(
        &mut self,
        year: Year,
        partner: impl Into<String>,
        amount: Money,
        interest_rate: Rate,
    ) {
        self.contributions.push(PartnerContribution {
            year,
            partner: partner.into(),
            amount,
            interest_rate,
        });
    }
}

/// The holding entity: owns its properties and partner contributions and is
/// read-only once built.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    name: String,
    creation_year: Year,
    share_capital: Money,
    partner_count: u32,
    crl_rate: Rate,
    accounting_fee: Money,
    banking_fee: Money,
    properties: Vec<Property>,
    contributions: Vec<PartnerContribution>,
    config: ProjectionConfig,
}

impl Entity {
    /// Validate the input and build the entity.
    ///
    /// Validation messages are returned together as
    /// [`ProjectionError::Validation`]; malformed loans surface as
    /// [`ProjectionError::StructuralInput`].
    pub fn new(input: EntityInput) -> ProjectionResult<Self> {
        let messages = validate_entity(&input);
        if !messages.is_empty() {
            tracing::warn!(
                entity = %input.name,
                count = messages.len(),
                "entity input rejected by validation"
            );
            return Err(ProjectionError::Validation(messages));
        }

        let properties = input
            .properties
            .into_iter()
            .map(Property::new)
            .collect::<ProjectionResult<Vec<_>>>()?;

        Ok(Self {
            name: input.name,
            creation_year: input.creation_year,
            share_capital: input.share_capital,
            partner_count: input.partner_count,
            crl_rate: input.crl_rate,
            accounting_fee: input.accounting_fee,
            banking_fee: input.banking_fee,
            properties,
            contributions: input.contributions,
            config: input.config,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn creation_year(&self) -> Year {
        self.creation_year
    }

    pub fn share_capital(&self) -> Money {
        self.share_capital
    }

    pub fn partner_count(&self) -> u32 {
        self.partner_count
    }

    pub fn crl_rate(&self) -> Rate {
        self.crl_rate
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn contributions(&self) -> &[PartnerContribution] {
        &self.contributions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Accounting plus banking fees, due every year.
    pub fn fixed_annual_charges(&self) -> Money {
        self.accounting_fee + self.banking_fee
    }

    /// Properties owned during `year`.
    pub fn active_properties(&self, year: Year) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(move |p| p.is_active(year))
    }

    /// Properties bought in exactly `year`.
    pub fn acquisitions_in(&self, year: Year) -> impl Iterator<Item = &Property> {
        self.properties
            .iter()
            .filter(move |p| p.purchase_year() == year)
    }

    /// Partner current-account advances tagged to `year`.
    pub fn contributions_in(&self, year: Year) -> Money {
        self.contributions
            .iter()
            .filter(|c| c.year == year)
            .map(|c| c.amount)
            .sum()
    }

    pub fn total_contributions(&self) -> Money {
        self.contributions.iter().map(|c| c.amount).sum()
    }

    pub fn total_acquisition_cost(&self) -> Money {
        self.properties.iter().map(Property::total_cost).sum()
    }

    pub fn total_borrowed(&self) -> Money {
        self.properties
            .iter()
            .map(Property::borrowed_capital)
            .sum::<Decimal>()
    }
}
