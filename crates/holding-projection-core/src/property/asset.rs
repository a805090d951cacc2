use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::rental_unit::RentalUnit;
use crate::financing::{build_schedule, AmortizationSchedule, Loan, LoanInput};
use crate::types::{Money, Rate, Year};
use crate::ProjectionResult;

fn default_pno_rate() -> Rate {
    dec!(0.02)
}

fn default_borrower_insurance_rate() -> Rate {
    dec!(0.0015)
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Acquisition, financing and operating parameters of one property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInput {
    #[serde(default)]
    pub number: u32,
    pub name: String,
    pub purchase_year: Year,
    pub purchase_price: Money,
    pub agency_fee: Money,
    pub notary_fee: Money,
    #[serde(default)]
    pub renovation_cost: Money,
    #[serde(default)]
    pub furniture_cost: Money,
    /// Entity cash put into the purchase
    #[serde(default)]
    pub capital_contribution: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan: Option<LoanInput>,
    #[serde(default)]
    pub units: Vec<RentalUnit>,
    /// Landlord (PNO) insurance, applied to the purchase price
    #[serde(default = "default_pno_rate")]
    pub pno_insurance_rate: Rate,
    /// Borrower insurance, applied to the borrowed capital
    #[serde(default = "default_borrower_insurance_rate")]
    pub borrower_insurance_rate: Rate,
    #[serde(default)]
    pub property_tax: Money,
    #[serde(default)]
    pub condo_charges: Money,
    #[serde(default)]
    pub other_charges: Money,
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

/// A property owned by the entity, with its loan schedule built once at
/// construction.
#[derive(Debug, Clone, Serialize)]
pub struct Property {
    number: u32,
    name: String,
    purchase_year: Year,
    purchase_price: Money,
    agency_fee: Money,
    notary_fee: Money,
    renovation_cost: Money,
    furniture_cost: Money,
    capital_contribution: Money,
    loan: Option<Loan>,
    #[serde(skip)]
    schedule: Option<AmortizationSchedule>,
    units: Vec<RentalUnit>,
    pno_insurance_rate: Rate,
    borrower_insurance_rate: Rate,
    property_tax: Money,
    condo_charges: Money,
    other_charges: Money,
}

impl Property {
    pub fn new(input: PropertyInput) -> ProjectionResult<Self> {
        let loan = input.loan.map(Loan::new).transpose()?;
        let schedule = loan.as_ref().map(build_schedule);

        Ok(Self {
            number: input.number,
            name: input.name,
            purchase_year: input.purchase_year,
            purchase_price: input.purchase_price,
            agency_fee: input.agency_fee,
            notary_fee: input.notary_fee,
            renovation_cost: input.renovation_cost,
            furniture_cost: input.furniture_cost,
            capital_contribution: input.capital_contribution,
            loan,
            schedule,
            units: input.units,
            pno_insurance_rate: input.pno_insurance_rate,
            borrower_insurance_rate: input.borrower_insurance_rate,
            property_tax: input.property_tax,
            condo_charges: input.condo_charges,
            other_charges: input.other_charges,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn purchase_year(&self) -> Year {
        self.purchase_year
    }

    pub fn purchase_price(&self) -> Money {
        self.purchase_price
    }

    pub fn agency_fee(&self) -> Money {
        self.agency_fee
    }

    pub fn notary_fee(&self) -> Money {
        self.notary_fee
    }

    pub fn renovation_cost(&self) -> Money {
        self.renovation_cost
    }

    pub fn furniture_cost(&self) -> Money {
        self.furniture_cost
    }

    pub fn capital_contribution(&self) -> Money {
        self.capital_contribution
    }

    pub fn loan(&self) -> Option<&Loan> {
        self.loan.as_ref()
    }

    /// Amortisation table of the loan, `None` without financing.
    pub fn schedule(&self) -> Option<&AmortizationSchedule> {
        self.schedule.as_ref()
    }

    pub fn units(&self) -> &[RentalUnit] {
        &self.units
    }

    pub fn property_tax(&self) -> Money {
        self.property_tax
    }

    // -- Acquisition ---------------------------------------------------------

    /// Price + agency fee + notary fee + renovation + furniture.
    pub fn total_cost(&self) -> Money {
        self.purchase_price
            + self.agency_fee
            + self.notary_fee
            + self.renovation_cost
            + self.furniture_cost
    }

    pub fn borrowed_capital(&self) -> Money {
        self.loan.as_ref().map_or(Decimal::ZERO, Loan::principal)
    }

    pub fn loan_fees(&self) -> Money {
        self.loan.as_ref().map_or(Decimal::ZERO, Loan::fees)
    }

    /// Amount left to finance once the entity's contribution is applied.
    pub fn financing_need(&self) -> Money {
        self.total_cost() + self.loan_fees() - self.capital_contribution
    }

    // -- Operations ----------------------------------------------------------

    pub fn monthly_revenue(&self) -> Money {
        self.units.iter().map(|u| u.monthly_rent).sum()
    }

    pub fn annual_revenue(&self) -> Money {
        self.units.iter().map(RentalUnit::annual_rent).sum()
    }

    pub fn pno_insurance(&self) -> Money {
        self.purchase_price * self.pno_insurance_rate
    }

    pub fn borrower_insurance(&self) -> Money {
        self.borrowed_capital() * self.borrower_insurance_rate
    }

    /// Recurring charges of the property, loan service excluded.
    pub fn annual_charges(&self) -> Money {
        self.pno_insurance()
            + self.borrower_insurance()
            + self.property_tax
            + self.condo_charges
            + self.other_charges
    }

    /// Twelve level instalments of the loan.
    pub fn annual_debt_service(&self) -> Money {
        self.schedule
            .as_ref()
            .map_or(Decimal::ZERO, |s| s.monthly_payment * dec!(12))
    }

    /// Owned and let during `year` (the purchase year counts in full).
    pub fn is_active(&self, year: Year) -> bool {
        self.purchase_year <= year
    }

    /// 1-based holding year, `None` before purchase.
    pub fn age_in(&self, year: Year) -> Option<u32> {
        if !self.is_active(year) {
            return None;
        }
        u32::try_from(i64::from(year) - i64::from(self.purchase_year) + 1).ok()
    }

    /// Loan interest accrued during the given calendar year.
    pub fn interest_in(&self, year: Year) -> Money {
        match (self.age_in(year), self.schedule.as_ref()) {
            (Some(age), Some(schedule)) => schedule.year_slice(age).interest,
            _ => Decimal::ZERO,
        }
    }

    /// Loan capital still owed once the given calendar year is over.
    pub fn outstanding_debt_in(&self, year: Year) -> Money {
        match (self.age_in(year), self.schedule.as_ref()) {
            (Some(age), Some(schedule)) => schedule.balance_at_end_of_year(age),
            _ => Decimal::ZERO,
        }
    }

    // -- Yields --------------------------------------------------------------

    /// Annual revenue over total cost, in percent.
    pub fn gross_yield(&self) -> Decimal {
        let cost = self.total_cost();
        if cost.is_zero() {
            return Decimal::ZERO;
        }
        self.annual_revenue() / cost * dec!(100)
    }

    /// Revenue net of charges and debt service over total cost, in percent.
    pub fn net_yield(&self) -> Decimal {
        let cost = self.total_cost();
        if cost.is_zero() {
            return Decimal::ZERO;
        }
        let net = self.annual_revenue() - self.annual_charges() - self.annual_debt_service();
        net / cost * dec!(100)
    }

    /// Human-readable deferral of the loan; a total deferral takes precedence.
    pub fn deferral_description(&self) -> String {
        match &self.loan {
            Some(l) if l.total_deferral_months() > 0 => {
                format!("Total ({} months)", l.total_deferral_months())
            }
            Some(l) if l.partial_deferral_months() > 0 => {
                format!("Partial ({} months)", l.partial_deferral_months())
            }
            _ => "None".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
