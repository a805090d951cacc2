use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;
use crate::types::{Money, Rate};
use crate::ProjectionResult;

/// Longest term accepted for a loan, in years.
pub const MAX_TERM_YEARS: u32 = 50;

/// Highest nominal annual rate accepted (100%).
pub const MAX_ANNUAL_RATE: Rate = Decimal::ONE;

/// Raw loan terms as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Capital borrowed
    pub principal: Money,
    /// Nominal annual rate as a decimal fraction (0.031 = 3.1%)
    pub annual_rate: Rate,
    pub term_years: u32,
    /// Initial months where only interest is paid
    #[serde(default)]
    pub partial_deferral_months: u32,
    /// Initial months where interest is capitalised and nothing is paid
    #[serde(default)]
    pub total_deferral_months: u32,
    #[serde(default)]
    pub origination_fee: Money,
    #[serde(default)]
    pub guarantee_fee: Money,
}

/// An amortising bank loan with optional deferral periods.
///
/// Only constructed through [`Loan::new`], which rejects deferrals that leave
/// no room for repayment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    principal: Money,
    annual_rate: Rate,
    term_years: u32,
    partial_deferral_months: u32,
    total_deferral_months: u32,
    origination_fee: Money,
    guarantee_fee: Money,
}

impl Loan {
    pub fn new(input: LoanInput) -> ProjectionResult<Self> {
        let term_months = input.term_years.checked_mul(12).ok_or_else(|| {
            ProjectionError::StructuralInput(format!(
                "loan term of {} years overflows the month count",
                input.term_years
            ))
        })?;
        if input.term_years > MAX_TERM_YEARS {
            return Err(ProjectionError::InvalidInput {
                field: "term_years".into(),
                reason: format!("loan term cannot exceed {MAX_TERM_YEARS} years"),
            });
        }
        if input.annual_rate < Decimal::ZERO || input.annual_rate > MAX_ANNUAL_RATE {
            return Err(ProjectionError::InvalidInput {
                field: "annual_rate".into(),
                reason: format!("annual rate must lie between 0 and {MAX_ANNUAL_RATE}"),
            });
        }
        let deferral = input
            .partial_deferral_months
            .max(input.total_deferral_months);

        if deferral > term_months {
            return Err(ProjectionError::StructuralInput(format!(
                "deferral of {deferral} months exceeds the {term_months}-month loan term"
            )));
        }
        if !input.principal.is_zero() && deferral == term_months {
            return Err(ProjectionError::StructuralInput(format!(
                "deferral of {deferral} months leaves no amortising period in a {term_months}-month term"
            )));
        }

        let loan = Self {
            principal: input.principal,
            annual_rate: input.annual_rate,
            term_years: input.term_years,
            partial_deferral_months: input.partial_deferral_months,
            total_deferral_months: input.total_deferral_months,
            origination_fee: input.origination_fee,
            guarantee_fee: input.guarantee_fee,
        };
        if loan.schedule_magnitude().is_none() {
            return Err(ProjectionError::StructuralInput(format!(
                "loan of {} over {term_months} months is too large to amortise",
                loan.principal
            )));
        }
        Ok(loan)
    }

    /// Upper bound of the total repaid over the term, or `None` when the
    /// capitalised balance, the compounding factor or the repayments do not
    /// fit in a `Decimal`.
    fn schedule_magnitude(&self) -> Option<Money> {
        let growth = Decimal::ONE.checked_add(self.monthly_rate())?;

        let mut balance = self.principal.abs();
        for _ in 0..self.total_deferral_months {
            balance = balance.checked_mul(growth)?;
        }
        let mut compound = Decimal::ONE;
        for _ in 0..self.amortizing_months() {
            compound = compound.checked_mul(growth)?;
        }

        // B * (1+r) * max((1+r)^n, 2) is never below the level instalment
        let payment_bound = balance
            .checked_mul(growth)?
            .checked_mul(compound.max(Decimal::TWO))?;
        payment_bound.checked_mul(Decimal::from(self.term_months()))
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn annual_rate(&self) -> Rate {
        self.annual_rate
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn partial_deferral_months(&self) -> u32 {
        self.partial_deferral_months
    }

    pub fn total_deferral_months(&self) -> u32 {
        self.total_deferral_months
    }

    pub fn origination_fee(&self) -> Money {
        self.origination_fee
    }

    pub fn guarantee_fee(&self) -> Money {
        self.guarantee_fee
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate / dec!(12)
    }

    pub fn term_months(&self) -> u32 {
        self.term_years * 12
    }

    /// Months before principal starts to amortise. The two deferral kinds
    /// overlap rather than add up.
    pub fn deferral_months(&self) -> u32 {
        self.partial_deferral_months.max(self.total_deferral_months)
    }

    pub fn amortizing_months(&self) -> u32 {
        self.term_months() - self.deferral_months()
    }

    /// One-off fees booked in the year the loan is taken out.
    pub fn fees(&self) -> Money {
        self.origination_fee + self.guarantee_fee
    }

    pub fn has_principal(&self) -> bool {
        self.principal > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> LoanInput {
        LoanInput {
            principal: dec!(100000),
            annual_rate: dec!(0.03),
            term_years: 10,
            partial_deferral_months: 0,
            total_deferral_months: 0,
            origination_fee: dec!(800),
            guarantee_fee: dec!(1200),
        }
    }

    #[test]
    fn test_derived_terms() {
        let loan = Loan::new(input()).unwrap();
        assert_eq!(loan.monthly_rate(), dec!(0.0025));
        assert_eq!(loan.term_months(), 120);
        assert_eq!(loan.amortizing_months(), 120);
        assert_eq!(loan.fees(), dec!(2000));
    }

    #[test]
    fn test_deferrals_overlap_not_add() {
        let mut raw = input();
        raw.partial_deferral_months = 18;
        raw.total_deferral_months = 12;
        let loan = Loan::new(raw).unwrap();
        assert_eq!(loan.deferral_months(), 18);
        assert_eq!(loan.amortizing_months(), 102);
    }

    #[test]
    fn test_deferral_beyond_term_rejected() {
        let mut raw = input();
        raw.total_deferral_months = 121;
        let err = Loan::new(raw).unwrap_err();
        assert!(matches!(err, ProjectionError::StructuralInput(_)));
    }

    #[test]
    fn test_deferral_consuming_whole_term_rejected() {
        let mut raw = input();
        raw.partial_deferral_months = 120;
        assert!(Loan::new(raw).is_err());
    }

    #[test]
    fn test_term_overflowing_month_count_rejected() {
        let mut raw = input();
        raw.term_years = 400_000_000;
        let err = Loan::new(raw).unwrap_err();
        assert!(matches!(err, ProjectionError::StructuralInput(_)));
    }

    #[test]
    fn test_term_above_limit_rejected() {
        let mut raw = input();
        raw.term_years = MAX_TERM_YEARS + 1;
        let err = Loan::new(raw).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput { ref field, .. } if field == "term_years"));

        let mut raw = input();
        raw.term_years = MAX_TERM_YEARS;
        assert!(Loan::new(raw).is_ok());
    }

    #[test]
    fn test_rate_outside_bounds_rejected() {
        let mut raw = input();
        raw.annual_rate = dec!(3);
        assert!(matches!(
            Loan::new(raw).unwrap_err(),
            ProjectionError::InvalidInput { ref field, .. } if field == "annual_rate"
        ));

        let mut raw = input();
        raw.annual_rate = dec!(-0.01);
        assert!(Loan::new(raw).is_err());

        let mut raw = input();
        raw.annual_rate = MAX_ANNUAL_RATE;
        raw.term_years = MAX_TERM_YEARS;
        assert!(Loan::new(raw).is_ok());
    }

    #[test]
    fn test_unrepresentable_capitalised_balance_rejected() {
        let mut raw = input();
        raw.principal = dec!(1000000000000000000000000000);
        raw.annual_rate = MAX_ANNUAL_RATE;
        raw.term_years = MAX_TERM_YEARS;
        raw.total_deferral_months = 599;
        let err = Loan::new(raw).unwrap_err();
        assert!(matches!(err, ProjectionError::StructuralInput(_)));
    }

    #[test]
    fn test_zero_principal_with_full_deferral_allowed() {
        let mut raw = input();
        raw.principal = Decimal::ZERO;
        raw.partial_deferral_months = 120;
        assert!(Loan::new(raw).is_ok());
    }
}
