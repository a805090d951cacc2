use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::loan::{Loan, LoanInput};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::ProjectionResult;

/// One month of an amortisation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// 1-based month since the loan was drawn
    pub period: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Sums over a 12-month block of the schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSlice {
    pub interest: Money,
    pub principal: Money,
    pub payments: Money,
}

/// Full month-by-month schedule of a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Level instalment paid once amortisation starts
    pub monthly_payment: Money,
    pub entries: Vec<AmortizationEntry>,
}

impl AmortizationSchedule {
    fn empty() -> Self {
        Self {
            monthly_payment: Decimal::ZERO,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_interest(&self) -> Money {
        self.entries.iter().map(|e| e.interest).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.entries.iter().map(|e| e.principal).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.entries.iter().map(|e| e.payment).sum()
    }

    /// Totals for the given 1-based loan-age year, i.e. months
    /// `(age-1)*12+1 ..= age*12`, clipped to the schedule length.
    pub fn year_slice(&self, age: u32) -> YearSlice {
        if age == 0 {
            return YearSlice::default();
        }
        let start = ((age - 1) as usize) * 12;
        let end = ((age as usize) * 12).min(self.entries.len());
        if start >= end {
            return YearSlice::default();
        }

        self.entries[start..end]
            .iter()
            .fold(YearSlice::default(), |mut acc, e| {
                acc.interest += e.interest;
                acc.principal += e.principal;
                acc.payments += e.payment;
                acc
            })
    }

    /// Outstanding capital once the given loan-age year is over.
    pub fn balance_at_end_of_year(&self, age: u32) -> Money {
        match self.entries.first() {
            None => Decimal::ZERO,
            Some(first) if age == 0 => first.opening_balance,
            Some(_) => {
                let idx = ((age as usize) * 12).min(self.entries.len()) - 1;
                self.entries[idx].closing_balance
            }
        }
    }
}

/// Fixed annuity repaying `balance` over `months` at `monthly_rate`:
/// B * r * (1+r)^n / ((1+r)^n - 1), or B / n when the rate is zero.
pub fn annuity_payment(balance: Money, monthly_rate: Rate, months: u32) -> Money {
    if months == 0 {
        return Decimal::ZERO;
    }
    if monthly_rate.is_zero() {
        return balance / Decimal::from(months);
    }

    // (1 + r)^n via iterative multiplication
    let mut compound = Decimal::ONE;
    for _ in 0..months {
        compound *= Decimal::ONE + monthly_rate;
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return balance / Decimal::from(months);
    }
    balance * monthly_rate * compound / denominator
}

/// Level instalment paid once the deferral window is over.
///
/// The annuity runs on the balance at the start of amortisation, so interest
/// capitalised during a total deferral is repaid over the remaining months.
pub fn monthly_payment(loan: &Loan) -> Money {
    if !loan.has_principal() {
        return Decimal::ZERO;
    }
    let rate = loan.monthly_rate();
    let mut balance = loan.principal();
    for _ in 0..loan.total_deferral_months() {
        balance += balance * rate;
    }
    annuity_payment(balance, rate, loan.amortizing_months())
}

/// Build the month-by-month amortisation table covering the whole term.
pub fn build_schedule(loan: &Loan) -> AmortizationSchedule {
    if !loan.has_principal() {
        return AmortizationSchedule::empty();
    }

    let rate = loan.monthly_rate();
    let term = loan.term_months();
    let total_deferral = loan.total_deferral_months();
    let partial_deferral = loan.partial_deferral_months();
    let payment = monthly_payment(loan);

    let mut entries = Vec::with_capacity(term as usize);
    let mut balance = loan.principal();

    for period in 1..=term {
        let opening = balance;
        let interest = opening * rate;

        let entry = if period <= total_deferral {
            // Interest is capitalised, nothing is paid
            balance += interest;
            AmortizationEntry {
                period,
                opening_balance: opening,
                payment: Decimal::ZERO,
                interest,
                principal: Decimal::ZERO,
                closing_balance: balance,
            }
        } else if period <= partial_deferral {
            AmortizationEntry {
                period,
                opening_balance: opening,
                payment: interest,
                interest,
                principal: Decimal::ZERO,
                closing_balance: balance,
            }
        } else {
            let mut principal = payment - interest;
            // Absorb rounding drift so the table closes at exactly zero
            if principal > opening || period == term {
                principal = opening;
            }
            balance = opening - principal;
            AmortizationEntry {
                period,
                opening_balance: opening,
                payment,
                interest,
                principal,
                closing_balance: balance,
            }
        };
        entries.push(entry);
    }

    tracing::debug!(
        principal = %loan.principal(),
        months = term,
        payment = %payment,
        "built amortization schedule"
    );

    AmortizationSchedule {
        monthly_payment: payment,
        entries,
    }
}

/// Interest paid over the life of the loan.
pub fn total_interest(loan: &Loan) -> Money {
    build_schedule(loan).total_interest()
}

/// Loan table with its headline totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanScheduleOutput {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub fees: Money,
    pub entries: Vec<AmortizationEntry>,
}

/// Build a loan from raw terms and return its full amortisation table.
pub fn run_schedule(input: &LoanInput) -> ProjectionResult<ComputationOutput<LoanScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let loan = Loan::new(input.clone())?;
    if !loan.has_principal() {
        warnings.push("Zero principal: no schedule is produced".into());
    }
    let schedule = build_schedule(&loan);

    let output = LoanScheduleOutput {
        monthly_payment: schedule.monthly_payment,
        total_interest: schedule.total_interest(),
        total_paid: schedule.total_paid(),
        fees: loan.fees(),
        entries: schedule.entries,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Annuity Loan Amortisation with Deferral",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::loan::LoanInput;
    use rust_decimal_macros::dec;

    fn loan(principal: Money, rate: Rate, years: u32, partial: u32, total: u32) -> Loan {
        Loan::new(LoanInput {
            principal,
            annual_rate: rate,
            term_years: years,
            partial_deferral_months: partial,
            total_deferral_months: total,
            origination_fee: Decimal::ZERO,
            guarantee_fee: Decimal::ZERO,
        })
        .unwrap()
    }

    #[test]
    fn test_reference_loan_payment() {
        // 208,157 at 3.1% over 20 years => ~1,164.88 per month
        let l = loan(dec!(208157), dec!(0.031), 20, 0, 0);
        let pmt = monthly_payment(&l);
        assert!(
            (pmt - dec!(1164.8817)).abs() < dec!(0.001),
            "Expected ~1164.88, got {pmt}"
        );
    }

    #[test]
    fn test_schedule_has_term_length_and_closes_at_zero() {
        let l = loan(dec!(208157), dec!(0.031), 20, 0, 0);
        let sched = build_schedule(&l);
        assert_eq!(sched.len(), 240);
        assert_eq!(sched.entries[0].period, 1);
        assert_eq!(sched.entries[239].period, 240);
        assert!(sched.entries[239].closing_balance.abs() < dec!(0.01));
    }

    #[test]
    fn test_first_month_split() {
        let l = loan(dec!(100000), dec!(0.06), 10, 0, 0);
        let sched = build_schedule(&l);
        let first = &sched.entries[0];
        assert_eq!(first.opening_balance, dec!(100000));
        assert_eq!(first.interest, dec!(500));
        assert_eq!(first.principal, first.payment - dec!(500));
        assert_eq!(first.closing_balance, dec!(100000) - first.principal);
    }

    #[test]
    fn test_total_interest_reference_loan() {
        let l = loan(dec!(208157), dec!(0.031), 20, 0, 0);
        let interest = total_interest(&l);
        assert!(
            (interest - dec!(71414.62)).abs() < dec!(0.05),
            "Expected ~71414.62, got {interest}"
        );
    }

    #[test]
    fn test_zero_principal_yields_empty_schedule() {
        let l = loan(Decimal::ZERO, dec!(0.03), 20, 0, 0);
        let sched = build_schedule(&l);
        assert!(sched.is_empty());
        assert_eq!(sched.monthly_payment, Decimal::ZERO);
        assert_eq!(total_interest(&l), Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_loan() {
        let l = loan(dec!(120000), Decimal::ZERO, 10, 0, 0);
        let sched = build_schedule(&l);
        assert_eq!(sched.monthly_payment, dec!(1000));
        assert_eq!(sched.total_principal(), dec!(120000));
        assert_eq!(sched.total_interest(), Decimal::ZERO);
        assert_eq!(sched.entries[119].closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_uneven_division_still_repays_principal_exactly() {
        let l = loan(dec!(100000), Decimal::ZERO, 20, 0, 0);
        let sched = build_schedule(&l);
        assert!((sched.total_principal() - dec!(100000)).abs() < dec!(0.0000000001));
        assert_eq!(sched.entries.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_with_deferral_uses_effective_span() {
        let l = loan(dec!(96000), Decimal::ZERO, 10, 24, 0);
        assert_eq!(monthly_payment(&l), dec!(1000));
    }

    #[test]
    fn test_partial_deferral_pays_interest_only() {
        let l = loan(dec!(100000), dec!(0.06), 10, 6, 0);
        let sched = build_schedule(&l);
        for e in &sched.entries[..6] {
            assert_eq!(e.payment, dec!(500));
            assert_eq!(e.interest, dec!(500));
            assert_eq!(e.principal, Decimal::ZERO);
            assert_eq!(e.closing_balance, dec!(100000));
        }
        assert!(sched.entries[6].principal > Decimal::ZERO);
        assert!(sched.entries[119].closing_balance.abs() < dec!(0.01));
        // Annuity runs over the 114 remaining months
        assert_eq!(
            sched.monthly_payment,
            annuity_payment(dec!(100000), dec!(0.005), 114)
        );
    }

    #[test]
    fn test_total_deferral_capitalises_then_amortises() {
        let l = loan(dec!(100000), dec!(0.03), 10, 0, 12);
        let sched = build_schedule(&l);
        let mut previous = dec!(100000);
        for e in &sched.entries[..12] {
            assert_eq!(e.payment, Decimal::ZERO);
            assert_eq!(e.principal, Decimal::ZERO);
            assert!(e.closing_balance > previous);
            previous = e.closing_balance;
        }
        assert!(
            (previous - dec!(103041.60)).abs() < dec!(0.01),
            "Expected ~103041.60 after capitalisation, got {previous}"
        );
        assert!((sched.monthly_payment - dec!(1089.86)).abs() < dec!(0.01));
        assert_eq!(sched.entries[12].payment, sched.monthly_payment);
        assert!(sched.entries[119].closing_balance.abs() < dec!(0.01));
    }

    #[test]
    fn test_total_then_partial_deferral() {
        let l = loan(dec!(50000), dec!(0.024), 15, 18, 6);
        let sched = build_schedule(&l);
        let capitalised = sched.entries[5].closing_balance;
        for e in &sched.entries[6..18] {
            assert_eq!(e.payment, e.interest);
            assert_eq!(e.closing_balance, capitalised);
        }
        assert!(sched.entries[179].closing_balance.abs() < dec!(0.01));
    }

    #[test]
    fn test_year_slice_clips_to_schedule() {
        let l = loan(dec!(60000), dec!(0.04), 2, 0, 0);
        let sched = build_schedule(&l);
        let y1 = sched.year_slice(1);
        let y2 = sched.year_slice(2);
        assert_eq!(y1.interest + y2.interest, sched.total_interest());
        assert_eq!(sched.year_slice(3), YearSlice::default());
        assert_eq!(sched.year_slice(0), YearSlice::default());
    }

    #[test]
    fn test_run_schedule_envelope() {
        let out = run_schedule(&LoanInput {
            principal: dec!(24000),
            annual_rate: Decimal::ZERO,
            term_years: 2,
            partial_deferral_months: 0,
            total_deferral_months: 0,
            origination_fee: dec!(150),
            guarantee_fee: dec!(250),
        })
        .unwrap();
        assert_eq!(out.result.monthly_payment, dec!(1000));
        assert_eq!(out.result.total_paid, dec!(24000));
        assert_eq!(out.result.fees, dec!(400));
        assert_eq!(out.result.entries.len(), 24);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_run_schedule_rejects_malformed_loan() {
        let err = run_schedule(&LoanInput {
            principal: dec!(24000),
            annual_rate: dec!(0.02),
            term_years: 2,
            partial_deferral_months: 30,
            total_deferral_months: 0,
            origination_fee: Decimal::ZERO,
            guarantee_fee: Decimal::ZERO,
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_balance_at_end_of_year() {
        let l = loan(dec!(60000), dec!(0.04), 2, 0, 0);
        let sched = build_schedule(&l);
        assert_eq!(sched.balance_at_end_of_year(0), dec!(60000));
        assert_eq!(
            sched.balance_at_end_of_year(1),
            sched.entries[11].closing_balance
        );
        assert_eq!(sched.balance_at_end_of_year(5), Decimal::ZERO);
    }
}
