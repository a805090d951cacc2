pub mod amortization;
pub mod loan;

pub use amortization::{
    annuity_payment, build_schedule, monthly_payment, run_schedule, total_interest,
    AmortizationEntry, AmortizationSchedule, LoanScheduleOutput, YearSlice,
};
pub use loan::{Loan, LoanInput, MAX_ANNUAL_RATE, MAX_TERM_YEARS};
