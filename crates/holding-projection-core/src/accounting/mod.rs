pub mod corporate_tax;
pub mod depreciation;

pub use corporate_tax::{corporate_tax, income_statement, IncomeStatement};
pub use depreciation::{depreciation_for_year, DepreciationBreakdown};
