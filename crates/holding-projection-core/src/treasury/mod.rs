pub mod cash_flow;

pub use cash_flow::{
    cash_flow_for_year, cash_flow_from_statement, outstanding_debt, CashFlowStatement,
};
