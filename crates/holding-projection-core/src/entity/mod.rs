pub mod holding;
pub mod projection;

pub use holding::{Entity, EntityInput, PartnerContribution};
pub use projection::{
    income_statements, project, projection_overview, property_summary, run_income_statements,
    run_projection, run_property_summary, run_treasury, treasury, ProjectionOutput,
    ProjectionOverview, ProjectionRow, PropertySummaryRow,
};
