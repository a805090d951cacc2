pub mod financing;
pub mod projection;
