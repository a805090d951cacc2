pub mod asset;
pub mod rental_unit;

pub use asset::{Property, PropertyInput};
pub use rental_unit::RentalUnit;
