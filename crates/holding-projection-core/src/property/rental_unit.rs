use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// A let unit (flat, studio, shop) inside a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalUnit {
    pub number: u32,
    pub monthly_rent: Money,
    /// Floor area in square metres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_area: Option<Decimal>,
}

impl RentalUnit {
    pub fn new(number: u32, monthly_rent: Money, floor_area: Option<Decimal>) -> Self {
        Self {
            number,
            monthly_rent,
            floor_area,
        }
    }

    pub fn annual_rent(&self) -> Money {
        self.monthly_rent * dec!(12)
    }
}
