use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::DepreciationDurations;
use crate::property::Property;
use crate::types::{Money, Year};

/// Depreciation charged in one year, per asset base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepreciationBreakdown {
    pub building: Money,
    pub renovation: Money,
    pub furniture: Money,
    pub notary_fees: Money,
    pub agency_fees: Money,
}

impl DepreciationBreakdown {
    pub fn total(&self) -> Money {
        self.building + self.renovation + self.furniture + self.notary_fees + self.agency_fees
    }
}

/// Straight-line charge for holding year `age` of an asset worth `amount`
/// depreciated over `duration` years.
fn straight_line(amount: Money, duration: u32, age: i64) -> Money {
    if amount.is_zero() || duration == 0 {
        return Decimal::ZERO;
    }
    if (1..=i64::from(duration)).contains(&age) {
        amount / Decimal::from(duration)
    } else {
        Decimal::ZERO
    }
}

/// Depreciation of each asset base of `property` for calendar `year`.
///
/// The acquisition year counts as a full year 1; there is no pro-rating. The
/// building base excludes renovation, which runs on its own schedule.
pub fn depreciation_for_year(
    property: &Property,
    year: Year,
    durations: &DepreciationDurations,
) -> DepreciationBreakdown {
    let age = i64::from(year) - i64::from(property.purchase_year()) + 1;
    let building_base = property.purchase_price() - property.renovation_cost();

    DepreciationBreakdown {
        building: straight_line(building_base, durations.building, age),
        renovation: straight_line(property.renovation_cost(), durations.renovation, age),
        furniture: straight_line(property.furniture_cost(), durations.furniture, age),
        notary_fees: straight_line(property.notary_fee(), durations.notary_fees, age),
        agency_fees: straight_line(property.agency_fee(), durations.agency_fees, age),
    }
}
