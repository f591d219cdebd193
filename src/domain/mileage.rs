//! Age-based mileage estimation, used when no odometer reading exists.

/// Annual mileage assumed per full year of vehicle age.
const MILES_PER_YEAR: i64 = 12_000;

/// Assumed mileage for a current-model-year vehicle.
const CURRENT_YEAR_MILES: i64 = 6_000;

/// Estimate mileage from model-year age.
///
/// Future model years estimate to zero; a vendor quote at zero miles is
/// preferable to a negative fabrication.
pub fn estimate_mileage(model_year: i32, current_year: i32) -> i64 {
    let year_diff = i64::from(current_year) - i64::from(model_year);
    if year_diff > 0 {
        year_diff * MILES_PER_YEAR
    } else if year_diff == 0 {
        CURRENT_YEAR_MILES
    } else {
        0
    }
}
