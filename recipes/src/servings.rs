//! Serving-size scaling.
//!
//! Ingredient amounts are stored for the recipe's base servings and scaled
//! linearly for display, rounded to two decimal places.

#[cfg(test)]
#[path = "servings_test.rs"]
mod servings_test;

/// Scale `amount` from `base_servings` to `target_servings`, rounded to
/// two decimals. A zero base leaves the amount unscaled.
#[must_use]
pub fn scale_amount(amount: f64, base_servings: u32, target_servings: u32) -> f64 {
    if base_servings == 0 {
        return round2(amount);
    }
    round2(amount * f64::from(target_servings) / f64::from(base_servings))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render an amount without trailing zeros (`2`, `1.5`, `0.33`).
#[must_use]
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", round2(amount));
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Next serving count for the `-` control. Never drops below one.
#[must_use]
pub fn decrement_servings(current: u32) -> u32 {
    current.saturating_sub(1).max(1)
}

/// Next serving count for the `+` control.
#[must_use]
pub fn increment_servings(current: u32) -> u32 {
    current.saturating_add(1)
}
