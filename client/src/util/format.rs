//! Display formatting for recipe metadata.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// `"15 min"`, `"1 h"`, `"1 h 20 min"`.
pub fn minutes_label(minutes: u32) -> String {
    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}

/// One chili per spice level, or `"Not spicy"`.
pub fn spicy_label(level: u8) -> String {
    if level == 0 { "Not spicy".to_owned() } else { "🌶".repeat(usize::from(level)) }
}

/// `"4 servings"`, `"1 serving"`.
pub fn servings_label(servings: u32) -> String {
    if servings == 1 { "1 serving".to_owned() } else { format!("{servings} servings") }
}
