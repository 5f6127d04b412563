//! Text normalization for column names and categorical values.
//!
//! Source spreadsheets arrive with inconsistent header formatting
//! ("Car Type", "car_type", "CarType"); everything downstream looks
//! columns up by the canonical form instead.

/// Canonical column name: lowercase, alphanumeric characters only.
///
/// "Car Type", " car_type " and "CarType" all map to "cartype".
/// Idempotent: `canon(canon(s)) == canon(s)`.
pub fn canon(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Cleanup for categorical cell values: trim, collapse whitespace runs
/// to a single space, lowercase.  Matches the treatment the scenario,
/// car-type and indicator columns need before filtering.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for c in text.trim().chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.extend(c.to_lowercase());
            last_was_space = false;
        }
    }
    out
}
