use super::value::TagValue;

/// Convert a degrees/minutes/seconds triple plus hemisphere reference to
/// signed decimal degrees.
///
/// Returns `None` unless `dms` holds exactly three elements. An element that
/// fails numeric conversion counts as zero. `S` and `W` negate the result.
pub fn dms_to_decimal(dms: &TagValue, reference: &str) -> Option<f64> {
    let parts = dms.components()?;
    let [degrees, minutes, seconds] = parts.as_slice() else {
        return None;
    };

    let degrees = degrees.unwrap_or(0.0);
    let minutes = minutes.unwrap_or(0.0);
    let seconds = seconds.unwrap_or(0.0);

    let mut coord = degrees + minutes / 60.0 + seconds / 3600.0;

    if is_negative_hemisphere(reference) {
        coord = -coord;
    }

    Some(coord)
}

fn is_negative_hemisphere(reference: &str) -> bool {
    matches!(reference.trim_matches(|c: char| c == '\0' || c.is_whitespace()), "S" | "W")
}
