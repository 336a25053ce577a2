use crate::ledger::GradeCell;

/// Shown in place of a grade that has not been recorded.
pub const UNGRADED_MARKER: &str = "—";

/// True when `value` sits exactly halfway between two hundredths.
///
/// Such values are always odd multiples of 1/8, and multiplying by 8 is exact.
fn is_hundredths_tie(value: f64) -> bool {
    let eighths = value.abs() * 8.0;
    eighths.fract() == 0.0 && eighths % 2.0 == 1.0
}

/// Magnitude from which grades switch to exponent notation.
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Out-of-range values: `Infinity`, `NaN`, and `1e+21` style exponents.
fn format_out_of_range(value: f64) -> Option<String> {
    if value.is_nan() {
        return Some("NaN".to_string());
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return Some(format!("{sign}Infinity"));
    }
    if value.abs() >= EXPONENT_THRESHOLD {
        return Some(format!("{:e}", value).replacen('e', "e+", 1));
    }
    None
}

/// Whole numbers render without decimals, anything else with exactly two,
/// rounding half away from zero.
pub fn format_grade(value: f64) -> String {
    if let Some(text) = format_out_of_range(value) {
        return text;
    }
    // -0.0 + 0.0 == +0.0
    let value = value + 0.0;
    if value % 1.0 == 0.0 {
        return format!("{:.0}", value);
    }
    if is_hundredths_tie(value) {
        let rounded = ((value.abs() * 100.0) + 0.5).floor() / 100.0;
        return format!("{:.2}", rounded.copysign(value));
    }
    format!("{:.2}", value)
}

/// Renders a topic weight the way the category filter buttons show it.
pub fn format_weight(weight: f64) -> String {
    format!("{}", weight + 0.0)
}

/// Renders one ledger cell; ungraded or unusable values become `marker`.
pub fn format_cell(cell: GradeCell<'_>, marker: &str) -> String {
    match cell.score() {
        Some(v) => format_grade(v),
        None => marker.to_string(),
    }
}
