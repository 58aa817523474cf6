/// Round `value` to `decimals` places. Aggregation keeps full precision; this
/// is applied only when a response is assembled.
///
/// # Examples
///
/// ```
/// use insight_core::formatting::round_to;
///
/// assert_eq!(round_to(12.3456, 2), 12.35);
/// assert_eq!(round_to(-0.125, 1), -0.1);
/// assert_eq!(round_to(7.5, 0), 8.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10_f64.powi(decimals as i32);
    // Nudge by a relative epsilon so binary midpoints such as 2.675 round up.
    let epsilon = f64::EPSILON * value.abs() * factor;
    let scaled = value * factor;
    let nudged = if scaled >= 0.0 {
        scaled + epsilon
    } else {
        scaled - epsilon
    };
    nudged.round() / factor
}

/// Round and render a number for narrative text. Whole numbers keep a
/// trailing `.0` so `"12.0M"` reads the same as the chart labels.
///
/// # Examples
///
/// ```
/// use insight_core::formatting::display_rounded;
///
/// assert_eq!(display_rounded(1234.56, 1), "1234.6");
/// assert_eq!(display_rounded(12.0, 2), "12.0");
/// assert_eq!(display_rounded(3.14159, 2), "3.14");
/// ```
pub fn display_rounded(value: f64, decimals: u32) -> String {
    let rounded = round_to(value, decimals);
    if rounded.is_finite() && rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

/// Chart label for a fiscal period, e.g. `"2024 Q3"`.
pub fn period_label(year: impl std::fmt::Display, quarter: impl std::fmt::Display) -> String {
    format!("{year} {quarter}")
}
