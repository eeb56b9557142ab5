//! Measurement-to-text conversion
//!
//! Turns a cached measurement scalar into the display string carried by the
//! generated text block: unit formatting, precision, rounding, zero
//! suppression, tolerance/limit decoration, the DIMPOST prefix/suffix
//! pattern, user override substitution, and the control-code rewrite.

use crate::style::{AngularFormat, DimStyle, ZeroSuppression};

/// Placeholder token replaced by the formatted value in DIMPOST patterns and
/// user override text
pub const VALUE_PLACEHOLDER: &str = "<>";

/// Format a linear measurement per the style's unit settings
pub fn format_linear(value: f64, style: &DimStyle) -> String {
    let rounded = apply_rounding(value, style.dimrnd);
    format_decimal(rounded, style.dimdec, style.dimdsep, style.dimzin)
}

/// Format an angular measurement (radians) per the style's angular settings
pub fn format_angular(radians: f64, style: &DimStyle) -> String {
    match style.dimaunit {
        AngularFormat::DecimalDegrees => {
            let degrees = radians.to_degrees();
            let mut text = format_decimal(degrees, style.dimadec, '.', style.dimazin);
            text.push('\u{00B0}');
            text
        }
        AngularFormat::DegreesMinutesSeconds => format_dms(radians, style),
        AngularFormat::Gradians => {
            let grads = radians.to_degrees() * 10.0 / 9.0;
            let mut text = format_decimal(grads, style.dimadec, '.', style.dimazin);
            text.push('g');
            text
        }
        AngularFormat::Radians => {
            let mut text = format_decimal(radians, style.dimadec, '.', style.dimazin);
            text.push('r');
            text
        }
    }
}

/// Decimal formatting shared by every unit family
fn format_decimal(value: f64, precision: u8, separator: char, zin: ZeroSuppression) -> String {
    let mut text = format!("{:.*}", precision as usize, value);
    // "-0.00" normalizes to "0.00"
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text.remove(0);
    }
    if zin.contains(ZeroSuppression::TRAILING) && text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if zin.contains(ZeroSuppression::LEADING) {
        if let Some(stripped) = text.strip_prefix("0.") {
            text = format!(".{}", stripped);
        } else if let Some(stripped) = text.strip_prefix("-0.") {
            text = format!("-.{}", stripped);
        }
    }
    if separator != '.' {
        text = text.replace('.', &separator.to_string());
    }
    text
}

/// Degrees/minutes/seconds rendering; DIMADEC applies to the seconds field
fn format_dms(radians: f64, style: &DimStyle) -> String {
    let total_degrees = radians.to_degrees().abs();
    let sign = if radians < 0.0 { "-" } else { "" };
    let degrees = total_degrees.floor();
    let minutes_full = (total_degrees - degrees) * 60.0;
    let minutes = minutes_full.floor();
    let seconds = (minutes_full - minutes) * 60.0;
    let seconds_text = format_decimal(seconds, style.dimadec, '.', ZeroSuppression::NONE);
    // Carry rounding overflow (59.999" printed as 60") into the minute field
    if seconds_text.starts_with("60") {
        let minutes = minutes + 1.0;
        if minutes >= 60.0 {
            return format!(
                "{}{}\u{00B0}0'0{}\"",
                sign,
                degrees + 1.0,
                zero_seconds_suffix(style)
            );
        }
        return format!(
            "{}{}\u{00B0}{}'0{}\"",
            sign,
            degrees,
            minutes,
            zero_seconds_suffix(style)
        );
    }
    format!("{}{}\u{00B0}{}'{}\"", sign, degrees, minutes, seconds_text)
}

fn zero_seconds_suffix(style: &DimStyle) -> String {
    if style.dimadec == 0 {
        String::new()
    } else {
        format!(".{}", "0".repeat(style.dimadec as usize))
    }
}

/// Snap a value to the rounding increment; zero disables rounding
fn apply_rounding(value: f64, increment: f64) -> f64 {
    if increment > 0.0 {
        (value / increment).round() * increment
    } else {
        value
    }
}

/// Tolerance decoration appended after the measurement value
///
/// Symmetric tolerances collapse to a single "±t"; asymmetric tolerances
/// render as "+tp/-tm".
pub fn tolerance_suffix(style: &DimStyle) -> Option<String> {
    if !style.dimtol || style.dimlim {
        return None;
    }
    let plus = format_decimal(style.dimtp, style.dimtdec, style.dimdsep, style.dimtzin);
    let minus = format_decimal(
        style.dimtm.abs(),
        style.dimtdec,
        style.dimdsep,
        style.dimtzin,
    );
    if (style.dimtp - style.dimtm.abs()).abs() < 1e-12 {
        Some(format!("\u{00B1}{}", plus))
    } else {
        Some(format!("+{}/-{}", plus, minus))
    }
}

/// Limits rendering: the measurement is replaced by its upper and lower
/// bounds, upper first
pub fn limits_text(value: f64, style: &DimStyle) -> Option<String> {
    if !style.dimlim {
        return None;
    }
    let upper = format_decimal(
        value + style.dimtp,
        style.dimdec,
        style.dimdsep,
        style.dimzin,
    );
    let lower = format_decimal(
        value - style.dimtm.abs(),
        style.dimdec,
        style.dimdsep,
        style.dimzin,
    );
    Some(format!("{}\n{}", upper, lower))
}

/// Apply the DIMPOST pattern: "prefix<>suffix", or a plain suffix when the
/// pattern carries no placeholder
pub fn apply_post(value_text: &str, dimpost: &str) -> String {
    if dimpost.is_empty() {
        value_text.to_string()
    } else if dimpost.contains(VALUE_PLACEHOLDER) {
        dimpost.replace(VALUE_PLACEHOLDER, value_text)
    } else {
        format!("{}{}", value_text, dimpost)
    }
}

/// Substitute the formatted value into a user override text
///
/// The override is reproduced verbatim apart from placeholder substitution
/// and the control-code rewrite applied later.
pub fn substitute_override(override_text: &str, value_text: &str) -> String {
    override_text.replace(VALUE_PLACEHOLDER, value_text)
}

/// Alternate-units suffix, e.g. " [25.4]"
pub fn alternate_suffix(value: f64, style: &DimStyle) -> Option<String> {
    if !style.dimalt {
        return None;
    }
    let alt = format_decimal(
        value * style.dimaltf,
        style.dimaltd,
        style.dimdsep,
        style.dimzin,
    );
    let alt = apply_post(&alt, &style.dimapost);
    Some(format!(" [{}]", alt))
}

/// The documented control-code rewrite
///
/// `%%d` becomes the degree sign, `%%p` plus/minus, `%%c` the diameter
/// sign, `%%%` a literal percent. Unrecognized pairs pass through unchanged.
pub fn rewrite_control_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() != Some(&'%') {
            out.push(c);
            continue;
        }
        chars.next();
        match chars.peek() {
            Some('d') | Some('D') => {
                chars.next();
                out.push('\u{00B0}');
            }
            Some('p') | Some('P') => {
                chars.next();
                out.push('\u{00B1}');
            }
            Some('c') | Some('C') => {
                chars.next();
                out.push('\u{2300}');
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => {
                out.push('%');
                out.push('%');
            }
        }
    }
    out
}

/// Compose the full display text for a linear measurement
///
/// Precedence: a user override (with `<>` substitution) wins over the
/// DIMPOST pattern, which wins over the caller's default prefix (the "R" or
/// diameter sign of the radial family).
pub fn compose_linear(
    value: f64,
    style: &DimStyle,
    override_text: Option<&str>,
    default_prefix: Option<&str>,
) -> String {
    let value_text = match limits_text(value, style) {
        Some(limits) => limits,
        None => {
            let mut text = format_linear(value, style);
            if let Some(tol) = tolerance_suffix(style) {
                text.push_str(&tol);
            }
            text
        }
    };

    let decorated = match override_text {
        Some(user) => substitute_override(user, &value_text),
        None if !style.dimpost.is_empty() => apply_post(&value_text, &style.dimpost),
        None => match default_prefix {
            Some(prefix) => format!("{}{}", prefix, value_text),
            None => value_text,
        },
    };

    let mut text = rewrite_control_codes(&decorated);
    if let Some(alt) = alternate_suffix(value, style) {
        text.push_str(&alt);
    }
    text
}

/// Compose the full display text for an angular measurement
pub fn compose_angular(radians: f64, style: &DimStyle, override_text: Option<&str>) -> String {
    let value_text = format_angular(radians, style);
    let decorated = match override_text {
        Some(user) => substitute_override(user, &value_text),
        None if !style.dimpost.is_empty() => apply_post(&value_text, &style.dimpost),
        None => value_text,
    };
    rewrite_control_codes(&decorated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_format_linear_default() {
        let style = DimStyle::standard();
        // Standard suppresses trailing zeros
        assert_eq!(format_linear(25.4, &style), "25.4");
        assert_eq!(format_linear(10.0, &style), "10");
    }

    #[test]
    fn test_format_linear_no_suppression() {
        let mut style = DimStyle::standard();
        style.dimzin = ZeroSuppression::NONE;
        assert_eq!(format_linear(25.4, &style), "25.40");
        assert_eq!(format_linear(10.0, &style), "10.00");
    }

    #[test]
    fn test_leading_zero_suppression() {
        let mut style = DimStyle::standard();
        style.dimzin = ZeroSuppression::LEADING;
        assert_eq!(format_linear(0.5, &style), ".50");
    }

    #[test]
    fn test_decimal_separator() {
        let mut style = DimStyle::standard();
        style.dimdsep = ',';
        style.dimzin = ZeroSuppression::NONE;
        assert_eq!(format_linear(1.5, &style), "1,50");
    }

    #[test]
    fn test_rounding_increment() {
        let mut style = DimStyle::standard();
        style.dimrnd = 0.25;
        style.dimzin = ZeroSuppression::NONE;
        assert_eq!(format_linear(1.13, &style), "1.25");
    }

    #[test]
    fn test_format_angular_degrees() {
        let mut style = DimStyle::standard();
        style.dimadec = 1;
        assert_eq!(format_angular(FRAC_PI_2, &style), "90.0\u{00B0}");
    }

    #[test]
    fn test_format_angular_dms() {
        let mut style = DimStyle::standard();
        style.dimaunit = AngularFormat::DegreesMinutesSeconds;
        let text = format_angular(30.5_f64.to_radians(), &style);
        assert_eq!(text, "30\u{00B0}30'0\"");
    }

    #[test]
    fn test_format_angular_gradians() {
        let mut style = DimStyle::standard();
        style.dimaunit = AngularFormat::Gradians;
        assert_eq!(format_angular(FRAC_PI_2, &style), "100g");
    }

    #[test]
    fn test_format_angular_radians() {
        let mut style = DimStyle::standard();
        style.dimaunit = AngularFormat::Radians;
        style.dimadec = 2;
        assert_eq!(format_angular(PI, &style), "3.14r");
    }

    #[test]
    fn test_symmetric_tolerance() {
        let mut style = DimStyle::standard();
        style.dimtol = true;
        style.dimtp = 0.1;
        style.dimtm = 0.1;
        style.dimtzin = ZeroSuppression::NONE;
        assert_eq!(tolerance_suffix(&style), Some("\u{00B1}0.10".to_string()));
    }

    #[test]
    fn test_asymmetric_tolerance() {
        let mut style = DimStyle::standard();
        style.dimtol = true;
        style.dimtp = 0.2;
        style.dimtm = 0.1;
        style.dimtzin = ZeroSuppression::NONE;
        assert_eq!(tolerance_suffix(&style), Some("+0.20/-0.10".to_string()));
    }

    #[test]
    fn test_limits() {
        let mut style = DimStyle::standard();
        style.dimlim = true;
        style.dimtp = 0.1;
        style.dimtm = 0.2;
        style.dimzin = ZeroSuppression::NONE;
        assert_eq!(limits_text(10.0, &style), Some("10.10\n9.80".to_string()));
    }

    #[test]
    fn test_apply_post() {
        assert_eq!(apply_post("10", "<> mm"), "10 mm");
        assert_eq!(apply_post("10", "~<>~"), "~10~");
        assert_eq!(apply_post("10", "mm"), "10mm");
        assert_eq!(apply_post("10", ""), "10");
    }

    #[test]
    fn test_override_round_trip() {
        // Everything except the placeholder survives verbatim
        let out = substitute_override("approx. <> (verify)", "12.5");
        assert_eq!(out, "approx. 12.5 (verify)");
    }

    #[test]
    fn test_control_code_rewrite() {
        assert_eq!(rewrite_control_codes("45%%d"), "45\u{00B0}");
        assert_eq!(rewrite_control_codes("%%c10"), "\u{2300}10");
        assert_eq!(rewrite_control_codes("10%%p0.1"), "10\u{00B1}0.1");
        assert_eq!(rewrite_control_codes("50%%%"), "50%");
        assert_eq!(rewrite_control_codes("%%x"), "%%x");
        assert_eq!(rewrite_control_codes("100%"), "100%");
    }

    #[test]
    fn test_compose_linear_prefix_precedence() {
        let mut style = DimStyle::standard();
        // Default prefix applies when no DIMPOST and no override
        assert_eq!(
            compose_linear(5.0, &style, None, Some("R")),
            "R5".to_string()
        );
        // DIMPOST beats the default prefix
        style.dimpost = "<> in".to_string();
        assert_eq!(compose_linear(5.0, &style, None, Some("R")), "5 in");
        // Override beats both
        assert_eq!(
            compose_linear(5.0, &style, Some("<> typ."), Some("R")),
            "5 typ."
        );
    }

    #[test]
    fn test_compose_linear_alternate_units() {
        let mut style = DimStyle::standard();
        style.dimalt = true;
        style.dimaltf = 2.0;
        style.dimaltd = 1;
        assert_eq!(compose_linear(5.0, &style, None, None), "5 [10.0]");
    }

    #[test]
    fn test_compose_angular() {
        let style = DimStyle::standard();
        assert_eq!(compose_angular(FRAC_PI_2, &style, None), "90\u{00B0}");
    }

    #[test]
    fn test_negative_zero_normalized() {
        let mut style = DimStyle::standard();
        style.dimadec = 0;
        assert_eq!(format_angular(-1e-14, &style), "0\u{00B0}");
    }
}
