//! Salary impact parsing and derivation.
//!
//! Upstream data delivers salary impact either as a number or as a localized
//! currency string (`"₹4.2L"`, `"$1,200"`, `"Rs. 4.2L p.a."`). Parsing drops
//! currency and unit markers and keeps the first number. Anything that still fails to parse
//! contributes 0; aggregation never errors on malformed upstream data.

use crate::models::skill::SalaryImpact;

/// Extracts the numeric part of a currency string: the first run of digits,
/// with thousands separators dropped and at most one decimal point. Dots in
/// markers such as `Rs.` or `p.a.` are not part of the run. `None` when no
/// digit is present or the run holds a second decimal point.
pub fn parse_salary_value(raw: &str) -> Option<f64> {
    let chars: Vec<char> = raw.trim().chars().collect();
    let start = chars.iter().position(|c| c.is_ascii_digit())?;

    let mut cleaned = String::with_capacity(chars.len());
    if start > 0 && chars[start - 1] == '-' {
        cleaned.push('-');
    }

    let mut seen_point = false;
    for &c in &chars[start..] {
        match c {
            '0'..='9' => cleaned.push(c),
            ',' => {}
            '.' if seen_point => return None,
            '.' => {
                seen_point = true;
                cleaned.push(c);
            }
            _ => break,
        }
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric salary impact with the resilient 0 fallback.
pub fn parse_salary_impact(impact: &SalaryImpact) -> f64 {
    match impact {
        SalaryImpact::Amount(v) if v.is_finite() => *v,
        SalaryImpact::Amount(_) => 0.0,
        SalaryImpact::Text(s) => parse_salary_value(s).unwrap_or(0.0),
    }
}

/// True when the value had to fall back to 0 because it could not be parsed.
pub fn is_malformed(impact: &SalaryImpact) -> bool {
    match impact {
        SalaryImpact::Amount(v) => !v.is_finite(),
        SalaryImpact::Text(s) => parse_salary_value(s).is_none(),
    }
}

/// Estimates a salary impact (in lakhs) for a skill whose upstream record carries none.
///
/// Demand is clamped to 30 – 100, each demand point is worth ₹1000 scaled by the
/// proficiency gain, and the result is clamped to ₹1.5L – ₹15L.
pub fn derive_salary_impact(market_demand: u8, current_proficiency: u8, target_proficiency: u8) -> f64 {
    let demand = (market_demand as f64).clamp(30.0, 100.0);
    let base_value = demand * 1000.0;
    let gain = (target_proficiency as f64 - current_proficiency as f64) / 5.0;
    let impact_lakhs = (base_value * gain.max(0.3)) / 100_000.0;
    (impact_lakhs.clamp(1.5, 15.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupee_lakh_string() {
        assert_eq!(parse_salary_value("₹4.2L"), Some(4.2));
        assert_eq!(parse_salary_impact(&SalaryImpact::from("₹4.2L")), 4.2);
    }

    #[test]
    fn test_zero_string_is_zero() {
        assert_eq!(parse_salary_impact(&SalaryImpact::from("0")), 0.0);
        assert!(!is_malformed(&SalaryImpact::from("0")));
    }

    #[test]
    fn test_malformed_strings_are_zero_not_errors() {
        for raw in ["", "N/A", "₹L", "lots", "-", "1.2.3"] {
            assert_eq!(
                parse_salary_impact(&SalaryImpact::from(raw)),
                0.0,
                "expected 0 for {raw:?}"
            );
            assert!(is_malformed(&SalaryImpact::from(raw)));
        }
    }

    #[test]
    fn test_thousands_separator_and_dollar() {
        assert_eq!(parse_salary_value("$1,200"), Some(1200.0));
        assert_eq!(parse_salary_value(" 15 LPA "), Some(15.0));
    }

    #[test]
    fn test_dotted_currency_and_unit_markers() {
        assert_eq!(parse_salary_value("Rs. 4.2L"), Some(4.2));
        assert_eq!(parse_salary_value("4.2L p.a."), Some(4.2));
        assert_eq!(parse_salary_value("Rs.4.2 L p.a."), Some(4.2));
        assert_eq!(parse_salary_value("INR 4.2 L"), Some(4.2));
        assert!(!is_malformed(&SalaryImpact::from("Rs. 4.2L")));
    }

    #[test]
    fn test_leading_minus_kept() {
        assert_eq!(parse_salary_value("-2.5L"), Some(-2.5));
    }

    #[test]
    fn test_numeric_amount_passes_through() {
        assert_eq!(parse_salary_impact(&SalaryImpact::Amount(3.5)), 3.5);
        assert_eq!(parse_salary_impact(&SalaryImpact::Amount(f64::NAN)), 0.0);
    }

    #[test]
    fn test_derived_impact_is_clamped() {
        // 90 demand, 0 → 4: 90_000 × 0.8 / 100_000 = 0.72 → clamped to 1.5
        assert_eq!(derive_salary_impact(90, 0, 4), 1.5);
        // demand below 30 is lifted to 30
        assert_eq!(derive_salary_impact(5, 0, 5), derive_salary_impact(30, 0, 5));
        assert!(derive_salary_impact(100, 0, 5) <= 15.0);
    }
}
