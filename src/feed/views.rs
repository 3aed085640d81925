use serde_json::{Number, Value};

use super::types::json_kind;

/// Views below this are shown verbatim.
const THOUSAND: f64 = 1_000.0;
/// Views at or above this use the "w" (wan, 10 000) unit.
const WAN: f64 = 10_000.0;

/// Formats a view count for a feed card.
///
/// | views            | output                      |
/// |------------------|-----------------------------|
/// | 0, NaN           | `"0"`                       |
/// | below 1000       | the number itself           |
/// | 1000 to 9999     | `views / 1000`, one decimal, `k` |
/// | 10000 and above  | `views / 10000`, one decimal, `w` |
///
/// The one-decimal rounding works on the exact binary value of the quotient
/// and rounds ties upwards, so `1250` gives `"1.3k"` while `1150` gives
/// `"1.1k"` (1.15 is stored just below the tie).
///
/// # Examples
///
/// ```
/// use feedmeta::feed::format_views;
///
/// assert_eq!(format_views(0.0), "0");
/// assert_eq!(format_views(999.0), "999");
/// assert_eq!(format_views(1000.0), "1.0k");
/// assert_eq!(format_views(1500.0), "1.5k");
/// assert_eq!(format_views(25000.0), "2.5w");
/// ```
pub fn format_views(views: f64) -> String {
    if views.is_nan() || views == 0.0 {
        return "0".to_string();
    }

    if views < THOUSAND {
        views.to_string()
    } else if views < WAN {
        format!("{}k", to_fixed_one(views / THOUSAND))
    } else {
        format!("{}w", to_fixed_one(views / WAN))
    }
}

/// Rounds a non-negative value to one decimal place, ties away from zero.
///
/// `{:.1}` would round ties to even, so the digits are taken from the exact
/// decimal expansion and rounded by hand. Quotients reaching here are at
/// least 0.1, which keeps the expansion within 60 fractional digits.
fn to_fixed_one(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let exact = format!("{value:.60}");
    let Some((whole, frac)) = exact.split_once('.') else {
        return exact;
    };
    let frac = frac.as_bytes();

    // Whole part followed by the tenths digit, as ASCII digits.
    let mut digits: Vec<u8> = whole.bytes().collect();
    digits.push(frac.first().copied().unwrap_or(b'0'));

    if frac.get(1).is_some_and(|d| *d >= b'5') {
        carry_one(&mut digits);
    }

    let split = digits.len() - 1;
    let mut out: String = digits[..split].iter().map(|&d| d as char).collect();
    out.push('.');
    out.push(digits[split] as char);
    out
}

/// Adds one to the last position of an ASCII digit string.
fn carry_one(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Normalizes the raw `views` field into a non-negative JSON number.
///
/// Absent, null, zero and other falsy values become `0`, the same as a feed
/// with no view data. Numeric strings are accepted since some endpoints
/// serialize counters as text.
pub fn normalize_views(raw: Option<&Value>) -> Number {
    let zero = Number::from(0u64);

    let Some(raw) = raw else {
        return zero;
    };

    match raw {
        Value::Null | Value::Bool(false) => zero,
        Value::Number(n) => {
            let v = n.as_f64().unwrap_or(0.0);
            if v < 0.0 {
                tracing::debug!(views = %n, "Negative view count, clamping to 0");
                zero
            } else if v == 0.0 {
                zero
            } else {
                n.clone()
            }
        }
        Value::String(s) => parse_views_text(s.trim()).unwrap_or(zero),
        other => {
            tracing::debug!(kind = json_kind(other), "Unsupported views value, using 0");
            zero
        }
    }
}

fn parse_views_text(s: &str) -> Option<Number> {
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<u64>() {
        return Some(Number::from(n));
    }

    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Number::from_f64(v),
        Ok(_) => None,
        Err(_) => {
            tracing::debug!(views = %s, "Views text is not numeric, using 0");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_and_nan() {
        assert_eq!(format_views(0.0), "0");
        assert_eq!(format_views(-0.0), "0");
        assert_eq!(format_views(f64::NAN), "0");
    }

    #[test]
    fn test_plain_tier() {
        assert_eq!(format_views(1.0), "1");
        assert_eq!(format_views(42.0), "42");
        assert_eq!(format_views(999.0), "999");
        assert_eq!(format_views(12.5), "12.5");
    }

    #[test]
    fn test_thousand_boundary() {
        assert_eq!(format_views(1000.0), "1.0k");
        assert_eq!(format_views(1500.0), "1.5k");
        assert_eq!(format_views(9999.0), "10.0k");
    }

    #[test]
    fn test_wan_boundary() {
        assert_eq!(format_views(10000.0), "1.0w");
        assert_eq!(format_views(12000.0), "1.2w");
        assert_eq!(format_views(25000.0), "2.5w");
        assert_eq!(format_views(1_000_000.0), "100.0w");
    }

    #[test]
    fn test_ties_round_up() {
        // Exactly representable ties.
        assert_eq!(format_views(1250.0), "1.3k");
        assert_eq!(format_views(1750.0), "1.8k");
        assert_eq!(format_views(12500.0), "1.3w");
    }

    #[test]
    fn test_inexact_ties_follow_binary_value() {
        // 1.05 is stored slightly above the tie, 1.15 slightly below.
        assert_eq!(format_views(1050.0), "1.1k");
        assert_eq!(format_views(1150.0), "1.1k");
    }

    #[test]
    fn test_carry_through_whole_part() {
        assert_eq!(to_fixed_one(9.96), "10.0");
        assert_eq!(to_fixed_one(99.99), "100.0");
        assert_eq!(to_fixed_one(1.04), "1.0");
    }

    #[test]
    fn test_normalize_views_falsy() {
        assert_eq!(normalize_views(None), Number::from(0u64));
        assert_eq!(normalize_views(Some(&json!(null))), Number::from(0u64));
        assert_eq!(normalize_views(Some(&json!(false))), Number::from(0u64));
        assert_eq!(normalize_views(Some(&json!(0))), Number::from(0u64));
        assert_eq!(normalize_views(Some(&json!(""))), Number::from(0u64));
    }

    #[test]
    fn test_normalize_views_numbers() {
        assert_eq!(normalize_views(Some(&json!(12000))), Number::from(12000u64));
        assert_eq!(normalize_views(Some(&json!(-5))), Number::from(0u64));
        assert_eq!(
            normalize_views(Some(&json!(12.5))),
            Number::from_f64(12.5).unwrap()
        );
    }

    #[test]
    fn test_normalize_views_strings() {
        assert_eq!(normalize_views(Some(&json!("1500"))), Number::from(1500u64));
        assert_eq!(normalize_views(Some(&json!(" 42 "))), Number::from(42u64));
        assert_eq!(
            normalize_views(Some(&json!("2.5"))),
            Number::from_f64(2.5).unwrap()
        );
        assert_eq!(normalize_views(Some(&json!("lots"))), Number::from(0u64));
        assert_eq!(normalize_views(Some(&json!("-3"))), Number::from(0u64));
    }

    #[test]
    fn test_normalize_views_other_shapes() {
        assert_eq!(normalize_views(Some(&json!(true))), Number::from(0u64));
        assert_eq!(normalize_views(Some(&json!([1]))), Number::from(0u64));
        assert_eq!(normalize_views(Some(&json!({"n": 1}))), Number::from(0u64));
    }
}
