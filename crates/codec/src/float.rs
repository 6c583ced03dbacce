//! Shortest round-trip formatting for 32-bit floats.
//!
//! Exported float literals are the shortest decimal text that still
//! reconstructs the same 32-bit value after parsing. Values that the
//! host widened to f64 keep long decimal tails in their default text
//! form (`0.1f32` widens to `0.10000000149011612`); writing those
//! tails verbatim makes exports noisy and no more precise.

/// Round a value to 32-bit float precision.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_f32(value: f64) -> f32 {
    value as f32
}

/// Format `value` as the shortest decimal text that parses back to
/// the same 32-bit float.
///
/// The canonical target is `value` rounded once to f32. Starting from
/// the full decimal text, the fractional part is re-rounded to 1, 2,
/// ... digits and the first candidate whose f32-rounded parse equals
/// the target wins. Text without a fractional part is returned
/// unchanged, so integer-valued floats stay integer-looking. The full
/// text is the fallback for the (unreachable for representable
/// values) case where no truncation matches.
#[must_use]
pub fn repr_f32(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let target = round_f32(value);
    let full = value.to_string();
    let Some(dot) = full.find('.') else {
        return full;
    };
    let frac_len = full.len() - dot - 1;
    for digits in 1..frac_len {
        let text = format!("{value:.digits$}");
        let Ok(parsed) = text.parse::<f64>() else {
            continue;
        };
        if round_f32(parsed) == target {
            return text;
        }
    }
    full
}

/// [`repr_f32`] for values already held at 32-bit precision.
#[must_use]
pub fn repr_f32_from(value: f32) -> String {
    repr_f32(f64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_valued_floats_stay_integer_looking() {
        assert_eq!(repr_f32(2.0), "2");
        assert_eq!(repr_f32(0.0), "0");
        assert_eq!(repr_f32(-3.0), "-3");
    }

    #[test]
    fn test_widened_f32_shortens() {
        // 0.1f32 widened to f64 prints as 0.10000000149011612.
        assert_eq!(repr_f32_from(0.1), "0.1");
        assert_eq!(repr_f32_from(0.3), "0.3");
        assert_eq!(repr_f32_from(-0.25), "-0.25");
    }

    #[test]
    fn test_precision_is_kept_when_needed() {
        assert_eq!(repr_f32_from(60.000_01), "60.00001");
        assert_eq!(repr_f32_from(0.123_456_79), "0.12345679");
    }

    #[test]
    fn test_roundtrip_for_awkward_values() {
        for &value in &[
            0.1_f32,
            1.0 / 3.0,
            0.000_001,
            12_345.678,
            -9.999_999,
            f32::MIN_POSITIVE,
        ] {
            let text = repr_f32_from(value);
            let parsed: f64 = text.parse().expect("formatter output parses");
            assert_eq!(round_f32(parsed).to_bits(), value.to_bits(), "{text}");
        }
    }

    #[test]
    fn test_result_is_minimal() {
        for &value in &[0.5_f32, 0.25, 60.000_01, 1.0 / 3.0] {
            let text = repr_f32_from(value);
            if let Some((_, frac)) = text.split_once('.') {
                // One digit fewer must no longer round-trip.
                let shorter = format!("{:.*}", frac.len() - 1, f64::from(value));
                let parsed: f64 = shorter.parse().expect("valid decimal");
                assert_ne!(round_f32(parsed).to_bits(), value.to_bits(), "{shorter}");
            }
        }
    }
}
