//! Lenient parsing of numeric command-line arguments.
//!
//! Counts never fail to parse. Leading whitespace is skipped, an optional
//! sign and the longest run of decimal digits are read, and anything after
//! the digits is ignored. Input without digits becomes zero, negative values
//! clamp to zero, and values above [`COUNT_CEILING`] clamp to it.

/// Largest count accepted on the command line.
pub const COUNT_CEILING: usize = i32::MAX.unsigned_abs() as usize;

/// Parses `raw` into a count in `0..=COUNT_CEILING`.
///
/// Used as a clap `value_parser`, so it returns a `Result` even though every
/// input is accepted.
///
/// # Errors
/// Never returns an error.
///
/// # Examples
/// ```
/// use randdot_cli::cli::clamp_count;
///
/// assert_eq!(clamp_count("  42abc"), Ok(42));
/// assert_eq!(clamp_count("-7"), Ok(0));
/// assert_eq!(clamp_count("lots"), Ok(0));
/// ```
pub fn clamp_count(raw: &str) -> Result<usize, String> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
        Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
        _ => (false, trimmed),
    };

    let mut value = 0_usize;
    for digit in unsigned.bytes().map_while(|byte| char::from(byte).to_digit(10)) {
        value = value
            .saturating_mul(10)
            .saturating_add(usize::try_from(digit).unwrap_or(COUNT_CEILING))
            .min(COUNT_CEILING.saturating_add(1));
    }

    if negative {
        return Ok(0);
    }
    Ok(value.min(COUNT_CEILING))
}
