use crate::errors::ParseError;

/// Parses a limit/offset value. Values below `min` or above `max` (when given)
/// are rejected.
pub(crate) fn parse_number(key: &str, value: &str, min: i64, max: Option<u64>) -> Result<u64, ParseError> {
    let n: i64 = value.parse().map_err(|_| ParseError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })?;
    if n < min {
        return Err(ParseError::BelowMinimum {
            key: key.to_string(),
            min,
        });
    }
    let n = u64::try_from(n).map_err(|_| ParseError::BelowMinimum {
        key: key.to_string(),
        min: 0,
    })?;
    if let Some(max) = max
        && n > max
    {
        return Err(ParseError::AboveMaximum {
            key: key.to_string(),
            max,
        });
    }
    Ok(n)
}
