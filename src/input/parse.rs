//! Explicit cell parsing with a defined failure reason per field.

use std::fmt;

/// Why a cell could not be coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellError {
    /// Required cell is empty or the row is too short
    Missing,
    /// Not a number
    NotNumeric,
    /// NaN or infinite
    NotFinite,
    /// Number is zero or negative where a positive value is required
    NotPositive,
    /// Not an integral charge state
    NotCharge,
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellError::Missing => write!(f, "missing value"),
            CellError::NotNumeric => write!(f, "not a number"),
            CellError::NotFinite => write!(f, "not a finite number"),
            CellError::NotPositive => write!(f, "must be > 0"),
            CellError::NotCharge => write!(f, "not an integer charge state"),
        }
    }
}

/// Parse a finite float; empty cells are [`CellError::Missing`]
pub fn parse_f64(raw: &str) -> Result<f64, CellError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CellError::Missing);
    }
    let value: f64 = raw.parse().map_err(|_| CellError::NotNumeric)?;
    if !value.is_finite() {
        return Err(CellError::NotFinite);
    }
    Ok(value)
}

/// Parse a finite float that must be > 0
pub fn parse_positive_f64(raw: &str) -> Result<f64, CellError> {
    let value = parse_f64(raw)?;
    if value <= 0.0 {
        return Err(CellError::NotPositive);
    }
    Ok(value)
}

/// Parse an optional float: empty is `None`, anything else must be finite
pub fn parse_optional_f64(raw: Option<&str>) -> Result<Option<f64>, CellError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_f64(s).map(Some),
    }
}

/// Parse a charge state.
///
/// Accepts `2`, `+2`, `2+`, `2-` and integral floats such as `2.0`.
pub fn parse_charge(raw: &str) -> Result<i32, CellError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CellError::Missing);
    }

    let (body, negative) = if let Some(body) = raw.strip_suffix('+') {
        (body, false)
    } else if let Some(body) = raw.strip_suffix('-') {
        (body, true)
    } else {
        (raw.strip_prefix('+').unwrap_or(raw), false)
    };

    let value = match body.parse::<i32>() {
        Ok(z) => z,
        Err(_) => {
            let float: f64 = body.parse().map_err(|_| CellError::NotCharge)?;
            if !float.is_finite() || float.fract() != 0.0 || float.abs() > i32::MAX as f64 {
                return Err(CellError::NotCharge);
            }
            float as i32
        }
    };

    Ok(if negative { -value } else { value })
}

/// Optional text cell: empty or whitespace-only is `None`
pub fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(" 1000.5 "), Ok(1000.5));
        assert_eq!(parse_f64("1e3"), Ok(1000.0));
        assert_eq!(parse_f64(""), Err(CellError::Missing));
        assert_eq!(parse_f64("abc"), Err(CellError::NotNumeric));
        assert_eq!(parse_f64("NaN"), Err(CellError::NotFinite));
        assert_eq!(parse_f64("inf"), Err(CellError::NotFinite));
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive_f64("0"), Err(CellError::NotPositive));
        assert_eq!(parse_positive_f64("-5"), Err(CellError::NotPositive));
        assert_eq!(parse_positive_f64("5"), Ok(5.0));
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(parse_optional_f64(None), Ok(None));
        assert_eq!(parse_optional_f64(Some("  ")), Ok(None));
        assert_eq!(parse_optional_f64(Some("12")), Ok(Some(12.0)));
        assert_eq!(parse_optional_f64(Some("x")), Err(CellError::NotNumeric));
    }

    #[test]
    fn test_parse_charge() {
        assert_eq!(parse_charge("2"), Ok(2));
        assert_eq!(parse_charge("+3"), Ok(3));
        assert_eq!(parse_charge("2+"), Ok(2));
        assert_eq!(parse_charge("2-"), Ok(-2));
        assert_eq!(parse_charge("2.0"), Ok(2));
        assert_eq!(parse_charge("2.5"), Err(CellError::NotCharge));
        assert_eq!(parse_charge("two"), Err(CellError::NotCharge));
        assert_eq!(parse_charge(""), Err(CellError::Missing));
    }
}
