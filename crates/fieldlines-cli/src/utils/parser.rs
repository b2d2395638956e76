use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid point '{0}'. Expected 'x,y' (e.g., '0.5,-1.0').")]
    InvalidPointFormat(String),

    #[error("Invalid number '{value}' in point '{point}'.")]
    InvalidNumber { value: String, point: String },

    #[error("Coordinates must be finite in point '{0}'.")]
    NonFinite(String),

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),
}

/// Parses `x,y` into a coordinate pair. Whitespace around either number is ignored.
pub fn parse_point(s: &str) -> Result<(f64, f64), ParseError> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| ParseError::InvalidPointFormat(s.to_string()))?;

    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber {
                value: value.trim().to_string(),
                point: s.to_string(),
            })
    };
    let (x, y) = (parse(x)?, parse(y)?);

    if !(x.is_finite() && y.is_finite()) {
        return Err(ParseError::NonFinite(s.to_string()));
    }
    Ok((x, y))
}

/// Splits a `-S KEY=VALUE` argument at the first `=`.
pub fn parse_key_value(s: &str) -> Result<(&str, &str), ParseError> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidKeyValue(s.to_string())),
    }
}
