use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid target format for '{0}'. Expected 'PHI,PSI' in degrees (e.g., '-57,-47').")]
    InvalidTargetFormat(String),

    #[error("Invalid angle '{value}' in '{input}'. Angles must be finite numbers.")]
    InvalidAngle { value: String, input: String },

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),
}

/// Parses a `PHI,PSI` pair of angles in degrees.
pub fn parse_target(input: &str) -> Result<(f64, f64), ParseError> {
    let (phi, psi) = input
        .split_once(',')
        .ok_or_else(|| ParseError::InvalidTargetFormat(input.to_string()))?;

    let parse_angle = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|angle| angle.is_finite())
            .ok_or_else(|| ParseError::InvalidAngle {
                value: value.trim().to_string(),
                input: input.to_string(),
            })
    };
    Ok((parse_angle(phi)?, parse_angle(psi)?))
}

/// Splits a `KEY=VALUE` override at the first `=`.
pub fn parse_key_value(input: &str) -> Result<(&str, &str), ParseError> {
    input
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim(), value.trim()))
        .ok_or_else(|| ParseError::InvalidKeyValue(input.to_string()))
}
