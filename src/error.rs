use thiserror::Error;

/// Failures of the seasonal back-transformation.
///
/// The recovery is pure arithmetic, so these are the only two ways it can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeasonalError {
    #[error("Invalid period length: {period_days} (must be finite and > 0).")]
    InvalidConfiguration { period_days: f64 },
    #[error("Invalid {name} coefficient: {value} (must be finite).")]
    InvalidInput { name: &'static str, value: f64 },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SeasonalError> for AppError {
    fn from(err: SeasonalError) -> Self {
        let exit_code = match err {
            SeasonalError::InvalidConfiguration { .. } => 2,
            SeasonalError::InvalidInput { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasonal_errors_map_to_exit_codes() {
        let config: AppError = SeasonalError::InvalidConfiguration { period_days: 0.0 }.into();
        assert_eq!(config.exit_code(), 2);
        assert!(config.message().contains("period"));

        let input: AppError = SeasonalError::InvalidInput {
            name: "sine",
            value: f64::NAN,
        }
        .into();
        assert_eq!(input.exit_code(), 4);
        assert!(input.message().contains("sine"));
    }
}
