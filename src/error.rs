//! Error types and handling for the `Gustwatch` application

use thiserror::Error;

/// Main error type for the `Gustwatch` application
#[derive(Error, Debug)]
pub enum GustError {
    /// Postcode lookup failed or returned no usable result
    #[error("Geocoding error: {message}")]
    Geocode { message: String },

    /// Weather provider rejected the API key (HTTP 401)
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Weather provider quota exhausted (HTTP 429)
    #[error("Rate limit error: {message}")]
    RateLimit { message: String },

    /// Any other weather provider failure, including transport errors
    #[error("Fetch error: {message}")]
    Fetch { message: String },

    /// No API key available for a direct provider call
    #[error("Missing configuration: {message}")]
    MissingConfiguration { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A newer search started before this one finished
    #[error("Search superseded by a newer request")]
    Superseded,
}

impl GustError {
    /// Create a new geocoding error
    pub fn geocode<S: Into<String>>(message: S) -> Self {
        Self::Geocode {
            message: message.into(),
        }
    }

    /// Create a new authentication error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a new rate limit error
    pub fn rate_limit<S: Into<String>>(message: S) -> Self {
        Self::RateLimit {
            message: message.into(),
        }
    }

    /// Create a new fetch error
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a new missing configuration error
    pub fn missing_configuration<S: Into<String>>(message: S) -> Self {
        Self::MissingConfiguration {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message, suitable as a page-level status
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GustError::Geocode { message }
            | GustError::Auth { message }
            | GustError::RateLimit { message }
            | GustError::Fetch { message }
            | GustError::MissingConfiguration { message }
            | GustError::Validation { message } => message.clone(),
            GustError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            GustError::Superseded => "A newer search replaced this one.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let geocode_err = GustError::geocode("bad postcode");
        assert!(matches!(geocode_err, GustError::Geocode { .. }));

        let auth_err = GustError::auth("401");
        assert!(matches!(auth_err, GustError::Auth { .. }));

        let rate_err = GustError::rate_limit("429");
        assert!(matches!(rate_err, GustError::RateLimit { .. }));
    }

    #[test]
    fn test_user_messages() {
        let rate_err = GustError::rate_limit("Rate limit reached. Try later.");
        assert_eq!(rate_err.user_message(), "Rate limit reached. Try later.");

        let config_err = GustError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = GustError::validation("Please select a property.");
        assert_eq!(validation_err.user_message(), "Please select a property.");
    }
}
