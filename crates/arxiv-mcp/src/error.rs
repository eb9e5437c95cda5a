//! Error types for the arXiv MCP server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// A single failed rule from the query validation engine.
///
/// Messages are self-contained and meant to be shown to the agent verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither `search_query` nor `id_list` was supplied.
    #[error("either 'search_query' or 'id_list' parameter is required")]
    MissingRequired,

    /// A `prefix:` token outside the known field prefixes.
    #[error("invalid field prefix '{prefix}'. Valid prefixes: {}", .allowed.join(", "))]
    UnknownFieldPrefix {
        /// The offending token
        prefix: String,
        /// Accepted prefixes, sorted
        allowed: &'static [&'static str],
    },

    /// A boolean operator that is not flanked by spaces or `+` signs.
    #[error("boolean operator '{operator}' should be surrounded by spaces or + signs")]
    MalformedBooleanOperator {
        /// AND, OR or ANDNOT
        operator: &'static str,
    },

    /// An empty member in a comma-separated identifier list.
    #[error("empty arXiv ID in id_list")]
    EmptyIdentifier,

    /// An identifier matching neither the legacy nor the modern shape.
    #[error(
        "invalid arXiv ID format: '{id}'. Expected formats: 'YYMM.NNNNN[vN]' or 'subject-class[.XX]/YYMMnnn[vN]'"
    )]
    MalformedIdentifier {
        /// The offending identifier
        id: String,
    },

    /// A numeric parameter that is not a base-10 integer.
    #[error("'{param}' must be a valid integer, got '{value}'")]
    MalformedInteger {
        /// Parameter name
        param: &'static str,
        /// Raw value
        value: String,
    },

    /// A numeric parameter outside its accepted range.
    #[error("'{param}' {constraint}, got {value}")]
    OutOfRange {
        /// Parameter name
        param: &'static str,
        /// Raw value
        value: String,
        /// Human description of the accepted range
        constraint: &'static str,
    },

    /// A value outside a closed set of options.
    #[error("invalid '{param}' value '{value}'. Valid options: {}", .allowed.join(", "))]
    InvalidEnumValue {
        /// Parameter name
        param: &'static str,
        /// Raw value
        value: String,
        /// Accepted values, sorted
        allowed: &'static [&'static str],
    },

    /// Top-level parameters the API grammar does not define.
    #[error("unknown parameters: {}", .names.join(", "))]
    UnknownParameter {
        /// Offending names in the order they appeared
        names: Vec<String>,
    },

    /// A submittedDate range that does not have the bracketed shape.
    #[error("invalid 'submittedDate' format '{value}'. Expected: [YYYYMMDDTTTT+TO+YYYYMMDDTTTT]")]
    InvalidDateRange {
        /// Raw value
        value: String,
    },

    /// A submittedDate range whose start is not before its end.
    #[error("start date {start} must be before end date {end} in 'submittedDate' range")]
    DateRangeOrder {
        /// Range start timestamp
        start: String,
        /// Range end timestamp
        end: String,
    },
}

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the arXiv API (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// URL of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }
}

/// Errors from MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Error from the API client
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The `send_query` string was rejected before reaching the API.
    #[error("Invalid query parameters: {0}")]
    InvalidQuery(#[from] ValidationError),

    /// A required tool argument was absent or had the wrong type.
    #[error("Missing {0} parameter")]
    MissingArgument(&'static str),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Saving a download failed
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not available
    #[error("Resource unavailable: {0}")]
    Unavailable(String),
}

impl ToolError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Convert to a user-friendly error message for MCP response.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Client(ClientError::RateLimited { retry_after }) => {
                format!(
                    "Rate limited by the arXiv API. Please wait {:?} before retrying.",
                    retry_after
                )
            }
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            _ => self.to_string(),
        }
    }
}

impl ValidationError {
    /// Name of the query parameter this failure is about.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::UnknownFieldPrefix { .. } | Self::MalformedBooleanOperator { .. } => {
                "search_query"
            }
            Self::EmptyIdentifier | Self::MalformedIdentifier { .. } => "id_list",
            Self::MalformedInteger { param, .. }
            | Self::OutOfRange { param, .. }
            | Self::InvalidEnumValue { param, .. } => *param,
            Self::InvalidDateRange { .. } | Self::DateRangeOrder { .. } => "submittedDate",
            Self::MissingRequired | Self::UnknownParameter { .. } => "query",
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_allowed_values() {
        let err = ValidationError::InvalidEnumValue {
            param: "sortOrder",
            value: "sideways".to_string(),
            allowed: &["ascending", "descending"],
        };
        assert_eq!(
            err.to_string(),
            "invalid 'sortOrder' value 'sideways'. Valid options: ascending, descending"
        );
    }

    #[test]
    fn test_unknown_parameter_joins_names() {
        let err = ValidationError::UnknownParameter {
            names: vec!["foo".to_string(), "bar".to_string()],
        };
        assert_eq!(err.to_string(), "unknown parameters: foo, bar");
    }

    #[test]
    fn test_invalid_query_message() {
        let err: ToolError = ValidationError::MalformedIdentifier { id: "nope".to_string() }.into();
        let message = err.to_user_message();
        assert!(message.starts_with("Invalid query parameters: "));
        assert!(message.contains("nope"));
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = ToolError::validation("arxiv_id", "empty");
        assert_eq!(err.to_user_message(), "Invalid input for 'arxiv_id': empty");
    }
}
