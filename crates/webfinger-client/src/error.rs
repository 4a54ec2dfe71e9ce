//! Error types for WebFinger resolution

use std::fmt;

/// Errors from host discovery and account resolution
///
/// The two network flavors are kept separate so callers can tell a
/// transport failure from an unexpected status; `NotFound` means a
/// well-formed document carried no usable link.
#[derive(Debug)]
pub enum WebFingerError {
    /// Malformed identifier or malformed XRD/JRD document
    Parse(String),
    /// Transport-level failure talking to a remote host
    Http(Box<reqwest::Error>),
    /// Unexpected HTTP status from a remote endpoint
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    /// Well-formed document without a usable link
    NotFound,
}

impl fmt::Display for WebFingerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebFingerError::Parse(msg) => write!(f, "parse error: {}", msg),
            WebFingerError::Http(err) => write!(f, "HTTP error: {}", err),
            WebFingerError::Status { status, url } => {
                write!(f, "status {} from {}", status, url)
            }
            WebFingerError::NotFound => write!(f, "no matching link found"),
        }
    }
}

impl std::error::Error for WebFingerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WebFingerError::Http(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WebFingerError {
    fn from(err: reqwest::Error) -> Self {
        WebFingerError::Http(Box::new(err))
    }
}

impl From<acct_address::ParseAddressError> for WebFingerError {
    fn from(err: acct_address::ParseAddressError) -> Self {
        WebFingerError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WebFingerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = WebFingerError::Parse("unexpected token".to_string());
        assert_eq!(format!("{}", err), "parse error: unexpected token");
    }

    #[test]
    fn test_status_error_display() {
        let err = WebFingerError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            url: "https://example.com/.well-known/host-meta".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "status 500 Internal Server Error from https://example.com/.well-known/host-meta"
        );
    }

    #[test]
    fn test_not_found_display() {
        assert_eq!(
            format!("{}", WebFingerError::NotFound),
            "no matching link found"
        );
    }

    #[test]
    fn test_from_address_error() {
        let err = WebFingerError::from(acct_address::ParseAddressError);
        assert!(matches!(err, WebFingerError::Parse(_)));
    }

    #[test]
    fn test_error_is_debug() {
        let err = WebFingerError::NotFound;
        assert!(format!("{:?}", err).contains("NotFound"));
    }
}
