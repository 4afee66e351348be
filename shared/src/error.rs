use serde::Deserialize;
use thiserror::Error;

/// Normalized failure for every remote-facing operation. Transport and
/// HTTP errors are classified once, at the client boundary, so callers
/// and views never see a raw transport error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Invalid input, rejected before or by the backend (4xx).
    #[error("{0}")]
    Validation(String),
    /// Sign-in or sign-up rejected. Never clears an existing session.
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("{0}")]
    NotFound(String),
    /// The bearer credential itself was rejected on a non-auth request.
    /// The caller is expected to discard the session and return to the
    /// sign-in entry point.
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Server(String),
    /// No response at all: connection refused, timeout, DNS failure.
    #[error("{0}")]
    Network(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn detail(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| fallback.to_string())
}

impl ApiError {
    /// Classification for non-auth endpoints. `fallback` is the
    /// per-operation message used when the body carries no `message`.
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        match status {
            400 => ApiError::Validation(detail(body, fallback)),
            401 => ApiError::Unauthorized(detail(body, fallback)),
            404 => ApiError::NotFound(detail(body, fallback)),
            402..=499 => ApiError::Validation(detail(body, fallback)),
            _ => ApiError::Server(detail(body, "Server error. Please try again later.")),
        }
    }

    /// Sign-in classification: a 400 or 401 here means bad credentials,
    /// not an expired session.
    pub fn from_login_response(status: u16, body: &str) -> Self {
        match status {
            400 | 401 => ApiError::InvalidCredentials(detail(body, "Invalid email or password")),
            _ => ApiError::Server(detail(body, "Server error. Please try again later.")),
        }
    }

    pub fn from_register_response(status: u16, body: &str) -> Self {
        match status {
            400..=499 => {
                ApiError::Validation(detail(body, "Email is already in use or invalid data"))
            }
            _ => ApiError::Server(detail(body, "Server error. Please try again later.")),
        }
    }

    pub fn network() -> Self {
        ApiError::Network("Network error. Please check your connection.".to_string())
    }

    /// Transport succeeded but the body did not match the expected shape.
    pub fn bad_payload() -> Self {
        ApiError::Server("Unexpected response from the server.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_takes_precedence_over_fallback() {
        let err = ApiError::from_response(404, r#"{"message":"Project not found"}"#, "fallback");
        assert_eq!(err, ApiError::NotFound("Project not found".into()));
    }

    #[test]
    fn fallback_used_when_body_has_no_message() {
        let err = ApiError::from_response(400, "", "Could not create the project.");
        assert_eq!(
            err,
            ApiError::Validation("Could not create the project.".into())
        );
        let err = ApiError::from_response(400, "not json", "Could not create the project.");
        assert_eq!(
            err,
            ApiError::Validation("Could not create the project.".into())
        );
    }

    #[test]
    fn unauthorized_only_for_401_on_domain_endpoints() {
        assert!(matches!(
            ApiError::from_response(401, "", "f"),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_response(403, "", "f"),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from_response(500, "", "f"),
            ApiError::Server(_)
        ));
        assert!(matches!(
            ApiError::from_response(503, "", "f"),
            ApiError::Server(_)
        ));
    }

    #[test]
    fn login_rejection_is_invalid_credentials_not_unauthorized() {
        let err =
            ApiError::from_login_response(401, r#"{"message":"Invalid email or password"}"#);
        assert_eq!(
            err,
            ApiError::InvalidCredentials("Invalid email or password".into())
        );
        let err = ApiError::from_login_response(400, "");
        assert_eq!(
            err,
            ApiError::InvalidCredentials("Invalid email or password".into())
        );
    }

    #[test]
    fn register_rejection_is_validation() {
        let err = ApiError::from_register_response(400, "");
        assert_eq!(
            err,
            ApiError::Validation("Email is already in use or invalid data".into())
        );
        let err = ApiError::from_register_response(500, "");
        assert_eq!(
            err,
            ApiError::Server("Server error. Please try again later.".into())
        );
    }

    #[test]
    fn network_wording_differs_from_server_wording() {
        let network = ApiError::network().to_string();
        let server = ApiError::from_response(500, "", "f").to_string();
        assert!(network.contains("connection"));
        assert!(server.contains("try again later"));
        assert_ne!(network, server);
    }
}
