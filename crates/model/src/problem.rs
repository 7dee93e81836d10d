//! IETF RFC-7807 problem payloads.
//!
//! Every wharf-api endpoint since v4.0.0 answers non-2xx requests with a
//! problem body served as [`PROBLEM_CONTENT_TYPE`].

use serde::{Deserialize, Serialize};

/// Content type of a structured problem response.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// A structured, machine-readable error returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemResponse {
    /// URI reference identifying the problem type.
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short, human-readable summary of the problem type.
    pub title: String,
    /// HTTP status code the server generated for this occurrence.
    pub status: u16,
    /// Human-readable explanation specific to this occurrence.
    pub detail: String,
    /// URI reference identifying this specific occurrence.
    pub instance: String,
    /// Ordered list of individual error messages.
    #[serde(default, deserialize_with = "crate::nullable::null_as_default")]
    pub errors: Vec<String>,
}

/// Returns `true` if a `Content-Type` header value denotes a problem payload.
///
/// Media type parameters (`; charset=utf-8`) and casing are ignored.
pub fn is_problem_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|media_type| media_type.eq_ignore_ascii_case(PROBLEM_CONTENT_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_problem_content_type_variants() {
        assert!(is_problem_content_type("application/problem+json"));
        assert!(is_problem_content_type("application/problem+json; charset=utf-8"));
        assert!(is_problem_content_type("Application/Problem+JSON"));
        assert!(!is_problem_content_type("application/json"));
        assert!(!is_problem_content_type(""));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let problem: ProblemResponse =
            serde_json::from_str(r#"{"title":"Bad request","errors":["limit must be positive"]}"#)
                .unwrap();
        assert_eq!(problem.title, "Bad request");
        assert_eq!(problem.errors, vec!["limit must be positive"]);
        assert_eq!(problem.status, 0);
        assert!(problem.detail.is_empty());
    }

    #[test]
    fn null_errors_read_as_empty() {
        let problem: ProblemResponse =
            serde_json::from_str(r#"{"title":"Bad request","errors":null}"#).unwrap();
        assert_eq!(problem.title, "Bad request");
        assert!(problem.errors.is_empty());
    }

    #[test]
    fn type_field_maps_to_problem_type() {
        let problem: ProblemResponse =
            serde_json::from_str(r#"{"type":"/prob/api/record-not-found","status":404}"#).unwrap();
        assert_eq!(problem.problem_type, "/prob/api/record-not-found");
        assert_eq!(problem.status, 404);
    }
}
