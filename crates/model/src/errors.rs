//! Error types owned by the Wharf API domain.
//!
//! [`CompatibilityError`] is produced by the version gate when a request must
//! be blocked before it reaches the network. [`QueryError`] is produced when a
//! search record violates one of its field relation rules. [`ProblemError`]
//! wraps a server-reported RFC-7807 problem.
//!
//! Transport-level failures are defined by the infrastructure crate that owns
//! the transport.

use thiserror::Error;

use crate::problem::ProblemResponse;
use crate::SemVer;

// ---------------------------------------------------------------------------
// Version compatibility
// ---------------------------------------------------------------------------

/// Reasons the version gate refuses to let an endpoint call proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompatibilityError {
    /// The server is older than the version in which the endpoint was
    /// introduced.
    ///
    /// Only returned when `err_if_outdated_server` is enabled.
    #[error("outdated server: {server} (server) is less than {introduced_in} (when endpoint was introduced)")]
    OutdatedServer {
        /// Version reported by the server.
        server: SemVer,
        /// Version in which the endpoint first became available.
        introduced_in: SemVer,
    },

    /// The server is at least two major versions ahead of the newest version
    /// this client is known to support.
    ///
    /// Only returned when `err_if_outdated_client` is enabled.
    #[error("outdated client: {server} (server) is too new for {highest_supported} (highest supported version by client)")]
    OutdatedClient {
        /// Version reported by the server.
        server: SemVer,
        /// Highest server version the client supports.
        highest_supported: SemVer,
    },
}

/// A version string that could not be read as `major.minor.patch`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid semantic version: {input:?}")]
pub struct VersionParseError {
    /// The rejected input.
    pub input: String,
}

/// The version source could not report the server version.
///
/// The gate treats this as "unknown version" and never surfaces it to the
/// endpoint caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch server version: {0}")]
pub struct VersionFetchError(pub String);

// ---------------------------------------------------------------------------
// Query encoding
// ---------------------------------------------------------------------------

/// A search record combined fields that the API refuses together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// `field` was set without the field it depends on.
    #[error("field {requires:?} not set when using {field:?}")]
    MissingRequired {
        /// Query name of the field that was set.
        field: &'static str,
        /// Query name of the field it depends on.
        requires: &'static str,
    },

    /// `field` was set together with a field it excludes.
    #[error("field {excluded:?} set when using {field:?}")]
    MutuallyExclusive {
        /// Query name of the field that was set.
        field: &'static str,
        /// Query name of the conflicting field.
        excluded: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Server-reported problems
// ---------------------------------------------------------------------------

/// A non-2xx response that carried an `application/problem+json` body.
///
/// The message is the problem title with its first character lower-cased and
/// trailing punctuation trimmed, followed by the individual errors:
///
/// ```text
/// Project not found.  +  ["no project with ID 3"]
///   => "project not found: no project with ID 3"
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ProblemError {
    /// The parsed problem body.
    pub problem: ProblemResponse,
    message: String,
}

impl ProblemError {
    /// Wraps a parsed problem, deriving the display message.
    pub fn new(problem: ProblemResponse) -> Self {
        let title = first_char_lower(&problem.title);
        let title = title.trim_end_matches([',', '.', '!', ';', ' ']);
        let message = format!("{}: {}", title, problem.errors.join("; "));
        Self { problem, message }
    }

    /// Returns the derived display message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn first_char_lower(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(title: &str, errors: &[&str]) -> ProblemResponse {
        ProblemResponse {
            title: title.to_string(),
            errors: errors.iter().map(|e| e.to_string()).collect(),
            ..ProblemResponse::default()
        }
    }

    #[test]
    fn problem_message_lowercases_and_trims_title() {
        let err = ProblemError::new(problem("Project not found.", &["no project with ID 3"]));
        assert_eq!(err.to_string(), "project not found: no project with ID 3");
    }

    #[test]
    fn problem_message_joins_errors() {
        let err = ProblemError::new(problem("Invalid input!; ", &["name is required", "bad URL"]));
        assert_eq!(err.message(), "invalid input: name is required; bad URL");
    }

    #[test]
    fn first_char_lower_handles_non_ascii() {
        assert_eq!(first_char_lower(""), "");
        assert_eq!(first_char_lower("F"), "f");
        assert_eq!(first_char_lower("FOO BAR"), "fOO BAR");
        assert_eq!(first_char_lower("ÄÅ gott"), "äÅ gott");
    }

    #[test]
    fn compatibility_messages_name_both_versions() {
        let err = CompatibilityError::OutdatedServer {
            server: SemVer::new(5, 0, 0),
            introduced_in: SemVer::new(6, 0, 0),
        };
        let text = err.to_string();
        assert!(text.starts_with("outdated server"));
        assert!(text.contains("5.0.0"));
        assert!(text.contains("6.0.0"));
    }
}
