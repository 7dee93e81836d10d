//! Client/server version compatibility gate.
//!
//! Every endpoint wrapper declares the server version in which its endpoint
//! was introduced. Before a request is sent, [`VersionGate::validate_endpoint`]
//! compares that requirement and the client's [`HIGHEST_SUPPORTED_VERSION`]
//! against the version the server reports, and either lets the call through,
//! logs a rate-limited warning, or blocks it with a [`CompatibilityError`].
//!
//! The gate is fail-open: if the server version cannot be fetched or parsed,
//! nothing is ever blocked.
//!
//! ## Client compatibility tiers
//!
//! Wharf aims for backward compatibility of one major version, so the client
//! only blocks once the server is two or more major versions ahead:
//!
//! | Server  | Client supports | Level | Blocks with `err_if_outdated_client`? |
//! |---------|-----------------|-------|---------------------------------------|
//! | 5.0.0   | 5.0.0           | None  | No                                    |
//! | 5.1.0   | 5.0.0           | Debug | No                                    |
//! | 6.12.5  | 5.0.0           | Warn  | No                                    |
//! | 7.0.0   | 5.0.0           | Error | Yes                                   |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::errors::{CompatibilityError, VersionFetchError};
use crate::SemVer;

/// The newest server version this client is known to work correctly against.
pub const HIGHEST_SUPPORTED_VERSION: SemVer = SemVer::new(5, 1, 0);

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Reports the raw version string of the remote server.
///
/// Implemented by the HTTP transport (`GET /api/version`). The gate calls it
/// at most once between resets.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Fetches the server's version string, e.g. `"v5.1.2"`.
    async fn fetch_version(&self) -> Result<String, VersionFetchError>;
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The minimum server version that supports an API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointRequirement {
    /// Version in which the endpoint first became available.
    pub introduced_in: SemVer,
}

impl EndpointRequirement {
    /// Creates a requirement for an endpoint introduced in `major.minor.patch`.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            introduced_in: SemVer::new(major, minor, patch),
        }
    }
}

/// Caller-controlled version enforcement switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFlags {
    /// Block calls when the server is two or more major versions ahead of
    /// [`HIGHEST_SUPPORTED_VERSION`].
    pub err_if_outdated_client: bool,
    /// Block calls to endpoints the server is too old to provide.
    pub err_if_outdated_server: bool,
    /// Suppress the once-per-client outdated-version log events.
    pub disable_outdated_logging: bool,
}

impl VersionFlags {
    /// Returns `true` if any check may block a call.
    pub fn enforces_anything(self) -> bool {
        self.err_if_outdated_client || self.err_if_outdated_server
    }
}

/// How far ahead of the client's supported range the server is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientCompatibility {
    /// Server is at or below the highest supported version.
    Supported,
    /// Same major version, but a newer minor or patch. Informational only.
    NewerMinor,
    /// One major version ahead. Tolerated, use with caution.
    NewerMajor,
    /// Two or more major versions ahead. The client is too old.
    Unsupported,
}

impl ClientCompatibility {
    /// Classifies `server` against the client's `highest_supported` version.
    pub fn classify(server: SemVer, highest_supported: SemVer) -> Self {
        if server.major > highest_supported.major.saturating_add(1) {
            Self::Unsupported
        } else if server.major > highest_supported.major {
            Self::NewerMajor
        } else if server > highest_supported {
            Self::NewerMinor
        } else {
            Self::Supported
        }
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Per-client version cache plus the log-once bookkeeping.
///
/// Owned by exactly one client instance and mutated only through `&mut self`;
/// there is no internal locking.
#[derive(Debug, Clone)]
pub struct VersionGate {
    cached_version: Option<SemVer>,
    has_checked_version: bool,
    has_logged_client_warning: bool,
    has_logged_server_warning: bool,
    highest_supported: SemVer,
}

impl Default for VersionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionGate {
    /// Creates an empty gate checking against [`HIGHEST_SUPPORTED_VERSION`].
    pub fn new() -> Self {
        Self::with_highest_supported(HIGHEST_SUPPORTED_VERSION)
    }

    /// Creates an empty gate checking against a custom highest supported
    /// version.
    pub fn with_highest_supported(highest_supported: SemVer) -> Self {
        Self {
            cached_version: None,
            has_checked_version: false,
            has_logged_client_warning: false,
            has_logged_server_warning: false,
            highest_supported,
        }
    }

    /// The highest server version this gate considers fully supported.
    pub fn highest_supported(&self) -> SemVer {
        self.highest_supported
    }

    /// The cached server version, if one has been detected or set.
    pub fn cached_version(&self) -> Option<SemVer> {
        self.cached_version
    }

    /// Whether a version lookup (successful or not) has happened since the
    /// last reset.
    pub fn has_checked_version(&self) -> bool {
        self.has_checked_version
    }

    /// Overrides the version the gate believes the server has.
    ///
    /// Re-arms both log-once flags.
    pub fn set_cached_version(&mut self, version: SemVer) {
        self.cached_version = Some(version);
        self.has_checked_version = true;
        self.rearm_logging();
    }

    /// Forgets the cached version; the next gated call fetches a fresh one.
    ///
    /// Re-arms both log-once flags.
    pub fn reset_cached_version(&mut self) {
        self.cached_version = None;
        self.has_checked_version = false;
        self.rearm_logging();
    }

    /// Returns the cached version, fetching and caching it on first use.
    ///
    /// Fetch and parse failures are cached as "unknown" (`None`) and are not
    /// retried until [`reset_cached_version`](Self::reset_cached_version).
    pub async fn get_or_fetch_version(&mut self, source: &dyn VersionSource) -> Option<SemVer> {
        if self.has_checked_version {
            return self.cached_version;
        }

        let fetched = match source.fetch_version().await {
            Ok(raw) => match raw.parse::<SemVer>() {
                Ok(version) => {
                    debug!(version = %version, "Detected server version.");
                    Some(version)
                }
                Err(err) => {
                    debug!(error = %err, "Server reported an unparsable version.");
                    None
                }
            },
            Err(err) => {
                debug!(error = %err, "Unable to detect server version.");
                None
            }
        };

        self.cached_version = fetched;
        self.has_checked_version = true;
        fetched
    }

    /// Decides whether a call to an endpoint may proceed.
    ///
    /// When neither enforcement flag is set, the server version is not looked
    /// up at all and the call always proceeds.
    pub async fn validate_endpoint(
        &mut self,
        requirement: EndpointRequirement,
        flags: VersionFlags,
        source: &dyn VersionSource,
    ) -> Result<(), CompatibilityError> {
        if !flags.enforces_anything() {
            return Ok(());
        }
        let server = self.get_or_fetch_version(source).await;
        self.validate_endpoint_no_lookup(requirement, flags, server)
    }

    /// Same as [`validate_endpoint`](Self::validate_endpoint) against an
    /// already-known server version.
    pub fn validate_endpoint_no_lookup(
        &mut self,
        requirement: EndpointRequirement,
        flags: VersionFlags,
        server: Option<SemVer>,
    ) -> Result<(), CompatibilityError> {
        let Some(server) = server else {
            return Ok(());
        };

        if server < requirement.introduced_in {
            let err = CompatibilityError::OutdatedServer {
                server,
                introduced_in: requirement.introduced_in,
            };
            if !flags.disable_outdated_logging && !self.has_logged_server_warning {
                self.has_logged_server_warning = true;
                warn!(error = %err, "Server is outdated.");
            }
            if flags.err_if_outdated_server {
                return Err(err);
            }
        }

        let compatibility = ClientCompatibility::classify(server, self.highest_supported);
        if compatibility == ClientCompatibility::Supported {
            return Ok(());
        }

        if !flags.disable_outdated_logging && !self.has_logged_client_warning {
            self.has_logged_client_warning = true;
            self.log_client_compatibility(compatibility, server);
        }

        if compatibility == ClientCompatibility::Unsupported && flags.err_if_outdated_client {
            return Err(CompatibilityError::OutdatedClient {
                server,
                highest_supported: self.highest_supported,
            });
        }
        Ok(())
    }

    fn log_client_compatibility(&self, compatibility: ClientCompatibility, server: SemVer) {
        let highest = self.highest_supported;
        match compatibility {
            ClientCompatibility::Unsupported => error!(
                server = %server,
                highest_supported = %highest,
                "Client is outdated: server is too new for the highest supported version by client."
            ),
            ClientCompatibility::NewerMajor => warn!(
                server = %server,
                highest_supported = %highest,
                "Client is outdated: server is newer than the highest supported version by client, \
                 enough to still be supported, but use with caution."
            ),
            ClientCompatibility::NewerMinor => debug!(
                server = %server,
                highest_supported = %highest,
                "Client is outdated: server is slightly newer than the highest supported version \
                 by client, however way within the supported range."
            ),
            ClientCompatibility::Supported => {}
        }
    }

    fn rearm_logging(&mut self) {
        self.has_logged_client_warning = false;
        self.has_logged_server_warning = false;
    }
}
