//! Protocol version query and minimum-version gate.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::protocol::{BrowserCommand, BrowserVersion, ProtocolVersion};

use super::Client;

// ============================================================================
// Client - Version
// ============================================================================

impl Client {
    /// Returns the remote's protocol version.
    ///
    /// The first call issues `Browser.getVersion`; the answer is cached for
    /// the life of the connection. Concurrent first callers share that one
    /// query. A remote that cannot answer (too old to know the command, a
    /// garbled version string) is reported as `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the connection closes before
    /// a version is known, or [`Error::RequestTimeout`] if the query hits
    /// the configured command timeout. Nothing is cached in either case.
    pub async fn get_protocol_version(&self) -> Result<ProtocolVersion> {
        self.inner
            .protocol_version
            .get_or_try_init(|| self.query_protocol_version())
            .await
            .copied()
    }

    /// Checks the remote speaks at least `required` (`"major.minor"`).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `required` is not `major.minor`
    /// - [`Error::VersionTooOld`] carrying both versions otherwise
    /// - [`Error::ConnectionClosed`] if the version cannot be queried
    pub async fn ensure_minimum_protocol_version(&self, required: &str) -> Result<()> {
        let required: ProtocolVersion = required.parse()?;
        self.ensure_protocol_version(required).await
    }

    /// Typed form of [`Client::ensure_minimum_protocol_version`].
    ///
    /// # Errors
    ///
    /// Same as [`Client::ensure_minimum_protocol_version`], minus parsing.
    pub async fn ensure_protocol_version(&self, required: ProtocolVersion) -> Result<()> {
        let actual = self.get_protocol_version().await?;

        if actual.satisfies(&required) {
            Ok(())
        } else {
            debug!(%required, %actual, "Protocol version below minimum");
            Err(Error::version_too_old(required, actual))
        }
    }

    /// Fetches product, revision and user agent details.
    ///
    /// Not cached; each call issues `Browser.getVersion`.
    ///
    /// # Errors
    ///
    /// Any error from the command, or [`Error::Json`] if the result has
    /// the wrong shape.
    pub async fn browser_version(&self) -> Result<BrowserVersion> {
        let result = self.send_command(BrowserCommand::GetVersion).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Runs the version query, mapping remote failures to `0.0`.
    ///
    /// Local conditions (closed connection, timeout, pending limit) say
    /// nothing about the remote and are returned uncached.
    async fn query_protocol_version(&self) -> Result<ProtocolVersion> {
        let version = match self.browser_version().await {
            Ok(info) => match info.protocol() {
                Ok(version) => version,
                Err(e) => {
                    warn!(error = %e, "Unparseable protocol version, assuming 0.0");
                    ProtocolVersion::ZERO
                }
            },
            Err(
                e @ (Error::ConnectionClosed
                | Error::RequestTimeout { .. }
                | Error::TooManyPendingRequests { .. }),
            ) => return Err(e),
            Err(e) => {
                warn!(error = %e, "Protocol version query failed, assuming 0.0");
                ProtocolVersion::ZERO
            }
        };

        debug!(%version, "Protocol version cached");
        Ok(version)
    }
}
