//! Client-side plumbing for language-analysis sessions.
//!
//! The editor core hosts the actual language servers; this crate manages the
//! client's view of them. A [`Registry`] deduplicates analysis sessions by
//! `(workspace root, language identity)` and performs the one-time handshake
//! that brings a new session online: an initialization notification to the
//! core, a [`CoreTransport`] bound to the language, and an
//! [`AnalysisSession`] owning that transport.
//!
//! Nothing here blocks on the core: the handshake notification is
//! fire-and-forget, and replies arrive through the session's transport
//! subscription.

use std::path::{Path, PathBuf};

/// Re-export of the JSON value type used for analysis-protocol payloads.
pub use serde_json::Value as JsonValue;

pub mod protocol;
pub mod registry;
pub mod session;
pub mod transport;

pub use protocol::{CoreConnection, CoreMessage};
pub use registry::Registry;
pub use session::{AnalysisSession, SessionKey};
pub use transport::CoreTransport;

/// A convenient type alias for `Result` with `E` = [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The core connection is closed; nothing can be emitted on it.
	#[error("core connection closed")]
	ConnectionClosed,
	/// A payload could not be decoded.
	#[error("deserialization failed: {0}")]
	Deserialize(#[from] serde_json::Error),
	/// The peer violated the analysis-session protocol.
	#[error("protocol error: {0}")]
	Protocol(String),
	/// A workspace root that cannot be expressed as a file URI.
	#[error("path has no URI form: {0}")]
	InvalidPath(String),
}

/// Converts a filesystem path to an LSP URI.
///
/// Returns `None` for paths that are not absolute or cannot be encoded.
pub fn uri_for_path(path: &Path) -> Option<lsp_types::Uri> {
	use std::str::FromStr;

	let url = url::Url::from_file_path(path).ok()?;
	lsp_types::Uri::from_str(url.as_str()).ok()
}

/// Converts an LSP URI to a filesystem path.
///
/// Returns `None` if the URI is not a `file://` scheme or cannot be parsed.
pub fn path_from_uri(uri: &lsp_types::Uri) -> Option<PathBuf> {
	use std::str::FromStr;

	let url = url::Url::from_str(uri.as_str()).ok()?;
	url.to_file_path().ok()
}
