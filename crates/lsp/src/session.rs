//! Analysis session: one logical connection to the language-analysis
//! service, keyed by workspace root and language identity.

use std::path::{Path, PathBuf};

use lsp_types::WorkspaceFolder;

use crate::transport::CoreTransport;
use crate::{JsonValue, Result};

/// Registry lookup key for an analysis session.
///
/// Not globally unique: two editor instances may both hold a session for the
/// same root and language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
	/// Workspace root the session was resolved for.
	pub root: PathBuf,
	/// Transport-level language identity.
	pub language_id: String,
}

/// A live analysis session.
///
/// Owns its [`CoreTransport`] exclusively; the workspace-folder context is
/// fixed at creation and describes the root the session was opened against.
/// Sessions are created by the [`Registry`] and shared as `Arc` handles;
/// they are never torn down individually, only dropped wholesale when the
/// registry is cleared.
///
/// [`Registry`]: crate::Registry
pub struct AnalysisSession {
	key: SessionKey,
	transport: CoreTransport,
	workspace_folders: Vec<WorkspaceFolder>,
}

impl std::fmt::Debug for AnalysisSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AnalysisSession")
			.field("key", &self.key)
			.field("workspace_folders", &self.workspace_folders.len())
			.finish_non_exhaustive()
	}
}

impl AnalysisSession {
	pub(crate) fn new(
		key: SessionKey,
		transport: CoreTransport,
		workspace_folders: Vec<WorkspaceFolder>,
	) -> Self {
		Self {
			key,
			transport,
			workspace_folders,
		}
	}

	/// The registry key this session is filed under.
	pub fn key(&self) -> &SessionKey {
		&self.key
	}

	/// The transport-level language identity.
	pub fn language_id(&self) -> &str {
		&self.key.language_id
	}

	/// The workspace root the session was resolved for.
	pub fn root(&self) -> &Path {
		&self.key.root
	}

	/// The workspace-folder context passed at creation time.
	pub fn workspace_folders(&self) -> &[WorkspaceFolder] {
		&self.workspace_folders
	}

	/// Sends an analysis-protocol payload over the session's transport.
	pub fn send(&self, payload: JsonValue) -> Result<()> {
		self.transport.send(payload)
	}

	/// Receives the next inbound payload from the session's transport.
	pub async fn recv(&self) -> Option<JsonValue> {
		self.transport.recv().await
	}
}
