//! Analysis session registry.
//!
//! Deduplicates analysis sessions by `(workspace root, language identity)`
//! and performs the handshake that brings a new session online.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lsp_types::WorkspaceFolder;
use parking_lot::RwLock;
use tracing::info;

use crate::protocol::{CoreConnection, CoreMessage};
use crate::session::{AnalysisSession, SessionKey};
use crate::transport::CoreTransport;
use crate::{Error, Result, uri_for_path};

/// Registry of active analysis sessions.
///
/// Created once per editor session, injected wherever sessions are resolved,
/// and [`clear`]ed when the editor session ends. All insertions go through
/// [`resolve`]; no other component mutates the map.
///
/// # Concurrency
///
/// The miss path (handshake + construction + registration) runs under the
/// map's write lock and never suspends, so two `resolve` calls for the same
/// key cannot both construct: the second blocks until the first has
/// registered, then takes the fast path.
///
/// [`clear`]: Registry::clear
/// [`resolve`]: Registry::resolve
pub struct Registry {
	/// The shared connection used to handshake and to build transports.
	connection: Arc<dyn CoreConnection>,
	/// Active sessions keyed by `(root, language)`.
	sessions: RwLock<HashMap<SessionKey, Arc<AnalysisSession>>>,
}

impl Registry {
	/// Creates an empty registry on the given core connection.
	pub fn new(connection: Arc<dyn CoreConnection>) -> Self {
		Self {
			connection,
			sessions: RwLock::new(HashMap::new()),
		}
	}

	/// Returns the analysis session for a document, starting one on miss.
	///
	/// The key is the document's containing directory (derived lexically
	/// from the path) paired with the language identity. A hit returns the
	/// existing handle with no protocol traffic. A miss performs the
	/// handshake:
	///
	/// 1. emit the initialization notification to the core, addressed by the
	///    owning state identifier (fire-and-forget, never awaited);
	/// 2. bind a transport to the language identity;
	/// 3. construct the session with the resolved root and a workspace
	///    folder derived from the containing directory;
	/// 4. register the handle under the key, then return it.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidPath`] if the root has no URI form, or the
	/// emit error if the core connection is closed.
	pub fn resolve(
		&self,
		document_path: &Path,
		language_id: &str,
	) -> Result<Arc<AnalysisSession>> {
		let root = workspace_root_for(document_path);
		let key = SessionKey {
			root: root.clone(),
			language_id: language_id.to_string(),
		};

		if let Some(session) = self.sessions.read().get(&key) {
			return Ok(session.clone());
		}

		let mut sessions = self.sessions.write();
		// Re-check under the write lock; a racing resolve may have registered first.
		if let Some(session) = sessions.get(&key) {
			return Ok(session.clone());
		}

		let folder = workspace_folder_for(&root)?;

		info!(language = %language_id, root = ?root, "Starting analysis session");

		self.connection.emit(CoreMessage::InitializeLanguageSession {
			state_id: self.connection.state_id(),
			language_id: language_id.to_string(),
		})?;

		let transport = CoreTransport::new(language_id, self.connection.clone());
		let session = Arc::new(AnalysisSession::new(key.clone(), transport, vec![folder]));
		sessions.insert(key, session.clone());

		Ok(session)
	}

	/// Returns the session for a document if one is already registered.
	pub fn get(&self, document_path: &Path, language_id: &str) -> Option<Arc<AnalysisSession>> {
		let key = SessionKey {
			root: workspace_root_for(document_path),
			language_id: language_id.to_string(),
		};
		self.sessions.read().get(&key).cloned()
	}

	/// The number of active sessions.
	pub fn active_count(&self) -> usize {
		self.sessions.read().len()
	}

	/// Drops every session. Called when the editor session ends.
	pub fn clear(&self) {
		self.sessions.write().clear();
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("active", &self.active_count())
			.finish_non_exhaustive()
	}
}

/// Resolves the workspace root for a document: its containing directory.
///
/// Purely lexical. Touching the filesystem here would block the resolve
/// path and make the dedup key depend on what currently exists on disk.
fn workspace_root_for(document_path: &Path) -> PathBuf {
	match document_path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
		_ => document_path.to_path_buf(),
	}
}

/// Builds the workspace-folder descriptor for a root directory.
fn workspace_folder_for(root: &Path) -> Result<WorkspaceFolder> {
	let uri =
		uri_for_path(root).ok_or_else(|| Error::InvalidPath(root.display().to_string()))?;
	let name = root
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| root.display().to_string());
	Ok(WorkspaceFolder { uri, name })
}
