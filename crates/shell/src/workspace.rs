//! Workspace - the container of one editor state's open document sessions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use scribe_lsp::Registry;
use tracing::{debug, warn};

use crate::ShellError;
use crate::format::{FileFormat, language_support};
use crate::fs::DocumentWriter;
use crate::session::{
	ConfirmationRequest, DocumentSession, EditEvent, EditorWidget, LoadOutcome, SaveChoice,
	SaveDisposition, SaveOptions, SessionDescriptor, SessionId,
};

/// Open document sessions of one editor state, plus the collaborators they
/// share.
///
/// The analysis [`Registry`] is injected at construction - it lives for the
/// whole editor session and outlives any workspace content - together with
/// the widget that builds editing handles and the writer that persists
/// content. Hosts drive the workspace from their event loop: open, feed the
/// content-load resolution, forward edits, save, close.
pub struct Workspace {
	sessions: HashMap<SessionId, DocumentSession>,
	registry: Arc<Registry>,
	widget: Arc<dyn EditorWidget>,
	writer: Arc<dyn DocumentWriter>,
}

impl Workspace {
	/// Creates an empty workspace over the given collaborators.
	pub fn new(
		registry: Arc<Registry>,
		widget: Arc<dyn EditorWidget>,
		writer: Arc<dyn DocumentWriter>,
	) -> Self {
		Self {
			sessions: HashMap::new(),
			registry,
			widget,
			writer,
		}
	}

	/// Opens a document session; content loading continues in the host.
	///
	/// # Errors
	///
	/// Returns [`ShellError::IncompatibleFormat`] for binary formats.
	pub fn open_document(
		&mut self,
		path: PathBuf,
		format: FileFormat,
	) -> Result<SessionId, ShellError> {
		let session = DocumentSession::open(path, format)?;
		let id = session.id();
		self.sessions.insert(id, session);
		Ok(id)
	}

	/// Applies a content-load resolution to a session.
	///
	/// A successful load of a supported language wires the session to its
	/// analysis session. A failed load removes the session - it has closed
	/// itself. Resolutions for unknown or already-closed sessions are
	/// discarded: close acts as load cancellation.
	pub fn resolve_load(&mut self, id: SessionId, content: Option<String>) -> LoadOutcome {
		let Some(session) = self.sessions.get_mut(&id) else {
			return LoadOutcome::Discarded;
		};

		let outcome = session.resolve_load(content, self.widget.as_ref());
		match outcome {
			LoadOutcome::Ready => self.attach_analysis(id),
			LoadOutcome::SelfClosed => {
				self.sessions.remove(&id);
			}
			LoadOutcome::Discarded => {}
		}
		outcome
	}

	/// Resolves and attaches the analysis session for a supported format.
	fn attach_analysis(&mut self, id: SessionId) {
		let Some(session) = self.sessions.get_mut(&id) else {
			return;
		};
		let Some(support) = language_support(session.format()) else {
			return;
		};

		match self.registry.resolve(session.path(), support.language_id) {
			Ok(analysis) => session.attach_analysis(analysis),
			Err(error) => {
				// The session stays usable without analysis.
				warn!(error = %error, session = ?id, "Analysis session resolution failed");
			}
		}
	}

	/// Forwards an edit event to a session.
	pub fn handle_edit(&mut self, id: SessionId, event: EditEvent) {
		if let Some(session) = self.sessions.get_mut(&id) {
			session.handle_edit(event);
		}
	}

	/// Saves a session, returning a confirmation request when one is needed.
	pub async fn save(
		&mut self,
		id: SessionId,
		options: SaveOptions,
	) -> Result<Option<ConfirmationRequest>, ShellError> {
		let session = self
			.sessions
			.get_mut(&id)
			.ok_or(ShellError::UnknownSession(id))?;
		session.save(options, self.writer.as_ref()).await
	}

	/// Applies the user's choice for a pending save confirmation.
	///
	/// `Discard` runs the close continuation: the session is closed and
	/// removed.
	pub async fn confirm_save(
		&mut self,
		id: SessionId,
		choice: SaveChoice,
	) -> Result<SaveDisposition, ShellError> {
		let session = self
			.sessions
			.get_mut(&id)
			.ok_or(ShellError::UnknownSession(id))?;
		let disposition = session.confirm_save(choice, self.writer.as_ref()).await?;

		if disposition == SaveDisposition::CloseRequested {
			self.close_session(id);
		}
		Ok(disposition)
	}

	/// Closes and removes a session.
	///
	/// Safe to call at any point in the session's life; closing with a load
	/// still pending cancels it, and a pending confirmation is discarded
	/// unresolved. Unknown IDs are ignored.
	pub fn close_session(&mut self, id: SessionId) {
		if let Some(mut session) = self.sessions.remove(&id) {
			session.close();
			debug!(session = ?id, "Document session removed from workspace");
		}
	}

	/// A session by ID.
	pub fn session(&self, id: SessionId) -> Option<&DocumentSession> {
		self.sessions.get(&id)
	}

	/// A session by ID, mutably.
	pub fn session_mut(&mut self, id: SessionId) -> Option<&mut DocumentSession> {
		self.sessions.get_mut(&id)
	}

	/// Serializable descriptors of all open sessions, for persistence.
	pub fn descriptors(&self) -> Vec<SessionDescriptor> {
		self.sessions.values().map(DocumentSession::descriptor).collect()
	}

	/// The injected analysis registry.
	pub fn registry(&self) -> &Arc<Registry> {
		&self.registry
	}

	/// The number of open sessions.
	pub fn len(&self) -> usize {
		self.sessions.len()
	}

	/// Whether no sessions are open.
	pub fn is_empty(&self) -> bool {
		self.sessions.is_empty()
	}
}

impl std::fmt::Debug for Workspace {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Workspace")
			.field("sessions", &self.sessions.len())
			.finish_non_exhaustive()
	}
}
