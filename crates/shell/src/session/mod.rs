//! Document session - the lifecycle of one open document.
//!
//! A [`DocumentSession`] moves through `Loading → Ready → Closed`. The
//! editing handle is owned by the `Ready` state, so "handle exists iff the
//! session is usable" holds structurally. Dirtiness is not a state of its
//! own: the [`edited`] flag is layered on `Ready` and driven exclusively by
//! the reconciler (`reconcile`) and the save coordinator (`save`).
//!
//! Content loading happens outside the session: the host awaits the loader
//! and feeds the single-shot resolution to [`resolve_load`]. A close while
//! the load is pending acts as cancellation - the late resolution is
//! discarded without constructing anything.
//!
//! [`edited`]: DocumentSession::edited
//! [`resolve_load`]: DocumentSession::resolve_load

mod reconcile;
mod save;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use reconcile::KeyDisposition;
pub use save::{
	ConfirmationAction, ConfirmationRequest, SaveChoice, SaveDisposition, SaveOptions,
};
use scribe_lsp::AnalysisSession;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ShellError;
use crate::format::FileFormat;
use crate::fs::LOCAL_FILESYSTEM;
use crate::snapshot::Snapshot;

/// Counter for generating unique session IDs.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a document session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
	/// Allocates the next unique session ID.
	pub fn next() -> Self {
		Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
	}
}

/// Edit notification emitted by the editing surface.
#[derive(Debug, Clone, Copy)]
pub struct EditEvent {
	/// Whether the edit changed document content (as opposed to selection or
	/// viewport state).
	pub document_changed: bool,
}

/// The owned, stateful in-memory document behind the editing surface.
///
/// Rendering is out of scope; the shell reads content, drives the history
/// primitives, and releases the handle on close.
pub trait EditingHandle {
	/// Current content as an ordered line sequence.
	fn snapshot_lines(&self) -> Vec<String>;

	/// Current content as a single string, or `None` if unreadable.
	fn current_text(&self) -> Option<String>;

	/// Applies the primitive undo transformation; returns whether anything
	/// was undone.
	fn undo(&mut self) -> bool;

	/// Applies the primitive redo transformation; returns whether anything
	/// was redone.
	fn redo(&mut self) -> bool;

	/// Releases the handle's resources. Idempotent.
	fn destroy(&mut self);
}

/// Factory for editing handles, implemented by the embedding widget.
pub trait EditorWidget: Send + Sync {
	/// Creates a handle seeded with a document's initial text.
	fn create_handle(&self, initial_text: &str) -> Box<dyn EditingHandle>;
}

/// Structural session state. Dirtiness lives in [`DocumentSession::edited`],
/// not here.
enum SessionState {
	/// Content load pending; only `close` is valid.
	Loading,
	/// Usable; the editing handle exists exactly as long as this state.
	Ready { handle: Box<dyn EditingHandle> },
	/// Terminal. The handle has been destroyed.
	Closed,
}

/// How a content-load resolution landed on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
	/// The session constructed its editing handle and became usable.
	Ready,
	/// The loader produced no content; the session closed itself and must be
	/// removed by its owner.
	SelfClosed,
	/// The session was no longer waiting for a load; nothing was
	/// constructed.
	Discarded,
}

/// Serializable identity of an open session.
///
/// Hosts persist these to restore the open-document list across editor
/// sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptor {
	pub id: SessionId,
	pub path: PathBuf,
	pub filesystem: String,
	pub format: FileFormat,
	pub display_name: String,
}

/// A live editing context bound to one open document.
pub struct DocumentSession {
	id: SessionId,
	path: PathBuf,
	display_name: String,
	format: FileFormat,
	/// Name of the filesystem scope the document was opened from.
	filesystem: String,
	state: SessionState,
	/// Content as of the last successful save (or initial load).
	last_saved: Snapshot,
	/// The sole externally observable dirtiness flag.
	edited: bool,
	/// Analysis session serving this document, when the format is supported.
	analysis: Option<Arc<AnalysisSession>>,
}

impl std::fmt::Debug for DocumentSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DocumentSession")
			.field("id", &self.id)
			.field("path", &self.path)
			.field("edited", &self.edited)
			.finish_non_exhaustive()
	}
}

impl DocumentSession {
	/// Opens a session for a document whose content load is pending.
	///
	/// # Errors
	///
	/// Returns [`ShellError::IncompatibleFormat`] for binary formats.
	pub fn open(path: PathBuf, format: FileFormat) -> Result<Self, ShellError> {
		if !format.is_text() {
			return Err(ShellError::IncompatibleFormat(format));
		}

		let display_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| path.display().to_string());

		debug!(path = ?path, "Opening document session");

		Ok(Self {
			id: SessionId::next(),
			path,
			display_name,
			format,
			filesystem: LOCAL_FILESYSTEM.to_string(),
			state: SessionState::Loading,
			last_saved: Snapshot::default(),
			edited: false,
			analysis: None,
		})
	}

	/// Applies the single-shot content-load resolution.
	///
	/// On `Some(text)` the widget constructs the editing handle, the text
	/// becomes the implicit save point, and the session turns usable. On
	/// `None` the session closes itself and reports [`LoadOutcome::SelfClosed`]
	/// so its owner removes it. A session that already left `Loading`
	/// (closed while the load was pending) discards the resolution without
	/// constructing a handle.
	pub fn resolve_load(
		&mut self,
		content: Option<String>,
		widget: &dyn EditorWidget,
	) -> LoadOutcome {
		if !matches!(self.state, SessionState::Loading) {
			debug!(session = ?self.id, "Discarding load resolution; session no longer loading");
			return LoadOutcome::Discarded;
		}

		let Some(text) = content else {
			debug!(session = ?self.id, path = ?self.path, "No content; session closes itself");
			self.close();
			return LoadOutcome::SelfClosed;
		};

		let handle = widget.create_handle(&text);
		self.last_saved = Snapshot::from_text(&text);
		self.edited = false;
		self.state = SessionState::Ready { handle };
		LoadOutcome::Ready
	}

	/// Closes the session, releasing the editing handle if one exists.
	///
	/// Valid from any state and idempotent. Any pending save confirmation is
	/// discarded by the host; a late choice lands on the stale-read guard.
	pub fn close(&mut self) {
		if let SessionState::Ready { handle } = &mut self.state {
			handle.destroy();
			debug!(session = ?self.id, path = ?self.path, "Document session closed");
		}
		self.state = SessionState::Closed;
	}

	/// The session's unique identifier.
	pub fn id(&self) -> SessionId {
		self.id
	}

	/// Location of the backing document.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// User-facing label of the backing document.
	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	/// The document's content classification.
	pub fn format(&self) -> &FileFormat {
		&self.format
	}

	/// Name of the filesystem scope the document was opened from.
	pub fn filesystem(&self) -> &str {
		&self.filesystem
	}

	/// Whether the session has unsaved changes.
	pub fn edited(&self) -> bool {
		self.edited
	}

	/// Content as of the last successful save.
	pub fn last_saved(&self) -> &Snapshot {
		&self.last_saved
	}

	/// Current content snapshot, while the session is usable.
	pub fn snapshot(&self) -> Option<Snapshot> {
		match &self.state {
			SessionState::Ready { handle } => {
				Some(Snapshot::from_lines(handle.snapshot_lines()))
			}
			_ => None,
		}
	}

	/// Whether the content load is still pending.
	pub fn is_loading(&self) -> bool {
		matches!(self.state, SessionState::Loading)
	}

	/// Whether the session is usable.
	pub fn is_ready(&self) -> bool {
		matches!(self.state, SessionState::Ready { .. })
	}

	/// Whether the session has been closed.
	pub fn is_closed(&self) -> bool {
		matches!(self.state, SessionState::Closed)
	}

	/// The analysis session serving this document, if any.
	pub fn analysis(&self) -> Option<&Arc<AnalysisSession>> {
		self.analysis.as_ref()
	}

	pub(crate) fn attach_analysis(&mut self, analysis: Arc<AnalysisSession>) {
		self.analysis = Some(analysis);
	}

	/// Serializable identity snapshot for persistence.
	pub fn descriptor(&self) -> SessionDescriptor {
		SessionDescriptor {
			id: self.id,
			path: self.path.clone(),
			filesystem: self.filesystem.clone(),
			format: self.format.clone(),
			display_name: self.display_name.clone(),
		}
	}
}
