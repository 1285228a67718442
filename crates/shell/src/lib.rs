//! Editor shell core: document session lifecycle, dirty-state
//! reconciliation, save coordination, and analysis-session wiring.
//!
//! The embeddable text widget, dialog rendering, and filesystem primitives
//! are external collaborators behind traits ([`EditorWidget`],
//! [`DocumentWriter`], and whatever dialog consumes a
//! [`ConfirmationRequest`]). The shell owns everything between them: when a
//! session becomes usable, when it counts as dirty, when a save needs user
//! confirmation, and which analysis session serves it.
//!
//! Everything runs on the host's event loop - single-threaded and
//! cooperative. The only suspension points are the content load (awaited by
//! the host, applied via [`Workspace::resolve_load`]), the async write
//! collaborator, and a pending save confirmation, which has no timeout.

pub mod format;
pub mod fs;
pub mod session;
pub mod snapshot;
pub mod workspace;

pub use format::{FileFormat, LanguageSupport, language_support};
pub use fs::{DocumentWriter, LOCAL_FILESYSTEM, LocalFilesystemWriter};
pub use session::{
	ConfirmationAction, ConfirmationRequest, DocumentSession, EditEvent, EditingHandle,
	EditorWidget, KeyDisposition, LoadOutcome, SaveChoice, SaveDisposition, SaveOptions,
	SessionDescriptor, SessionId,
};
pub use snapshot::Snapshot;
pub use workspace::Workspace;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShellError {
	/// The format cannot back a text editing session.
	#[error("cannot edit {0:?} content as text")]
	IncompatibleFormat(FileFormat),
	/// The write collaborator failed; the session keeps its edited state.
	#[error("write failed: {0}")]
	Write(#[from] std::io::Error),
	/// No open session has the given identifier.
	#[error("no open session {0:?}")]
	UnknownSession(SessionId),
}
