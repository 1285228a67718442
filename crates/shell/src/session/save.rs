//! Save coordination: forced saves, the confirmation flow, and saved-snapshot
//! upkeep.

use tracing::debug;

use super::{DocumentSession, SessionState};
use crate::ShellError;
use crate::fs::DocumentWriter;
use crate::snapshot::Snapshot;

/// Options controlling a save request.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
	/// Write immediately, without confirmation.
	pub force: bool,
	/// The save was triggered by a close request; adjusts the confirmation
	/// copy shown to the user.
	pub close_requested: bool,
}

/// The three resolutions of a save confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
	/// Write the document, then mark it unedited.
	Save,
	/// Discard changes; the caller runs its close continuation.
	Discard,
	/// Abort the pending operation; no state change.
	Cancel,
}

/// One labeled confirmation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationAction {
	/// User-facing button label.
	pub label: &'static str,
	/// The resolution this action stands for.
	pub choice: SaveChoice,
}

/// A pending request for user confirmation of unsaved changes.
///
/// Inert data until the host's dialog yields exactly one [`SaveChoice`] and
/// feeds it to [`DocumentSession::confirm_save`]; only one action may ever
/// fire. Dismissing the dialog without a choice must be treated as
/// [`SaveChoice::Cancel`]. There is no timeout - the request persists until
/// resolved or its session closes, which discards it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
	/// Dialog title.
	pub title: String,
	/// Dialog body copy.
	pub body: String,
	/// Exactly three labeled actions: save, discard, cancel.
	pub actions: [ConfirmationAction; 3],
	/// Suggested dialog height, in pixels.
	pub size_hint: u16,
}

impl ConfirmationRequest {
	fn for_session(session: &DocumentSession, close_requested: bool) -> Self {
		let body = if close_requested {
			"There are unsaved changes. Save them before closing?"
		} else {
			"There are unsaved changes. Save them now?"
		};
		Self {
			title: format!("Save changes to {}?", session.display_name),
			body: body.to_string(),
			actions: [
				ConfirmationAction {
					label: "Save",
					choice: SaveChoice::Save,
				},
				ConfirmationAction {
					label: "Don't save",
					choice: SaveChoice::Discard,
				},
				ConfirmationAction {
					label: "Cancel",
					choice: SaveChoice::Cancel,
				},
			],
			size_hint: 200,
		}
	}
}

/// How a resolved save left the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDisposition {
	/// The document was written and marked unedited.
	Saved,
	/// Changes were discarded; the caller should run its close continuation.
	CloseRequested,
	/// Nothing changed.
	Cancelled,
}

impl DocumentSession {
	/// Saves the session, or asks for confirmation first.
	///
	/// Forced saves write immediately and return no request. A clean session
	/// is a no-op. A dirty, unforced save returns a [`ConfirmationRequest`]
	/// carrying the three resolutions; the host resolves it through
	/// [`confirm_save`].
	///
	/// # Errors
	///
	/// Propagates the write collaborator's failure; `edited` and the saved
	/// snapshot are left untouched in that case.
	///
	/// [`confirm_save`]: DocumentSession::confirm_save
	pub async fn save(
		&mut self,
		options: SaveOptions,
		writer: &dyn DocumentWriter,
	) -> Result<Option<ConfirmationRequest>, ShellError> {
		if options.force {
			self.write_current(writer).await?;
			return Ok(None);
		}

		if !self.edited {
			return Ok(None);
		}

		Ok(Some(ConfirmationRequest::for_session(
			self,
			options.close_requested,
		)))
	}

	/// Applies the user's choice for a pending confirmation.
	///
	/// `Save` writes and marks the session unedited; `Discard` reports
	/// [`SaveDisposition::CloseRequested`] so the caller runs its close
	/// continuation; `Cancel` changes nothing.
	pub async fn confirm_save(
		&mut self,
		choice: SaveChoice,
		writer: &dyn DocumentWriter,
	) -> Result<SaveDisposition, ShellError> {
		match choice {
			SaveChoice::Save => {
				self.write_current(writer).await?;
				Ok(SaveDisposition::Saved)
			}
			SaveChoice::Discard => Ok(SaveDisposition::CloseRequested),
			SaveChoice::Cancel => Ok(SaveDisposition::Cancelled),
		}
	}

	/// Writes the current content and records it as the saved snapshot.
	///
	/// A session without a readable handle saves as a silent no-op, leaving
	/// `edited` unchanged: the guard absorbs saves racing a close, it is not
	/// a user-facing failure.
	async fn write_current(&mut self, writer: &dyn DocumentWriter) -> Result<(), ShellError> {
		let SessionState::Ready { handle } = &self.state else {
			debug!(session = ?self.id, "Skipping save; no editing handle");
			return Ok(());
		};
		let Some(content) = handle.current_text() else {
			debug!(session = ?self.id, "Skipping save; content unreadable");
			return Ok(());
		};

		writer.write(&self.path, &content, &self.filesystem).await?;

		self.last_saved = Snapshot::from_text(&content);
		self.edited = false;
		Ok(())
	}
}
