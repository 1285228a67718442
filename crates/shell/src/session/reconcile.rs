//! Dirty-state reconciliation.
//!
//! Two update paths converge on the session's `edited` flag:
//!
//! - the direct-edit path marks the session edited on any content-changing
//!   event, without looking at content - cheap and optimistic;
//! - the undo/redo path performs the primitive history transformation and
//!   then recomputes the current snapshot against the last saved one, so an
//!   undo that restores the saved content clears dirtiness, which the
//!   direct-edit path alone cannot express.

use super::{DocumentSession, EditEvent, EditingHandle, SessionState};
use crate::snapshot::Snapshot;

/// What a shell key command tells the editing surface about its default
/// binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
	/// The shell handled the key; the surface's default binding (and its
	/// dirty-marking) must not run.
	SuppressDefault,
	/// The surface should run its default binding.
	RunDefault,
}

impl DocumentSession {
	/// Applies an edit-event notification from the editing surface.
	///
	/// Any content-changing edit marks the session edited unconditionally;
	/// content equality is only re-examined by [`undo`] and [`redo`].
	/// Events are applied in emission order; sessions outside `Ready`
	/// ignore them.
	///
	/// [`undo`]: DocumentSession::undo
	/// [`redo`]: DocumentSession::redo
	pub fn handle_edit(&mut self, event: EditEvent) {
		if !matches!(self.state, SessionState::Ready { .. }) {
			return;
		}
		if event.document_changed {
			self.edited = true;
		}
	}

	/// Undoes the last edit, then reconciles `edited` against the last
	/// saved snapshot.
	pub fn undo(&mut self) -> KeyDisposition {
		self.history_command(|handle| handle.undo())
	}

	/// Redoes the last undone edit, then reconciles `edited` against the
	/// last saved snapshot.
	pub fn redo(&mut self) -> KeyDisposition {
		self.history_command(|handle| handle.redo())
	}

	/// Perform-then-reconcile for the two history commands.
	///
	/// Always suppresses the surface's default binding, keeping this
	/// reconciliation the only dirtiness authority for undo and redo: the
	/// flag is recomputed from an element-wise comparison of the current
	/// line sequence against the last saved one.
	fn history_command(
		&mut self,
		op: impl FnOnce(&mut dyn EditingHandle) -> bool,
	) -> KeyDisposition {
		let SessionState::Ready { handle } = &mut self.state else {
			return KeyDisposition::SuppressDefault;
		};

		op(handle.as_mut());

		let current = Snapshot::from_lines(handle.snapshot_lines());
		self.edited = current != self.last_saved;
		KeyDisposition::SuppressDefault
	}
}
