//! Message envelopes exchanged with the editor core.
//!
//! The core multiplexes every client over one connection; envelopes carry the
//! client's state identifier and the language identity they concern so the
//! core can route them to the right analysis session.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{JsonValue, Result};

/// Messages sent to the editor core on behalf of analysis sessions.
///
/// Externally tagged; the variant name is the wire-level message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CoreMessage {
	/// Ask the core to bring an analysis session online for a language.
	///
	/// Emitted exactly once per `(root, language)` key, before the client
	/// constructs its transport. The core replies through the transport
	/// subscription, not to this notification.
	InitializeLanguageSession {
		/// Identifier of the client's active core state.
		state_id: u8,
		/// Transport-level language identity being initialized.
		language_id: String,
	},
	/// An opaque analysis-protocol payload addressed to a language session.
	LanguageSessionPayload {
		/// Identifier of the client's active core state.
		state_id: u8,
		/// Transport-level language identity the payload belongs to.
		language_id: String,
		/// The protocol payload; its encoding is a core concern.
		payload: JsonValue,
	},
}

impl CoreMessage {
	/// The language identity this message concerns.
	pub fn language_id(&self) -> &str {
		match self {
			Self::InitializeLanguageSession { language_id, .. } => language_id,
			Self::LanguageSessionPayload { language_id, .. } => language_id,
		}
	}
}

/// The client's connection to the editor core.
///
/// Implementations wrap whatever channel reaches the core (an in-process
/// queue, a websocket, ...). Sends are fire-and-forget: [`emit`] enqueues and
/// returns without waiting for the core to act.
///
/// [`emit`]: CoreConnection::emit
pub trait CoreConnection: Send + Sync {
	/// Identifier of the client's active core state.
	///
	/// Stamped on every envelope so the core can address the owning state.
	fn state_id(&self) -> u8;

	/// Fire-and-forget send of a message envelope to the core.
	///
	/// # Errors
	///
	/// Returns [`Error::ConnectionClosed`] if the connection is gone.
	///
	/// [`Error::ConnectionClosed`]: crate::Error::ConnectionClosed
	fn emit(&self, message: CoreMessage) -> Result<()>;

	/// Subscribes to inbound analysis payloads for a language identity.
	///
	/// The returned receiver is handed to exactly one [`CoreTransport`],
	/// which owns it for the life of its analysis session.
	///
	/// [`CoreTransport`]: crate::CoreTransport
	fn subscribe(&self, language_id: &str) -> mpsc::UnboundedReceiver<JsonValue>;
}
