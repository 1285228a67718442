//! Per-language transport over the shared core connection.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::protocol::{CoreConnection, CoreMessage};
use crate::{JsonValue, Result};

/// The channel an analysis session talks through.
///
/// Outbound payloads are wrapped in [`CoreMessage::LanguageSessionPayload`]
/// envelopes stamped with the owning state identifier; inbound payloads
/// arrive on the subscription taken from the connection at construction
/// time. A transport is exclusively owned by its [`AnalysisSession`].
///
/// [`AnalysisSession`]: crate::AnalysisSession
pub struct CoreTransport {
	/// Transport-level language identity this channel is bound to.
	language_id: String,
	/// The shared connection to the core.
	connection: Arc<dyn CoreConnection>,
	/// Inbound payload subscription for `language_id`.
	inbound: Mutex<mpsc::UnboundedReceiver<JsonValue>>,
}

impl std::fmt::Debug for CoreTransport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CoreTransport")
			.field("language_id", &self.language_id)
			.finish_non_exhaustive()
	}
}

impl CoreTransport {
	/// Binds a transport to a language identity on the given connection.
	pub(crate) fn new(language_id: impl Into<String>, connection: Arc<dyn CoreConnection>) -> Self {
		let language_id = language_id.into();
		let inbound = connection.subscribe(&language_id);
		Self {
			language_id,
			connection,
			inbound: Mutex::new(inbound),
		}
	}

	/// The language identity this transport is bound to.
	pub fn language_id(&self) -> &str {
		&self.language_id
	}

	/// Sends an analysis-protocol payload to the core.
	pub fn send(&self, payload: JsonValue) -> Result<()> {
		self.connection.emit(CoreMessage::LanguageSessionPayload {
			state_id: self.connection.state_id(),
			language_id: self.language_id.clone(),
			payload,
		})
	}

	/// Receives the next inbound payload.
	///
	/// Returns `None` once the connection drops the subscription.
	pub async fn recv(&self) -> Option<JsonValue> {
		self.inbound.lock().await.recv().await
	}
}
