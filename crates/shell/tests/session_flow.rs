//! End-to-end shell flows: workspace, sessions, save confirmation, and
//! analysis registry wiring, with every external collaborator mocked.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use scribe_lsp::{CoreConnection, CoreMessage, JsonValue, Registry};
use scribe_shell::{
	DocumentWriter, EditEvent, EditingHandle, EditorWidget, FileFormat, LoadOutcome, SaveChoice,
	SaveDisposition, SaveOptions, ShellError, Workspace,
};
use tokio::sync::mpsc;

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[derive(Default)]
struct MockConnection {
	emitted: Mutex<Vec<CoreMessage>>,
}

impl MockConnection {
	fn initializations(&self) -> usize {
		self.emitted
			.lock()
			.iter()
			.filter(|message| matches!(message, CoreMessage::InitializeLanguageSession { .. }))
			.count()
	}
}

impl CoreConnection for MockConnection {
	fn state_id(&self) -> u8 {
		0
	}

	fn emit(&self, message: CoreMessage) -> scribe_lsp::Result<()> {
		self.emitted.lock().push(message);
		Ok(())
	}

	fn subscribe(&self, _language_id: &str) -> mpsc::UnboundedReceiver<JsonValue> {
		let (_tx, rx) = mpsc::unbounded_channel();
		rx
	}
}

/// Editing surface shared between the test and the handles it hands out.
#[derive(Default)]
struct SurfaceState {
	texts: Vec<Arc<Mutex<String>>>,
}

#[derive(Clone, Default)]
struct FakeSurface(Arc<Mutex<SurfaceState>>);

impl FakeSurface {
	fn handles_created(&self) -> usize {
		self.0.lock().texts.len()
	}

	/// Replaces the content of the `index`-th created handle.
	fn rewrite(&self, index: usize, text: &str) {
		*self.0.lock().texts[index].lock() = text.to_string();
	}
}

impl EditorWidget for FakeSurface {
	fn create_handle(&self, initial_text: &str) -> Box<dyn EditingHandle> {
		let text = Arc::new(Mutex::new(initial_text.to_string()));
		self.0.lock().texts.push(text.clone());
		Box::new(FakeHandle(text))
	}
}

struct FakeHandle(Arc<Mutex<String>>);

impl EditingHandle for FakeHandle {
	fn snapshot_lines(&self) -> Vec<String> {
		self.0.lock().split('\n').map(str::to_string).collect()
	}

	fn current_text(&self) -> Option<String> {
		Some(self.0.lock().clone())
	}

	fn undo(&mut self) -> bool {
		false
	}

	fn redo(&mut self) -> bool {
		false
	}

	fn destroy(&mut self) {}
}

#[derive(Default)]
struct RecordingWriter {
	writes: Mutex<Vec<(PathBuf, String)>>,
}

#[async_trait::async_trait]
impl DocumentWriter for RecordingWriter {
	async fn write(&self, path: &Path, content: &str, _filesystem: &str) -> io::Result<()> {
		self.writes.lock().push((path.to_path_buf(), content.to_string()));
		Ok(())
	}
}

struct Harness {
	workspace: Workspace,
	connection: Arc<MockConnection>,
	surface: FakeSurface,
	writer: Arc<RecordingWriter>,
}

fn harness() -> Harness {
	init_tracing();
	let connection = Arc::new(MockConnection::default());
	let registry = Arc::new(Registry::new(connection.clone()));
	let surface = FakeSurface::default();
	let writer = Arc::new(RecordingWriter::default());
	let workspace = Workspace::new(registry, Arc::new(surface.clone()), writer.clone());
	Harness {
		workspace,
		connection,
		surface,
		writer,
	}
}

#[tokio::test]
async fn open_edit_confirm_and_close_flow() {
	let mut h = harness();

	let id = h
		.workspace
		.open_document(
			PathBuf::from("/tmp/scribe-flow-tests/project/main.rs"),
			FileFormat::Text("Rust".to_string()),
		)
		.unwrap();
	assert!(h.workspace.session(id).unwrap().is_loading());

	assert_eq!(
		h.workspace.resolve_load(id, Some("fn main() {}\n".to_string())),
		LoadOutcome::Ready
	);
	let session = h.workspace.session(id).unwrap();
	assert!(session.is_ready());
	assert!(!session.edited());
	assert!(session.analysis().is_some());

	h.surface.rewrite(0, "fn main() { todo!() }\n");
	h.workspace.handle_edit(
		id,
		EditEvent {
			document_changed: true,
		},
	);
	assert!(h.workspace.session(id).unwrap().edited());

	let request = h
		.workspace
		.save(
			id,
			SaveOptions {
				force: false,
				close_requested: true,
			},
		)
		.await
		.unwrap()
		.expect("dirty session needs confirmation");
	assert_eq!(request.actions.len(), 3);

	let disposition = h.workspace.confirm_save(id, SaveChoice::Save).await.unwrap();
	assert_eq!(disposition, SaveDisposition::Saved);
	assert!(!h.workspace.session(id).unwrap().edited());
	assert_eq!(h.writer.writes.lock().len(), 1);

	h.workspace.close_session(id);
	assert!(h.workspace.is_empty());
}

#[tokio::test]
async fn analysis_sessions_dedup_by_root_and_language() {
	let mut h = harness();

	let first = h
		.workspace
		.open_document(
			PathBuf::from("/tmp/scribe-flow-tests/project/main.rs"),
			FileFormat::Text("Rust".to_string()),
		)
		.unwrap();
	let second = h
		.workspace
		.open_document(
			PathBuf::from("/tmp/scribe-flow-tests/project/lib.rs"),
			FileFormat::Text("Rust".to_string()),
		)
		.unwrap();
	h.workspace.resolve_load(first, Some(String::new()));
	h.workspace.resolve_load(second, Some(String::new()));

	// Same (root, language): one handshake, one shared analysis session.
	assert_eq!(h.connection.initializations(), 1);
	assert_eq!(h.workspace.registry().active_count(), 1);
	let a = h.workspace.session(first).unwrap().analysis().unwrap().clone();
	let b = h.workspace.session(second).unwrap().analysis().unwrap().clone();
	assert!(Arc::ptr_eq(&a, &b));

	let script = h
		.workspace
		.open_document(
			PathBuf::from("/tmp/scribe-flow-tests/project/app.ts"),
			FileFormat::Text("TypeScript".to_string()),
		)
		.unwrap();
	h.workspace.resolve_load(script, Some(String::new()));
	assert_eq!(h.connection.initializations(), 2);

	// Unsupported language tags skip the registry entirely.
	let notes = h
		.workspace
		.open_document(
			PathBuf::from("/tmp/scribe-flow-tests/project/notes.txt"),
			FileFormat::Text("Plain Text".to_string()),
		)
		.unwrap();
	h.workspace.resolve_load(notes, Some(String::new()));
	assert!(h.workspace.session(notes).unwrap().analysis().is_none());
	assert_eq!(h.connection.initializations(), 2);

	// Binary documents never become sessions at all.
	let result = h.workspace.open_document(
		PathBuf::from("/tmp/scribe-flow-tests/project/logo.png"),
		FileFormat::Binary,
	);
	assert!(matches!(result, Err(ShellError::IncompatibleFormat(_))));
}

#[tokio::test]
async fn close_cancels_pending_load() {
	let mut h = harness();

	let id = h
		.workspace
		.open_document(
			PathBuf::from("/tmp/scribe-flow-tests/project/main.rs"),
			FileFormat::Text("Rust".to_string()),
		)
		.unwrap();
	h.workspace.close_session(id);

	assert_eq!(
		h.workspace.resolve_load(id, Some("late".to_string())),
		LoadOutcome::Discarded
	);
	assert_eq!(h.surface.handles_created(), 0);
	assert_eq!(h.connection.initializations(), 0);
}

#[tokio::test]
async fn failed_load_removes_session() {
	let mut h = harness();

	let id = h
		.workspace
		.open_document(
			PathBuf::from("/tmp/scribe-flow-tests/project/main.rs"),
			FileFormat::Text("Rust".to_string()),
		)
		.unwrap();

	assert_eq!(h.workspace.resolve_load(id, None), LoadOutcome::SelfClosed);
	assert!(h.workspace.session(id).is_none());
	assert_eq!(h.surface.handles_created(), 0);
}

#[tokio::test]
async fn discard_runs_the_close_continuation() {
	let mut h = harness();

	let id = h
		.workspace
		.open_document(
			PathBuf::from("/tmp/scribe-flow-tests/project/main.rs"),
			FileFormat::Text("Rust".to_string()),
		)
		.unwrap();
	h.workspace.resolve_load(id, Some("original\n".to_string()));
	h.surface.rewrite(0, "changed\n");
	h.workspace.handle_edit(
		id,
		EditEvent {
			document_changed: true,
		},
	);

	let disposition = h
		.workspace
		.confirm_save(id, SaveChoice::Discard)
		.await
		.unwrap();

	assert_eq!(disposition, SaveDisposition::CloseRequested);
	assert!(h.workspace.session(id).is_none());
	assert!(h.writer.writes.lock().is_empty());

	let descriptors = h.workspace.descriptors();
	assert!(descriptors.is_empty());
}
