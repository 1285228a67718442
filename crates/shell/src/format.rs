//! Document format classification and the analysis-support table.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Classification of a document's content kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
	/// Editable text carrying a named language tag.
	Text(String),
	/// Opaque binary content; incompatible with text editing sessions.
	Binary,
}

impl FileFormat {
	/// Classifies a document by its path extension.
	///
	/// Unknown extensions (and extensionless paths) are plain text; only
	/// extensions in the binary table refuse a text session.
	pub fn from_path(path: &Path) -> Self {
		let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
			return Self::Text(PLAIN_TEXT.to_string());
		};
		let extension = extension.to_ascii_lowercase();
		if BINARY_EXTENSIONS.contains(&extension.as_str()) {
			return Self::Binary;
		}
		match TEXT_EXTENSIONS.iter().find(|(ext, _)| *ext == extension) {
			Some((_, tag)) => Self::Text((*tag).to_string()),
			None => Self::Text(PLAIN_TEXT.to_string()),
		}
	}

	/// Whether a text editing session can be opened on this format.
	pub fn is_text(&self) -> bool {
		!matches!(self, Self::Binary)
	}
}

/// Tag used for text documents with no recognized language.
const PLAIN_TEXT: &str = "Plain Text";

/// Extension to language tag, for text formats.
const TEXT_EXTENSIONS: &[(&str, &str)] = &[
	("js", "JavaScript"),
	("json", "JSON"),
	("jsx", "JavaScript"),
	("md", "Markdown"),
	("mjs", "JavaScript"),
	("rs", "Rust"),
	("toml", "TOML"),
	("ts", "TypeScript"),
	("tsx", "TypeScript"),
];

/// Extensions that mark a document as binary.
const BINARY_EXTENSIONS: &[&str] = &[
	"bin", "class", "exe", "gif", "ico", "jpeg", "jpg", "o", "png", "so", "wasm", "zip",
];

/// Analysis support for one language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageSupport {
	/// Transport-level language identity.
	pub language_id: &'static str,
	/// User-facing language name.
	pub display_name: &'static str,
	/// Whether syntax support ships for the language.
	pub syntax: bool,
}

/// Closed table from language tag to analysis support.
///
/// Extended by adding entries. Tags missing here still open fine; they just
/// never get an analysis session.
const LANGUAGE_SUPPORT: &[(&str, LanguageSupport)] = &[
	(
		"JavaScript",
		LanguageSupport {
			language_id: "javascript",
			display_name: "JavaScript",
			syntax: true,
		},
	),
	(
		"Rust",
		LanguageSupport {
			language_id: "rust",
			display_name: "Rust",
			syntax: true,
		},
	),
	(
		"TypeScript",
		LanguageSupport {
			language_id: "typescript",
			display_name: "TypeScript",
			syntax: true,
		},
	),
];

/// Looks up analysis support for a format.
///
/// `None` means the format skips the analysis registry entirely.
pub fn language_support(format: &FileFormat) -> Option<&'static LanguageSupport> {
	match format {
		FileFormat::Text(tag) => LANGUAGE_SUPPORT
			.iter()
			.find(|(name, _)| name == tag)
			.map(|(_, support)| support),
		FileFormat::Binary => None,
	}
}
