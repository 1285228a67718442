//! Point-in-time document content as an ordered line sequence.

/// An ordered sequence of lines representing document content at one
/// instant.
///
/// Equality is line-based, not character-based: snapshots split on `\n` and
/// strip one trailing `\r` per line, so CRLF and LF renditions of the same
/// lines compare equal. Anything else (count, order, content, a trailing
/// newline adding a final empty line) makes snapshots unequal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
	lines: Vec<String>,
}

impl Snapshot {
	/// Captures a snapshot from a document's full text.
	pub fn from_text(text: &str) -> Self {
		let lines = text
			.split('\n')
			.map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
			.collect();
		Self { lines }
	}

	/// Wraps an already-split line sequence.
	///
	/// Normalizes exactly like [`from_text`]: one trailing `\r` is stripped
	/// per line, so snapshots taken from an editing handle's lines compare
	/// against text-derived ones regardless of line-terminator flavor.
	///
	/// [`from_text`]: Snapshot::from_text
	pub fn from_lines(lines: Vec<String>) -> Self {
		let lines = lines
			.into_iter()
			.map(|mut line| {
				if line.ends_with('\r') {
					line.pop();
				}
				line
			})
			.collect();
		Self { lines }
	}

	/// The snapshot's lines, in document order.
	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	/// The number of lines.
	pub fn line_count(&self) -> usize {
		self.lines.len()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn line_terminator_flavor_is_normalized() {
		assert_eq!(Snapshot::from_text("a\r\nb\r\n"), Snapshot::from_text("a\nb\n"));
	}

	#[test]
	fn split_lines_normalize_like_text() {
		let from_handle = Snapshot::from_lines(vec!["a\r".to_string(), "b".to_string()]);
		assert_eq!(from_handle, Snapshot::from_text("a\r\nb"));
		assert_eq!(from_handle, Snapshot::from_text("a\nb"));
	}

	#[test]
	fn trailing_newline_is_a_distinct_final_line() {
		assert_ne!(Snapshot::from_text("a\nb\n"), Snapshot::from_text("a\nb"));
		assert_eq!(Snapshot::from_text("a\nb\n").line_count(), 3);
	}

	#[test]
	fn equality_is_length_and_value_in_order() {
		assert_eq!(Snapshot::from_text("a\nb"), Snapshot::from_text("a\nb"));
		assert_ne!(Snapshot::from_text("a\nb"), Snapshot::from_text("b\na"));
		assert_ne!(Snapshot::from_text("a\nb"), Snapshot::from_text("a\nb\nc"));
		// Interior whitespace is content; nothing is trimmed.
		assert_ne!(Snapshot::from_text("a "), Snapshot::from_text("a"));
	}
}
