/*!
# MarkMinL: Source Code Navigation.

Everything the parser and minifiers report is keyed to a byte offset. This
module turns those offsets into human-friendly line/column pairs and builds
the little caret-annotated excerpts that accompany errors.
*/



/// # Fragment Width.
///
/// Source lines longer than this are clipped (around the column of interest)
/// when building fragments.
const FRAGMENT_WIDTH: usize = 95;

/// # Ellipsis.
const ELLIPSIS: char = '…';



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
/// # Source Coordinates.
///
/// Both values are 1-based.
pub struct SourceCoordinates {
	/// # Line.
	pub line: usize,

	/// # Column.
	pub column: usize,
}

impl SourceCoordinates {
	#[must_use]
	/// # New.
	pub const fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}

	#[must_use]
	/// # Translate.
	///
	/// Convert coordinates relative to an embedded fragment into coordinates
	/// relative to the document containing it, given the position the
	/// fragment starts at.
	///
	/// Only the first line of a fragment is offset horizontally.
	pub const fn translate(self, origin: Self) -> Self {
		if self.line <= 1 {
			Self {
				line: origin.line,
				column: origin.column + self.column.saturating_sub(1),
			}
		}
		else {
			Self {
				line: origin.line + self.line - 1,
				column: self.column,
			}
		}
	}
}



#[derive(Debug)]
/// # Source Code.
///
/// A thin wrapper around the raw document that remembers where each line
/// begins so offsets can be resolved quickly.
pub(crate) struct SourceCode<'a> {
	/// # Raw Source.
	src: &'a str,

	/// # Line Start Offsets.
	lines: Vec<usize>,
}

impl<'a> SourceCode<'a> {
	#[must_use]
	/// # New.
	pub(crate) fn new(src: &'a str) -> Self {
		let mut lines = vec![0];
		let bytes = src.as_bytes();
		let mut idx = 0;
		while idx < bytes.len() {
			match bytes[idx] {
				b'\r' =>
					if bytes.get(idx + 1) == Some(&b'\n') {
						idx += 1;
						lines.push(idx + 1);
					}
					else { lines.push(idx + 1); },
				b'\n' => { lines.push(idx + 1); },
				_ => {},
			}
			idx += 1;
		}

		Self { src, lines }
	}

	#[must_use]
	/// # Raw Source.
	pub(crate) const fn as_str(&self) -> &'a str { self.src }

	#[must_use]
	/// # Coordinates.
	///
	/// Return the line/column for a given byte offset. Offsets past the end
	/// resolve to the end of the document.
	pub(crate) fn coordinates(&self, offset: usize) -> SourceCoordinates {
		let offset = self.floor_offset(offset);
		let idx = match self.lines.binary_search(&offset) {
			Ok(idx) => idx,
			Err(idx) => idx.saturating_sub(1),
		};

		let start = self.lines[idx];
		let column = self.src.get(start..offset).map_or(0, |s| s.chars().count());
		SourceCoordinates::new(idx + 1, column + 1)
	}

	#[must_use]
	/// # Line Text.
	///
	/// Return the text of a (1-based) line, without its line break.
	fn line_text(&self, line: usize) -> Option<&'a str> {
		if line == 0 { return None; }
		let start = *self.lines.get(line - 1)?;
		let end = self.lines.get(line).copied().unwrap_or(self.src.len());
		self.src.get(start..end)
			.map(|s| s.trim_end_matches(['\r', '\n']))
	}

	#[must_use]
	/// # Fragment.
	///
	/// Build an excerpt of the source around `coords`, including the line
	/// before and after (when present), followed by a pointer line with a
	/// caret under the target column.
	///
	/// Long lines are clipped to a fixed width centered (more or less) on the
	/// target column, with ellipses marking the cuts.
	pub(crate) fn fragment(&self, coords: SourceCoordinates) -> String {
		let Some(target) = self.line_text(coords.line) else { return String::new(); };

		let first = coords.line.saturating_sub(1).max(1);
		let last =
			if self.line_text(coords.line + 1).is_some() { coords.line + 1 }
			else { coords.line };
		let num_width = last.to_string().len();

		// All lines share the same horizontal window so the caret lines up.
		let col = coords.column.saturating_sub(1);
		let target_len = target.chars().count();
		let start =
			if target_len.max(col + 1) <= FRAGMENT_WIDTH { 0 }
			else {
				col.saturating_sub(FRAGMENT_WIDTH / 2)
					.min(target_len.saturating_sub(FRAGMENT_WIDTH).max(col.saturating_sub(FRAGMENT_WIDTH - 1)))
			};

		let mut out = String::new();
		let mut caret = 0;
		for num in first..=last {
			let Some(text) = self.line_text(num) else { continue; };
			let prefix = format!("Line {num:>num_width$}: ");
			let (clipped, lead) = clip(text, start);

			if num == coords.line {
				caret = prefix.chars().count() + usize::from(lead) + col - start;
			}

			out.push_str(&prefix);
			out.push_str(&clipped);
			out.push('\n');
		}

		for _ in 0..caret { out.push('-'); }
		out.push('^');
		out
	}

	#[must_use]
	/// # Floor Offset.
	///
	/// Make sure an offset lands on a character boundary.
	fn floor_offset(&self, mut offset: usize) -> usize {
		if offset > self.src.len() { return self.src.len(); }
		while offset != 0 && ! self.src.is_char_boundary(offset) { offset -= 1; }
		offset
	}
}



/// # Clip Line.
///
/// Cut a window of `FRAGMENT_WIDTH` characters out of `text` starting from
/// character `start`, adding ellipses where content was removed. The second
/// value is `true` if a leading ellipsis was added.
fn clip(text: &str, start: usize) -> (String, bool) {
	let len = text.chars().count();
	if start == 0 && len <= FRAGMENT_WIDTH {
		return (text.to_owned(), false);
	}

	let mut out = String::with_capacity(FRAGMENT_WIDTH + 8);
	let lead = start != 0 && start < len;
	if lead { out.push(ELLIPSIS); }
	out.extend(text.chars().skip(start).take(FRAGMENT_WIDTH));
	if start + FRAGMENT_WIDTH < len { out.push(ELLIPSIS); }
	(out, lead)
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_coordinates() {
		let src = SourceCode::new("ab\ncd\r\nef\rgh");
		for (offset, line, column) in [
			(0, 1, 1),
			(1, 1, 2),
			(2, 1, 3),
			(3, 2, 1),
			(4, 2, 2),
			(7, 3, 1),
			(10, 4, 1),
			(11, 4, 2),
			(500, 4, 3),
		] {
			assert_eq!(
				src.coordinates(offset),
				SourceCoordinates::new(line, column),
				"Offset {offset}",
			);
		}
	}

	#[test]
	fn t_coordinates_multibyte() {
		let src = SourceCode::new("héllo <b>");
		// The "<" is the 7th character, but the 8th byte.
		assert_eq!(src.coordinates(7), SourceCoordinates::new(1, 7));
	}

	#[test]
	fn t_translate() {
		let origin = SourceCoordinates::new(10, 5);
		assert_eq!(
			SourceCoordinates::new(1, 3).translate(origin),
			SourceCoordinates::new(10, 7),
		);
		assert_eq!(
			SourceCoordinates::new(3, 3).translate(origin),
			SourceCoordinates::new(12, 3),
		);
	}

	#[test]
	fn t_fragment() {
		let src = SourceCode::new("<div>\n<p>Hello\n</div>");
		assert_eq!(
			src.fragment(SourceCoordinates::new(2, 4)),
			"Line 1: <div>\nLine 2: <p>Hello\nLine 3: </div>\n-----------^",
		);

		// First line has no predecessor.
		assert_eq!(
			src.fragment(SourceCoordinates::new(1, 1)),
			"Line 1: <div>\nLine 2: <p>Hello\n--------^",
		);
	}

	#[test]
	fn t_fragment_clipped() {
		let line = "x".repeat(300);
		let src = SourceCode::new(&line);
		let frag = src.fragment(SourceCoordinates::new(1, 150));
		let mut lines = frag.lines();
		let text = lines.next().expect("Missing text line.");
		let caret = lines.next().expect("Missing caret line.");

		assert!(text.starts_with("Line 1: …"));
		assert!(text.ends_with('…'));
		assert_eq!(text.chars().count(), "Line 1: ".len() + FRAGMENT_WIDTH + 2);

		// The caret should sit under the 150th character of the original.
		let caret_col = caret.chars().count() - 1;
		let start = 150 - 1 - FRAGMENT_WIDTH / 2;
		assert_eq!(caret_col, "Line 1: ".len() + 1 + (149 - start));
	}
}
