/*!
# MarkMinL: `StrTendril` Whitespace Helpers.
*/

use crate::parser::is_whitespace as is_ws;
use dactyl::traits::SaturatingFrom;
use tendril::StrTendril;



/// # Collapse Whitespace.
///
/// Convert each contiguous run of (ASCII) whitespace into a single space, or
/// a single line feed if `lines` is set and the run contained a line break.
///
/// The no-break space (`\xA0`) is not whitespace for our purposes.
pub(crate) fn collapse_whitespace(txt: &mut StrTendril, lines: bool) {
	if let Some(new) = collapse(txt.as_ref(), lines) {
		*txt = StrTendril::from(new);
	}
}

#[must_use]
/// # Collapse (String).
///
/// Same as `collapse_whitespace`, but for plain strings. `None` is returned
/// if nothing needed changing.
pub(crate) fn collapse(src: &str, lines: bool) -> Option<String> {
	if ! src.bytes().any(is_ws) { return None; }

	let mut out = String::with_capacity(src.len());
	let mut run: Option<bool> = None;
	for c in src.chars() {
		if u8::try_from(c).is_ok_and(is_ws) {
			let newline = matches!(c, '\n' | '\r');
			run = Some(run.unwrap_or(false) || newline);
		}
		else {
			if let Some(newline) = run.take() {
				out.push(if lines && newline { '\n' } else { ' ' });
			}
			out.push(c);
		}
	}
	if let Some(newline) = run {
		out.push(if lines && newline { '\n' } else { ' ' });
	}

	if out == src { None }
	else { Some(out) }
}

#[must_use]
/// # Is (Only) Whitespace?
///
/// Returns `true` if the text is empty or contains only whitespace.
pub(crate) fn is_whitespace(txt: &StrTendril) -> bool {
	txt.as_bytes().iter().all(|b| is_ws(*b))
}

#[must_use]
/// # Has a Line Break?
pub(crate) fn has_line_break(txt: &str) -> bool {
	txt.bytes().any(|b| matches!(b, b'\n' | b'\r'))
}

/// # Trim Start.
pub(crate) fn trim_start(txt: &mut StrTendril) {
	let len = u32::saturating_from(
		txt.as_bytes().iter().take_while(|b| is_ws(**b)).count()
	);
	if 0 != len { txt.pop_front(len); }
}

/// # Trim End.
pub(crate) fn trim_end(txt: &mut StrTendril) {
	let len = u32::saturating_from(
		txt.as_bytes().iter().rev().take_while(|b| is_ws(**b)).count()
	);
	if 0 != len { txt.pop_back(len); }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_collapse() {
		for (raw, lines, expected) in [
			("hello world", false, None),
			("hello  world", false, Some("hello world")),
			("hello\tworld", false, Some("hello world")),
			(" \n hello \r\n world\n", false, Some(" hello world ")),
			(" \n hello \r\n world\n", true, Some("\nhello\nworld\n")),
			("hello\nworld", true, None),
			("a\u{a0}\u{a0}b", false, None),
		] {
			assert_eq!(collapse(raw, lines).as_deref(), expected, "{raw:?}");
		}
	}

	#[test]
	fn t_trim() {
		let mut txt = StrTendril::from_slice("\n\t Hello World  ");
		assert!(! is_whitespace(&txt));
		trim_start(&mut txt);
		assert_eq!(txt.as_ref(), "Hello World  ");
		trim_end(&mut txt);
		assert_eq!(txt.as_ref(), "Hello World");

		let mut txt = StrTendril::from_slice(" \r\n ");
		assert!(is_whitespace(&txt));
		trim_end(&mut txt);
		assert!(txt.is_empty());

		assert!(has_line_break("a\rb"));
		assert!(! has_line_break("a b"));
	}
}
