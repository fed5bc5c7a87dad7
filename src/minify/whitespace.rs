/*!
# MarkMinL: Whitespace Minification.

HTML rendering largely ignores whitespace, and at any rate treats all types
(other than the no-break space `\xA0`) the same. There is some nuance, but for
most elements we can safely convert contiguous runs of whitespace to a single
space.

Trimming gets dangerous, particularly given that CSS can override the
display of any element arbitrarily, so the more aggressive modes should be
used with care.
*/

use crate::{
	dom::{
		Document,
		Element,
		Namespace,
		Node,
		strtendril,
	},
	settings::WhitespaceMinificationMode,
	spec,
};
use tendril::StrTendril;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Whitespace Options.
pub(crate) struct WhitespaceOptions {
	/// # Mode.
	pub(crate) mode: WhitespaceMinificationMode,

	/// # Collapse to Line Breaks?
	pub(crate) lines: bool,

	/// # Leave `{{ }}` Alone?
	pub(crate) templates: bool,

	/// # XML Rules?
	pub(crate) xml: bool,
}

impl WhitespaceOptions {
	#[must_use]
	/// # Replacement.
	///
	/// Return what a removed whitespace run should be replaced with, if
	/// anything.
	fn replacement(self, removed: &str) -> Option<&'static str> {
		if self.lines && strtendril::has_line_break(removed) { Some("\n") }
		else { None }
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Parent Context.
enum Parent<'a> {
	/// # Top Level.
	Root,

	/// # An Element (Key, Is HTML).
	Element(&'a str, bool),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Sibling Kind.
enum Side {
	/// # Nothing There.
	Edge,

	/// # Block-Level or Invisible.
	Block,

	/// # Inline (or Unknown).
	Inline,
}

impl Side {
	#[must_use]
	/// # From Node.
	fn new(node: Option<&Node>) -> Self {
		match node {
			None => Self::Edge,
			Some(Node::Element(el)) =>
				if el.is_html() && spec::is_block_level(&el.key) { Self::Block }
				else { Self::Inline },
			Some(Node::Doctype(_) | Node::ProcessingInstruction(_)) => Self::Block,
			Some(_) => Self::Inline,
		}
	}

	#[must_use]
	/// # Block or Edge?
	const fn is_boundary(self) -> bool { matches!(self, Self::Edge | Self::Block) }
}



/// # Minify Whitespace.
pub(crate) fn minify(doc: &mut Document, opts: WhitespaceOptions) {
	if opts.mode != WhitespaceMinificationMode::None {
		walk(&mut doc.children, Parent::Root, opts);
	}
}

#[must_use]
/// # Preserves Whitespace?
///
/// Returns `true` if nothing inside the element should be touched.
pub(crate) fn preserves_whitespace(el: &Element) -> bool {
	(
		el.is_html() &&
		(
			spec::is_whitespace_preserving(&el.key) ||
			spec::ContentKind::html(&el.key) == spec::ContentKind::RawText
		)
	) ||
	el.attr_value("xml:space").is_some_and(|v| v.trim() == "preserve")
}

/// # Walk.
fn walk(nodes: &mut Vec<Node>, parent: Parent<'_>, opts: WhitespaceOptions) {
	// Children first.
	for node in nodes.iter_mut() {
		if let Node::Element(el) = node && ! preserves_whitespace(el) {
			let Element { key, ns, children, .. } = el;
			walk(children, Parent::Element(key, *ns == Namespace::Html), opts);
		}
	}

	if opts.xml { xml_level(nodes, opts); }
	else { html_level(nodes, parent, opts); }
}

/// # XML Level.
///
/// XML only gets whitespace-only text nodes removed; mixed content is left
/// alone.
fn xml_level(nodes: &mut Vec<Node>, opts: WhitespaceOptions) {
	nodes.retain_mut(|node| {
		if let Node::Text { content, .. } = node && strtendril::is_whitespace(content) {
			if let Some(rep) = opts.replacement(content.as_ref()) {
				*content = StrTendril::from_slice(rep);
				true
			}
			else { false }
		}
		else { true }
	});
}

/// # HTML Level.
fn html_level(nodes: &mut Vec<Node>, parent: Parent<'_>, opts: WhitespaceOptions) {
	use WhitespaceMinificationMode as Mode;

	// Collapse everything first.
	for node in nodes.iter_mut() {
		if let Node::Text { content, .. } = node { collapse_text(content, opts); }
	}

	let (drop_all, trim_edges) = match parent {
		Parent::Root => (false, true),
		Parent::Element(key, html) => (
			html && spec::can_drop_whitespace_children(key),
			match opts.mode {
				Mode::Aggressive => true,
				Mode::Medium => html && (spec::can_trim(key) || spec::is_block_level(key)),
				Mode::Safe => html && spec::can_trim(key),
				Mode::None => false,
			},
		),
	};
	let blocks = matches!(opts.mode, Mode::Medium | Mode::Aggressive);

	let len = nodes.len();
	for idx in 0..len {
		let prev = Side::new(idx.checked_sub(1).and_then(|i| nodes.get(i)));
		let next = Side::new(nodes.get(idx + 1));
		let Node::Text { content, .. } = &mut nodes[idx] else { continue; };

		let edge_start = trim_edges && prev == Side::Edge;
		let edge_end = trim_edges && next == Side::Edge;

		if strtendril::is_whitespace(content) {
			let remove =
				drop_all ||
				edge_start ||
				edge_end ||
				(parent == Parent::Root && prev.is_boundary() && next.is_boundary()) ||
				(blocks && (prev == Side::Block || next == Side::Block));
			if remove { replace_whitespace(content, opts); }
		}
		else {
			if edge_start || (blocks && prev == Side::Block) { trim_start(content, opts); }
			if edge_end || (blocks && next == Side::Block) { trim_end(content, opts); }
		}
	}

	// Drop anything we emptied.
	nodes.retain(|n| ! matches!(n, Node::Text { content, .. } if content.is_empty()));
}

/// # Collapse Text.
///
/// Collapse whitespace runs, skipping over `{{ }}` expressions if desired.
fn collapse_text(content: &mut StrTendril, opts: WhitespaceOptions) {
	let src: &str = content.as_ref();
	if ! opts.templates || ! src.contains("{{") {
		strtendril::collapse_whitespace(content, opts.lines);
		return;
	}

	let mut out = String::with_capacity(src.len());
	let mut rest = src;
	while let Some(start) = rest.find("{{") {
		push_collapsed(&mut out, &rest[..start], opts.lines);
		match rest[start..].find("}}") {
			Some(end) => {
				out.push_str(&rest[start..start + end + 2]);
				rest = &rest[start + end + 2..];
			},
			None => {
				out.push_str(&rest[start..]);
				rest = "";
			},
		}
	}
	push_collapsed(&mut out, rest, opts.lines);

	if out != src { *content = StrTendril::from(out); }
}

/// # Push Collapsed.
fn push_collapsed(out: &mut String, src: &str, lines: bool) {
	match strtendril::collapse(src, lines) {
		Some(v) => out.push_str(&v),
		None => out.push_str(src),
	}
}

/// # Replace Whitespace-Only Text.
///
/// Empty it, or reduce it to a line break.
fn replace_whitespace(content: &mut StrTendril, opts: WhitespaceOptions) {
	match opts.replacement(content.as_ref()) {
		Some(rep) => if content.as_ref() != rep { *content = StrTendril::from_slice(rep); },
		None => content.clear(),
	}
}

/// # Trim Start.
fn trim_start(content: &mut StrTendril, opts: WhitespaceOptions) {
	let src: &str = content.as_ref();
	let trimmed = src.trim_start_matches(|c: char| u8::try_from(c).is_ok_and(crate::parser::is_whitespace));
	if trimmed.len() == src.len() { return; }

	let removed = &src[..src.len() - trimmed.len()];
	if opts.replacement(removed).is_some() {
		// The run is already collapsed to a single line break.
		if removed != "\n" {
			let new = format!("\n{trimmed}");
			*content = StrTendril::from(new);
		}
	}
	else { strtendril::trim_start(content); }
}

/// # Trim End.
fn trim_end(content: &mut StrTendril, opts: WhitespaceOptions) {
	let src: &str = content.as_ref();
	let trimmed = src.trim_end_matches(|c: char| u8::try_from(c).is_ok_and(crate::parser::is_whitespace));
	if trimmed.len() == src.len() { return; }

	let removed = &src[trimmed.len()..];
	if opts.replacement(removed).is_some() {
		if removed != "\n" {
			let new = format!("{trimmed}\n");
			*content = StrTendril::from(new);
		}
	}
	else { strtendril::trim_end(content); }
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		dom,
		parser::Syntax,
		ser,
		source::SourceCode,
	};

	fn minify_str(raw: &str, mode: WhitespaceMinificationMode, lines: bool) -> String {
		let src = SourceCode::new(raw);
		let mut doc = dom::parse(&src, Syntax::Html).expect("Parse failed.").document;
		minify(&mut doc, WhitespaceOptions { mode, lines, templates: true, xml: false });
		ser::serialize(&doc, &ser::SerializeOptions::verbatim(Syntax::Html))
	}

	#[test]
	fn t_safe() {
		use WhitespaceMinificationMode::Safe;
		for (raw, expected) in [
			("<p>Hello   \n  <b> World </b>  !</p>", "<p>Hello <b> World </b> !</p>"),
			("<!DOCTYPE html>\n<html>\n<head>\n<title> Hi </title>\n</head>\n<body>\n<p>x</p>\n</body>\n</html>\n",
				"<!DOCTYPE html><html><head><title>Hi</title></head><body><p>x</p></body></html>"),
			("<pre>  a\n   b  </pre>", "<pre>  a\n   b  </pre>"),
			("<textarea>  a  </textarea>", "<textarea>  a  </textarea>"),
			("<div>  <script>  var a  =  1;  </script>  </div>", "<div> <script>  var a  =  1;  </script> </div>"),
			("<b>a</b> <i>b</i>", "<b>a</b> <i>b</i>"),
			("<table>\n<tr>\n<td> a </td>\n</tr>\n</table>", "<table><tr><td> a </td></tr></table>"),
			("<div>{{  a  +  b  }}   x</div>", "<div>{{  a  +  b  }} x</div>"),
			("<p xml:space=\"preserve\">  a  </p>", "<p xml:space=\"preserve\">  a  </p>"),
		] {
			assert_eq!(minify_str(raw, Safe, false), expected, "{raw:?}");
		}
	}

	#[test]
	fn t_medium() {
		use WhitespaceMinificationMode::Medium;
		for (raw, expected) in [
			("<div>  <p> Hello </p>  <p> World </p>  </div>", "<div><p>Hello</p><p>World</p></div>"),
			("<div> a <span> b </span> c </div>", "<div>a <span> b </span> c</div>"),
			("<span> a </span>", "<span> a </span>"),
		] {
			assert_eq!(minify_str(raw, Medium, false), expected, "{raw:?}");
		}
	}

	#[test]
	fn t_aggressive() {
		use WhitespaceMinificationMode::Aggressive;
		assert_eq!(
			minify_str("<div> a <span> b </span> c </div>", Aggressive, false),
			"<div>a <span>b</span> c</div>",
		);
	}

	#[test]
	fn t_lines() {
		use WhitespaceMinificationMode::Medium;
		let out = minify_str("<div>\n  <p>\n Hello   World\n</p>\n\n</div>", Medium, true);
		assert_eq!(out, "<div>\n<p>\nHello World\n</p>\n</div>");

		// And again.
		assert_eq!(minify_str(&out, Medium, true), out);
	}

	#[test]
	fn t_idempotent() {
		for mode in [
			WhitespaceMinificationMode::Safe,
			WhitespaceMinificationMode::Medium,
			WhitespaceMinificationMode::Aggressive,
		] {
			for raw in [
				"<ul>\n  <li> One </li>\n  <li>Two  </li>\n</ul>\n<p>Some  <em>text</em> here.</p>",
				"<!DOCTYPE html>\n<html><body>  <div> x </div>  y  </body></html>",
			] {
				let once = minify_str(raw, mode, false);
				let twice = minify_str(&once, mode, false);
				assert_eq!(once, twice, "{mode} {raw:?}");
			}
		}
	}
}
