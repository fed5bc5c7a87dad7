/*!
# MarkMinL: Serialization.

Turn the (minified) tree back into text. Text, comments, and the like are
written exactly as they are stored; the only real decisions to be made here
concern attribute quoting and how empty elements are closed.
*/

use crate::{
	dom::{
		Attribute,
		Document,
		Element,
		EndTag,
		Node,
	},
	parser::Syntax,
	settings::{
		AttributeQuotesRemovalMode,
		AttributeQuotesStyle,
	},
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Quote Mode.
///
/// This merges the HTML quote-removal modes and XML quote styles into one
/// thing the serializer can work with.
pub(crate) enum QuoteMode {
	/// # Keep Source Quotes.
	Keep,

	/// # Unquote HTML4-Safe Values.
	Html4,

	/// # Unquote HTML5-Safe Values.
	Html5,

	/// # Always Quote With…
	Fixed(char),

	/// # Always Quote, Picking the Cheaper Character.
	Optimal,
}

impl QuoteMode {
	#[must_use]
	/// # From HTML Setting.
	pub(crate) const fn html(mode: AttributeQuotesRemovalMode) -> Self {
		match mode {
			AttributeQuotesRemovalMode::KeepQuotes => Self::Keep,
			AttributeQuotesRemovalMode::Html4 => Self::Html4,
			AttributeQuotesRemovalMode::Html5 => Self::Html5,
		}
	}

	#[must_use]
	/// # From XML Setting.
	///
	/// `Auto` resolves to whichever quote the source document used most.
	pub(crate) const fn xml(style: AttributeQuotesStyle, majority: char) -> Self {
		match style {
			AttributeQuotesStyle::Auto => Self::Fixed(majority),
			AttributeQuotesStyle::Optimal => Self::Optimal,
			AttributeQuotesStyle::Single => Self::Fixed('\''),
			AttributeQuotesStyle::Double => Self::Fixed('"'),
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Serialization Options.
pub(crate) struct SerializeOptions {
	/// # Syntax.
	pub(crate) syntax: Syntax,

	/// # Quoting.
	pub(crate) quotes: QuoteMode,

	/// # Void Element Close.
	pub(crate) void_close: &'static str,

	/// # Self-Closed Element Close.
	pub(crate) self_close: &'static str,
}

impl SerializeOptions {
	#[cfg(test)]
	#[must_use]
	/// # Verbatim.
	///
	/// Leave quotes and closings more or less as they were.
	pub(crate) const fn verbatim(syntax: Syntax) -> Self {
		Self {
			syntax,
			quotes: QuoteMode::Keep,
			void_close: ">",
			self_close: "/>",
		}
	}
}



#[must_use]
/// # Serialize.
pub(crate) fn serialize(doc: &Document, opts: &SerializeOptions) -> String {
	let mut out = String::new();
	write_nodes(&mut out, &doc.children, opts);
	out
}

/// # Write Nodes.
fn write_nodes(out: &mut String, nodes: &[Node], opts: &SerializeOptions) {
	for node in nodes {
		match node {
			Node::Doctype(d) => { out.push_str(&d.to_string()); },
			Node::Element(el) => { write_element(out, el, opts); },
			Node::Text { content, .. } => { out.push_str(content); },
			Node::Comment { content, .. } => {
				out.push_str("<!--");
				out.push_str(content);
				out.push_str("-->");
			},
			Node::Cdata { content, .. } => {
				out.push_str("<![CDATA[");
				out.push_str(content);
				out.push_str("]]>");
			},
			Node::ProcessingInstruction(raw) | Node::Raw(raw) => { out.push_str(raw); },
		}
	}
}

/// # Write Element.
fn write_element(out: &mut String, el: &Element, opts: &SerializeOptions) {
	let close = match el.end_tag {
		EndTag::Void => opts.void_close,
		EndTag::SelfClosed => opts.self_close,
		EndTag::Explicit | EndTag::Omitted => ">",
	};
	let slashed = close.ends_with("/>") && ! close.starts_with(' ');

	out.push('<');
	out.push_str(&el.name);
	let last = el.attributes.len().saturating_sub(1);
	for (idx, attr) in el.attributes.iter().enumerate() {
		write_attribute(out, attr, opts.quotes, slashed && idx == last);
	}
	out.push_str(close);

	if matches!(el.end_tag, EndTag::Explicit | EndTag::Omitted) {
		write_nodes(out, &el.children, opts);
		if el.end_tag == EndTag::Explicit {
			out.push_str("</");
			out.push_str(&el.name);
			out.push('>');
		}
	}
}

/// # Write Attribute.
///
/// If `before_slash` is true, the attribute is immediately followed by `/>`,
/// so may not be left unquoted.
fn write_attribute(out: &mut String, attr: &Attribute, mode: QuoteMode, before_slash: bool) {
	out.push(' ');
	out.push_str(&attr.name);

	let Some(value) = attr.value.as_deref() else { return; };

	let quote = match mode {
		QuoteMode::Keep => Some(attr.quote.unwrap_or_else(|| cheapest_quote(value))),
		QuoteMode::Html4 =>
			if ! before_slash && is_html4_unquotable(value) { None }
			else { Some(cheapest_quote(value)) },
		QuoteMode::Html5 =>
			if value.is_empty() { return; }
			else if ! before_slash && is_html5_unquotable(value) { None }
			else { Some(cheapest_quote(value)) },
		QuoteMode::Fixed(q) => Some(q),
		QuoteMode::Optimal => Some(cheapest_quote(value)),
	};

	out.push('=');
	match quote {
		Some(q) => {
			out.push(q);
			write_escaped(out, value, q);
			out.push(q);
		},
		None => { out.push_str(value); },
	}
}

/// # Write Escaped Value.
///
/// Only the wrapping quote needs escaping. Everything else, entities
/// included, is kept as written.
fn write_escaped(out: &mut String, value: &str, quote: char) {
	let entity = if quote == '"' { "&#34;" } else { "&#39;" };
	let mut rest = value;
	while let Some(idx) = rest.find(quote) {
		out.push_str(&rest[..idx]);
		out.push_str(entity);
		rest = &rest[idx + 1..];
	}
	out.push_str(rest);
}

#[must_use]
/// # Cheapest Quote.
///
/// Return whichever quote requires fewer escapes for the value, preferring
/// double quotes in the event of a tie.
pub(crate) fn cheapest_quote(value: &str) -> char {
	let mut double = 0_usize;
	let mut single = 0_usize;
	for b in value.bytes() {
		match b {
			b'"' => { double += 1; },
			b'\'' => { single += 1; },
			_ => {},
		}
	}

	if single < double { '\'' }
	else { '"' }
}

#[must_use]
/// # HTML4 Unquotable?
///
/// HTML4 only allowed unquoted values made up of letters, digits, hyphens,
/// periods, underscores, and colons.
fn is_html4_unquotable(value: &str) -> bool {
	! value.is_empty() &&
	value.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b':'))
}

#[must_use]
/// # HTML5 Unquotable?
fn is_html5_unquotable(value: &str) -> bool {
	! value.is_empty() &&
	! value.ends_with('/') &&
	! value.bytes().any(|b| matches!(
		b,
		b'\t' | b'\n' | b'\x0C' | b'\r' | b' ' | b'"' | b'\'' | b'=' | b'<' | b'>' | b'`'
	))
}



/// # Detect Line Break.
///
/// Return the style of the first line break found in the source, if any.
pub(crate) fn detect_line_break(src: &str) -> Option<&'static str> {
	let idx = src.find(['\r', '\n'])?;
	let rest = &src.as_bytes()[idx..];
	if rest.starts_with(b"\r\n") { Some("\r\n") }
	else if rest[0] == b'\r' { Some("\r") }
	else { Some("\n") }
}

/// # Normalize Line Breaks.
///
/// Convert every `\r\n`, `\r`, or `\n` to the given style.
pub(crate) fn normalize_line_breaks(src: String, style: &str) -> String {
	// Short circuit: nothing to change.
	let mixed = match style {
		"\n" => src.contains('\r'),
		"\r\n" => src.replace("\r\n", "").contains(['\r', '\n']),
		_ => src.contains('\n'),
	};
	if ! mixed { return src; }

	let mut out = String::with_capacity(src.len());
	let mut chars = src.chars().peekable();
	while let Some(c) = chars.next() {
		match c {
			'\r' => {
				if chars.peek() == Some(&'\n') { chars.next(); }
				out.push_str(style);
			},
			'\n' => { out.push_str(style); },
			c => { out.push(c); },
		}
	}
	out
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		dom,
		source::SourceCode,
	};

	fn reserialize(raw: &str, syntax: Syntax, opts: &SerializeOptions) -> String {
		let src = SourceCode::new(raw);
		let doc = dom::parse(&src, syntax).expect("Parse failed.").document;
		serialize(&doc, opts)
	}

	#[test]
	fn t_verbatim() {
		for raw in [
			"<!DOCTYPE html><html><head><title>Hi</title></head><body><p class='a'>Hello &amp; <b>World</b></p><br><!-- Note --></body></html>",
			"<svg><path d=\"M0 0\"/></svg>",
			"<?php echo 1; ?><div>x</div>",
		] {
			assert_eq!(reserialize(raw, Syntax::Html, &SerializeOptions::verbatim(Syntax::Html)), raw);
		}

		let raw = "<?xml version=\"1.0\"?><a b='1'><![CDATA[<x>]]></a>";
		assert_eq!(reserialize(raw, Syntax::Xml, &SerializeOptions::verbatim(Syntax::Xml)), raw);
	}

	#[test]
	fn t_quotes() {
		let mut opts = SerializeOptions::verbatim(Syntax::Html);

		let raw = "<a href=\"/foo/\" title=\"\" class=\"a b\" data-x=\"it's\" id=\"x:y\">";
		opts.quotes = QuoteMode::Html5;
		assert_eq!(
			reserialize(raw, Syntax::Html, &opts),
			"<a href=\"/foo/\" title class=\"a b\" data-x=\"it's\" id=x:y>",
		);

		opts.quotes = QuoteMode::Html4;
		assert_eq!(
			reserialize(raw, Syntax::Html, &opts),
			"<a href=\"/foo/\" title=\"\" class=\"a b\" data-x=\"it's\" id=x:y>",
		);

		// Unquoted values can't run into a slash.
		opts.quotes = QuoteMode::Html5;
		opts.void_close = "/>";
		assert_eq!(reserialize("<img src=\"a.png\">", Syntax::Html, &opts), "<img src=\"a.png\"/>");
		opts.void_close = " />";
		assert_eq!(reserialize("<img src=\"a.png\">", Syntax::Html, &opts), "<img src=a.png />");
	}

	#[test]
	fn t_xml_quotes() {
		let raw = "<a author=\"Vasya &quot;Monster&quot; Pupkin\" b='x' c=\"it's\"/>";
		let mut opts = SerializeOptions::verbatim(Syntax::Xml);

		opts.quotes = QuoteMode::Fixed('"');
		assert_eq!(
			reserialize(raw, Syntax::Xml, &opts),
			"<a author=\"Vasya &#34;Monster&#34; Pupkin\" b=\"x\" c=\"it's\"/>",
		);

		opts.quotes = QuoteMode::Fixed('\'');
		assert_eq!(
			reserialize(raw, Syntax::Xml, &opts),
			"<a author='Vasya \"Monster\" Pupkin' b='x' c='it&#39;s'/>",
		);

		opts.quotes = QuoteMode::Optimal;
		assert_eq!(
			reserialize(raw, Syntax::Xml, &opts),
			"<a author='Vasya \"Monster\" Pupkin' b=\"x\" c=\"it's\"/>",
		);
	}

	#[test]
	fn t_cheapest_quote() {
		assert_eq!(cheapest_quote("abc"), '"');
		assert_eq!(cheapest_quote("a\"b"), '\'');
		assert_eq!(cheapest_quote("a'b"), '"');
		assert_eq!(cheapest_quote("'\"'\""), '"');
	}

	#[test]
	fn t_line_breaks() {
		assert_eq!(detect_line_break("abc"), None);
		assert_eq!(detect_line_break("a\r\nb\nc"), Some("\r\n"));
		assert_eq!(detect_line_break("a\rb\r\nc"), Some("\r"));
		assert_eq!(detect_line_break("a\nb"), Some("\n"));

		let raw = String::from("a\r\nb\rc\nd");
		assert_eq!(normalize_line_breaks(raw.clone(), "\n"), "a\nb\nc\nd");
		assert_eq!(normalize_line_breaks(raw.clone(), "\r\n"), "a\r\nb\r\nc\r\nd");
		assert_eq!(normalize_line_breaks(raw, "\r"), "a\rb\rc\rd");
		assert_eq!(normalize_line_breaks(String::from("a\nb"), "\n"), "a\nb");
	}
}
