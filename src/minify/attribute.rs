/*!
# MarkMinL: Attribute Minification.

Drop attributes that don't do anything, collapse booleans, and tidy up the
values that can be tidied. Quoting is decided later, during serialization.
*/

use crate::{
	dom::{
		Attribute,
		AttributeKind,
		Document,
		Element,
		Node,
	},
	settings::CommonSettings,
	spec,
};



#[derive(Debug, Clone, Copy)]
/// # Attribute Options.
pub(crate) struct AttributeOptions<'a> {
	/// # Shared Settings.
	pub(crate) common: &'a CommonSettings,

	/// # Collapse Boolean Attributes?
	///
	/// This is never done for XHTML.
	pub(crate) collapse_booleans: bool,
}



#[derive(Debug, Clone, Default)]
/// # Element Context.
///
/// A few things about the element that certain attribute rules need to know.
struct Context {
	/// # Has `src`?
	has_src: bool,

	/// # The `id`, if any.
	id: Option<String>,

	/// # Linked Stylesheet?
	stylesheet: bool,

	/// # External Link?
	external: bool,
}

impl Context {
	#[must_use]
	/// # New.
	fn new(el: &Element) -> Self {
		let rel = el.attr_value("rel").unwrap_or_default().to_ascii_lowercase();
		Self {
			has_src: el.has_attr("src"),
			id: el.attr_value("id").map(str::to_owned),
			stylesheet: rel.split_ascii_whitespace().any(|v| v == "stylesheet"),
			external: rel.split_ascii_whitespace().any(|v| v == "external"),
		}
	}
}



/// # Minify Attributes.
pub(crate) fn minify(doc: &mut Document, opts: AttributeOptions<'_>) {
	walk(&mut doc.children, opts);
}

/// # Walk.
fn walk(nodes: &mut [Node], opts: AttributeOptions<'_>) {
	for node in nodes {
		if let Node::Element(el) = node {
			element(el, opts);
			walk(&mut el.children, opts);
		}
	}
}

/// # Element.
fn element(el: &mut Element, opts: AttributeOptions<'_>) {
	if el.attributes.is_empty() { return; }

	// Foreign elements only get their classes and styles tidied.
	if ! el.is_html() {
		for attr in &mut el.attributes { tidy_value(attr); }
		return;
	}

	let ctx = Context::new(el);
	let tag = el.key.as_str();
	el.attributes.retain_mut(|attr| {
		tidy_value(attr);

		let preserved = opts.common.preservable_attribute_list.matches(
			tag,
			&attr.key,
			attr.value.as_deref(),
		);

		if ! preserved && is_removable(tag, attr, &ctx, opts.common) { return false; }

		match attr.kind {
			AttributeKind::Boolean =>
				if opts.collapse_booleans && ! (attr.key == "hidden" && attr.value().eq_ignore_ascii_case("until-found")) {
					attr.value = None;
				},
			AttributeKind::Event =>
				if opts.common.remove_js_protocol_from_attributes {
					strip_js_protocol(attr);
				},
			AttributeKind::Url =>
				if ! ctx.external { strip_http_protocol(attr, opts.common); },
			_ => {},
		}

		true
	});
}

/// # Tidy Value.
///
/// Trim (and for classes, collapse) values where whitespace is
/// insignificant.
fn tidy_value(attr: &mut Attribute) {
	let Some(value) = attr.value.as_deref() else { return; };
	let new = match attr.kind {
		AttributeKind::Class => clean_class(value),
		AttributeKind::Style | AttributeKind::Event | AttributeKind::Url => {
			let trimmed = value.trim();
			if trimmed.len() == value.len() { return; }

			// Keep the offset pointing at the value's first byte.
			let lead = value.len() - value.trim_start().len();
			attr.value_offset = attr.value_offset.saturating_add(lead);
			trimmed.to_owned()
		},
		_ => return,
	};
	if new != value { attr.value = Some(new); }
}

#[must_use]
/// # Clean Class.
///
/// Trim the value and collapse the whitespace between class names, leaving
/// anything inside `{{ }}` alone.
fn clean_class(src: &str) -> String {
	let mut out = String::with_capacity(src.len());
	let mut space = false;
	let mut rest = src;
	while let Some(c) = rest.chars().next() {
		if c.is_ascii_whitespace() {
			space = true;
			rest = &rest[1..];
			continue;
		}

		// Templates are kept whole; anything else runs until the next space
		// or template.
		let end =
			if rest.starts_with("{{") { rest.find("}}").map_or(rest.len(), |e| e + 2) }
			else {
				let end = rest.find(|c: char| c.is_ascii_whitespace()).unwrap_or(rest.len());
				rest[..end].find("{{").unwrap_or(end)
			};

		if space && ! out.is_empty() { out.push(' '); }
		space = false;
		out.push_str(&rest[..end]);
		rest = &rest[end..];
	}

	out
}

#[must_use]
/// # Is Removable?
///
/// Returns `true` if the attribute is empty and pointless, redundant, or
/// an unnecessary `type`.
fn is_removable(tag: &str, attr: &Attribute, ctx: &Context, opts: &CommonSettings) -> bool {
	let value = attr.value().trim();
	let key = attr.key.as_str();

	// Empty.
	if opts.remove_empty_attributes && value.is_empty() && spec::is_removable_if_empty(key) {
		return true;
	}

	// Default types.
	if key == "type" {
		if opts.remove_js_type_attributes && tag == "script" && spec::is_js_type(value) {
			return true;
		}
		if
			opts.remove_css_type_attributes &&
			value.eq_ignore_ascii_case("text/css") &&
			(tag == "style" || (tag == "link" && ctx.stylesheet))
		{
			return true;
		}
	}

	opts.remove_redundant_attributes && is_redundant(tag, key, value, ctx)
}

#[must_use]
/// # Is Redundant?
///
/// These attributes merely restate the defaults.
fn is_redundant(tag: &str, key: &str, value: &str, ctx: &Context) -> bool {
	match (tag, key) {
		("script", "language") => value.to_ascii_lowercase().starts_with("javascript"),
		("script", "charset") => ! ctx.has_src,
		("form", "method") => value.eq_ignore_ascii_case("get"),
		("input", "type") => value.eq_ignore_ascii_case("text"),
		("area", "shape") => value.eq_ignore_ascii_case("rect"),
		("a", "name") => ctx.id.as_deref() == Some(value),
		("style" | "link", "media") => value.eq_ignore_ascii_case("all"),
		("button", "type") => value.eq_ignore_ascii_case("submit"),
		_ => false,
	}
}

/// # Strip `javascript:`.
///
/// Event handlers are JavaScript by definition.
fn strip_js_protocol(attr: &mut Attribute) {
	if let Some(value) = attr.value.as_deref() && let Some(rest) = strip_prefix_ci(value, "javascript:") {
		let rest = rest.trim_start();
		attr.value_offset = attr.value_offset.saturating_add(value.len() - rest.len());
		attr.value = Some(rest.to_owned());
	}
}

/// # Strip `http:`/`https:`.
///
/// Turn absolute URLs into protocol-relative ones, if enabled.
fn strip_http_protocol(attr: &mut Attribute, opts: &CommonSettings) {
	let Some(value) = attr.value.as_deref() else { return; };
	let rest =
		if opts.remove_http_protocol_from_attributes && let Some(rest) = strip_prefix_ci(value, "http://") {
			rest
		}
		else if opts.remove_https_protocol_from_attributes && let Some(rest) = strip_prefix_ci(value, "https://") {
			rest
		}
		else { return; };

	if ! rest.is_empty() { attr.value = Some(format!("//{rest}")); }
}

#[must_use]
/// # Strip Prefix (Case-Insensitive).
pub(crate) fn strip_prefix_ci<'a>(src: &'a str, prefix: &str) -> Option<&'a str> {
	if
		src.len() >= prefix.len() &&
		src.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
	{
		Some(&src[prefix.len()..])
	}
	else { None }
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

	fn minify_str(raw: &str, common: &CommonSettings) -> String {
		let src = SourceCode::new(raw);
		let mut doc = dom::parse(&src, Syntax::Html).expect("Parse failed.").document;
		minify(&mut doc, AttributeOptions { common, collapse_booleans: true });
		ser::serialize(&doc, &ser::SerializeOptions::verbatim(Syntax::Html))
	}

	#[test]
	fn t_clean_class() {
		for (raw, expected) in [
			("  a   b  ", "a b"),
			(" label  done-{{ todo.done }} ", "label done-{{ todo.done }}"),
			("{{ a }}  b", "{{ a }} b"),
			("a {{ b }}", "a {{ b }}"),
			("a{{ b }}c", "a{{ b }}c"),
			("", ""),
		] {
			assert_eq!(clean_class(raw), expected, "{raw:?}");
		}
	}

	#[test]
	fn t_defaults() {
		let common = CommonSettings::default();
		for (raw, expected) in [
			(
				"<div class=\" a  b \" id=\"\" title=\"\" style=\" color: red \" data-x=\"\"></div>",
				"<div class=\"a b\" style=\"color: red\" data-x=\"\"></div>",
			),
			(
				"<input type=\"checkbox\" checked=\"checked\" disabled=\"\">",
				"<input type=\"checkbox\" checked disabled>",
			),
			(
				"<script type=\"text/javascript\" src=\"a.js\"></script><style type=\"text/css\"></style>",
				"<script src=\"a.js\"></script><style></style>",
			),
			(
				"<a href=\" http://example.com/ \" onclick=\"javascript: go()\">x</a>",
				"<a href=\"http://example.com/\" onclick=\"go()\">x</a>",
			),
			(
				"<link rel=\"stylesheet\" type=\"text/css\" href=\"a.css\">",
				"<link rel=\"stylesheet\" href=\"a.css\">",
			),
			("<div hidden=\"until-found\"></div>", "<div hidden=\"until-found\"></div>"),
		] {
			assert_eq!(minify_str(raw, &common), expected, "{raw:?}");
		}
	}

	#[test]
	fn t_optional() {
		let common = CommonSettings {
			remove_redundant_attributes: true,
			remove_http_protocol_from_attributes: true,
			remove_https_protocol_from_attributes: true,
			preservable_attribute_list: "div[title], [data-keep]".parse().expect("Bad list."),
			..CommonSettings::default()
		};
		for (raw, expected) in [
			(
				"<form method=\"GET\"><input type=\"text\"><button type=\"submit\">x</button></form>",
				"<form><input><button>x</button></form>",
			),
			(
				"<script language=\"JavaScript\" charset=\"utf-8\"></script>",
				"<script></script>",
			),
			(
				"<a id=\"top\" name=\"top\" href=\"https://example.com/\">x</a>",
				"<a id=\"top\" href=\"//example.com/\">x</a>",
			),
			(
				"<a href=\"http://example.com/\" rel=\"external\">x</a>",
				"<a href=\"http://example.com/\" rel=\"external\">x</a>",
			),
			("<div title=\"\" id=\"\"></div>", "<div title=\"\"></div>"),
		] {
			assert_eq!(minify_str(raw, &common), expected, "{raw:?}");
		}
	}
}
