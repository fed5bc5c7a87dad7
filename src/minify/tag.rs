/*!
# MarkMinL: Tag Minification.

This covers everything structural: comments, doctypes, `<meta>` charsets,
elements without content, and optional end tags.
*/

use crate::{
	dom::{
		self,
		Attribute,
		AttributeKind,
		Document,
		Element,
		EndTag,
		Node,
	},
	minify::{
		expression::{
			is_angular_comment,
			is_knockout_comment,
		},
		whitespace::preserves_whitespace,
	},
	parser::doctype::{
		Doctype,
		ExternalId,
	},
	settings::{
		ShortDoctypeList,
		TagList,
	},
	spec::{
		self,
		Following,
	},
};



#[must_use]
/// # Is Conditional Comment?
///
/// Returns `true` for IE conditional comments, both the hidden kind
/// (`<!--[if IE]>…<![endif]-->`) and the bits that make up the revealed kind
/// (`<!--[if !IE]><!-->`, `<!--<![endif]-->`).
pub(crate) fn is_conditional_comment(content: &str) -> bool {
	content.starts_with("[if") || content.starts_with("<![endif]")
}

#[must_use]
/// # Hidden Conditional Comment Body.
///
/// Return the markup hidden inside a downlevel-hidden conditional comment,
/// along with its offset relative to the comment content.
pub(crate) fn conditional_body(content: &str) -> Option<(&str, usize)> {
	if ! content.starts_with("[if") { return None; }
	let start = content.find("]>")? + 2;
	let end = content.rfind("<![endif]")?;
	if end < start { return None; }

	// Revealed comments have an empty "body" of "<!".
	let body = &content[start..end];
	if body.is_empty() || body == "<!" { None }
	else { Some((body, start)) }
}

#[must_use]
/// # Is Keepable Comment?
///
/// These comments mean something to somebody, so are never removed.
fn is_special_comment(content: &str) -> bool {
	let trimmed = content.trim();
	is_conditional_comment(content) ||
	is_knockout_comment(trimmed) ||
	is_angular_comment(trimmed)
}

/// # Remove Comments.
///
/// Strip comments (save for the special ones, unless `everything` is set),
/// then merge any text nodes that were separated by them.
pub(crate) fn remove_comments(doc: &mut Document, everything: bool) {
	/// # Walk.
	fn walk(nodes: &mut Vec<Node>, everything: bool) {
		nodes.retain(|n| match n {
			Node::Comment { content, .. } => ! everything && is_special_comment(content),
			_ => true,
		});
		for node in nodes {
			if let Node::Element(el) = node { walk(&mut el.children, everything); }
		}
	}

	walk(&mut doc.children, everything);
	dom::merge_text(&mut doc.children);
}



/// # Shorten Doctype.
///
/// Swap HTML doctypes for the short HTML5 version.
pub(crate) fn shorten_doctype(doc: &mut Document, custom: &ShortDoctypeList) {
	for node in &mut doc.children {
		if let Node::Doctype(d) = node && is_shortenable(d, custom) {
			*d = Doctype {
				keyword: "DOCTYPE".to_owned(),
				root: "html".to_owned(),
				external: None,
				internal_subset: None,
			};
		}
	}
}

#[must_use]
/// # Is Shortenable?
fn is_shortenable(d: &Doctype, custom: &ShortDoctypeList) -> bool {
	if ! d.is_html_root() || d.internal_subset.is_some() { return false; }
	match &d.external {
		None => d.keyword != "DOCTYPE" || d.root != "html",
		Some(ExternalId::Public { fpi, .. }) => fpi.is_html() || custom.contains(fpi),
		Some(ExternalId::System { system, .. }) => system.literal == "about:legacy-compat",
	}
}

/// # Use `<meta charset>`.
///
/// Replace `<meta http-equiv="content-type" content="…; charset=X">` with
/// the equivalent `<meta charset="X">`.
pub(crate) fn meta_charset(nodes: &mut [Node]) {
	for node in nodes {
		if let Node::Element(el) = node {
			if el.is("meta") {
				if let Some(charset) = content_type_charset(el) {
					el.attributes = vec![Attribute::synthetic("charset", charset, AttributeKind::Other)];
				}
			}
			else if el.is_html() { meta_charset(&mut el.children); }
		}
	}
}

#[must_use]
/// # Charset From Content-Type.
fn content_type_charset(el: &Element) -> Option<String> {
	if
		el.attributes.len() != 2 ||
		! el.attr_value("http-equiv")?.trim().eq_ignore_ascii_case("content-type")
	{
		return None;
	}

	let content = el.attr_value("content")?;
	let (_, rest) = content.split_once(';')?;
	let rest = rest.trim();
	let (key, value) = rest.split_once('=')?;
	if ! key.trim().eq_ignore_ascii_case("charset") { return None; }

	let value = value.trim().trim_matches(['"', '\'']);
	if value.is_empty() || value.contains(|c: char| c.is_ascii_whitespace() || c == ';') {
		None
	}
	else { Some(value.to_owned()) }
}



/// # Remove Tags Without Content.
///
/// Recursively remove (non-exempt) elements with no children, returning
/// `true` if anything was removed.
pub(crate) fn remove_empty(nodes: &mut Vec<Node>) -> bool {
	let mut removed = false;
	for node in nodes.iter_mut() {
		if let Node::Element(el) = node && remove_empty(&mut el.children) {
			removed = true;
		}
	}

	let before = nodes.len();
	nodes.retain(|n| ! n.as_element().is_some_and(is_removable_empty));
	removed || nodes.len() != before
}

#[must_use]
/// # Is Removable (Empty)?
fn is_removable_empty(el: &Element) -> bool {
	el.is_html() &&
	el.children.is_empty() &&
	matches!(el.end_tag, EndTag::Explicit | EndTag::Omitted) &&
	spec::ContentKind::html(&el.key) == spec::ContentKind::Normal &&
	! spec::keep_when_empty(&el.key) &&
	! el.attributes.iter().any(|a|
		matches!(a.key.as_str(), "class" | "id" | "name" | "role" | "src") ||
		a.key.starts_with("data-") ||
		matches!(a.kind, AttributeKind::Binding | AttributeKind::Event)
	)
}



/// # Optional End Tags.
///
/// Decide, for every HTML element, whether or not its end tag gets written.
/// End tags are dropped when `remove` is set and the context allows it;
/// end tags the source omitted are restored if the new context does not
/// allow the omission.
pub(crate) fn optional_end_tags(doc: &mut Document, remove: bool, keep: &TagList) {
	walk_end_tags(&mut doc.children, None, remove, keep);
}

/// # Walk (Optional End Tags).
fn walk_end_tags(nodes: &mut [Node], parent: Option<&str>, remove: bool, keep: &TagList) {
	for idx in 0..nodes.len() {
		let (head, tail) = nodes.split_at_mut(idx + 1);
		let next = following(tail.first());
		let Node::Element(el) = &mut head[idx] else { continue; };

		if el.is_html() && matches!(el.end_tag, EndTag::Explicit | EndTag::Omitted) {
			let optional =
				spec::has_optional_end_tag(&el.key) &&
				spec::can_omit_end_tag(&el.key, next, parent);

			if optional && (remove || el.end_tag == EndTag::Omitted) && ! keep.contains(&el.key) {
				el.end_tag = EndTag::Omitted;
			}
			else { el.end_tag = EndTag::Explicit; }
		}
		// Foreign elements the source left open need closing now.
		else if el.end_tag == EndTag::Omitted { el.end_tag = EndTag::Explicit; }

		// Foreign parents don't count for the optional tag rules.
		let html = el.is_html();
		let Element { key, children, .. } = el;
		walk_end_tags(children, html.then_some(key.as_str()), remove, keep);
	}
}

/// # Explicit End Tags.
///
/// XHTML has to close everything, so implied end tags get written out.
pub(crate) fn explicit_end_tags(nodes: &mut [Node]) {
	for node in nodes {
		if let Node::Element(el) = node {
			if el.end_tag == EndTag::Omitted { el.end_tag = EndTag::Explicit; }
			explicit_end_tags(&mut el.children);
		}
	}
}

#[must_use]
/// # Following.
fn following(node: Option<&Node>) -> Following<'_> {
	match node {
		None => Following::Nothing,
		Some(Node::Element(el)) =>
			if el.is_html() { Following::Element(&el.key) }
			else { Following::Other },
		Some(n @ Node::Text { .. }) =>
			if n.is_whitespace() { Following::Whitespace }
			else { Following::Other },
		Some(Node::Comment { .. }) => Following::Comment,
		Some(_) => Following::Other,
	}
}



/// # Collapse XML Tags Without Content.
///
/// Turn `<a></a>` into `<a/>`, but only for elements that never had any
/// real content. Whitespace-only content counts as empty when whitespace is
/// being minified.
pub(crate) fn collapse_empty(nodes: &mut [Node], whitespace: bool) {
	for node in nodes {
		if let Node::Element(el) = node {
			if el.end_tag != EndTag::Explicit { continue; }

			let empty =
				! el.had_content &&
				(
					el.children.is_empty() ||
					(
						whitespace &&
						! preserves_whitespace(el) &&
						el.children.iter().all(Node::is_whitespace)
					)
				);

			if empty {
				el.children.clear();
				el.end_tag = EndTag::SelfClosed;
			}
			else { collapse_empty(&mut el.children, whitespace); }
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		parser::Syntax,
		ser,
		source::SourceCode,
	};

	fn parse(raw: &str, syntax: Syntax) -> Document {
		let src = SourceCode::new(raw);
		dom::parse(&src, syntax).expect("Parse failed.").document
	}

	fn render(doc: &Document, syntax: Syntax) -> String {
		ser::serialize(doc, &ser::SerializeOptions::verbatim(syntax))
	}

	#[test]
	fn t_comments() {
		let raw = "<p>a<!-- plain -->b</p><!--[if IE]><p>IE</p><![endif]--><!--[if !IE]><!--><p>Not</p><!--<![endif]--><!-- ko if: x --><!-- /ko --><!-- directive: my-dir x -->";
		let mut doc = parse(raw, Syntax::Html);
		remove_comments(&mut doc, false);
		assert_eq!(
			render(&doc, Syntax::Html),
			"<p>ab</p><!--[if IE]><p>IE</p><![endif]--><!--[if !IE]><!--><p>Not</p><!--<![endif]--><!-- ko if: x --><!-- /ko --><!-- directive: my-dir x -->",
		);

		let mut doc = parse("<a>x<!-- y --></a>", Syntax::Xml);
		remove_comments(&mut doc, true);
		assert_eq!(render(&doc, Syntax::Xml), "<a>x</a>");
	}

	#[test]
	fn t_conditional_body() {
		assert_eq!(
			conditional_body("[if lt IE 9]><script src=\"a.js\"></script><![endif]"),
			Some(("<script src=\"a.js\"></script>", 13)),
		);
		assert_eq!(conditional_body("[if !IE]><!"), None);
		assert_eq!(conditional_body("<![endif]"), None);
		assert_eq!(conditional_body(" plain "), None);
	}

	#[test]
	fn t_doctype() {
		let custom: ShortDoctypeList = "-//Acme//DTD HTML Extra//EN".parse().expect("Bad list.");
		for (raw, expected) in [
			("<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">", "<!DOCTYPE html>"),
			("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">", "<!DOCTYPE html>"),
			("<!doctype html>", "<!DOCTYPE html>"),
			("<!DOCTYPE html SYSTEM \"about:legacy-compat\">", "<!DOCTYPE html>"),
			("<!DOCTYPE html PUBLIC \"-//Acme//DTD HTML Extra//EN\">", "<!DOCTYPE html>"),
			("<!DOCTYPE html PUBLIC \"-//Other//DTD Thing//EN\">", "<!DOCTYPE html PUBLIC \"-//Other//DTD Thing//EN\">"),
			("<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"x.dtd\">", "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"x.dtd\">"),
		] {
			let mut doc = parse(raw, Syntax::Html);
			shorten_doctype(&mut doc, &custom);
			assert_eq!(render(&doc, Syntax::Html), expected, "{raw}");
		}
	}

	#[test]
	fn t_meta_charset() {
		let mut doc = parse(
			"<head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\"><meta name=\"x\" content=\"y\"></head>",
			Syntax::Html,
		);
		meta_charset(&mut doc.children);
		assert_eq!(
			render(&doc, Syntax::Html),
			"<head><meta charset=\"utf-8\"><meta name=\"x\" content=\"y\"></head>",
		);
	}

	#[test]
	fn t_remove_empty() {
		let mut doc = parse(
			"<div><p><span></span></p><p id=\"x\"></p><i class=\"icon\"></i><b></b>x<td></td><br></div><div></div>",
			Syntax::Html,
		);
		assert!(remove_empty(&mut doc.children));
		assert_eq!(
			render(&doc, Syntax::Html),
			"<div><p id=\"x\"></p><i class=\"icon\"></i>x<td></td><br></div>",
		);
		assert!(! remove_empty(&mut doc.children));
	}

	#[test]
	fn t_optional_end_tags() {
		let keep = TagList::default();
		for (raw, remove, expected) in [
			(
				"<ul><li>One</li><li>Two</li></ul><p>A</p><p>B</p><div>C</div>",
				true,
				"<ul><li>One<li>Two</ul><p>A<p>B<div>C</div>",
			),
			(
				"<ul><li>One</li> <li>Two</li></ul>",
				true,
				"<ul><li>One</li> <li>Two</ul>",
			),
			(
				"<ul><li>One <li>Two</ul>",
				false,
				"<ul><li>One <li>Two</ul>",
			),
			(
				"<p>A<span>B</span>",
				false,
				"<p>A<span>B</span></p>",
			),
			(
				"<table><tr><td>1</td><td>2</td></tr></table>",
				true,
				"<table><tr><td>1<td>2</table>",
			),
		] {
			let mut doc = parse(raw, Syntax::Html);
			optional_end_tags(&mut doc, remove, &keep);
			assert_eq!(render(&doc, Syntax::Html), expected, "{raw}");
		}

		let keep: TagList = "li".parse().expect("Bad list.");
		let mut doc = parse("<ul><li>One</li><li>Two</li></ul>", Syntax::Html);
		optional_end_tags(&mut doc, true, &keep);
		assert_eq!(render(&doc, Syntax::Html), "<ul><li>One</li><li>Two</li></ul>");
	}

	#[test]
	fn t_explicit_end_tags() {
		let mut doc = parse("<ul><li>One<li>Two</ul><p>A", Syntax::Xhtml);
		explicit_end_tags(&mut doc.children);
		assert_eq!(render(&doc, Syntax::Xhtml), "<ul><li>One</li><li>Two</li></ul><p>A</p>");
	}

	#[test]
	fn t_collapse_empty() {
		let mut doc = parse("<a><node></node><b> </b><c>x</c><d><e></e></d></a>", Syntax::Xml);
		collapse_empty(&mut doc.children, true);
		assert_eq!(render(&doc, Syntax::Xml), "<a><node/><b/><c>x</c><d><e/></d></a>");

		let mut doc = parse("<a><b> </b></a>", Syntax::Xml);
		collapse_empty(&mut doc.children, false);
		assert_eq!(render(&doc, Syntax::Xml), "<a><b> </b></a>");
	}
}
