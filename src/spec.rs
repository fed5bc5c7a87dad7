/*!
# MarkMinL: Questions of Spec.

Static knowledge about HTML elements and attributes. Unless otherwise noted,
the functions here expect names that have already been lowercased.
*/



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Content Model.
///
/// How the content of an element is parsed and how much of it we may touch.
pub(crate) enum ContentKind {
	/// # Void (No Content).
	Void,

	/// # Raw Text.
	///
	/// Content is not parsed at all (`<script>`, `<style>`).
	RawText,

	/// # Escapable Raw Text.
	///
	/// Content is not parsed, but may contain entities (`<textarea>`,
	/// `<title>`).
	EscapableRawText,

	/// # Normal.
	Normal,

	/// # Foreign (SVG, MathML, or XML).
	///
	/// Names are case-sensitive and self-closing syntax is meaningful.
	Foreign,
}

impl ContentKind {
	#[must_use]
	/// # For HTML Element.
	pub(crate) fn html(name: &str) -> Self {
		if is_void(name) { Self::Void }
		else if is_raw_text(name) { Self::RawText }
		else if matches!(name, "textarea" | "title") { Self::EscapableRawText }
		else { Self::Normal }
	}

	#[must_use]
	/// # Is Raw?
	///
	/// Returns `true` for either flavor of raw text.
	pub(crate) const fn is_raw(self) -> bool {
		matches!(self, Self::RawText | Self::EscapableRawText)
	}
}



#[must_use]
/// # Is Void HTML Element?
pub(crate) fn is_void(name: &str) -> bool {
	matches!(
		name,
		"area" |
		"base" |
		"basefont" |
		"bgsound" |
		"br" |
		"col" |
		"embed" |
		"frame" |
		"hr" |
		"image" |
		"img" |
		"input" |
		"keygen" |
		"link" |
		"meta" |
		"param" |
		"source" |
		"track" |
		"wbr"
	)
}

#[must_use]
/// # Is Raw Text Element?
fn is_raw_text(name: &str) -> bool {
	matches!(
		name,
		"iframe" | "noembed" | "noframes" | "script" | "style" | "xmp"
	)
}

#[must_use]
/// # Preserves Whitespace?
///
/// Text within these elements (and their descendants) is rendered exactly
/// as written.
pub(crate) fn is_whitespace_preserving(name: &str) -> bool {
	matches!(name, "listing" | "plaintext" | "pre" | "textarea" | "xmp")
}

#[must_use]
/// # Is Block-Level Element?
///
/// Whitespace touching these elements is never rendered, at least not with
/// the default stylesheet.
pub(crate) fn is_block_level(name: &str) -> bool {
	matches!(
		name,
		"address" |
		"article" |
		"aside" |
		"blockquote" |
		"body" |
		"caption" |
		"center" |
		"col" |
		"colgroup" |
		"dd" |
		"details" |
		"dialog" |
		"dir" |
		"div" |
		"dl" |
		"dt" |
		"fieldset" |
		"figcaption" |
		"figure" |
		"footer" |
		"form" |
		"frameset" |
		"h1" |
		"h2" |
		"h3" |
		"h4" |
		"h5" |
		"h6" |
		"head" |
		"header" |
		"hgroup" |
		"hr" |
		"html" |
		"legend" |
		"li" |
		"main" |
		"menu" |
		"nav" |
		"ol" |
		"optgroup" |
		"option" |
		"p" |
		"pre" |
		"section" |
		"summary" |
		"table" |
		"tbody" |
		"td" |
		"tfoot" |
		"th" |
		"thead" |
		"tr" |
		"ul"
	) || is_invisible(name)
}

#[must_use]
/// # Is Invisible Element?
///
/// Metadata-ish elements that don't render anything, so whitespace around
/// them never matters.
pub(crate) fn is_invisible(name: &str) -> bool {
	matches!(
		name,
		"base" |
		"basefont" |
		"bgsound" |
		"link" |
		"meta" |
		"noscript" |
		"script" |
		"style" |
		"template" |
		"title"
	)
}

#[must_use]
/// # Can Drop Whitespace Children?
///
/// These elements aren't allowed to hold text in the first place, so
/// whitespace-only children can be removed in any whitespace mode.
pub(crate) fn can_drop_whitespace_children(name: &str) -> bool {
	matches!(
		name,
		"audio" |
		"colgroup" |
		"datalist" |
		"frameset" |
		"head" |
		"html" |
		"optgroup" |
		"picture" |
		"select" |
		"table" |
		"tbody" |
		"tfoot" |
		"thead" |
		"tr" |
		"video"
	)
}

#[must_use]
/// # Can Trim Child Text?
///
/// Leading whitespace can be trimmed from the first child and trailing from
/// the last in any whitespace mode.
pub(crate) fn can_trim(name: &str) -> bool {
	can_drop_whitespace_children(name) ||
	matches!(name, "body" | "option" | "title")
}



#[must_use]
/// # Is Head Content?
///
/// Elements allowed inside `<head>`; anything else closes it.
fn is_head_content(name: &str) -> bool {
	matches!(
		name,
		"base" |
		"basefont" |
		"bgsound" |
		"link" |
		"meta" |
		"noscript" |
		"script" |
		"style" |
		"template" |
		"title"
	)
}

#[must_use]
/// # Closes Paragraph?
///
/// A `<p>` element's end tag may be omitted if it is immediately followed by
/// one of these; the parser likewise closes an open `<p>` when it sees one.
pub(crate) fn closes_paragraph(name: &str) -> bool {
	matches!(
		name,
		"address" |
		"article" |
		"aside" |
		"blockquote" |
		"details" |
		"div" |
		"dl" |
		"fieldset" |
		"figcaption" |
		"figure" |
		"footer" |
		"form" |
		"h1" |
		"h2" |
		"h3" |
		"h4" |
		"h5" |
		"h6" |
		"header" |
		"hgroup" |
		"hr" |
		"main" |
		"menu" |
		"nav" |
		"ol" |
		"p" |
		"pre" |
		"section" |
		"table" |
		"ul"
	)
}

#[must_use]
/// # Has Optional End Tag?
pub(crate) fn has_optional_end_tag(name: &str) -> bool {
	matches!(
		name,
		"body" |
		"caption" |
		"colgroup" |
		"dd" |
		"dt" |
		"head" |
		"html" |
		"li" |
		"optgroup" |
		"option" |
		"p" |
		"rb" |
		"rp" |
		"rt" |
		"rtc" |
		"tbody" |
		"td" |
		"tfoot" |
		"th" |
		"thead" |
		"tr"
	)
}

#[must_use]
/// # Closed Implicitly?
///
/// Returns `true` if an open `open` element is closed by the start of a
/// `new` element.
pub(crate) fn closes_implicitly(open: &str, new: &str) -> bool {
	match open {
		"p" => closes_paragraph(new) || matches!(new, "dd" | "dt" | "li"),
		"li" => new == "li",
		"dd" | "dt" => matches!(new, "dd" | "dt"),
		"rb" | "rp" | "rt" | "rtc" => matches!(new, "rb" | "rp" | "rt" | "rtc"),
		"option" => matches!(new, "hr" | "optgroup" | "option"),
		"optgroup" => new == "optgroup",
		"tr" => matches!(new, "tbody" | "tfoot" | "thead" | "tr"),
		"td" | "th" => matches!(new, "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"),
		"thead" | "tbody" | "tfoot" => matches!(new, "tbody" | "tfoot" | "thead"),
		"caption" => matches!(new, "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"),
		"colgroup" => ! matches!(new, "col" | "template"),
		"head" => ! is_head_content(new),
		_ => false,
	}
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Following Node.
///
/// A simplified view of whatever immediately follows an element, used to
/// decide whether its end tag may be dropped.
pub(crate) enum Following<'a> {
	/// # Nothing (End of Parent).
	Nothing,

	/// # An HTML Element (Lowercase Name).
	Element(&'a str),

	/// # Whitespace-Only Text.
	Whitespace,

	/// # A Comment.
	Comment,

	/// # Anything Else.
	Other,
}

#[must_use]
/// # Can Omit End Tag?
///
/// This follows the HTML5 optional tag rules. `parent` is the lowercase
/// name of the parent element, if any.
pub(crate) fn can_omit_end_tag(name: &str, next: Following<'_>, parent: Option<&str>) -> bool {
	match name {
		"html" | "body" => ! matches!(next, Following::Comment),
		"head" => ! matches!(next, Following::Comment | Following::Whitespace),
		"p" => match next {
			Following::Element(n) => closes_paragraph(n),
			Following::Nothing => ! matches!(
				parent,
				Some("a" | "audio" | "del" | "ins" | "map" | "noscript" | "video") | None
			),
			_ => false,
		},
		"li" => matches!(next, Following::Element("li") | Following::Nothing),
		"dt" => matches!(next, Following::Element("dd" | "dt")),
		"dd" => matches!(next, Following::Element("dd" | "dt") | Following::Nothing),
		"rb" | "rp" | "rt" | "rtc" => matches!(
			next,
			Following::Element("rb" | "rp" | "rt" | "rtc") | Following::Nothing
		),
		"optgroup" => matches!(next, Following::Element("optgroup") | Following::Nothing),
		"option" => matches!(
			next,
			Following::Element("hr" | "optgroup" | "option") | Following::Nothing
		),
		"colgroup" => matches!(next, Following::Element(n) if n != "col" && n != "template") ||
			matches!(next, Following::Nothing),
		"caption" => matches!(
			next,
			Following::Element("col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr") |
			Following::Nothing
		),
		"thead" => matches!(next, Following::Element("tbody" | "tfoot")),
		"tbody" => matches!(next, Following::Element("tbody" | "tfoot") | Following::Nothing),
		"tfoot" => matches!(next, Following::Nothing),
		"tr" => matches!(next, Following::Element("tr") | Following::Nothing),
		"td" | "th" => matches!(next, Following::Element("td" | "th") | Following::Nothing),
		_ => false,
	}
}

#[must_use]
/// # Keep When Empty?
///
/// Elements that mean something even without content, so are never removed
/// by the contentless-tag pass.
pub(crate) fn keep_when_empty(name: &str) -> bool {
	matches!(
		name,
		"audio" |
		"body" |
		"canvas" |
		"head" |
		"html" |
		"iframe" |
		"object" |
		"td" |
		"textarea" |
		"th" |
		"title" |
		"tr" |
		"video"
	)
}



#[must_use]
/// # Is Boolean Attribute?
///
/// These attributes either are or aren't. Their existence implies "true",
/// so if they're true they don't need values.
pub(crate) fn is_boolean_attribute(name: &str) -> bool {
	matches!(
		name,
		"allowfullscreen" |
		"async" |
		"autofocus" |
		"autoplay" |
		"checked" |
		"compact" |
		"controls" |
		"declare" |
		"default" |
		"defaultchecked" |
		"defaultmuted" |
		"defaultselected" |
		"defer" |
		"disabled" |
		"enabled" |
		"formnovalidate" |
		"hidden" |
		"indeterminate" |
		"inert" |
		"ismap" |
		"itemscope" |
		"loop" |
		"multiple" |
		"muted" |
		"nohref" |
		"nomodule" |
		"noresize" |
		"noshade" |
		"novalidate" |
		"nowrap" |
		"open" |
		"pauseonexit" |
		"playsinline" |
		"readonly" |
		"required" |
		"reversed" |
		"scoped" |
		"seamless" |
		"selected" |
		"sortable" |
		"truespeed" |
		"typemustmatch" |
		"visible"
	)
}

#[must_use]
/// # Is URL Attribute?
///
/// Returns `true` if the attribute holds a single URL.
pub(crate) fn is_url_attribute(tag: &str, attr: &str) -> bool {
	match attr {
		"href" => matches!(tag, "a" | "area" | "base" | "link"),
		"src" => matches!(
			tag,
			"audio" | "embed" | "frame" | "iframe" | "img" | "input" | "script" |
			"source" | "track" | "video"
		),
		"action" => tag == "form",
		"formaction" => matches!(tag, "button" | "input"),
		"cite" => matches!(tag, "blockquote" | "del" | "ins" | "q"),
		"background" => matches!(tag, "body" | "table" | "td" | "th"),
		"poster" => tag == "video",
		"longdesc" => matches!(tag, "frame" | "iframe" | "img"),
		"usemap" => matches!(tag, "img" | "input" | "object"),
		"codebase" | "classid" | "data" => tag == "object",
		"manifest" => tag == "html",
		"profile" => tag == "head",
		"icon" => tag == "command",
		_ => false,
	}
}

#[must_use]
/// # Is Event Handler Attribute?
///
/// Any `on*` attribute, e.g. `onclick`.
pub(crate) fn is_event_attribute(attr: &str) -> bool {
	attr.len() > 2 &&
	attr.starts_with("on") &&
	attr.bytes().skip(2).all(|b| b.is_ascii_alphabetic())
}

#[must_use]
/// # Is Removable If Empty?
///
/// These attributes serve no purpose if they have no values.
pub(crate) fn is_removable_if_empty(attr: &str) -> bool {
	matches!(
		attr,
		"abbr" |
		"accesskey" |
		"class" |
		"dir" |
		"for" |
		"id" |
		"lang" |
		"name" |
		"rel" |
		"srcset" |
		"style" |
		"tabindex" |
		"target" |
		"title"
	) || is_event_attribute(attr)
}

#[must_use]
/// # Is JavaScript MIME Type?
pub(crate) fn is_js_type(kind: &str) -> bool {
	kind.eq_ignore_ascii_case("text/javascript") ||
	kind.eq_ignore_ascii_case("application/javascript") ||
	kind.eq_ignore_ascii_case("application/x-javascript") ||
	kind.eq_ignore_ascii_case("text/ecmascript") ||
	kind.eq_ignore_ascii_case("application/ecmascript") ||
	kind.eq_ignore_ascii_case("text/jscript")
}

#[must_use]
/// # Is JSON MIME Type?
pub(crate) fn is_json_type(kind: &str) -> bool {
	kind.eq_ignore_ascii_case("application/json") ||
	kind.eq_ignore_ascii_case("application/ld+json") ||
	kind.eq_ignore_ascii_case("importmap") ||
	kind.eq_ignore_ascii_case("speculationrules")
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_content_kind() {
		assert_eq!(ContentKind::html("br"), ContentKind::Void);
		assert_eq!(ContentKind::html("script"), ContentKind::RawText);
		assert_eq!(ContentKind::html("style"), ContentKind::RawText);
		assert_eq!(ContentKind::html("textarea"), ContentKind::EscapableRawText);
		assert_eq!(ContentKind::html("title"), ContentKind::EscapableRawText);
		assert_eq!(ContentKind::html("div"), ContentKind::Normal);
		assert!(ContentKind::RawText.is_raw());
		assert!(! ContentKind::Foreign.is_raw());
	}

	#[test]
	fn t_closes_implicitly() {
		for (open, new, expected) in [
			("p", "div", true),
			("p", "span", false),
			("p", "li", true),
			("li", "li", true),
			("li", "ul", false),
			("dt", "dd", true),
			("td", "tr", true),
			("tr", "td", false),
			("option", "optgroup", true),
			("head", "body", true),
			("head", "meta", false),
			("colgroup", "col", false),
			("colgroup", "tbody", true),
			("div", "div", false),
		] {
			assert_eq!(closes_implicitly(open, new), expected, "<{open}> <{new}>");
		}
	}

	#[test]
	fn t_can_omit_end_tag() {
		assert!(can_omit_end_tag("li", Following::Element("li"), Some("ul")));
		assert!(can_omit_end_tag("li", Following::Nothing, Some("ul")));
		assert!(! can_omit_end_tag("li", Following::Whitespace, Some("ul")));
		assert!(can_omit_end_tag("p", Following::Element("div"), Some("body")));
		assert!(! can_omit_end_tag("p", Following::Element("span"), Some("body")));
		assert!(can_omit_end_tag("p", Following::Nothing, Some("div")));
		assert!(! can_omit_end_tag("p", Following::Nothing, Some("a")));
		assert!(! can_omit_end_tag("dt", Following::Nothing, Some("dl")));
		assert!(can_omit_end_tag("thead", Following::Element("tbody"), Some("table")));
		assert!(! can_omit_end_tag("thead", Following::Nothing, Some("table")));
		assert!(can_omit_end_tag("head", Following::Element("body"), Some("html")));
		assert!(! can_omit_end_tag("head", Following::Whitespace, Some("html")));
		assert!(! can_omit_end_tag("body", Following::Comment, Some("html")));
		assert!(! can_omit_end_tag("div", Following::Nothing, Some("body")));
	}

	#[test]
	fn t_attributes() {
		assert!(is_boolean_attribute("checked"));
		assert!(! is_boolean_attribute("value"));
		assert!(is_url_attribute("a", "href"));
		assert!(! is_url_attribute("div", "href"));
		assert!(is_event_attribute("onclick"));
		assert!(! is_event_attribute("on"));
		assert!(! is_event_attribute("one-way"));
		assert!(is_removable_if_empty("class"));
		assert!(is_removable_if_empty("onload"));
		assert!(! is_removable_if_empty("value"));
		assert!(! is_removable_if_empty("alt"));
	}

	#[test]
	fn t_mime() {
		assert!(is_js_type("text/javascript"));
		assert!(is_js_type("Application/JavaScript"));
		assert!(! is_js_type("module"));
		assert!(is_json_type("application/ld+json"));
		assert!(! is_json_type("text/html"));
	}
}
