/*!
# MarkMinL: DOM Node.

The tree is fully owned: every element holds its children directly. The
minification passes walk it recursively, mutating as they go, which keeps
things simple enough that no reference counting is needed.
*/

use crate::{
	parser::doctype::Doctype,
	spec,
};
use tendril::StrTendril;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Namespace.
pub(crate) enum Namespace {
	/// # HTML.
	Html,

	/// # SVG (Inline).
	Svg,

	/// # MathML (Inline).
	MathMl,

	/// # Generic XML.
	Xml,
}

impl Namespace {
	#[must_use]
	/// # Is Foreign?
	///
	/// Foreign elements are case-sensitive and may self-close.
	pub(crate) const fn is_foreign(self) -> bool { ! matches!(self, Self::Html) }
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # End Tag.
pub(crate) enum EndTag {
	/// # Written Out.
	Explicit,

	/// # Implied (or Dropped).
	Omitted,

	/// # Written Like `<a/>`.
	SelfClosed,

	/// # Void (HTML).
	Void,
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Attribute Kind.
///
/// A rough classification, used to figure out which rules apply to which
/// attributes.
pub(crate) enum AttributeKind {
	/// # Boolean.
	Boolean,

	/// # Holds a URL.
	Url,

	/// # Event Handler (`on*`).
	Event,

	/// # Inline CSS.
	Style,

	/// # Class List.
	Class,

	/// # Framework Binding (Knockout, AngularJS).
	Binding,

	/// # Anything Else.
	Other,
}

impl AttributeKind {
	#[must_use]
	/// # Classify.
	///
	/// Both names should already be lowercase.
	pub(crate) fn new(tag: &str, key: &str, ns: Namespace) -> Self {
		if ns != Namespace::Html && ns != Namespace::Svg { return Self::Other; }

		match key {
			"class" => Self::Class,
			"style" => Self::Style,
			"data-bind" => Self::Binding,
			_ if is_angular_attribute(key) => Self::Binding,
			_ if ns == Namespace::Svg => Self::Other,
			_ if spec::is_event_attribute(key) => Self::Event,
			_ if spec::is_boolean_attribute(key) => Self::Boolean,
			_ if spec::is_url_attribute(tag, key) => Self::Url,
			_ => Self::Other,
		}
	}
}

#[must_use]
/// # AngularJS Directive Name.
///
/// Directives may be spelled `ng-x`, `ng:x`, `ng_x`, `data-ng-x`, or
/// `x-ng-x`.
pub(crate) fn angular_directive(key: &str) -> Option<&str> {
	let key = key.strip_prefix("data-")
		.or_else(|| key.strip_prefix("x-"))
		.unwrap_or(key);
	let rest = key.strip_prefix("ng")?;
	let rest = rest.strip_prefix(['-', ':', '_'])?;
	if rest.is_empty() { None }
	else { Some(rest) }
}

#[must_use]
/// # Is AngularJS Attribute?
fn is_angular_attribute(key: &str) -> bool { angular_directive(key).is_some() }



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Attribute.
pub(crate) struct Attribute {
	/// # Name (Source Casing).
	pub(crate) name: String,

	/// # Key (Lowercase for HTML).
	pub(crate) key: String,

	/// # Value.
	///
	/// This is kept as written, save for quote entities, which are decoded
	/// so the serializer can choose the best quoting style later.
	pub(crate) value: Option<String>,

	/// # Source Quote.
	pub(crate) quote: Option<char>,

	/// # Kind.
	pub(crate) kind: AttributeKind,

	/// # Source Offset (Name).
	pub(crate) offset: usize,

	/// # Source Offset (Value).
	pub(crate) value_offset: usize,
}

impl Attribute {
	#[must_use]
	/// # Value (or Empty).
	pub(crate) fn value(&self) -> &str { self.value.as_deref().unwrap_or_default() }

	#[must_use]
	/// # Value Is Pristine?
	///
	/// Returns `true` if the value still matches the source exactly, meaning
	/// source offsets within it can be trusted.
	pub(crate) fn is_pristine(&self, src: &str) -> bool {
		self.value.as_deref().is_some_and(|v|
			self.value_offset.checked_add(v.len())
				.and_then(|end| src.get(self.value_offset..end)) == Some(v)
		)
	}

	#[must_use]
	/// # New (Synthetic).
	///
	/// Build an attribute that didn't come from the source.
	pub(crate) fn synthetic(key: &str, value: String, kind: AttributeKind) -> Self {
		Self {
			name: key.to_owned(),
			key: key.to_owned(),
			value: Some(value),
			quote: None,
			kind,
			offset: usize::MAX,
			value_offset: usize::MAX,
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Element.
pub(crate) struct Element {
	/// # Name (Source Casing).
	pub(crate) name: String,

	/// # Key (Lowercase for HTML).
	pub(crate) key: String,

	/// # Namespace.
	pub(crate) ns: Namespace,

	/// # Attributes.
	pub(crate) attributes: Vec<Attribute>,

	/// # Children.
	pub(crate) children: Vec<Node>,

	/// # End Tag.
	pub(crate) end_tag: EndTag,

	/// # Had (Non-Whitespace) Content in the Source?
	pub(crate) had_content: bool,

	/// # Source Offset.
	pub(crate) offset: usize,
}

impl Element {
	#[must_use]
	/// # Is HTML?
	pub(crate) fn is_html(&self) -> bool { self.ns == Namespace::Html }

	#[must_use]
	/// # Is HTML Element Named…?
	pub(crate) fn is(&self, key: &str) -> bool { self.is_html() && self.key == key }

	#[must_use]
	/// # Attribute.
	pub(crate) fn attr(&self, key: &str) -> Option<&Attribute> {
		self.attributes.iter().find(|a| a.key == key)
	}

	#[must_use]
	/// # Attribute Value.
	///
	/// Valueless attributes return an empty string.
	pub(crate) fn attr_value(&self, key: &str) -> Option<&str> {
		self.attr(key).map(Attribute::value)
	}

	#[must_use]
	/// # Has Attribute?
	pub(crate) fn has_attr(&self, key: &str) -> bool { self.attr(key).is_some() }

	#[must_use]
	/// # Has Raw Text Content?
	///
	/// Returns `true` for elements whose content is never parsed.
	pub(crate) fn is_raw(&self) -> bool {
		self.is_html() && spec::ContentKind::html(&self.key).is_raw()
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Node.
pub(crate) enum Node {
	/// # Doctype.
	Doctype(Doctype),

	/// # Element.
	Element(Element),

	/// # Text.
	Text {
		/// # Content (As Written).
		content: StrTendril,

		/// # Source Offset.
		offset: usize,
	},

	/// # Comment.
	Comment {
		/// # Content.
		content: StrTendril,

		/// # Source Offset.
		offset: usize,
	},

	/// # CDATA Section.
	Cdata {
		/// # Content.
		content: StrTendril,

		/// # Source Offset.
		offset: usize,
	},

	/// # Processing Instruction (Verbatim).
	ProcessingInstruction(StrTendril),

	/// # Anything Else (Verbatim).
	Raw(StrTendril),
}

impl Node {
	#[must_use]
	/// # New Text.
	pub(crate) fn text(content: &str, offset: usize) -> Self {
		Self::Text { content: StrTendril::from_slice(content), offset }
	}

	#[must_use]
	/// # As Element.
	pub(crate) const fn as_element(&self) -> Option<&Element> {
		if let Self::Element(el) = self { Some(el) }
		else { None }
	}

	#[must_use]
	/// # Is Whitespace-Only Text?
	pub(crate) fn is_whitespace(&self) -> bool {
		matches!(self, Self::Text { content, .. } if super::strtendril::is_whitespace(content))
	}

	#[must_use]
	/// # Is Text?
	pub(crate) const fn is_text(&self) -> bool { matches!(self, Self::Text { .. }) }

	#[must_use]
	/// # Is Comment?
	pub(crate) const fn is_comment(&self) -> bool { matches!(self, Self::Comment { .. }) }
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Document (or Fragment).
pub(crate) struct Document {
	/// # Top-Level Nodes.
	pub(crate) children: Vec<Node>,
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_angular_directive() {
		for (key, expected) in [
			("ng-if", Some("if")),
			("data-ng-click", Some("click")),
			("x-ng-show", Some("show")),
			("ng:model", Some("model")),
			("ng_bind", Some("bind")),
			("ng-", None),
			("ngx", None),
			("class", None),
		] {
			assert_eq!(angular_directive(key), expected, "{key}");
		}
	}

	#[test]
	fn t_attribute_kind() {
		assert_eq!(AttributeKind::new("a", "href", Namespace::Html), AttributeKind::Url);
		assert_eq!(AttributeKind::new("div", "href", Namespace::Html), AttributeKind::Other);
		assert_eq!(AttributeKind::new("input", "checked", Namespace::Html), AttributeKind::Boolean);
		assert_eq!(AttributeKind::new("div", "onclick", Namespace::Html), AttributeKind::Event);
		assert_eq!(AttributeKind::new("div", "style", Namespace::Html), AttributeKind::Style);
		assert_eq!(AttributeKind::new("div", "class", Namespace::Svg), AttributeKind::Class);
		assert_eq!(AttributeKind::new("div", "ng-class", Namespace::Html), AttributeKind::Binding);
		assert_eq!(AttributeKind::new("rect", "onclick", Namespace::Svg), AttributeKind::Other);
		assert_eq!(AttributeKind::new("a", "class", Namespace::Xml), AttributeKind::Other);
	}
}
