/*!
# MarkMinL: DOM.

This module builds an owned node tree from the tokenizer's events, closing
implied elements and recovering from mismatched tags along the way.
*/

pub(crate) mod node;
pub(crate) mod strtendril;

pub(crate) use node::{
	Attribute,
	AttributeKind,
	Document,
	Element,
	EndTag,
	Namespace,
	Node,
};

use crate::{
	MarkupParsingError,
	parser::{
		self,
		doctype::Doctype,
		Fault,
		MarkupHandler,
		RawAttribute,
		StartTag,
		Syntax,
	},
	source::SourceCode,
	spec::{
		self,
		ContentKind,
	},
};
use std::borrow::Cow;
use tendril::StrTendril;



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Quote Tally.
///
/// How many attribute values in the source were single- or double-quoted.
pub(crate) struct QuoteTally {
	/// # Single.
	pub(crate) single: usize,

	/// # Double.
	pub(crate) double: usize,
}

impl QuoteTally {
	#[must_use]
	/// # Majority Quote.
	///
	/// Ties go to double quotes.
	pub(crate) const fn majority(self) -> char {
		if self.double < self.single { '\'' }
		else { '"' }
	}
}



#[derive(Debug)]
/// # Parsed Document.
pub(crate) struct Parsed {
	/// # Document.
	pub(crate) document: Document,

	/// # Warnings (Message, Offset).
	pub(crate) warnings: Vec<(String, usize)>,

	/// # Quote Tally.
	pub(crate) quotes: QuoteTally,
}

/// # Parse Document.
///
/// ## Errors
///
/// Structural breakage is returned as a `MarkupParsingError`.
pub(crate) fn parse(src: &SourceCode<'_>, syntax: Syntax) -> Result<Parsed, MarkupParsingError> {
	let mut builder = TreeBuilder::new(syntax);
	parser::parse(src, syntax, &mut builder)?;
	Ok(Parsed {
		document: Document { children: builder.root },
		warnings: builder.warnings,
		quotes: builder.quotes,
	})
}



#[derive(Debug)]
/// # Tree Builder.
struct TreeBuilder {
	/// # Syntax.
	syntax: Syntax,

	/// # Open Elements.
	///
	/// Elements are only attached to their parents once they close.
	stack: Vec<Element>,

	/// # Top-Level Nodes.
	root: Vec<Node>,

	/// # Warnings.
	warnings: Vec<(String, usize)>,

	/// # Quote Tally.
	quotes: QuoteTally,
}

impl TreeBuilder {
	#[must_use]
	/// # New.
	const fn new(syntax: Syntax) -> Self {
		Self {
			syntax,
			stack: Vec::new(),
			root: Vec::new(),
			warnings: Vec::new(),
			quotes: QuoteTally { single: 0, double: 0 },
		}
	}

	/// # Append Node.
	///
	/// Add a node to the current parent, merging adjacent text.
	fn append(&mut self, node: Node) {
		let siblings = match self.stack.last_mut() {
			Some(parent) => {
				if ! node.is_whitespace() && ! node.is_comment() {
					parent.had_content = true;
				}
				&mut parent.children
			},
			None => &mut self.root,
		};

		if
			let Node::Text { content: new, .. } = &node &&
			let Some(Node::Text { content, .. }) = siblings.last_mut()
		{
			content.push_tendril(new);
			return;
		}

		siblings.push(node);
	}

	/// # Close the Top Element.
	fn close(&mut self, end_tag: EndTag) {
		if let Some(mut el) = self.stack.pop() {
			if el.end_tag == EndTag::Explicit { el.end_tag = end_tag; }
			self.append(Node::Element(el));
		}
	}

	/// # Close Implied.
	///
	/// Close an open element, warning if its end tag wasn't optional.
	fn close_implied(&mut self) {
		if let Some(el) = self.stack.last() {
			let optional =
				el.ns.is_foreign() ||
				(el.is_html() && spec::has_optional_end_tag(&el.key));
			if ! optional {
				self.warnings.push((
					format!("End tag for element <{}> is missing.", el.name),
					el.offset,
				));
			}
		}
		self.close(EndTag::Omitted);
	}

	#[must_use]
	/// # Namespace for a New Element.
	fn namespace(&self, key: &str) -> Namespace {
		if self.syntax.is_xml() { return Namespace::Xml; }

		match self.stack.last().map(|el| (el.ns, el.key.as_str())) {
			// SVG/MathML content stays foreign, except within integration
			// points.
			Some((Namespace::Svg, k)) if k != "foreignobject" => Namespace::Svg,
			Some((Namespace::MathMl, k)) if k != "annotation-xml" => Namespace::MathMl,
			_ => match key {
				"svg" => Namespace::Svg,
				"math" => Namespace::MathMl,
				_ => Namespace::Html,
			},
		}
	}

	#[must_use]
	/// # Build Attribute.
	fn attribute(&mut self, tag: &str, ns: Namespace, raw: RawAttribute<'_>) -> Attribute {
		let key =
			if ns == Namespace::Xml { raw.name.to_owned() }
			else { raw.name.to_ascii_lowercase() };

		match raw.quote {
			Some('\'') => { self.quotes.single += 1; },
			Some(_) => { self.quotes.double += 1; },
			None => {},
		}

		Attribute {
			kind: AttributeKind::new(tag, &key, ns),
			name: raw.name.to_owned(),
			key,
			value: raw.value.map(|v| decode_quotes(v).into_owned()),
			quote: raw.quote,
			offset: raw.offset,
			value_offset: raw.value_offset,
		}
	}
}

impl MarkupHandler for TreeBuilder {
	fn doctype(&mut self, doctype: Doctype, _offset: usize) -> Result<(), Fault> {
		self.append(Node::Doctype(doctype));
		Ok(())
	}

	fn start_tag(&mut self, tag: StartTag<'_>) -> Result<ContentKind, Fault> {
		let ns = self.namespace(&tag.name.to_ascii_lowercase());
		let key =
			if ns == Namespace::Xml { tag.name.to_owned() }
			else { tag.name.to_ascii_lowercase() };

		// Close anything the new element implies the end of.
		if ns == Namespace::Html {
			while self.stack.last().is_some_and(|el| el.is_html() && spec::closes_implicitly(&el.key, &key)) {
				self.close(EndTag::Omitted);
			}
		}

		let attributes = tag.attributes.into_iter()
			.map(|a| self.attribute(&key, ns, a))
			.collect();

		let kind =
			if ns == Namespace::Html { ContentKind::html(&key) }
			else { ContentKind::Foreign };

		let mut el = Element {
			name: tag.name.to_owned(),
			key,
			ns,
			attributes,
			children: Vec::new(),
			end_tag: EndTag::Explicit,
			had_content: false,
			offset: tag.offset,
		};

		// Void elements never have content.
		if kind == ContentKind::Void {
			el.end_tag = EndTag::Void;
			self.append(Node::Element(el));
			return Ok(ContentKind::Void);
		}

		// Self-closing syntax is honored for everything but raw text
		// elements, which HTML parsers never treat as closed.
		if tag.self_closing && (! kind.is_raw() || self.syntax != Syntax::Html) {
			el.end_tag = EndTag::SelfClosed;
			self.append(Node::Element(el));
			return Ok(ContentKind::Void);
		}

		self.stack.push(el);
		Ok(kind)
	}

	fn end_tag(&mut self, name: &str, offset: usize) -> Result<(), Fault> {
		let xml = self.syntax.is_xml();
		let pos = self.stack.iter().rposition(|el|
			if xml { el.name == name }
			else { el.name.eq_ignore_ascii_case(name) }
		);

		// XML is unforgiving.
		if xml {
			let len = self.stack.len();
			if pos.is_some_and(|idx| idx + 1 == len) {
				self.close(EndTag::Explicit);
				return Ok(());
			}

			return Err(match self.stack.last() {
				Some(open) => Fault::new(
					format!("The end tag </{name}> does not match the start tag <{}>.", open.name),
					offset,
				),
				None => Fault::new(format!("Unexpected end tag </{name}>."), offset),
			});
		}

		if let Some(idx) = pos {
			while idx + 1 < self.stack.len() { self.close_implied(); }
			self.close(EndTag::Explicit);
		}
		// Stray end tags are kept as-are.
		else {
			self.warnings.push((format!("Unexpected end tag </{name}>."), offset));
			self.append(Node::Raw(StrTendril::from(format!("</{name}>"))));
		}

		Ok(())
	}

	fn text(&mut self, text: &str, offset: usize) {
		self.append(Node::text(text, offset));
	}

	fn comment(&mut self, text: &str, offset: usize) {
		self.append(Node::Comment { content: StrTendril::from_slice(text), offset });
	}

	fn cdata(&mut self, text: &str, offset: usize) {
		self.append(Node::Cdata { content: StrTendril::from_slice(text), offset });
	}

	fn processing_instruction(&mut self, raw: &str, _offset: usize) {
		self.append(Node::ProcessingInstruction(StrTendril::from_slice(raw)));
	}

	fn bogus(&mut self, raw: &str, _offset: usize) {
		self.append(Node::Raw(StrTendril::from_slice(raw)));
	}

	fn warning(&mut self, message: String, offset: usize) {
		self.warnings.push((message, offset));
	}

	fn finish(&mut self, _offset: usize) -> Result<(), Fault> {
		if self.syntax.is_xml() && let Some(el) = self.stack.last() {
			return Err(Fault::new(format!("Element <{}> is not closed.", el.name), el.offset));
		}

		while ! self.stack.is_empty() { self.close_implied(); }
		Ok(())
	}
}



/// # Merge Adjacent Text.
///
/// Removing nodes can leave text nodes side by side; this joins them back
/// together (recursively).
pub(crate) fn merge_text(nodes: &mut Vec<Node>) {
	let mut idx = 1;
	while idx < nodes.len() {
		if nodes[idx - 1].is_text() && nodes[idx].is_text() {
			if
				let Node::Text { content: next, .. } = nodes.remove(idx) &&
				let Node::Text { content, .. } = &mut nodes[idx - 1]
			{
				content.push_tendril(&next);
			}
		}
		else { idx += 1; }
	}

	for node in nodes {
		if let Node::Element(el) = node { merge_text(&mut el.children); }
	}
}

#[must_use]
/// # Decode Quote Entities.
///
/// Attribute values are otherwise left exactly as written, but quotes are
/// decoded so the serializer can pick the best quoting style.
pub(crate) fn decode_quotes(src: &str) -> Cow<'_, str> {
	if ! src.contains('&') { return Cow::Borrowed(src); }

	let mut out = String::with_capacity(src.len());
	let mut rest = src;
	while let Some(idx) = rest.find('&') {
		out.push_str(&rest[..idx]);
		rest = &rest[idx..];

		let mut found = false;
		for (entity, quote) in [
			("&quot;", '"'),
			("&#34;", '"'),
			("&#x22;", '"'),
			("&#X22;", '"'),
			("&apos;", '\''),
			("&#39;", '\''),
			("&#x27;", '\''),
			("&#X27;", '\''),
		] {
			if rest.starts_with(entity) {
				out.push(quote);
				rest = &rest[entity.len()..];
				found = true;
				break;
			}
		}

		if ! found {
			out.push('&');
			rest = &rest[1..];
		}
	}
	out.push_str(rest);

	Cow::Owned(out)
}
