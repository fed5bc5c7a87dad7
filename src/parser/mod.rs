/*!
# MarkMinL: Tokenizer.

This is a hand-rolled, character-driven state machine that walks a document
once, feeding structural events (tags, text, comments, etc.) to a
`MarkupHandler`.

HTML is parsed tolerantly: most malformations produce a warning and a
best-effort recovery. XML is held to a stricter standard. Either way, truly
structural breakage (an unclosed comment, say, or a mangled doctype) aborts the
whole thing with a `MarkupParsingError`.

Events carry byte offsets rather than line/column pairs; the latter are only
worked out (via `SourceCode`) when a diagnostic actually needs them.
*/

pub(crate) mod doctype;

use crate::{
	MarkupParsingError,
	source::SourceCode,
	spec::ContentKind,
};
use doctype::Doctype;
use std::borrow::Cow;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Syntax Flavor.
pub(crate) enum Syntax {
	/// # HTML (Tolerant).
	Html,

	/// # XHTML.
	///
	/// This uses the HTML vocabulary, but self-closing syntax is honored for
	/// every element.
	Xhtml,

	/// # XML (Strict).
	Xml,
}

impl Syntax {
	#[must_use]
	/// # Is XML?
	pub(crate) const fn is_xml(self) -> bool { matches!(self, Self::Xml) }
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Fault.
///
/// A fatal problem, keyed to a byte offset. This gets upgraded to a proper
/// `MarkupParsingError` once it leaves the tokenizer.
pub(crate) struct Fault {
	/// # Message.
	pub(crate) message: Cow<'static, str>,

	/// # Byte Offset.
	pub(crate) offset: usize,
}

impl Fault {
	#[must_use]
	/// # New.
	pub(crate) fn new<S>(message: S, offset: usize) -> Self
	where S: Into<Cow<'static, str>> {
		Self { message: message.into(), offset }
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Raw Attribute.
///
/// Everything borrows from the source, and values are exactly as written
/// (sans quotes).
pub(crate) struct RawAttribute<'a> {
	/// # Name.
	pub(crate) name: &'a str,

	/// # Value.
	pub(crate) value: Option<&'a str>,

	/// # Quote Character.
	pub(crate) quote: Option<char>,

	/// # Offset of the Name.
	pub(crate) offset: usize,

	/// # Offset of the Value.
	pub(crate) value_offset: usize,
}

#[derive(Debug, Clone, Eq, PartialEq)]
/// # Start Tag.
pub(crate) struct StartTag<'a> {
	/// # Name (Source Casing).
	pub(crate) name: &'a str,

	/// # Attributes.
	pub(crate) attributes: Vec<RawAttribute<'a>>,

	/// # Written Like `<a/>`?
	pub(crate) self_closing: bool,

	/// # Offset of the `<`.
	pub(crate) offset: usize,
}



/// # Markup Handler.
///
/// The tokenizer's event sink. Offsets always point to the first byte of the
/// construct in question, e.g. the `<` of a tag.
pub(crate) trait MarkupHandler {
	/// # Doctype.
	fn doctype(&mut self, doctype: Doctype, offset: usize) -> Result<(), Fault>;

	/// # Start Tag.
	///
	/// The return value tells the tokenizer how to treat what follows; raw
	/// kinds switch it into raw text mode until the matching end tag.
	fn start_tag(&mut self, tag: StartTag<'_>) -> Result<ContentKind, Fault>;

	/// # End Tag.
	fn end_tag(&mut self, name: &str, offset: usize) -> Result<(), Fault>;

	/// # Text.
	fn text(&mut self, text: &str, offset: usize);

	/// # Comment (Content Only).
	fn comment(&mut self, text: &str, offset: usize);

	/// # CDATA Section (Content Only).
	fn cdata(&mut self, text: &str, offset: usize);

	/// # Processing Instruction (Verbatim).
	fn processing_instruction(&mut self, raw: &str, offset: usize);

	/// # Bogus Markup (Verbatim).
	///
	/// Junk like `</>` or `<!foo>` that isn't worth understanding but
	/// shouldn't be lost either.
	fn bogus(&mut self, raw: &str, offset: usize);

	/// # Warning.
	fn warning(&mut self, message: String, offset: usize);

	/// # End of Document.
	fn finish(&mut self, offset: usize) -> Result<(), Fault>;
}



/// # Parse.
///
/// Tokenize the entire document, feeding the results to `handler`.
///
/// ## Errors
///
/// Structural breakage is returned as a `MarkupParsingError`.
pub(crate) fn parse<H: MarkupHandler>(
	src: &SourceCode<'_>,
	syntax: Syntax,
	handler: &mut H,
) -> Result<(), MarkupParsingError> {
	let raw = src.as_str();
	Tokenizer {
		src: raw,
		bytes: raw.as_bytes(),
		pos: 0,
		text_start: 0,
		syntax,
	}
		.run(handler)
		.map_err(|e| MarkupParsingError::new(e.message, src, e.offset))
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Document State.
enum State<'a> {
	/// # Plain Content.
	Data,

	/// # At a `<`.
	TagOpen,

	/// # At a `</`.
	EndTagOpen,

	/// # At a `<!`.
	MarkupDeclarationOpen,

	/// # At a `<?`.
	ProcessingInstruction,

	/// # Inside a Raw Text Element (Source Name).
	RawText(&'a str),

	/// # All Done.
	Eof,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Start Tag State.
enum TagState {
	/// # Tag Name.
	TagName,

	/// # Between Attributes.
	BeforeAttributeName,

	/// # Attribute Name.
	AttributeName,

	/// # After an Attribute Name.
	AfterAttributeName,

	/// # After an `=`.
	BeforeAttributeValue,

	/// # Quoted Value.
	AttributeValueQuoted(u8),

	/// # Unquoted Value.
	AttributeValueUnquoted,

	/// # After a `/`.
	SelfClosingStart,

	/// # At the End.
	Done,
}



#[derive(Debug)]
/// # Tokenizer.
struct Tokenizer<'a> {
	/// # Source.
	src: &'a str,

	/// # Source (Bytes).
	bytes: &'a [u8],

	/// # Cursor.
	pos: usize,

	/// # Start of Pending Text.
	text_start: usize,

	/// # Syntax.
	syntax: Syntax,
}

impl<'a> Tokenizer<'a> {
	/// # Run!
	fn run<H: MarkupHandler>(mut self, handler: &mut H) -> Result<(), Fault> {
		let mut state = State::Data;
		loop {
			state = match state {
				State::Data => self.data(),
				State::TagOpen => self.tag_open(handler)?,
				State::EndTagOpen => self.end_tag_open(handler)?,
				State::MarkupDeclarationOpen => self.markup_declaration(handler)?,
				State::ProcessingInstruction => self.processing_instruction(handler)?,
				State::RawText(name) => self.raw_text(name, handler),
				State::Eof => {
					self.flush_text(self.src.len(), handler);
					return handler.finish(self.src.len());
				},
			};
		}
	}

	/// # Data.
	///
	/// Skip ahead to the next `<`.
	fn data(&mut self) -> State<'a> {
		match self.bytes.get(self.pos..).and_then(|b| b.iter().position(|b| *b == b'<')) {
			Some(idx) => {
				self.pos += idx;
				State::TagOpen
			},
			None => {
				self.pos = self.src.len();
				State::Eof
			},
		}
	}

	/// # Flush Text.
	///
	/// Emit any pending text up to `end`.
	fn flush_text<H: MarkupHandler>(&mut self, end: usize, handler: &mut H) {
		if self.text_start < end {
			handler.text(&self.src[self.text_start..end], self.text_start);
		}
		self.text_start = end;
	}

	/// # Finish Markup.
	///
	/// Move the cursor past a construct that has been dealt with.
	const fn consume(&mut self, end: usize) {
		self.pos = end;
		self.text_start = end;
	}

	/// # Stray Less-Than.
	///
	/// Treat a `<` that doesn't open anything as text.
	fn stray<H: MarkupHandler>(&mut self, handler: &mut H) -> Result<State<'a>, Fault> {
		if self.syntax.is_xml() {
			return Err(Fault::new("Unescaped less-than sign.", self.pos));
		}
		handler.warning("Unescaped less-than sign.".to_owned(), self.pos);
		self.pos += 1;
		Ok(State::Data)
	}

	/// # Tag Open.
	fn tag_open<H: MarkupHandler>(&mut self, handler: &mut H) -> Result<State<'a>, Fault> {
		match self.bytes.get(self.pos + 1).copied() {
			Some(b'/') => Ok(State::EndTagOpen),
			Some(b'!') => Ok(State::MarkupDeclarationOpen),
			Some(b'?') => Ok(State::ProcessingInstruction),
			Some(b) if self.is_name_start(b) => {
				self.flush_text(self.pos, handler);
				self.start_tag(handler)
			},
			_ => self.stray(handler),
		}
	}

	/// # Is Name Start?
	const fn is_name_start(&self, b: u8) -> bool {
		b.is_ascii_alphabetic() ||
		(self.syntax.is_xml() && (b == b'_' || b == b':' || 0x80 <= b))
	}

	#[expect(clippy::too_many_lines, reason = "It's a state machine.")]
	/// # Start Tag.
	fn start_tag<H: MarkupHandler>(&mut self, handler: &mut H) -> Result<State<'a>, Fault> {
		let src = self.src;
		let bytes = self.bytes;
		let start = self.pos;
		let mut pos = start + 1;
		let mut tag = StartTag {
			name: "",
			attributes: Vec::new(),
			self_closing: false,
			offset: start,
		};
		let mut invalid = false;
		let mut unclosed: Option<&str> = None;
		let mut mark = pos;
		let mut attr_name = "";
		let mut attr_offset = pos;
		let mut state = TagState::TagName;

		while state != TagState::Done {
			let Some(&b) = bytes.get(pos) else {
				let name = if tag.name.is_empty() { &src[start + 1..pos] } else { tag.name };
				return Err(Fault::new(format!("Start tag <{name}> is not closed."), start));
			};

			state = match state {
				TagState::TagName => match b {
					b'/' | b'>' | b'"' | b'\'' | b'<' | b'=' => {
						tag.name = &src[mark..pos];
						if b == b'/' { pos += 1; TagState::SelfClosingStart }
						else if b == b'>' { pos += 1; TagState::Done }
						else { TagState::BeforeAttributeName }
					},
					_ if is_whitespace(b) => {
						tag.name = &src[mark..pos];
						pos += 1;
						TagState::BeforeAttributeName
					},
					_ => { pos += 1; TagState::TagName },
				},

				TagState::BeforeAttributeName => match b {
					b'/' => { pos += 1; TagState::SelfClosingStart },
					b'>' => { pos += 1; TagState::Done },
					b'"' | b'\'' | b'<' | b'=' => {
						invalid = true;
						pos += 1;
						TagState::BeforeAttributeName
					},
					_ if is_whitespace(b) => { pos += 1; TagState::BeforeAttributeName },
					_ => {
						mark = pos;
						attr_offset = pos;
						pos += 1;
						TagState::AttributeName
					},
				},

				TagState::AttributeName => match b {
					b'=' => {
						attr_name = &src[mark..pos];
						pos += 1;
						TagState::BeforeAttributeValue
					},
					b'/' | b'>' | b'"' | b'\'' | b'<' => {
						if b != b'/' && b != b'>' { invalid = true; }
						attr_name = &src[mark..pos];
						TagState::AfterAttributeName
					},
					_ if is_whitespace(b) => {
						attr_name = &src[mark..pos];
						pos += 1;
						TagState::AfterAttributeName
					},
					_ => { pos += 1; TagState::AttributeName },
				},

				TagState::AfterAttributeName => match b {
					b'=' => { pos += 1; TagState::BeforeAttributeValue },
					_ if is_whitespace(b) => { pos += 1; TagState::AfterAttributeName },
					_ => {
						self.push_attribute(&mut tag, attr_name, attr_offset, None)?;
						TagState::BeforeAttributeName
					},
				},

				TagState::BeforeAttributeValue => match b {
					b'"' | b'\'' => {
						pos += 1;
						mark = pos;
						TagState::AttributeValueQuoted(b)
					},
					b'>' => {
						invalid = true;
						self.push_attribute(&mut tag, attr_name, attr_offset, Some(("", None, pos)))?;
						TagState::BeforeAttributeName
					},
					_ if is_whitespace(b) => { pos += 1; TagState::BeforeAttributeValue },
					_ => {
						mark = pos;
						TagState::AttributeValueUnquoted
					},
				},

				TagState::AttributeValueQuoted(q) => {
					let quote = Some(char::from(q));
					let recover =
						if self.syntax.is_xml() { None }
						else { bytes[pos..].iter().position(|c| *c == b'>') };
					if let Some(idx) = bytes[pos..].iter().position(|c| *c == q) {
						let value = &src[mark..pos + idx];
						self.push_attribute(&mut tag, attr_name, attr_offset, Some((value, quote, mark)))?;
						pos += idx + 1;
					}
					// Recover at the first ">".
					else if let Some(idx) = recover {
						let value = &src[mark..pos + idx];
						self.push_attribute(&mut tag, attr_name, attr_offset, Some((value, quote, mark)))?;
						unclosed.get_or_insert(attr_name);
						pos += idx;
					}
					else {
						let name = tag.name;
						return Err(Fault::new(
							format!("The value of attribute {attr_name} in the start tag <{name}> is not closed."),
							mark - 1,
						));
					}
					TagState::BeforeAttributeName
				},

				TagState::AttributeValueUnquoted => match b {
					b'>' => {
						self.push_attribute(&mut tag, attr_name, attr_offset, Some((&src[mark..pos], None, mark)))?;
						TagState::BeforeAttributeName
					},
					b'"' | b'\'' | b'<' | b'=' | b'`' => {
						invalid = true;
						pos += 1;
						TagState::AttributeValueUnquoted
					},
					_ if is_whitespace(b) => {
						self.push_attribute(&mut tag, attr_name, attr_offset, Some((&src[mark..pos], None, mark)))?;
						TagState::BeforeAttributeName
					},
					_ => { pos += 1; TagState::AttributeValueUnquoted },
				},

				TagState::SelfClosingStart =>
					if b == b'>' {
						tag.self_closing = true;
						pos += 1;
						TagState::Done
					}
					else { TagState::BeforeAttributeName },

				TagState::Done => TagState::Done,
			};
		}

		if invalid {
			handler.warning(
				format!("In the start tag <{}> found invalid characters.", tag.name),
				start,
			);
		}
		if let Some(attr) = unclosed {
			handler.warning(
				format!("The value of attribute {attr} in the start tag <{}> is not closed.", tag.name),
				start,
			);
		}

		let name = tag.name;
		let kind = handler.start_tag(tag)?;
		self.consume(pos);
		if kind.is_raw() { Ok(State::RawText(name)) }
		else { Ok(State::Data) }
	}

	/// # Push Attribute.
	///
	/// XML requires every attribute to have a quoted value.
	fn push_attribute(
		&self,
		tag: &mut StartTag<'a>,
		name: &'a str,
		offset: usize,
		value: Option<(&'a str, Option<char>, usize)>,
	) -> Result<(), Fault> {
		if self.syntax.is_xml() && value.is_none_or(|(_, q, _)| q.is_none()) {
			return Err(Fault::new(
				format!("The attribute {name} in the start tag <{}> must have a quoted value.", tag.name),
				offset,
			));
		}

		let (value, quote, value_offset) = match value {
			Some((v, q, o)) => (Some(v), q, o),
			None => (None, None, offset + name.len()),
		};
		tag.attributes.push(RawAttribute { name, value, quote, offset, value_offset });
		Ok(())
	}

	/// # End Tag Open.
	fn end_tag_open<H: MarkupHandler>(&mut self, handler: &mut H) -> Result<State<'a>, Fault> {
		let start = self.pos;
		match self.bytes.get(start + 2).copied() {
			Some(b) if self.is_name_start(b) => {
				self.flush_text(start, handler);
				let name_end = self.bytes[start + 2..].iter()
					.position(|b| is_whitespace(*b) || matches!(b, b'/' | b'>'))
					.map_or(self.src.len(), |idx| start + 2 + idx);
				let name = &self.src[start + 2..name_end];
				let Some(close) = self.bytes[name_end..].iter().position(|b| *b == b'>') else {
					return Err(Fault::new(format!("End tag </{name}> is not closed."), start));
				};
				let close = name_end + close;

				// Nothing but whitespace belongs after the name.
				if self.bytes[name_end..close].iter().any(|b| ! is_whitespace(*b)) {
					let msg = format!("The end tag </{name}> contains junk.");
					if self.syntax.is_xml() { return Err(Fault::new(msg, start)); }
					handler.warning(msg, start);
				}

				handler.end_tag(name, start)?;
				self.consume(close + 1);
				Ok(State::Data)
			},
			Some(b'>') if ! self.syntax.is_xml() => {
				self.flush_text(start, handler);
				handler.warning("Empty end tag.".to_owned(), start);
				handler.bogus("</>", start);
				self.consume(start + 3);
				Ok(State::Data)
			},
			_ => self.bogus_markup(handler),
		}
	}

	/// # Bogus Markup.
	///
	/// Keep everything up to the next `>` verbatim.
	fn bogus_markup<H: MarkupHandler>(&mut self, handler: &mut H) -> Result<State<'a>, Fault> {
		let start = self.pos;
		if self.syntax.is_xml() {
			return Err(Fault::new("Invalid markup.", start));
		}

		match self.bytes[start..].iter().position(|b| *b == b'>') {
			Some(idx) => {
				self.flush_text(start, handler);
				handler.warning("Bogus markup.".to_owned(), start);
				handler.bogus(&self.src[start..=start + idx], start);
				self.consume(start + idx + 1);
				Ok(State::Data)
			},
			None => self.stray(handler),
		}
	}

	/// # Markup Declaration.
	///
	/// Comments, CDATA, and doctypes.
	fn markup_declaration<H: MarkupHandler>(&mut self, handler: &mut H) -> Result<State<'a>, Fault> {
		let start = self.pos;
		let rest = &self.src[start..];

		if rest.starts_with("<!--") {
			self.flush_text(start, handler);
			let body = &rest[4..];

			// Abruptly closed comments like <!--> are empty.
			let (content, end) =
				if body.starts_with('>') { ("", start + 5) }
				else if body.starts_with("->") { ("", start + 6) }
				else if let Some(idx) = body.find("-->") { (&body[..idx], start + 4 + idx + 3) }
				else { return Err(Fault::new("Comment is not closed.", start)); };

			handler.comment(content, start);
			self.consume(end);
			Ok(State::Data)
		}
		else if rest.starts_with("<![CDATA[") {
			self.flush_text(start, handler);
			let Some(idx) = rest[9..].find("]]>") else {
				return Err(Fault::new("CDATA section is not closed.", start));
			};
			handler.cdata(&rest[9..9 + idx], start);
			self.consume(start + 9 + idx + 3);
			Ok(State::Data)
		}
		else if rest.get(..9).is_some_and(|v| v.eq_ignore_ascii_case("<!DOCTYPE")) {
			self.flush_text(start, handler);
			let (doctype, end) = doctype::parse(self.src, start)?;
			handler.doctype(doctype, start)?;
			self.consume(end);
			Ok(State::Data)
		}
		else { self.bogus_markup(handler) }
	}

	/// # Processing Instruction.
	fn processing_instruction<H: MarkupHandler>(&mut self, handler: &mut H) -> Result<State<'a>, Fault> {
		let start = self.pos;
		if let Some(idx) = self.src[start + 2..].find("?>") {
			self.flush_text(start, handler);
			let end = start + 2 + idx + 2;
			handler.processing_instruction(&self.src[start..end], start);
			self.consume(end);
			Ok(State::Data)
		}
		else if self.syntax.is_xml() {
			Err(Fault::new("Processing instruction is not closed.", start))
		}
		else { self.bogus_markup(handler) }
	}

	/// # Raw Text.
	///
	/// Everything up to the matching end tag is text, including things that
	/// look like comments.
	fn raw_text<H: MarkupHandler>(&mut self, name: &str, handler: &mut H) -> State<'a> {
		let mut from = self.pos;
		while let Some(idx) = self.src[from..].find("</") {
			let lt = from + idx;
			let after = lt + 2 + name.len();
			if
				self.bytes.get(lt + 2..after).is_some_and(|v| v.eq_ignore_ascii_case(name.as_bytes())) &&
				self.bytes.get(after).is_none_or(|b| is_whitespace(*b) || matches!(b, b'/' | b'>'))
			{
				self.flush_text(lt, handler);
				self.pos = lt;
				return State::EndTagOpen;
			}
			from = lt + 2;
		}

		// The element never closes; the builder will sort that out.
		self.pos = self.src.len();
		State::Eof
	}
}



#[must_use]
/// # Is Whitespace?
pub(crate) const fn is_whitespace(b: u8) -> bool {
	matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}



#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Default)]
	/// # Event Recorder.
	struct Recorder {
		events: Vec<String>,
		warnings: Vec<(String, usize)>,
		raw: bool,
	}

	impl MarkupHandler for Recorder {
		fn doctype(&mut self, doctype: Doctype, offset: usize) -> Result<(), Fault> {
			self.events.push(format!("doctype:{}@{offset}", doctype.root));
			Ok(())
		}

		fn start_tag(&mut self, tag: StartTag<'_>) -> Result<ContentKind, Fault> {
			let mut out = format!("start:{}", tag.name);
			for a in &tag.attributes {
				out.push(' ');
				out.push_str(a.name);
				if let Some(v) = a.value {
					out.push('=');
					if let Some(q) = a.quote { out.push(q); }
					out.push_str(v);
					if let Some(q) = a.quote { out.push(q); }
				}
			}
			if tag.self_closing { out.push('/'); }
			out.push_str(&format!("@{}", tag.offset));
			self.events.push(out);

			let kind =
				if self.raw { ContentKind::html(&tag.name.to_ascii_lowercase()) }
				else { ContentKind::Normal };
			Ok(kind)
		}

		fn end_tag(&mut self, name: &str, offset: usize) -> Result<(), Fault> {
			self.events.push(format!("end:{name}@{offset}"));
			Ok(())
		}

		fn text(&mut self, text: &str, offset: usize) {
			self.events.push(format!("text:{text}@{offset}"));
		}

		fn comment(&mut self, text: &str, _offset: usize) {
			self.events.push(format!("comment:{text}"));
		}

		fn cdata(&mut self, text: &str, _offset: usize) {
			self.events.push(format!("cdata:{text}"));
		}

		fn processing_instruction(&mut self, raw: &str, _offset: usize) {
			self.events.push(format!("pi:{raw}"));
		}

		fn bogus(&mut self, raw: &str, _offset: usize) {
			self.events.push(format!("bogus:{raw}"));
		}

		fn warning(&mut self, message: String, offset: usize) {
			self.warnings.push((message, offset));
		}

		fn finish(&mut self, offset: usize) -> Result<(), Fault> {
			self.events.push(format!("eof@{offset}"));
			Ok(())
		}
	}

	fn tokenize(raw: &str, syntax: Syntax) -> Result<Recorder, MarkupParsingError> {
		let src = SourceCode::new(raw);
		let mut rec = Recorder { raw: true, ..Recorder::default() };
		parse(&src, syntax, &mut rec)?;
		Ok(rec)
	}

	#[test]
	fn t_basic() {
		let rec = tokenize(
			"<!DOCTYPE html><p class=\"a b\" id=x hidden>Hi<br/></p><!-- c --><?php echo 1; ?>",
			Syntax::Html,
		).expect("Tokenization failed.");
		assert_eq!(
			rec.events,
			[
				"doctype:html@0",
				"start:p class=\"a b\" id=x hidden@15",
				"text:Hi@42",
				"start:br/@44",
				"end:p@49",
				"comment: c ",
				"pi:<?php echo 1; ?>",
				"eof@79",
			],
		);
		assert!(rec.warnings.is_empty());
	}

	#[test]
	fn t_raw_text() {
		let rec = tokenize(
			"<script>if (a < b) { x = '</p><!-- -->'; }</script ><style>b{}</STYLE>",
			Syntax::Html,
		).expect("Tokenization failed.");
		assert_eq!(
			rec.events,
			[
				"start:script@0",
				"text:if (a < b) { x = '</p><!-- -->'; }@8",
				"end:script@42",
				"start:style@52",
				"text:b{}@59",
				"end:STYLE@62",
				"eof@70",
			],
		);
		assert!(rec.warnings.is_empty());
	}

	#[test]
	fn t_recovery() {
		// Stray less-than.
		let rec = tokenize("a < b", Syntax::Html).expect("Tokenization failed.");
		assert_eq!(rec.events, ["text:a < b@0", "eof@5"]);
		assert_eq!(rec.warnings, [("Unescaped less-than sign.".to_owned(), 2)]);

		// Junk in a tag.
		let rec = tokenize("<div \"id=x>y</div>", Syntax::Html).expect("Tokenization failed.");
		assert_eq!(rec.events[0], "start:div id=x@0");
		assert_eq!(
			rec.warnings,
			[("In the start tag <div> found invalid characters.".to_owned(), 0)],
		);

		// Unclosed quote.
		let rec = tokenize("<a href=\"foo>bar</a>", Syntax::Html).expect("Tokenization failed.");
		assert_eq!(rec.events[0], "start:a href=\"foo\"@0");
		assert_eq!(rec.events[1], "text:bar@13");
		assert_eq!(rec.warnings.len(), 1);

		// Bogus bits.
		let rec = tokenize("<!foo></>", Syntax::Html).expect("Tokenization failed.");
		assert_eq!(rec.events, ["bogus:<!foo>", "bogus:</>", "eof@9"]);
		assert_eq!(rec.warnings.len(), 2);
	}

	#[test]
	fn t_fatal() {
		for (raw, syntax, msg, line, column) in [
			("<p>\n<!-- oops", Syntax::Html, "Comment is not closed.", 2, 1),
			("<![CDATA[ x", Syntax::Html, "CDATA section is not closed.", 1, 1),
			("<div class=x", Syntax::Html, "Start tag <div> is not closed.", 1, 1),
			("<p></p", Syntax::Html, "End tag </p> is not closed.", 1, 4),
			("<!DOCTYPE HTML PUBLIC>", Syntax::Html, "Expected a formal public identifier but the doctype ended.", 1, 22),
			("<a b=c/>", Syntax::Xml, "The attribute b in the start tag <a> must have a quoted value.", 1, 4),
			("<a b/>", Syntax::Xml, "The attribute b in the start tag <a> must have a quoted value.", 1, 4),
			("a < b", Syntax::Xml, "Unescaped less-than sign.", 1, 3),
		] {
			let err = tokenize(raw, syntax).expect_err(raw);
			assert_eq!(err.message(), msg, "{raw}");
			assert_eq!((err.line(), err.column()), (line, column), "{raw}");
		}
	}

	#[test]
	fn t_xml() {
		let rec = tokenize(
			"<?xml version=\"1.0\"?><_a:b x='1'><![CDATA[<hi>]]></_a:b>",
			Syntax::Xml,
		).expect("Tokenization failed.");
		assert_eq!(
			rec.events,
			[
				"pi:<?xml version=\"1.0\"?>",
				"start:_a:b x='1'@21",
				"cdata:<hi>",
				"end:_a:b@49",
				"eof@56",
			],
		);
	}
}
