/*!
# MarkMinL: Doctype Recognizer.

This handles `<!DOCTYPE …>` declarations, including legacy SGML formal public
identifiers and XML internal subsets.
*/

use super::{
	Fault,
	is_whitespace,
};
use std::fmt;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Formal Public Identifier Owner Prefix.
pub enum FpiPrefix {
	/// # Registered (`+`).
	Registered,

	/// # Unregistered (`-`).
	Unregistered,

	/// # None (ISO Owner).
	None,
}

impl FpiPrefix {
	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Registered => "+",
			Self::Unregistered => "-",
			Self::None => "",
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Formal Public Identifier.
///
/// An FPI always decomposes as:
///
/// ```text
/// <prefix>//<organization>//<type> <description>//<language>[//<version>]
/// ```
///
/// The prefix (and its separator) is absent for ISO-owned identifiers.
pub struct FormalPublicId {
	/// # Owner Prefix.
	pub prefix: FpiPrefix,

	/// # Owner Organization.
	pub organization: String,

	/// # Public Text Class (e.g. `DTD`).
	pub kind: String,

	/// # Public Text Description.
	pub description: String,

	/// # Public Text Language.
	pub language: String,

	/// # Display Version.
	pub version: Option<String>,
}

impl fmt::Display for FormalPublicId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.prefix != FpiPrefix::None {
			write!(f, "{}//", self.prefix.as_str())?;
		}
		write!(
			f,
			"{}//{} {}//{}",
			self.organization,
			self.kind,
			self.description,
			self.language,
		)?;
		if let Some(v) = self.version.as_deref() { write!(f, "//{v}")?; }
		Ok(())
	}
}

impl FormalPublicId {
	#[must_use]
	/// # Parse.
	///
	/// Decompose a formal public identifier, returning `None` if it does not
	/// fit the grammar. Nothing is trimmed or coerced, so a successful parse
	/// always re-serializes to the identical literal.
	pub fn parse(src: &str) -> Option<Self> {
		let (prefix, rest) =
			if let Some(rest) = src.strip_prefix("-//") { (FpiPrefix::Unregistered, rest) }
			else if let Some(rest) = src.strip_prefix("+//") { (FpiPrefix::Registered, rest) }
			else { (FpiPrefix::None, src) };

		let mut parts = rest.split("//");
		let organization = parts.next().filter(|v| is_fpi_part(v))?;
		let text = parts.next()?;
		let language = parts.next().filter(|v| is_fpi_part(v))?;
		let version = match parts.next() {
			Some(v) if is_fpi_part(v) => Some(v.to_owned()),
			Some(_) => return None,
			None => None,
		};
		if parts.next().is_some() { return None; }

		// The text bit is a class keyword followed by a description.
		let (kind, description) = text.split_once(' ')?;
		if
			kind.is_empty() ||
			! kind.bytes().all(|b| b.is_ascii_uppercase()) ||
			description.trim().is_empty()
		{
			return None;
		}

		Some(Self {
			prefix,
			organization: organization.to_owned(),
			kind: kind.to_owned(),
			description: description.to_owned(),
			language: language.to_owned(),
			version,
		})
	}

	#[must_use]
	/// # Is (X)HTML?
	///
	/// Returns `true` for the W3C and IETF HTML/XHTML DTDs.
	pub fn is_html(&self) -> bool {
		matches!(self.organization.as_str(), "W3C" | "IETF" | "W3O" | "WebTechs") &&
		self.kind == "DTD" &&
		{
			let desc = self.description.trim_start().as_bytes();
			desc.len() >= 4 && (
				desc[..4].eq_ignore_ascii_case(b"html") ||
				(desc.len() >= 5 && desc[..5].eq_ignore_ascii_case(b"xhtml"))
			)
		}
	}
}

/// # Is Valid FPI Part?
fn is_fpi_part(src: &str) -> bool {
	! src.trim().is_empty() && ! src.contains(['"', '\''])
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # System Identifier.
pub struct SystemId {
	/// # Literal.
	pub literal: String,

	/// # Quote Character.
	pub quote: char,
}

impl fmt::Display for SystemId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{q}{}{q}", self.literal, q = self.quote)
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # External Identifier.
pub enum ExternalId {
	/// # Public.
	Public {
		/// # Keyword (Source Casing).
		keyword: String,

		/// # Formal Public Identifier.
		fpi: FormalPublicId,

		/// # FPI Quote Character.
		quote: char,

		/// # System Identifier.
		system: Option<SystemId>,
	},

	/// # System.
	System {
		/// # Keyword (Source Casing).
		keyword: String,

		/// # System Identifier.
		system: SystemId,
	},
}

impl fmt::Display for ExternalId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Public { keyword, fpi, quote, system } => {
				write!(f, "{keyword} {quote}{fpi}{quote}")?;
				if let Some(system) = system { write!(f, " {system}")?; }
				Ok(())
			},
			Self::System { keyword, system } => write!(f, "{keyword} {system}"),
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Doctype.
pub struct Doctype {
	/// # Keyword (Source Casing).
	pub keyword: String,

	/// # Root Element Name.
	pub root: String,

	/// # External Identifier.
	pub external: Option<ExternalId>,

	/// # Internal Subset (XML).
	pub internal_subset: Option<String>,
}

impl fmt::Display for Doctype {
	/// # Normalized Form.
	///
	/// This collapses any formatting whitespace between the parts.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "<!{} {}", self.keyword, self.root)?;
		if let Some(ext) = &self.external { write!(f, " {ext}")?; }
		if let Some(subset) = self.internal_subset.as_deref() {
			write!(f, " [{subset}]")?;
		}
		f.write_str(">")
	}
}

impl Doctype {
	#[must_use]
	/// # Is HTML Root?
	pub fn is_html_root(&self) -> bool { self.root.eq_ignore_ascii_case("html") }

	#[must_use]
	/// # Is Short Form?
	///
	/// Returns `true` if this is already `<!DOCTYPE html>`, give or take
	/// casing.
	pub fn is_short(&self) -> bool {
		self.is_html_root() &&
		self.external.is_none() &&
		self.internal_subset.is_none()
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Recognizer State.
enum DoctypeState {
	/// # Right After the Keyword.
	Start,

	/// # Root Element Name.
	Name,

	/// # After Root Element Name.
	AfterName,

	/// # After the PUBLIC Keyword.
	BeforePublicId,

	/// # Inside the Quoted FPI.
	PublicIdQuoted(u8),

	/// # After the FPI.
	AfterPublicId,

	/// # After the SYSTEM Keyword.
	BeforeSystemId,

	/// # Inside the Quoted System Identifier.
	SystemIdQuoted(u8),

	/// # After the System Identifier.
	AfterSystemId,

	/// # Internal Subset.
	InternalSubset,
}

/// # Parse Doctype.
///
/// Parse the doctype whose opening `<` sits at byte `start` of `src`,
/// returning it along with the offset immediately following its closing
/// `>`.
///
/// The caller is expected to have confirmed `<!DOCTYPE` (in any case) is
/// present.
pub(crate) fn parse(src: &str, start: usize) -> Result<(Doctype, usize), Fault> {
	let bytes = src.as_bytes();
	let keyword = &src[start + 2..start + 9];
	let mut pos = start + 9;
	let mut state = DoctypeState::Start;

	let mut root = "";
	let mut external: Option<ExternalId> = None;
	let mut internal_subset = None;
	let mut id_keyword = "";
	let mut public: Option<(FormalPublicId, char)> = None;

	loop {
		// Everything but the name and quoted states starts by skipping
		// whitespace, so let's do that here.
		let had_ws =
			if matches!(
				state,
				DoctypeState::Name |
				DoctypeState::PublicIdQuoted(_) |
				DoctypeState::SystemIdQuoted(_) |
				DoctypeState::InternalSubset
			) { false }
			else {
				let before = pos;
				while bytes.get(pos).is_some_and(|b| is_whitespace(*b)) { pos += 1; }
				before != pos
			};

		let Some(&b) = bytes.get(pos) else {
			return Err(Fault::new("Doctype is not closed.", start));
		};

		state = match state {
			DoctypeState::Start =>
				if ! had_ws || b == b'>' {
					return Err(Fault::new(
						"Missing space before the doctype root element.",
						start + 9,
					));
				}
				else if pos != start + 10 {
					return Err(Fault::new(
						"Expected a single space before the doctype root element.",
						start + 10,
					));
				}
				else { DoctypeState::Name },

			DoctypeState::Name => {
				let name_start = pos;
				while bytes.get(pos).is_some_and(|b| ! is_whitespace(*b) && ! matches!(b, b'>' | b'[')) {
					pos += 1;
				}
				root = &src[name_start..pos];
				DoctypeState::AfterName
			},

			DoctypeState::AfterName => match b {
				b'>' => return Ok((finish(keyword, root, external, internal_subset), pos + 1)),
				b'[' => DoctypeState::InternalSubset,
				_ => {
					let word_start = pos;
					while bytes.get(pos).is_some_and(u8::is_ascii_alphabetic) { pos += 1; }
					let word = &src[word_start..pos];
					id_keyword = word;
					if word.eq_ignore_ascii_case("PUBLIC") { DoctypeState::BeforePublicId }
					else if word.eq_ignore_ascii_case("SYSTEM") { DoctypeState::BeforeSystemId }
					else { return Err(Fault::new("Bogus doctype.", word_start)); }
				},
			},

			DoctypeState::BeforePublicId => match b {
				b'>' => return Err(Fault::new(
					"Expected a formal public identifier but the doctype ended.",
					pos,
				)),
				b'"' | b'\'' =>
					if had_ws {
						pos += 1;
						DoctypeState::PublicIdQuoted(b)
					}
					else {
						return Err(Fault::new(
							"Missing space before the formal public identifier.",
							pos,
						));
					},
				_ => return Err(Fault::new("Expected a formal public identifier.", pos)),
			},

			DoctypeState::PublicIdQuoted(q) => {
				let quote_pos = pos - 1;
				let literal = quoted(src, pos, q).ok_or_else(||
					Fault::new("Formal public identifier is not closed.", quote_pos)
				)?;
				if literal.trim().is_empty() {
					return Err(Fault::new("Empty formal public identifier.", quote_pos));
				}
				let fpi = FormalPublicId::parse(literal).ok_or_else(||
					Fault::new("Invalid formal public identifier.", quote_pos)
				)?;
				public = Some((fpi, char::from(q)));
				pos += literal.len() + 1;
				DoctypeState::AfterPublicId
			},

			DoctypeState::AfterPublicId => match b {
				b'>' | b'[' => {
					if let Some((fpi, quote)) = public.take() {
						external = Some(ExternalId::Public {
							keyword: id_keyword.to_owned(),
							fpi,
							quote,
							system: None,
						});
					}
					if b == b'>' {
						return Ok((finish(keyword, root, external, internal_subset), pos + 1));
					}
					DoctypeState::InternalSubset
				},
				b'"' | b'\'' =>
					if had_ws {
						pos += 1;
						DoctypeState::SystemIdQuoted(b)
					}
					else {
						return Err(Fault::new(
							"Missing space before the system identifier.",
							pos,
						));
					},
				_ => return Err(Fault::new("Bogus doctype.", pos)),
			},

			DoctypeState::BeforeSystemId => match b {
				b'>' => return Err(Fault::new(
					"Expected a system identifier but the doctype ended.",
					pos,
				)),
				b'"' | b'\'' =>
					if had_ws {
						pos += 1;
						DoctypeState::SystemIdQuoted(b)
					}
					else {
						return Err(Fault::new(
							"Missing space before the system identifier.",
							pos,
						));
					},
				_ => return Err(Fault::new("Expected a system identifier.", pos)),
			},

			DoctypeState::SystemIdQuoted(q) => {
				let quote_pos = pos - 1;
				let literal = quoted(src, pos, q).ok_or_else(||
					Fault::new("System identifier is not closed.", quote_pos)
				)?;
				if literal.trim().is_empty() {
					return Err(Fault::new("Empty system identifier.", quote_pos));
				}
				let system = SystemId {
					literal: literal.to_owned(),
					quote: char::from(q),
				};
				external = Some(match public.take() {
					Some((fpi, quote)) => ExternalId::Public {
						keyword: id_keyword.to_owned(),
						fpi,
						quote,
						system: Some(system),
					},
					None => ExternalId::System {
						keyword: id_keyword.to_owned(),
						system,
					},
				});
				pos += literal.len() + 1;
				DoctypeState::AfterSystemId
			},

			DoctypeState::AfterSystemId => match b {
				b'>' => return Ok((finish(keyword, root, external, internal_subset), pos + 1)),
				b'[' => DoctypeState::InternalSubset,
				_ => return Err(Fault::new("Bogus doctype.", pos)),
			},

			DoctypeState::InternalSubset => {
				// We're sitting on the "[".
				let (subset, end) = internal(src, pos + 1)
					.ok_or_else(|| Fault::new("Doctype is not closed.", start))?;
				internal_subset = Some(subset.to_owned());
				return Ok((finish(keyword, root, external, internal_subset), end));
			},
		};
	}
}

/// # Finish.
fn finish(
	keyword: &str,
	root: &str,
	external: Option<ExternalId>,
	internal_subset: Option<String>,
) -> Doctype {
	Doctype {
		keyword: keyword.to_owned(),
		root: root.to_owned(),
		external,
		internal_subset,
	}
}

/// # Quoted Literal.
///
/// Return everything from `pos` up to (but not including) the closing quote
/// `q`. A `>` or the end of the document before the quote means the literal
/// was never closed.
fn quoted(src: &str, pos: usize, q: u8) -> Option<&str> {
	let rest = src.as_bytes().get(pos..)?;
	let end = rest.iter().position(|b| *b == q || *b == b'>')?;
	if rest[end] == q { src.get(pos..pos + end) }
	else { None }
}

/// # Internal Subset.
///
/// Find the closing `]` (skipping over quoted strings and comments inside
/// the subset) and the `>` following it, returning the subset content and
/// the offset after the `>`.
fn internal(src: &str, start: usize) -> Option<(&str, usize)> {
	let bytes = src.as_bytes();
	let mut pos = start;
	while let Some(&b) = bytes.get(pos) {
		match b {
			b'"' | b'\'' => {
				let len = bytes.get(pos + 1..)?.iter().position(|c| *c == b)?;
				pos += len + 2;
			},
			b'<' if bytes.get(pos..pos + 4) == Some(b"<!--") => {
				let len = src.get(pos + 4..)?.find("-->")?;
				pos += len + 7;
			},
			b']' => {
				let subset = &src[start..pos];
				pos += 1;
				while bytes.get(pos).is_some_and(|b| is_whitespace(*b)) { pos += 1; }
				return if bytes.get(pos) == Some(&b'>') { Some((subset, pos + 1)) } else { None };
			},
			_ => { pos += 1; },
		}
	}

	None
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_fpi() {
		let fpi = FormalPublicId::parse("-//W3C//DTD HTML 4.01//EN")
			.expect("FPI failed to parse.");
		assert_eq!(fpi.prefix, FpiPrefix::Unregistered);
		assert_eq!(fpi.organization, "W3C");
		assert_eq!(fpi.kind, "DTD");
		assert_eq!(fpi.description, "HTML 4.01");
		assert_eq!(fpi.language, "EN");
		assert_eq!(fpi.version, None);
		assert_eq!(fpi.to_string(), "-//W3C//DTD HTML 4.01//EN");
		assert!(fpi.is_html());

		for s in [
			"-//W3C//DTD XHTML 1.0 Transitional//EN",
			"+//Silmaril//DTD HTML Pro v0r11 19970101//EN",
			"ISO/IEC 15445:2000//DTD HyperText Markup Language//EN",
			"-//W3C//DTD SVG 1.1//EN",
			"-//OASIS//DTD DocBook XML V4.5//EN//XML",
		] {
			let fpi = FormalPublicId::parse(s).expect("FPI failed to parse.");
			assert_eq!(fpi.to_string(), s);
		}

		let fpi = FormalPublicId::parse("ISO/IEC 15445:2000//DTD HyperText Markup Language//EN")
			.expect("FPI failed to parse.");
		assert_eq!(fpi.prefix, FpiPrefix::None);
		assert_eq!(fpi.organization, "ISO/IEC 15445:2000");

		let fpi = FormalPublicId::parse("-//OASIS//DTD DocBook XML V4.5//EN//XML")
			.expect("FPI failed to parse.");
		assert_eq!(fpi.version.as_deref(), Some("XML"));
		assert!(! fpi.is_html());

		// Bad ones.
		for s in [
			"",
			"html",
			"-//W3C//DTD//EN",
			"-//W3C//dtd HTML 4.01//EN",
			"-//W3C//DTD HTML 4.01",
			"-////DTD HTML 4.01//EN",
			"-//W3C//DTD HTML 4.01//EN//1//2",
		] {
			assert!(FormalPublicId::parse(s).is_none(), "{s:?}");
		}
	}

	#[test]
	fn t_parse() {
		let src = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" 'http://www.w3.org/TR/html4/strict.dtd'><html>"#;
		let (doctype, end) = parse(src, 0).expect("Doctype failed to parse.");
		assert_eq!(&src[end..], "<html>");
		assert_eq!(doctype.keyword, "DOCTYPE");
		assert_eq!(doctype.root, "HTML");
		assert!(doctype.is_html_root());
		assert!(! doctype.is_short());
		let Some(ExternalId::Public { fpi, quote, system, .. }) = &doctype.external else {
			panic!("Expected a public identifier.");
		};
		assert_eq!(fpi.description, "HTML 4.01");
		assert_eq!(*quote, '"');
		assert_eq!(
			system.as_ref().map(|s| (s.literal.as_str(), s.quote)),
			Some(("http://www.w3.org/TR/html4/strict.dtd", '\'')),
		);
		assert_eq!(doctype.to_string(), &src[..end]);

		// Short and sweet.
		let (doctype, end) = parse("<!doctype html>", 0).expect("Doctype failed to parse.");
		assert_eq!(end, 15);
		assert!(doctype.is_short());
		assert_eq!(doctype.to_string(), "<!doctype html>");

		// System.
		let (doctype, _) = parse(r#"<!DOCTYPE note SYSTEM "Note.dtd">"#, 0)
			.expect("Doctype failed to parse.");
		assert!(matches!(doctype.external, Some(ExternalId::System { .. })));

		// Internal subset.
		let src = "<!DOCTYPE note [\n<!ELEMENT note (#PCDATA)>\n<!ENTITY a \"]\">\n]>";
		let (doctype, end) = parse(src, 0).expect("Doctype failed to parse.");
		assert_eq!(end, src.len());
		assert_eq!(
			doctype.internal_subset.as_deref(),
			Some("\n<!ELEMENT note (#PCDATA)>\n<!ENTITY a \"]\">\n"),
		);
	}

	#[test]
	fn t_parse_errors() {
		for (src, msg, offset) in [
			("<!DOCTYPE HTML PUBLIC>", "Expected a formal public identifier but the doctype ended.", 21),
			("<!DOCTYPEhtml>", "Missing space before the doctype root element.", 9),
			("<!DOCTYPE>", "Missing space before the doctype root element.", 9),
			("<!DOCTYPE  html>", "Expected a single space before the doctype root element.", 10),
			("<!DOCTYPE\n\thtml>", "Expected a single space before the doctype root element.", 10),
			("<!DOCTYPE html FOO>", "Bogus doctype.", 15),
			("<!DOCTYPE html PUBLIC \"\">", "Empty formal public identifier.", 22),
			("<!DOCTYPE html PUBLIC \"-//W3C//EN\">", "Invalid formal public identifier.", 22),
			("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN>", "Formal public identifier is not closed.", 22),
			("<!DOCTYPE html PUBLIC html>", "Expected a formal public identifier.", 22),
			("<!DOCTYPE html PUBLIC\"-//W3C//DTD HTML 4.01//EN\">", "Missing space before the formal public identifier.", 21),
			("<!DOCTYPE html SYSTEM>", "Expected a system identifier but the doctype ended.", 21),
			("<!DOCTYPE html SYSTEM ''>", "Empty system identifier.", 22),
			("<!DOCTYPE html SYSTEM 'about:legacy-compat' x>", "Bogus doctype.", 44),
			("<!DOCTYPE html", "Doctype is not closed.", 0),
		] {
			let err = parse(src, 0).expect_err(src);
			assert_eq!(err.message, msg, "{src}");
			assert_eq!(err.offset, offset, "{src}");
		}
	}
}
