/*!
# MarkMinL: Errors
*/

use crate::source::{
	SourceCode,
	SourceCoordinates,
};
use std::{
	error::Error,
	fmt,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Settings Error.
///
/// This is returned when a setting value, usually parsed from a string, is
/// invalid. Such values are rejected up front so that a minifier can never be
/// built with nonsense in it.
pub enum SettingsError {
	/// # Invalid Attribute Quotes Removal Mode.
	AttributeQuotesRemovalMode,

	/// # Invalid Attribute Quotes Style.
	AttributeQuotesStyle,

	/// # Invalid Empty Tag Render Mode.
	EmptyTagRenderMode,

	/// # Invalid New Line Style.
	NewLineStyle,

	/// # Invalid Preservable Attribute Selector.
	PreservableAttributeList,

	/// # Invalid Script Type.
	ScriptTypeList,

	/// # Invalid Doctype Identifier.
	ShortDoctypeList,

	/// # Invalid Tag or Directive Name.
	TagList,

	/// # Invalid Whitespace Minification Mode.
	WhitespaceMinificationMode,
}

impl AsRef<str> for SettingsError {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for SettingsError {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Error for SettingsError {}

impl SettingsError {
	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AttributeQuotesRemovalMode => "The attribute quotes removal mode must be one of: keepquotes, html4, html5.",
			Self::AttributeQuotesStyle => "The attribute quotes style must be one of: auto, optimal, single, double.",
			Self::EmptyTagRenderMode => "The empty tag render mode must be one of: noslash, slash, spaceandslash.",
			Self::NewLineStyle => "The new line style must be one of: auto, native, windows, mac, unix.",
			Self::PreservableAttributeList => "Preservable attributes must be written like tag[attr], tag[attr=value], [attr], or [attr=value].",
			Self::ScriptTypeList => "Script types must be non-empty MIME types without whitespace or quotes.",
			Self::ShortDoctypeList => "Short doctype entries must be valid formal public identifiers.",
			Self::TagList => "Tag and directive names must be non-empty and contain no whitespace, quotes, or angle brackets.",
			Self::WhitespaceMinificationMode => "The whitespace minification mode must be one of: none, safe, medium, aggressive.",
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
/// # Error Category.
///
/// Every collected error or warning is tagged with one of these, mostly so
/// loggers have something meaningful to group by.
pub enum ErrorCategory {
	/// # HTML Parsing.
	HtmlParsing,

	/// # XHTML Parsing.
	XhtmlParsing,

	/// # XML Parsing.
	XmlParsing,

	/// # HTML Minification.
	HtmlMinification,

	/// # XML Minification.
	XmlMinification,

	/// # Embedded/Inline CSS.
	CssMinification,

	/// # Embedded/Inline JS.
	JsMinification,

	/// # Embedded JSON.
	JsonMinification,

	/// # Framework Binding Expressions.
	TemplateExpressionMinification,
}

impl fmt::Display for ErrorCategory {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl ErrorCategory {
	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::HtmlParsing => "HTML_PARSING_ERROR",
			Self::XhtmlParsing => "XHTML_PARSING_ERROR",
			Self::XmlParsing => "XML_PARSING_ERROR",
			Self::HtmlMinification => "HTML_MINIFICATION_ERROR",
			Self::XmlMinification => "XML_MINIFICATION_ERROR",
			Self::CssMinification => "CSS_MINIFICATION_ERROR",
			Self::JsMinification => "JS_MINIFICATION_ERROR",
			Self::JsonMinification => "JSON_MINIFICATION_ERROR",
			Self::TemplateExpressionMinification => "TEMPLATE_EXPRESSION_MINIFICATION_ERROR",
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Markup Parsing Error.
///
/// This is the show-stopper: the document is too broken to be understood,
/// so minification cannot continue.
pub struct MarkupParsingError {
	/// # Message.
	message: String,

	/// # Position.
	position: SourceCoordinates,

	/// # Source Fragment.
	source_fragment: String,
}

impl fmt::Display for MarkupParsingError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} (line {}, column {})",
			self.message,
			self.position.line,
			self.position.column,
		)
	}
}

impl Error for MarkupParsingError {}

impl MarkupParsingError {
	#[must_use]
	/// # New.
	///
	/// Build an error for the byte `offset` of `src`, complete with a
	/// caret-annotated fragment.
	pub(crate) fn new<S>(message: S, src: &SourceCode<'_>, offset: usize) -> Self
	where S: Into<String> {
		let position = src.coordinates(offset);
		Self {
			message: message.into(),
			source_fragment: src.fragment(position),
			position,
		}
	}

	#[must_use]
	/// # Message.
	pub fn message(&self) -> &str { &self.message }

	#[must_use]
	/// # Line Number (1-based).
	pub const fn line(&self) -> usize { self.position.line }

	#[must_use]
	/// # Column Number (1-based).
	pub const fn column(&self) -> usize { self.position.column }

	#[must_use]
	/// # Source Fragment.
	pub fn source_fragment(&self) -> &str { &self.source_fragment }

	#[must_use]
	/// # Into Error Info.
	pub(crate) fn into_info(self, category: ErrorCategory) -> MinificationErrorInfo {
		MinificationErrorInfo {
			category,
			message: self.message,
			line: self.position.line,
			column: self.position.column,
			source_fragment: self.source_fragment,
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Minification Error (or Warning) Info.
///
/// Line and column numbers are 1-based and always refer to the original
/// document, even when the problem was found inside an embedded fragment.
/// A line of zero means the location is unknown.
pub struct MinificationErrorInfo {
	/// # Category.
	pub category: ErrorCategory,

	/// # Message.
	pub message: String,

	/// # Line Number.
	pub line: usize,

	/// # Column Number.
	pub column: usize,

	/// # Source Fragment.
	pub source_fragment: String,
}

impl fmt::Display for MinificationErrorInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.line == 0 {
			write!(f, "{}: {}", self.category, self.message)
		}
		else {
			write!(
				f,
				"{}: {} (line {}, column {})",
				self.category,
				self.message,
				self.line,
				self.column,
			)
		}
	}
}
