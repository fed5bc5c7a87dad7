/*!
# MarkMinL: Settings.

Each minifier is configured by a plain settings struct. The HTML and XHTML
flavors share most of their knobs, so those live in `CommonSettings`, which
both embed.
*/

use crate::{
	FormalPublicId,
	SettingsError,
};
use std::{
	fmt,
	str::FromStr,
};



/// # Helper: Keyword Enum.
///
/// Generate `as_str`, `Display`, and (case-insensitive) `FromStr` impls for a
/// fieldless settings enum.
macro_rules! keyword_enum {
	($ty:ty, $err:ident, $($var:ident $kw:literal),+ $(,)?) => (
		impl $ty {
			#[must_use]
			/// # As Str.
			pub const fn as_str(self) -> &'static str {
				match self {
					$( Self::$var => $kw, )+
				}
			}
		}

		impl fmt::Display for $ty {
			#[inline]
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl FromStr for $ty {
			type Err = SettingsError;

			fn from_str(src: &str) -> Result<Self, Self::Err> {
				let src = src.trim();
				$(
					if src.eq_ignore_ascii_case($kw) { return Ok(Self::$var); }
				)+
				Err(SettingsError::$err)
			}
		}
	);
}



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Whitespace Minification Mode.
pub enum WhitespaceMinificationMode {
	/// # Leave Whitespace Alone.
	None,

	#[default]
	/// # Collapse Runs.
	Safe,

	/// # Also Trim Around Blocks.
	Medium,

	/// # Also Trim Inside Every Tag.
	Aggressive,
}

keyword_enum!(
	WhitespaceMinificationMode,
	WhitespaceMinificationMode,
	None "none",
	Safe "safe",
	Medium "medium",
	Aggressive "aggressive",
);



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Attribute Quotes Removal Mode (HTML).
pub enum AttributeQuotesRemovalMode {
	/// # Always Quote.
	KeepQuotes,

	/// # HTML4 Rules.
	///
	/// Values consisting only of letters, digits, hyphens, periods,
	/// underscores, and colons may go unquoted.
	Html4,

	#[default]
	/// # HTML5 Rules.
	///
	/// Any value free of whitespace, quotes, backticks, equal signs, and angle
	/// brackets may go unquoted.
	Html5,
}

keyword_enum!(
	AttributeQuotesRemovalMode,
	AttributeQuotesRemovalMode,
	KeepQuotes "keepquotes",
	Html4 "html4",
	Html5 "html5",
);



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Attribute Quotes Style (XHTML/XML).
pub enum AttributeQuotesStyle {
	#[default]
	/// # Match the Document's Majority.
	Auto,

	/// # Fewest Escapes.
	Optimal,

	/// # Single.
	Single,

	/// # Double.
	Double,
}

keyword_enum!(
	AttributeQuotesStyle,
	AttributeQuotesStyle,
	Auto "auto",
	Optimal "optimal",
	Single "single",
	Double "double",
);



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Empty Tag Render Mode (HTML).
pub enum EmptyTagRenderMode {
	#[default]
	/// # `<br>`
	NoSlash,

	/// # `<br/>`
	Slash,

	/// # `<br />`
	SpaceAndSlash,
}

keyword_enum!(
	EmptyTagRenderMode,
	EmptyTagRenderMode,
	NoSlash "noslash",
	Slash "slash",
	SpaceAndSlash "spaceandslash",
);

impl EmptyTagRenderMode {
	#[must_use]
	/// # Closing Sequence.
	pub(crate) const fn close(self) -> &'static str {
		match self {
			Self::NoSlash => ">",
			Self::Slash => "/>",
			Self::SpaceAndSlash => " />",
		}
	}
}



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # New Line Style.
pub enum NewLineStyle {
	#[default]
	/// # Whatever the Document Used First.
	Auto,

	/// # Platform Default.
	Native,

	/// # `\r\n`
	Windows,

	/// # `\r`
	Mac,

	/// # `\n`
	Unix,
}

keyword_enum!(
	NewLineStyle,
	NewLineStyle,
	Auto "auto",
	Native "native",
	Windows "windows",
	Mac "mac",
	Unix "unix",
);

impl NewLineStyle {
	#[must_use]
	/// # Line Break.
	///
	/// Return the literal break for this style, or `None` for `Auto`.
	pub(crate) const fn line_break(self) -> Option<&'static str> {
		match self {
			Self::Auto => None,
			Self::Native => Some(native_line_break()),
			Self::Windows => Some("\r\n"),
			Self::Mac => Some("\r"),
			Self::Unix => Some("\n"),
		}
	}
}

#[must_use]
/// # Native Line Break.
pub(crate) const fn native_line_break() -> &'static str {
	if cfg!(windows) { "\r\n" }
	else { "\n" }
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Preservable Attribute Selector.
pub struct PreservableAttribute {
	/// # Tag (Lowercase).
	tag: Option<String>,

	/// # Attribute Name (Lowercase).
	name: String,

	/// # Attribute Value.
	value: Option<String>,
}

impl FromStr for PreservableAttribute {
	type Err = SettingsError;

	/// # Parse Selector.
	///
	/// Accepted forms: `tag[attr]`, `tag[attr=value]`, `[attr]`, and
	/// `[attr=value]`.
	fn from_str(src: &str) -> Result<Self, Self::Err> {
		let src = src.trim();
		let (tag, rest) = src.split_once('[')
			.ok_or(SettingsError::PreservableAttributeList)?;
		let inner = rest.strip_suffix(']')
			.ok_or(SettingsError::PreservableAttributeList)?;

		let tag = tag.trim();
		let tag =
			if tag.is_empty() { None }
			else if is_name(tag) { Some(tag.to_ascii_lowercase()) }
			else { return Err(SettingsError::PreservableAttributeList); };

		let (name, value) = match inner.split_once('=') {
			Some((n, v)) => (n.trim(), Some(unquote(v.trim()).to_owned())),
			None => (inner.trim(), None),
		};
		if ! is_name(name) { return Err(SettingsError::PreservableAttributeList); }

		Ok(Self {
			tag,
			name: name.to_ascii_lowercase(),
			value,
		})
	}
}

impl PreservableAttribute {
	#[must_use]
	/// # Matches?
	///
	/// `tag` and `name` are expected to be lowercase already.
	pub fn matches(&self, tag: &str, name: &str, value: Option<&str>) -> bool {
		self.name == name &&
		self.tag.as_deref().is_none_or(|t| t == tag) &&
		self.value.as_deref().is_none_or(|v| value == Some(v))
	}
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Preservable Attribute List.
///
/// Attributes matching any of these selectors are never removed, even if
/// empty or redundant.
pub struct PreservableAttributeList(Vec<PreservableAttribute>);

impl FromStr for PreservableAttributeList {
	type Err = SettingsError;

	fn from_str(src: &str) -> Result<Self, Self::Err> {
		split_list(src)
			.map(PreservableAttribute::from_str)
			.collect::<Result<Vec<_>, _>>()
			.map(Self)
	}
}

impl PreservableAttributeList {
	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool { self.0.is_empty() }

	#[must_use]
	/// # Matches?
	pub fn matches(&self, tag: &str, name: &str, value: Option<&str>) -> bool {
		self.0.iter().any(|a| a.matches(tag, name, value))
	}
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Tag (or Directive) List.
///
/// Entries are stored lowercase.
pub struct TagList(Vec<String>);

impl FromStr for TagList {
	type Err = SettingsError;

	fn from_str(src: &str) -> Result<Self, Self::Err> {
		let mut out = Vec::new();
		for name in split_list(src) {
			if ! is_name(name) { return Err(SettingsError::TagList); }
			let name = name.to_ascii_lowercase();
			if ! out.contains(&name) { out.push(name); }
		}
		Ok(Self(out))
	}
}

impl TagList {
	#[must_use]
	/// # New (Empty).
	pub const fn new() -> Self { Self(Vec::new()) }

	#[must_use]
	/// # Contains?
	pub fn contains(&self, name: &str) -> bool {
		self.0.iter().any(|v| v.eq_ignore_ascii_case(name))
	}

	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool { self.0.is_empty() }

	/// # Iterate.
	pub fn iter(&self) -> impl Iterator<Item=&str> { self.0.iter().map(String::as_str) }
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Script Type List.
///
/// MIME types (or bare keywords like `module`), stored lowercase.
pub struct ScriptTypeList(Vec<String>);

impl FromStr for ScriptTypeList {
	type Err = SettingsError;

	fn from_str(src: &str) -> Result<Self, Self::Err> {
		let mut out = Vec::new();
		for kind in split_list(src) {
			if kind.bytes().any(|b| b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b'<' | b'>' | b',')) {
				return Err(SettingsError::ScriptTypeList);
			}
			let kind = kind.to_ascii_lowercase();
			if ! out.contains(&kind) { out.push(kind); }
		}
		Ok(Self(out))
	}
}

impl ScriptTypeList {
	#[must_use]
	/// # Contains?
	pub fn contains(&self, kind: &str) -> bool {
		let kind = kind.trim();
		self.0.iter().any(|v| v.eq_ignore_ascii_case(kind))
	}

	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool { self.0.is_empty() }
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Short Doctype List.
///
/// Additional formal public identifiers whose doctypes may be rewritten to
/// `<!DOCTYPE html>`.
pub struct ShortDoctypeList(Vec<FormalPublicId>);

impl FromStr for ShortDoctypeList {
	type Err = SettingsError;

	fn from_str(src: &str) -> Result<Self, Self::Err> {
		split_list(src)
			.map(|v| FormalPublicId::parse(unquote(v)).ok_or(SettingsError::ShortDoctypeList))
			.collect::<Result<Vec<_>, _>>()
			.map(Self)
	}
}

impl ShortDoctypeList {
	#[must_use]
	/// # Contains?
	pub fn contains(&self, fpi: &FormalPublicId) -> bool {
		self.0.iter().any(|v| v == fpi)
	}

	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool { self.0.is_empty() }
}



#[derive(Debug, Clone, Eq, PartialEq)]
#[expect(clippy::struct_excessive_bools, reason = "It is what it is.")]
/// # Common (HTML/XHTML) Settings.
pub struct CommonSettings {
	/// # Whitespace Minification Mode.
	pub whitespace_minification_mode: WhitespaceMinificationMode,

	/// # Collapse Whitespace Runs With Line Breaks to a Line Break.
	pub preserve_new_lines: bool,

	/// # Leave `{{ … }}` Interiors Alone.
	pub preserve_template_whitespace: bool,

	/// # Remove Comments.
	pub remove_html_comments: bool,

	/// # Strip `<!-- -->` Wrappers From Scripts/Styles.
	pub remove_html_comments_from_scripts_and_styles: bool,

	/// # Strip `<![CDATA[ ]]>` Wrappers From Scripts/Styles.
	pub remove_cdata_sections_from_scripts_and_styles: bool,

	/// # Shorten Doctype.
	pub use_short_doctype: bool,

	/// # Additional Shortenable Doctypes.
	pub custom_short_doctype_list: ShortDoctypeList,

	/// # Rewrite Content-Type Metas as `<meta charset>`.
	pub use_meta_charset_tag: bool,

	/// # Remove Contentless Elements.
	pub remove_tags_without_content: bool,

	/// # Remove Empty Attributes.
	pub remove_empty_attributes: bool,

	/// # Remove Redundant Attributes.
	pub remove_redundant_attributes: bool,

	/// # Remove JS `type` Attributes.
	pub remove_js_type_attributes: bool,

	/// # Remove CSS `type` Attributes.
	pub remove_css_type_attributes: bool,

	/// # Attributes Never to Remove.
	pub preservable_attribute_list: PreservableAttributeList,

	/// # Strip `http:` From URL Attributes.
	pub remove_http_protocol_from_attributes: bool,

	/// # Strip `https:` From URL Attributes.
	pub remove_https_protocol_from_attributes: bool,

	/// # Strip `javascript:` From Event Handlers.
	pub remove_js_protocol_from_attributes: bool,

	/// # Minify `<style>` Content.
	pub minify_embedded_css_code: bool,

	/// # Minify `style=""` Content.
	pub minify_inline_css_code: bool,

	/// # Minify `<script>` Content.
	pub minify_embedded_js_code: bool,

	/// # Minify Event Handlers and `javascript:` URLs.
	pub minify_inline_js_code: bool,

	/// # Minify JSON Scripts.
	pub minify_embedded_json_data: bool,

	/// # Additional JS Script Types.
	pub processable_script_type_list: ScriptTypeList,

	/// # Script Types Holding Markup Templates.
	pub markup_template_type_list: ScriptTypeList,

	/// # Minify Knockout `data-bind` Expressions.
	pub minify_knockout_binding_expressions: bool,

	/// # Minify AngularJS Expressions.
	pub minify_angular_binding_expressions: bool,

	/// # Additional AngularJS Expression Directives.
	pub custom_angular_directive_list: TagList,

	/// # New Line Style.
	pub new_line_style: NewLineStyle,
}

impl Default for CommonSettings {
	fn default() -> Self {
		Self {
			whitespace_minification_mode: WhitespaceMinificationMode::Safe,
			preserve_new_lines: false,
			preserve_template_whitespace: true,
			remove_html_comments: true,
			remove_html_comments_from_scripts_and_styles: true,
			remove_cdata_sections_from_scripts_and_styles: true,
			use_short_doctype: true,
			custom_short_doctype_list: ShortDoctypeList::default(),
			use_meta_charset_tag: true,
			remove_tags_without_content: false,
			remove_empty_attributes: true,
			remove_redundant_attributes: false,
			remove_js_type_attributes: true,
			remove_css_type_attributes: true,
			preservable_attribute_list: PreservableAttributeList::default(),
			remove_http_protocol_from_attributes: false,
			remove_https_protocol_from_attributes: false,
			remove_js_protocol_from_attributes: true,
			minify_embedded_css_code: true,
			minify_inline_css_code: true,
			minify_embedded_js_code: true,
			minify_inline_js_code: true,
			minify_embedded_json_data: true,
			processable_script_type_list: ScriptTypeList::default(),
			markup_template_type_list: ScriptTypeList::default(),
			minify_knockout_binding_expressions: false,
			minify_angular_binding_expressions: false,
			custom_angular_directive_list: TagList::default(),
			new_line_style: NewLineStyle::Auto,
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # HTML Settings.
pub struct HtmlSettings {
	/// # Shared Settings.
	pub common: CommonSettings,

	/// # Remove Optional End Tags.
	pub remove_optional_end_tags: bool,

	/// # Optional End Tags to Keep Regardless.
	pub preservable_optional_tag_list: TagList,

	/// # Collapse Boolean Attributes.
	pub collapse_boolean_attributes: bool,

	/// # Attribute Quotes Removal Mode.
	pub attribute_quotes_removal_mode: AttributeQuotesRemovalMode,

	/// # Void Element Rendering.
	pub empty_tag_render_mode: EmptyTagRenderMode,
}

impl Default for HtmlSettings {
	fn default() -> Self {
		Self {
			common: CommonSettings::default(),
			remove_optional_end_tags: true,
			preservable_optional_tag_list: TagList::default(),
			collapse_boolean_attributes: true,
			attribute_quotes_removal_mode: AttributeQuotesRemovalMode::Html5,
			empty_tag_render_mode: EmptyTagRenderMode::NoSlash,
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # XHTML Settings.
pub struct XhtmlSettings {
	/// # Shared Settings.
	pub common: CommonSettings,

	/// # Render Empty Tags as `<br />`.
	///
	/// When `false`, they're rendered as `<br/>`.
	pub render_empty_tags_with_space: bool,

	/// # Attribute Quotes Style.
	pub attribute_quotes_style: AttributeQuotesStyle,
}

impl Default for XhtmlSettings {
	fn default() -> Self {
		Self {
			common: CommonSettings {
				use_short_doctype: false,
				use_meta_charset_tag: false,
				..CommonSettings::default()
			},
			render_empty_tags_with_space: true,
			attribute_quotes_style: AttributeQuotesStyle::Auto,
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[expect(clippy::struct_excessive_bools, reason = "It is what it is.")]
/// # XML Settings.
pub struct XmlSettings {
	/// # Minify Whitespace.
	pub minify_whitespace: bool,

	/// # Collapse Whitespace Runs With Line Breaks to a Line Break.
	pub preserve_new_lines: bool,

	/// # Remove Comments.
	pub remove_xml_comments: bool,

	/// # Render Empty Tags as `<a />`.
	pub render_empty_tags_with_space: bool,

	/// # Collapse `<a></a>` to `<a/>`.
	pub collapse_tags_without_content: bool,

	/// # Attribute Quotes Style.
	pub attribute_quotes_style: AttributeQuotesStyle,

	/// # New Line Style.
	pub new_line_style: NewLineStyle,
}

impl Default for XmlSettings {
	fn default() -> Self {
		Self {
			minify_whitespace: true,
			preserve_new_lines: false,
			remove_xml_comments: true,
			render_empty_tags_with_space: false,
			collapse_tags_without_content: false,
			attribute_quotes_style: AttributeQuotesStyle::Auto,
			new_line_style: NewLineStyle::Auto,
		}
	}
}



/// # Split List.
///
/// Split a comma-separated list, trimming entries and skipping empty ones.
fn split_list(src: &str) -> impl Iterator<Item=&str> {
	src.split(',').map(str::trim).filter(|v| ! v.is_empty())
}

/// # Is Valid Name?
fn is_name(src: &str) -> bool {
	! src.is_empty() &&
	! src.bytes().any(|b| b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b'<' | b'>' | b'=' | b'[' | b']' | b'/'))
}

/// # Strip Quotes.
fn unquote(src: &str) -> &str {
	src.strip_prefix('"').and_then(|v| v.strip_suffix('"'))
		.or_else(|| src.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
		.unwrap_or(src)
}
