/*!
# MarkMinL: Minification Pipeline.

The passes, in order:

1. Parse the source into a tree;
2. Minify template expressions (HTML/XHTML);
3. Remove comments;
4. Minify whitespace;
5. Minify attributes (HTML/XHTML);
6. Minify tags;
7. Minify embedded code (HTML/XHTML);
8. Serialize.

New lines are normalized afterwards by the public minifiers, since nested
fragments (conditional comments, markup templates) run through this same
pipeline and shouldn't be normalized twice.
*/

pub(crate) mod attribute;
pub(crate) mod code;
pub(crate) mod expression;
pub(crate) mod tag;
pub(crate) mod whitespace;

use crate::{
	CssMinifier,
	diagnostics::Diagnostics,
	dom::{
		self,
		Document,
		QuoteTally,
	},
	ErrorCategory,
	JsMinifier,
	MarkupParsingError,
	parser::Syntax,
	ser::{
		self,
		QuoteMode,
		SerializeOptions,
	},
	settings::{
		CommonSettings,
		HtmlSettings,
		WhitespaceMinificationMode,
		XhtmlSettings,
		XmlSettings,
	},
	source::SourceCode,
};
use attribute::AttributeOptions;
use expression::ExpressionOptions;
use whitespace::WhitespaceOptions;



#[derive(Debug, Clone, Copy)]
/// # Flavor.
pub(crate) enum Flavor<'a> {
	/// # HTML.
	Html(&'a HtmlSettings),

	/// # XHTML.
	Xhtml(&'a XhtmlSettings),

	/// # XML.
	Xml(&'a XmlSettings),
}

impl Flavor<'_> {
	#[must_use]
	/// # Syntax.
	pub(crate) const fn syntax(self) -> Syntax {
		match self {
			Self::Html(_) => Syntax::Html,
			Self::Xhtml(_) => Syntax::Xhtml,
			Self::Xml(_) => Syntax::Xml,
		}
	}

	#[must_use]
	/// # Parsing Error Category.
	pub(crate) const fn parsing_category(self) -> ErrorCategory {
		match self {
			Self::Html(_) => ErrorCategory::HtmlParsing,
			Self::Xhtml(_) => ErrorCategory::XhtmlParsing,
			Self::Xml(_) => ErrorCategory::XmlParsing,
		}
	}

	#[must_use]
	/// # Serialization Options.
	fn serialize_options(self, quotes: QuoteTally) -> SerializeOptions {
		match self {
			Self::Html(s) => {
				let void_close = s.empty_tag_render_mode.close();
				SerializeOptions {
					syntax: Syntax::Html,
					quotes: QuoteMode::html(s.attribute_quotes_removal_mode),
					void_close,
					self_close: if void_close == ">" { "/>" } else { void_close },
				}
			},
			Self::Xhtml(s) => {
				let close = if s.render_empty_tags_with_space { " />" } else { "/>" };
				SerializeOptions {
					syntax: Syntax::Xhtml,
					quotes: QuoteMode::xml(s.attribute_quotes_style, quotes.majority()),
					void_close: close,
					self_close: close,
				}
			},
			Self::Xml(s) => {
				let close = if s.render_empty_tags_with_space { " />" } else { "/>" };
				SerializeOptions {
					syntax: Syntax::Xml,
					quotes: QuoteMode::xml(s.attribute_quotes_style, quotes.majority()),
					void_close: close,
					self_close: close,
				}
			},
		}
	}
}



/// # Pipeline.
///
/// Everything needed to minify one document (or fragment).
pub(crate) struct Pipeline<'a> {
	/// # Flavor and Settings.
	pub(crate) flavor: Flavor<'a>,

	/// # CSS Minifier.
	pub(crate) css: &'a dyn CssMinifier,

	/// # JS Minifier.
	pub(crate) js: &'a dyn JsMinifier,
}

impl Pipeline<'_> {
	/// # Run.
	///
	/// Minify the source, returning the serialized result. Recoverable
	/// problems are added to `diag`.
	///
	/// ## Errors
	///
	/// If the markup cannot be parsed, an error is returned.
	pub(crate) fn run(&self, src: &SourceCode<'_>, diag: &mut Diagnostics)
	-> Result<String, MarkupParsingError> {
		let parsed = dom::parse(src, self.flavor.syntax())?;
		let category = self.flavor.parsing_category();
		for (message, offset) in parsed.warnings {
			diag.warn(category, message, src, offset);
		}

		let mut doc = parsed.document;
		match self.flavor {
			Flavor::Html(s) => self.run_html(&mut doc, &s.common, src, diag),
			Flavor::Xhtml(s) => self.run_html(&mut doc, &s.common, src, diag),
			Flavor::Xml(s) => run_xml(&mut doc, s),
		}

		Ok(ser::serialize(&doc, &self.flavor.serialize_options(parsed.quotes)))
	}

	/// # Run (Fragment).
	///
	/// Minify a nested fragment, e.g. the content of a conditional comment.
	/// The diagnostics are relative to the fragment.
	pub(crate) fn run_fragment(&self, content: &str)
	-> (Result<String, MarkupParsingError>, Diagnostics) {
		let src = SourceCode::new(content);
		let mut diag = Diagnostics::default();
		let res = self.run(&src, &mut diag);
		(res, diag)
	}

	/// # HTML/XHTML Passes.
	fn run_html(
		&self,
		doc: &mut Document,
		common: &CommonSettings,
		src: &SourceCode<'_>,
		diag: &mut Diagnostics,
	) {
		expression::minify(
			doc,
			ExpressionOptions {
				knockout: common.minify_knockout_binding_expressions,
				angular: common.minify_angular_binding_expressions,
				directives: &common.custom_angular_directive_list,
			},
			src,
			diag,
		);

		if common.remove_html_comments { tag::remove_comments(doc, false); }

		let ws = WhitespaceOptions {
			mode: common.whitespace_minification_mode,
			lines: common.preserve_new_lines,
			templates: common.preserve_template_whitespace,
			xml: false,
		};
		whitespace::minify(doc, ws);

		attribute::minify(
			doc,
			AttributeOptions {
				common,
				collapse_booleans: matches!(self.flavor, Flavor::Html(s) if s.collapse_boolean_attributes),
			},
		);

		if common.use_short_doctype {
			tag::shorten_doctype(doc, &common.custom_short_doctype_list);
		}
		if common.use_meta_charset_tag { tag::meta_charset(&mut doc.children); }

		// Removing elements can leave text to be merged and re-minified.
		if common.remove_tags_without_content && tag::remove_empty(&mut doc.children) {
			dom::merge_text(&mut doc.children);
			whitespace::minify(doc, ws);
		}

		match self.flavor {
			Flavor::Html(s) => tag::optional_end_tags(
				doc,
				s.remove_optional_end_tags,
				&s.preservable_optional_tag_list,
			),
			Flavor::Xhtml(_) | Flavor::Xml(_) => tag::explicit_end_tags(&mut doc.children),
		}

		code::minify(doc, self, common, src, diag);
	}
}

/// # XML Passes.
fn run_xml(doc: &mut Document, settings: &XmlSettings) {
	if settings.remove_xml_comments { tag::remove_comments(doc, true); }

	if settings.minify_whitespace {
		whitespace::minify(doc, WhitespaceOptions {
			mode: WhitespaceMinificationMode::Safe,
			lines: settings.preserve_new_lines,
			templates: false,
			xml: true,
		});
	}

	if settings.collapse_tags_without_content {
		tag::collapse_empty(&mut doc.children, settings.minify_whitespace);
	}
}
