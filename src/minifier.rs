/*!
# MarkMinL: Minifiers.

These are the public entry points. Each wraps a settings object (and, for
the HTML family, the embedded code minifiers) and turns documents into
`MarkupMinificationResult`s.

A minifier holds no state beyond its configuration, so a single instance can
be shared freely, across threads and all.
*/

use crate::{
	CssMinifier,
	diagnostics::Diagnostics,
	ErrorCategory,
	JsMinifier,
	Logger,
	MinificationErrorInfo,
	MinificationStatistics,
	minify::{
		Flavor,
		Pipeline,
	},
	NullCssMinifier,
	NullJsMinifier,
	NullLogger,
	ser,
	settings::{
		HtmlSettings,
		native_line_break,
		NewLineStyle,
		XhtmlSettings,
		XmlSettings,
	},
	source::SourceCode,
};
use std::{
	fmt,
	time::Instant,
};



#[derive(Debug, Clone, Default, PartialEq)]
/// # Markup Minification Result.
///
/// If `errors` is empty, `minified_content` can be used in place of the
/// original. If not, it is best-effort at most, and empty entirely if the
/// document could not be parsed.
pub struct MarkupMinificationResult {
	/// # Minified Content.
	pub minified_content: String,

	/// # Errors.
	pub errors: Vec<MinificationErrorInfo>,

	/// # Warnings.
	pub warnings: Vec<MinificationErrorInfo>,

	/// # Statistics.
	///
	/// These are only generated on request, and only for error-free runs.
	pub statistics: Option<MinificationStatistics>,
}

impl MarkupMinificationResult {
	#[must_use]
	/// # Is Okay?
	///
	/// Returns `true` if there were no errors.
	pub fn is_ok(&self) -> bool { self.errors.is_empty() }
}



/// # Markup Minifier (Shared Bits).
macro_rules! markup_minifier {
	($ty:ident, $settings:ident, $flavor:ident, $title:literal) => (
		#[doc = concat!("# ", $title, " Minifier.")]
		///
		/// Embedded CSS and JS are passed through unchanged unless real
		/// minifiers are supplied via `with_css_minifier` and
		/// `with_js_minifier`.
		pub struct $ty {
			/// # Settings.
			settings: $settings,

			/// # CSS Minifier.
			css: Box<dyn CssMinifier>,

			/// # JS Minifier.
			js: Box<dyn JsMinifier>,

			/// # Logger.
			logger: Box<dyn Logger>,
		}

		impl Default for $ty {
			#[inline]
			fn default() -> Self { Self::new($settings::default()) }
		}

		impl fmt::Debug for $ty {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.debug_struct(stringify!($ty))
					.field("settings", &self.settings)
					.finish_non_exhaustive()
			}
		}

		impl $ty {
			#[must_use]
			/// # New.
			pub fn new(settings: $settings) -> Self {
				Self {
					settings,
					css: Box::new(NullCssMinifier),
					js: Box::new(NullJsMinifier),
					logger: Box::new(NullLogger),
				}
			}

			#[must_use]
			/// # With CSS Minifier.
			pub fn with_css_minifier<M>(mut self, minifier: M) -> Self
			where M: CssMinifier + 'static {
				self.css = Box::new(minifier);
				self
			}

			#[must_use]
			/// # With JS Minifier.
			pub fn with_js_minifier<M>(mut self, minifier: M) -> Self
			where M: JsMinifier + 'static {
				self.js = Box::new(minifier);
				self
			}

			#[must_use]
			/// # With Logger.
			pub fn with_logger<L>(mut self, logger: L) -> Self
			where L: Logger + 'static {
				self.logger = Box::new(logger);
				self
			}

			#[must_use]
			/// # Settings.
			pub const fn settings(&self) -> &$settings { &self.settings }

			#[must_use]
			#[inline]
			/// # Minify.
			pub fn minify(&self, content: &str) -> MarkupMinificationResult {
				self.minify_with(content, "", false)
			}

			#[must_use]
			/// # Minify (With Options).
			///
			/// The `file_context` (a path or URL) is passed along to the logger
			/// to help identify the document.
			pub fn minify_with(
				&self,
				content: &str,
				file_context: &str,
				generate_statistics: bool,
			) -> MarkupMinificationResult {
				let pipeline = Pipeline {
					flavor: Flavor::$flavor(&self.settings),
					css: self.css.as_ref(),
					js: self.js.as_ref(),
				};
				execute(
					&pipeline,
					self.logger.as_ref(),
					self.settings.common.new_line_style,
					content,
					file_context,
					generate_statistics,
				)
			}
		}
	);
}

markup_minifier!(HtmlMinifier, HtmlSettings, Html, "HTML");
markup_minifier!(XhtmlMinifier, XhtmlSettings, Xhtml, "XHTML");



/// # XML Minifier.
pub struct XmlMinifier {
	/// # Settings.
	settings: XmlSettings,

	/// # Logger.
	logger: Box<dyn Logger>,
}

impl Default for XmlMinifier {
	#[inline]
	fn default() -> Self { Self::new(XmlSettings::default()) }
}

impl fmt::Debug for XmlMinifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("XmlMinifier")
			.field("settings", &self.settings)
			.finish_non_exhaustive()
	}
}

impl XmlMinifier {
	#[must_use]
	/// # New.
	pub fn new(settings: XmlSettings) -> Self {
		Self { settings, logger: Box::new(NullLogger) }
	}

	#[must_use]
	/// # With Logger.
	pub fn with_logger<L>(mut self, logger: L) -> Self
	where L: Logger + 'static {
		self.logger = Box::new(logger);
		self
	}

	#[must_use]
	/// # Settings.
	pub const fn settings(&self) -> &XmlSettings { &self.settings }

	#[must_use]
	#[inline]
	/// # Minify.
	pub fn minify(&self, content: &str) -> MarkupMinificationResult {
		self.minify_with(content, "", false)
	}

	#[must_use]
	/// # Minify (With Options).
	pub fn minify_with(
		&self,
		content: &str,
		file_context: &str,
		generate_statistics: bool,
	) -> MarkupMinificationResult {
		let pipeline = Pipeline {
			flavor: Flavor::Xml(&self.settings),
			css: &NullCssMinifier,
			js: &NullJsMinifier,
		};
		execute(
			&pipeline,
			self.logger.as_ref(),
			self.settings.new_line_style,
			content,
			file_context,
			generate_statistics,
		)
	}
}



/// # Execute.
///
/// Run the pipeline, normalize the line breaks, and tally up the results.
fn execute(
	pipeline: &Pipeline<'_>,
	logger: &dyn Logger,
	new_line_style: NewLineStyle,
	content: &str,
	file_context: &str,
	generate_statistics: bool,
) -> MarkupMinificationResult {
	let now = Instant::now();
	let src = SourceCode::new(content);
	let mut diag = Diagnostics::default();

	let minified_content = match pipeline.run(&src, &mut diag) {
		Ok(out) => {
			let style = new_line_style.line_break()
				.or_else(|| ser::detect_line_break(content))
				.unwrap_or_else(native_line_break);
			ser::normalize_line_breaks(out, style)
		},
		Err(e) => {
			diag.errors.insert(0, e.into_info(pipeline.flavor.parsing_category()));
			String::new()
		},
	};

	let statistics =
		if generate_statistics && ! diag.has_errors() {
			Some(MinificationStatistics::new(content, &minified_content, now.elapsed()))
		}
		else { None };

	for e in &diag.errors {
		logger.error(e.category, &e.message, file_context, e.line, e.column, &e.source_fragment);
	}
	for w in &diag.warnings {
		logger.warn(w.category, &w.message, file_context, w.line, w.column, &w.source_fragment);
	}
	if let Some(stats) = &statistics {
		let category = match pipeline.flavor {
			Flavor::Html(_) | Flavor::Xhtml(_) => ErrorCategory::HtmlMinification,
			Flavor::Xml(_) => ErrorCategory::XmlMinification,
		};
		logger.info(category, "Minification complete.", file_context, Some(stats));
	}

	MarkupMinificationResult {
		minified_content,
		errors: diag.errors,
		warnings: diag.warnings,
		statistics,
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		FormalPublicId,
		FpiPrefix,
		WhitespaceMinificationMode,
	};
	use std::sync::{
		Arc,
		Mutex,
	};

	/// # Recording Logger.
	#[derive(Default, Clone)]
	struct Recorder(Arc<Mutex<Vec<String>>>);

	impl Recorder {
		fn push(&self, line: String) {
			if let Ok(mut v) = self.0.lock() { v.push(line); }
		}

		fn lines(&self) -> Vec<String> {
			self.0.lock().map(|v| v.clone()).unwrap_or_default()
		}
	}

	impl Logger for Recorder {
		fn error(&self, c: ErrorCategory, m: &str, f: &str, l: usize, col: usize, _: &str) {
			self.push(format!("error {c} {m} {f}:{l}:{col}"));
		}

		fn warn(&self, c: ErrorCategory, m: &str, f: &str, l: usize, col: usize, _: &str) {
			self.push(format!("warn {c} {m} {f}:{l}:{col}"));
		}

		fn info(&self, c: ErrorCategory, m: &str, f: &str, s: Option<&MinificationStatistics>) {
			self.push(format!("info {c} {m} {f} {}", s.is_some()));
		}
	}

	fn html(mode: WhitespaceMinificationMode) -> HtmlMinifier {
		let mut settings = HtmlSettings::default();
		settings.common.whitespace_minification_mode = mode;
		HtmlMinifier::new(settings)
	}

	#[test]
	fn t_idempotent() {
		for mode in [
			WhitespaceMinificationMode::None,
			WhitespaceMinificationMode::Safe,
			WhitespaceMinificationMode::Medium,
			WhitespaceMinificationMode::Aggressive,
		] {
			let minifier = html(mode);
			for raw in [
				"<!DOCTYPE html>\n<html>\n<head>\n<title> Test </title>\n</head>\n<body>\n<ul>\n  <li> One </li>\n  <li>Two</li>\n</ul>\n<p>Some <em>text</em>.</p>\n</body>\n</html>\n",
				"<div>\n  <p>A</p>\n  <p>B <b> C </b></p>\n</div>\n<!-- note -->\n<span> x </span>",
				"<table>\n<tr><td> 1 </td><td>2</td></tr>\n</table>",
			] {
				let once = minifier.minify(raw);
				assert!(once.is_ok(), "{mode} {raw:?}");
				let twice = minifier.minify(&once.minified_content);
				assert!(twice.is_ok(), "{mode} {raw:?}");
				assert_eq!(once.minified_content, twice.minified_content, "{mode} {raw:?}");
			}
		}
	}

	#[test]
	fn t_whitespace_invariant() {
		let raw = "<div>  <pre>  a  \n  b </pre>  <textarea>  x  </textarea>\n<script>  var  a = 1;  </script>  <style>  a  {  }  </style>  </div>";
		for mode in [
			WhitespaceMinificationMode::None,
			WhitespaceMinificationMode::Safe,
			WhitespaceMinificationMode::Medium,
			WhitespaceMinificationMode::Aggressive,
		] {
			let out = html(mode).minify(raw).minified_content;
			for part in [
				"<pre>  a  \n  b </pre>",
				"<textarea>  x  </textarea>",
				"<script>  var  a = 1;  </script>",
				"<style>  a  {  }  </style>",
			] {
				assert!(out.contains(part), "{mode}: {part:?} missing from {out:?}");
			}
		}

		let out = XmlMinifier::default().minify("<a>\n  <![CDATA[  x  ]]>\n</a>").minified_content;
		assert_eq!(out, "<a><![CDATA[  x  ]]></a>");
	}

	#[test]
	fn t_doctype_invariant() {
		let raw = "-//W3C//DTD HTML 4.01//EN";
		let fpi = FormalPublicId::parse(raw).expect("Invalid FPI.");
		assert_eq!(fpi.prefix, FpiPrefix::Unregistered);
		assert_eq!(fpi.organization, "W3C");
		assert_eq!(fpi.kind, "DTD");
		assert_eq!(fpi.description, "HTML 4.01");
		assert_eq!(fpi.language, "EN");
		assert_eq!(fpi.version, None);
		assert_eq!(fpi.to_string(), raw);

		// Left alone, the whole declaration survives.
		let mut settings = HtmlSettings::default();
		settings.common.use_short_doctype = false;
		let doctype = "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">";
		let res = HtmlMinifier::new(settings).minify(doctype);
		assert_eq!(res.minified_content, doctype);

		// Or shortened.
		let res = HtmlMinifier::default().minify(doctype);
		assert_eq!(res.minified_content, "<!DOCTYPE html>");
	}

	#[test]
	fn t_quoting_invariant() {
		let raw = "<person author=\"Vasya &quot;Monster&quot; Pupkin\"/>";
		let res = XmlMinifier::default().minify(raw);
		assert_eq!(res.minified_content, "<person author=\"Vasya &#34;Monster&#34; Pupkin\"/>");

		let res = XhtmlMinifier::default().minify("<p title=\"Vasya &quot;Monster&quot; Pupkin\">x</p>");
		assert_eq!(res.minified_content, "<p title=\"Vasya &#34;Monster&#34; Pupkin\">x</p>");

		// Mixed quotes are escaped, not requoted.
		let res = XmlMinifier::default().minify("<a b='it&apos;s \"x\"'/>");
		assert_eq!(res.minified_content, "<a b='it&#39;s \"x\"'/>");
	}

	#[test]
	fn t_collapse() {
		let settings = XmlSettings {
			collapse_tags_without_content: true,
			..XmlSettings::default()
		};
		assert_eq!(XmlMinifier::new(settings).minify("<node></node>").minified_content, "<node/>");
		assert_eq!(XmlMinifier::default().minify("<node></node>").minified_content, "<node></node>");

		let settings = XmlSettings {
			collapse_tags_without_content: true,
			render_empty_tags_with_space: true,
			..XmlSettings::default()
		};
		assert_eq!(XmlMinifier::new(settings).minify("<a><b/></a>").minified_content, "<a><b /></a>");
	}

	#[test]
	fn t_angular() {
		let raw = "<div class=\" label  done-{{ todo.done }} \">{{todo.text}}</div>";
		let res = HtmlMinifier::default().minify(raw);
		assert_eq!(res.minified_content, "<div class=\"label done-{{ todo.done }}\">{{todo.text}}</div>");

		let mut settings = HtmlSettings::default();
		settings.common.minify_angular_binding_expressions = true;
		let res = HtmlMinifier::new(settings.clone()).minify(raw);
		assert_eq!(res.minified_content, "<div class=\"label done-{{todo.done}}\">{{todo.text}}</div>");

		// Literal and interpolated directive values keep their spacing.
		let raw = "<div ng-attr-title=\"Hello   World {{ a + b }}\" ng-switch-when=\"a   b\" ng-if=\"a  &&  b\">x</div>";
		let res = HtmlMinifier::new(settings).minify(raw);
		assert!(res.is_ok());
		assert_eq!(
			res.minified_content,
			"<div ng-attr-title=\"Hello   World {{a+b}}\" ng-switch-when=\"a   b\" ng-if=a&&b>x</div>",
		);
	}

	#[test]
	fn t_fatal() {
		let logger = Recorder::default();
		let res = HtmlMinifier::default()
			.with_logger(logger.clone())
			.minify_with("<!DOCTYPE HTML PUBLIC>", "a.html", true);

		assert!(res.minified_content.is_empty());
		assert!(res.statistics.is_none());
		assert_eq!(res.errors.len(), 1);

		let err = &res.errors[0];
		assert_eq!(err.category, ErrorCategory::HtmlParsing);
		assert_eq!(err.message, "Expected a formal public identifier but the doctype ended.");
		assert_eq!((err.line, err.column), (1, 22));

		assert_eq!(
			logger.lines(),
			["error HTML_PARSING_ERROR Expected a formal public identifier but the doctype ended. a.html:1:22"],
		);
	}

	#[test]
	fn t_coordinates() {
		let res = XmlMinifier::default().minify("<a>\n  <b>\n</a>");
		assert!(res.minified_content.is_empty());

		let err = &res.errors[0];
		assert_eq!(err.category, ErrorCategory::XmlParsing);
		assert_eq!((err.line, err.column), (3, 1));
		assert_eq!(err.source_fragment, "Line 2:   <b>\nLine 3: </a>\n--------^");
	}

	#[test]
	fn t_statistics() {
		let logger = Recorder::default();
		let res = HtmlMinifier::default()
			.with_logger(logger.clone())
			.minify_with("<p>  Hello  </p>\n<p> World </p>", "b.html", true);
		assert!(res.is_ok());

		let stats = res.statistics.expect("Missing statistics.");
		assert_eq!(stats.original_size(), 31);
		assert_eq!(stats.minified_size(), res.minified_content.len() as u64);
		assert!(stats.saved() > 0);
		assert_eq!(logger.lines(), ["info HTML_MINIFICATION_ERROR Minification complete. b.html true"]);

		// Not unless asked.
		assert!(HtmlMinifier::default().minify("<p>x</p>").statistics.is_none());
	}

	#[test]
	fn t_new_lines() {
		let mut settings = HtmlSettings::default();
		settings.common.preserve_new_lines = true;
		settings.common.new_line_style = NewLineStyle::Windows;
		let res = HtmlMinifier::new(settings).minify("<div>\n<p>a</p>\n</div><pre>x\ny</pre>");
		assert_eq!(res.minified_content, "<div>\r\n<p>a</p>\r\n</div><pre>x\r\ny</pre>");

		// Auto follows the source.
		let res = XmlMinifier::new(XmlSettings {
			preserve_new_lines: true,
			..XmlSettings::default()
		}).minify("<a>\r\n<b>x</b>\n</a>");
		assert_eq!(res.minified_content, "<a>\r\n<b>x</b>\r\n</a>");
	}
}
