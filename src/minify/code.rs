/*!
# MarkMinL: Embedded Code.

Hand `<style>` and `<script>` bodies, `style` attributes, event handlers,
and `javascript:` URLs off to the configured CSS/JS minifiers, splicing the
results back in when (and only when) they come back error-free.

JSON data blocks are compacted in-house, while markup templates and hidden
conditional comments are run back through the markup pipeline as fragments.

Whatever the collaborators report is translated from fragment coordinates
to document coordinates before being recorded.
*/

use crate::{
	CodeMinificationResult,
	diagnostics::Diagnostics,
	dom::{
		Attribute,
		AttributeKind,
		Document,
		Element,
		Node,
	},
	ErrorCategory,
	MinificationErrorInfo,
	minify::{
		attribute::strip_prefix_ci,
		Pipeline,
		tag::conditional_body,
	},
	settings::CommonSettings,
	source::{
		SourceCode,
		SourceCoordinates,
	},
	spec,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Embedded Language.
enum Lang {
	/// # Stylesheet.
	Css,

	/// # Script.
	Js,

	/// # JSON Data.
	Json,
}

impl Lang {
	#[must_use]
	/// # Error Category.
	const fn category(self) -> ErrorCategory {
		match self {
			Self::Css => ErrorCategory::CssMinification,
			Self::Js => ErrorCategory::JsMinification,
			Self::Json => ErrorCategory::JsonMinification,
		}
	}

	#[must_use]
	/// # Closing Tag.
	///
	/// Minified code containing this would end its element early.
	const fn terminator(self) -> &'static str {
		match self {
			Self::Css => "</style",
			Self::Js | Self::Json => "</script",
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Wrapper Kind.
enum Wrapper {
	/// # `<!-- … -->`.
	Comment,

	/// # `<![CDATA[ … ]]>`.
	Cdata,

	/// # `//<![CDATA[ … //]]>` or `/*<![CDATA[*/ … /*]]>*/`.
	EscapedCdata,
}

impl Wrapper {
	/// # Open/Close Variants.
	///
	/// Longest first, so the escaped forms win.
	const VARIANTS: [(&'static str, &'static str, Self); 5] = [
		("/*<![CDATA[*/", "/*]]>*/", Self::EscapedCdata),
		("//<![CDATA[", "//]]>", Self::EscapedCdata),
		("<![CDATA[", "]]>", Self::Cdata),
		("<!--", "//-->", Self::Comment),
		("<!--", "-->", Self::Comment),
	];

	#[must_use]
	/// # Unwrap.
	///
	/// Return the wrapper kind, the inner code, and the inner code's offset
	/// within `code`.
	fn unwrap(code: &str) -> Option<(Self, &str, usize)> {
		let lead = code.len() - code.trim_start().len();
		let trimmed = code.trim();
		Self::VARIANTS.iter().find_map(|&(open, close, kind)| {
			let inner = trimmed.strip_prefix(open)?.strip_suffix(close)?;
			Some((kind, inner, lead + open.len()))
		})
	}

	#[must_use]
	/// # Rewrap.
	///
	/// Wrap (minified) code back up. The escaped forms need line breaks to
	/// keep the code out of the single-line comments.
	fn wrap(self, lang: Lang, code: &str) -> String {
		let (open, close) = match (self, lang) {
			(Self::Comment, Lang::Css) => ("<!--", "-->"),
			(Self::Comment, _) => ("<!--\n", "\n//-->"),
			(Self::Cdata, _) => ("<![CDATA[", "]]>"),
			(Self::EscapedCdata, Lang::Css) => ("/*<![CDATA[*/", "/*]]>*/"),
			(Self::EscapedCdata, _) => ("//<![CDATA[\n", "\n//]]>"),
		};
		let mut out = String::with_capacity(open.len() + code.len() + close.len());
		out.push_str(open);
		out.push_str(code);
		out.push_str(close);
		out
	}
}



/// # Code Bridge.
struct Bridge<'a, 'b> {
	/// # Pipeline.
	pipeline: &'a Pipeline<'a>,

	/// # Settings.
	common: &'a CommonSettings,

	/// # Source.
	src: &'a SourceCode<'b>,

	/// # Diagnostics.
	diag: &'a mut Diagnostics,
}

/// # Minify Embedded Code.
pub(crate) fn minify(
	doc: &mut Document,
	pipeline: &Pipeline<'_>,
	common: &CommonSettings,
	src: &SourceCode<'_>,
	diag: &mut Diagnostics,
) {
	let mut bridge = Bridge { pipeline, common, src, diag };
	bridge.walk(&mut doc.children);
}

impl Bridge<'_, '_> {
	/// # Walk.
	fn walk(&mut self, nodes: &mut [Node]) {
		for node in nodes {
			match node {
				Node::Element(el) => {
					self.attributes(el);
					if el.is("style") { self.style(el); }
					else if el.is("script") { self.script(el); }
					else if ! el.is_raw() { self.walk(&mut el.children); }
				},
				Node::Comment { content, offset } =>
					if let Some(new) = self.conditional_comment(content, *offset) {
						*content = new.into();
					},
				_ => {},
			}
		}
	}

	/// # Attributes.
	fn attributes(&mut self, el: &mut Element) {
		let css = self.common.minify_inline_css_code && self.pipeline.css.supports_inline();
		let js = self.common.minify_inline_js_code && self.pipeline.js.supports_inline();
		if ! css && ! js { return; }

		for attr in &mut el.attributes {
			match attr.kind {
				AttributeKind::Style if css => { self.attribute(attr, Lang::Css, 0); },
				AttributeKind::Event if js => { self.attribute(attr, Lang::Js, 0); },
				AttributeKind::Url if js => {
					let prefix = attr.value.as_deref()
						.and_then(|v| strip_prefix_ci(v, "javascript:"))
						.map(|rest| attr.value().len() - rest.len());
					if let Some(prefix) = prefix { self.attribute(attr, Lang::Js, prefix); }
				},
				_ => {},
			}
		}
	}

	/// # Attribute.
	///
	/// Minify the value after the first `skip` bytes, which are kept as-are.
	fn attribute(&mut self, attr: &mut Attribute, lang: Lang, skip: usize) {
		let Some(value) = attr.value.as_deref() else { return; };
		let Some(code) = value.get(skip..) else { return; };
		if code.trim().is_empty() { return; }

		let pristine = attr.is_pristine(self.src.as_str());
		let origin = self.src.coordinates(
			if pristine { attr.value_offset.saturating_add(skip) }
			else { attr.value_offset }
		);

		let mut res = match lang {
			Lang::Css => self.pipeline.css.minify(code, true),
			Lang::Js => self.pipeline.js.minify(code, true),
			Lang::Json => compact_json(code),
		};

		// Decoded values no longer line up with the source, so anything
		// reported is pinned to the start of the value.
		if ! pristine {
			for info in res.errors.iter_mut().chain(res.warnings.iter_mut()) {
				info.line = 1;
				info.column = 1;
			}
		}

		if self.relay(res.errors, res.warnings, Some(origin), Some(lang.category())) {
			return;
		}

		if res.minified_code != code {
			let mut new = String::with_capacity(skip + res.minified_code.len());
			new.push_str(&value[..skip]);
			new.push_str(&res.minified_code);
			attr.value = Some(new);
		}
	}

	/// # Style Element.
	fn style(&mut self, el: &mut Element) {
		let css = el.attr_value("type").is_none_or(|t| {
			let t = t.trim();
			t.is_empty() || t.eq_ignore_ascii_case("text/css")
		});
		if css {
			let enabled = self.common.minify_embedded_css_code;
			self.embedded(&mut el.children, Lang::Css, enabled);
		}
	}

	/// # Script Element.
	fn script(&mut self, el: &mut Element) {
		let kind = el.attr_value("type").map_or("", str::trim);
		if
			kind.is_empty() ||
			kind.eq_ignore_ascii_case("module") ||
			spec::is_js_type(kind) ||
			self.common.processable_script_type_list.contains(kind)
		{
			let enabled = self.common.minify_embedded_js_code;
			self.embedded(&mut el.children, Lang::Js, enabled);
		}
		else if spec::is_json_type(kind) {
			let enabled = self.common.minify_embedded_json_data;
			self.embedded(&mut el.children, Lang::Json, enabled);
		}
		else if self.common.markup_template_type_list.contains(kind) {
			self.template(&mut el.children);
		}
	}

	/// # Embedded Code.
	///
	/// Minify the body of a `<style>` or `<script>` (if `enabled`), and strip
	/// its `<!-- -->`/CDATA wrapper (if so configured).
	fn embedded(&mut self, children: &mut Vec<Node>, lang: Lang, enabled: bool) {
		let (code, offset) = match children.as_slice() {
			[Node::Text { content, offset }] => (String::from(&**content), *offset),
			_ => return,
		};

		if code.trim().is_empty() {
			if enabled { children.clear(); }
			return;
		}

		let (wrapper, inner, start) = match Wrapper::unwrap(&code) {
			Some((kind, inner, start)) => (Some(kind), inner, start),
			None => (None, code.as_str(), 0),
		};
		let strip = wrapper.is_some_and(|w| match w {
			Wrapper::Comment => self.common.remove_html_comments_from_scripts_and_styles,
			Wrapper::Cdata | Wrapper::EscapedCdata => self.common.remove_cdata_sections_from_scripts_and_styles,
		});
		if ! enabled && ! strip { return; }

		let res =
			if enabled {
				match lang {
					Lang::Css => self.pipeline.css.minify(inner, false),
					Lang::Js => self.pipeline.js.minify(inner, false),
					Lang::Json => compact_json(inner),
				}
			}
			else { CodeMinificationResult::from(inner.trim().to_owned()) };

		let origin = self.src.coordinates(offset.saturating_add(start));
		if self.relay(res.errors, res.warnings, Some(origin), Some(lang.category())) {
			return;
		}

		let new = match wrapper {
			Some(w) if ! strip => w.wrap(lang, &res.minified_code),
			_ => res.minified_code,
		};
		if contains_ci(&new, lang.terminator()) {
			self.diag.warn(
				lang.category(),
				format!("The minified code contains \"{}\" and was discarded.", lang.terminator()),
				self.src,
				offset,
			);
			return;
		}

		if new.is_empty() { children.clear(); }
		else if new != code { children[0] = Node::text(&new, offset); }
	}

	/// # Markup Template.
	fn template(&mut self, children: &mut [Node]) {
		let [Node::Text { content, offset }] = children else { return; };
		if content.trim().is_empty() { return; }

		let origin = self.src.coordinates(*offset);
		if let Some(new) = self.fragment(content, origin) {
			if contains_ci(&new, "</script") {
				self.diag.warn(
					ErrorCategory::HtmlMinification,
					"The minified template contains \"</script\" and was discarded.",
					self.src,
					*offset,
				);
			}
			else if new.as_str() != &**content { *content = new.into(); }
		}
	}

	/// # Hidden Conditional Comment.
	///
	/// Returns the new comment content, if it changed.
	fn conditional_comment(&mut self, content: &str, offset: usize) -> Option<String> {
		let (body, start) = conditional_body(content)?;

		// The content starts after the "<!--".
		let origin = self.src.coordinates(offset.saturating_add(4 + start));
		let new = self.fragment(body, origin)?;
		if new == body { return None; }

		let mut out = String::with_capacity(content.len());
		out.push_str(&content[..start]);
		out.push_str(&new);
		out.push_str(&content[start + body.len()..]);
		Some(out)
	}

	/// # Markup Fragment.
	///
	/// Run a fragment through the pipeline, returning the result if it came
	/// back clean.
	fn fragment(&mut self, content: &str, origin: SourceCoordinates) -> Option<String> {
		let (res, diag) = self.pipeline.run_fragment(content);
		let category = self.pipeline.flavor.parsing_category();
		match res {
			Ok(out) =>
				if self.relay(diag.errors, diag.warnings, Some(origin), None) { None }
				else { Some(out) },
			Err(e) => {
				self.relay(vec![e.into_info(category)], Vec::new(), Some(origin), None);
				None
			},
		}
	}

	/// # Relay Diagnostics.
	///
	/// Translate and record a collaborator's errors and warnings, returning
	/// `true` if there were any errors.
	fn relay(
		&mut self,
		errors: Vec<MinificationErrorInfo>,
		warnings: Vec<MinificationErrorInfo>,
		origin: Option<SourceCoordinates>,
		category: Option<ErrorCategory>,
	) -> bool {
		let failed = ! errors.is_empty();
		for (info, error) in errors.into_iter().map(|e| (e, true))
			.chain(warnings.into_iter().map(|w| (w, false)))
		{
			let coords =
				if info.line == 0 { None }
				else {
					origin.map(|o| SourceCoordinates::new(info.line, info.column).translate(o))
				};
			let category = category.unwrap_or(info.category);
			if error { self.diag.error_at(category, info.message, self.src, coords); }
			else { self.diag.warn_at(category, info.message, self.src, coords); }
		}
		failed
	}
}



#[must_use]
/// # Contains (Case-Insensitive)?
fn contains_ci(haystack: &str, needle: &str) -> bool {
	haystack.as_bytes()
		.windows(needle.len())
		.any(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

#[must_use]
/// # Compact JSON.
///
/// Strip the whitespace between JSON tokens. Nothing else about the data is
/// touched, so invalid JSON passes through about as invalid as it came in,
/// save for unterminated strings, which are reported.
fn compact_json(src: &str) -> CodeMinificationResult {
	let mut out = String::with_capacity(src.len());
	let mut string: Option<usize> = None;
	let mut escaped = false;

	for (idx, c) in src.char_indices() {
		if string.is_some() {
			out.push(c);
			if escaped { escaped = false; }
			else if c == '\\' { escaped = true; }
			else if c == '"' { string = None; }
		}
		else if c == '"' {
			string = Some(idx);
			out.push(c);
		}
		else if ! c.is_whitespace() { out.push(c); }
	}

	let mut res = CodeMinificationResult::from(out);
	if let Some(idx) = string {
		let coords = SourceCode::new(src).coordinates(idx);
		res.errors.push(MinificationErrorInfo {
			category: ErrorCategory::JsonMinification,
			message: "Unterminated string in the JSON data.".to_owned(),
			line: coords.line,
			column: coords.column,
			source_fragment: String::new(),
		});
	}
	res
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		CssMinifier,
		JsMinifier,
		minify::Flavor,
		settings::HtmlSettings,
	};

	/// # Squash.
	///
	/// Removes all whitespace; good enough to see something happened.
	struct Squash;

	impl CssMinifier for Squash {
		fn minify(&self, content: &str, _is_inline: bool) -> CodeMinificationResult {
			CodeMinificationResult::from(content.split_whitespace().collect::<String>())
		}
	}

	impl JsMinifier for Squash {
		fn minify(&self, content: &str, _is_inline: bool) -> CodeMinificationResult {
			CodeMinificationResult::from(content.split_whitespace().collect::<String>())
		}
	}

	/// # Broken.
	///
	/// Always reports an error on the second line, third column.
	struct Broken;

	impl JsMinifier for Broken {
		fn minify(&self, content: &str, _is_inline: bool) -> CodeMinificationResult {
			CodeMinificationResult {
				minified_code: String::new(),
				errors: vec![MinificationErrorInfo {
					category: ErrorCategory::JsMinification,
					message: format!("Bad code ({} bytes).", content.len()),
					line: 2,
					column: 3,
					source_fragment: String::new(),
				}],
				warnings: Vec::new(),
			}
		}
	}

	fn run(raw: &str, settings: &HtmlSettings, js: &dyn JsMinifier) -> (String, Diagnostics) {
		let pipeline = Pipeline {
			flavor: Flavor::Html(settings),
			css: &Squash,
			js,
		};
		let src = SourceCode::new(raw);
		let mut diag = Diagnostics::default();
		let out = pipeline.run(&src, &mut diag).expect("Minification failed.");
		(out, diag)
	}

	#[test]
	fn t_unwrap() {
		for (raw, expected) in [
			("<!--\nfoo\n//-->", Some((Wrapper::Comment, "\nfoo\n", 4))),
			("  <!-- a -->  ", Some((Wrapper::Comment, " a ", 6))),
			("//<![CDATA[\nfoo\n//]]>", Some((Wrapper::EscapedCdata, "\nfoo\n", 11))),
			("/*<![CDATA[*/a{}/*]]>*/", Some((Wrapper::EscapedCdata, "a{}", 13))),
			("<![CDATA[x]]>", Some((Wrapper::Cdata, "x", 9))),
			("<!-- a", None),
			("foo", None),
		] {
			assert_eq!(Wrapper::unwrap(raw), expected, "{raw:?}");
		}
	}

	#[test]
	fn t_compact_json() {
		let res = compact_json("{\n  \"a b\": [1, 2],\n  \"c\": \"\\\" x\"\n}");
		assert!(res.is_ok());
		assert_eq!(res.minified_code, "{\"a b\":[1,2],\"c\":\"\\\" x\"}");

		let res = compact_json("{\n \"a\": \"b\n}");
		assert!(! res.is_ok());
		assert_eq!(res.errors[0].line, 2);
		assert_eq!(res.errors[0].column, 7);
	}

	#[test]
	fn t_embedded() {
		let settings = HtmlSettings::default();
		for (raw, expected) in [
			("<style>\n  a { color: red; }\n</style>", "<style>a{color:red;}</style>"),
			("<script><!--\nalert( 1 );\n//--></script>", "<script>alert(1);</script>"),
			("<script>//<![CDATA[\nalert( 1 );\n//]]></script>", "<script>alert(1);</script>"),
			("<script type=\"text/template\"> a b </script>", "<script type=text/template> a b </script>"),
			("<script type=\"application/ld+json\">{ \"a\": 1 }</script>", "<script type=application/ld+json>{\"a\":1}</script>"),
			("<script>  </script>", "<script></script>"),
			("<style media=\"print\">b { }</style>", "<style media=print>b{}</style>"),
		] {
			assert_eq!(run(raw, &settings, &Squash).0, expected, "{raw:?}");
		}

		// Nothing happens when disabled.
		let mut disabled = HtmlSettings::default();
		disabled.common.minify_embedded_js_code = false;
		disabled.common.minify_embedded_css_code = false;
		assert_eq!(
			run("<script>  </script><style>\n</style>", &disabled, &Squash).0,
			"<script>  </script><style>\n</style>",
		);

		// Keep the wrapper.
		let mut settings = HtmlSettings::default();
		settings.common.remove_cdata_sections_from_scripts_and_styles = false;
		assert_eq!(
			run("<script>//<![CDATA[\nalert( 1 );\n//]]></script>", &settings, &Squash).0,
			"<script>//<![CDATA[\nalert(1);\n//]]></script>",
		);
	}

	#[test]
	fn t_inline() {
		let settings = HtmlSettings::default();
		let (out, diag) = run(
			"<a href=\"javascript: go( 1 )\" onclick=\" go( 2 ) \" style=\"color : red\">x</a>",
			&settings,
			&Squash,
		);
		assert_eq!(out, "<a href=javascript:go(1) onclick=go(2) style=color:red>x</a>");
		assert!(diag.errors.is_empty());
	}

	#[test]
	fn t_template() {
		let mut settings = HtmlSettings::default();
		settings.common.markup_template_type_list = "text/x-template".parse().expect("Bad list.");
		let (out, _) = run(
			"<script type=\"text/x-template\"><div   class=\"a\"><p>Hi</p></div></script>",
			&settings,
			&Squash,
		);
		assert_eq!(out, "<script type=text/x-template><div class=a><p>Hi</div></script>");
	}

	#[test]
	fn t_conditional_comment() {
		let settings = HtmlSettings::default();
		let (out, _) = run(
			"<!--[if lt IE 9]><script   src=\"a.js\"  ></script><![endif]-->",
			&settings,
			&Squash,
		);
		assert_eq!(out, "<!--[if lt IE 9]><script src=a.js></script><![endif]-->");
	}

	#[test]
	fn t_translated_errors() {
		let settings = HtmlSettings::default();
		let raw = "<p>x</p>\n<script>\nfoo\nbar</script>";
		let (out, diag) = run(raw, &settings, &Broken);
		assert!(out.ends_with("<script>\nfoo\nbar</script>"));
		assert_eq!(diag.errors.len(), 1);

		let err = &diag.errors[0];
		assert_eq!(err.category, ErrorCategory::JsMinification);
		assert_eq!((err.line, err.column), (3, 3));
		assert!(err.source_fragment.contains("Line 3: foo"));
	}

	#[test]
	fn t_decoded_attribute_errors() {
		let settings = HtmlSettings::default();
		let raw = "<p>x</p>\n<p onclick=\"go(&quot;a&quot;)\">y</p>";
		let (out, diag) = run(raw, &settings, &Broken);
		assert!(out.contains("onclick='go(\"a\")'"), "{out}");
		assert_eq!(diag.errors.len(), 1);

		// The value starts at the second line, thirteenth column.
		let err = &diag.errors[0];
		assert_eq!(err.category, ErrorCategory::JsMinification);
		assert_eq!((err.line, err.column), (2, 13));
	}

	#[test]
	fn t_terminator_guard() {
		struct Evil;
		impl JsMinifier for Evil {
			fn minify(&self, _content: &str, _is_inline: bool) -> CodeMinificationResult {
				CodeMinificationResult::from("a='</SCRIPT>'".to_owned())
			}
		}

		let settings = HtmlSettings::default();
		let (out, diag) = run("<script>a = 1</script>", &settings, &Evil);
		assert_eq!(out, "<script>a = 1</script>");
		assert_eq!(diag.warnings.len(), 1);
	}
}
