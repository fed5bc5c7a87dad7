/*!
# MarkMinL: Template Expressions.

Knockout and AngularJS sprinkle little JavaScript-like expressions all over
the markup: `data-bind` attributes, `ng-*` directives, `{{ }}`
interpolations, class and comment directives. None of that is real JS, so
the embedded JS minifier can't help, but the whitespace around operators and
punctuation can still be dropped safely.

The tokenizer here is deliberately dumb. It understands strings and block
comments, and otherwise only distinguishes "word" characters from
everything else; a space is kept only where removing it would glue two
tokens together.
*/

use crate::{
	diagnostics::Diagnostics,
	dom::{
		Attribute,
		Document,
		Element,
		Node,
		node::angular_directive,
	},
	ErrorCategory,
	parser::is_whitespace,
	settings::TagList,
	source::SourceCode,
};
use tendril::StrTendril;



#[derive(Debug, Clone, Copy)]
/// # Expression Options.
pub(crate) struct ExpressionOptions<'a> {
	/// # Knockout?
	pub(crate) knockout: bool,

	/// # AngularJS?
	pub(crate) angular: bool,

	/// # Custom AngularJS Directives.
	pub(crate) directives: &'a TagList,
}

impl ExpressionOptions<'_> {
	#[must_use]
	/// # Anything To Do?
	const fn is_enabled(&self) -> bool { self.knockout || self.angular }

	#[must_use]
	/// # Is Directive?
	///
	/// Returns `true` if the name (attribute or class directive) is an
	/// AngularJS directive whose value is an expression.
	///
	/// Directives taking literal strings or `{{ }}`-interpolated text, like
	/// `ng-attr-*` or `ng-switch-when`, are not.
	fn is_directive(&self, name: &str) -> bool {
		if let Some(dir) = angular_directive(name) {
			! dir.starts_with("attr-") &&
			! matches!(
				dir,
				"app" | "bind-template" | "csp" | "form" | "href" | "jq" |
				"list" | "message" | "messages-include" | "non-bindable" |
				"pattern" | "pluralize" | "src" | "srcset" | "strict-di" |
				"switch-when" | "switch-when-separator" | "transclude" | "trim"
			)
		}
		else {
			let name = name.strip_prefix("data-")
				.or_else(|| name.strip_prefix("x-"))
				.unwrap_or(name);
			self.directives.contains(name)
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Expression Error.
pub(crate) struct ExpressionError {
	/// # Message.
	pub(crate) message: &'static str,

	/// # Offset (Relative to the Expression).
	pub(crate) offset: usize,
}

impl ExpressionError {
	#[must_use]
	/// # Shift Offset.
	const fn shift(self, by: usize) -> Self {
		Self { message: self.message, offset: self.offset + by }
	}
}



/// # Minify Template Expressions.
pub(crate) fn minify(
	doc: &mut Document,
	opts: ExpressionOptions<'_>,
	src: &SourceCode<'_>,
	diag: &mut Diagnostics,
) {
	if opts.is_enabled() {
		walk(&mut doc.children, opts, src, diag);
	}
}

/// # Walk.
fn walk(
	nodes: &mut [Node],
	opts: ExpressionOptions<'_>,
	src: &SourceCode<'_>,
	diag: &mut Diagnostics,
) {
	for node in nodes {
		match node {
			Node::Element(el) => {
				element(el, opts, src, diag);
				if ! el.is_raw() { walk(&mut el.children, opts, src, diag); }
			},
			Node::Text { content, offset } if opts.angular => {
				match minify_interpolations(content) {
					Ok(Some(new)) => { *content = StrTendril::from(new); },
					Ok(None) => {},
					Err(e) => report(diag, src, Some(*offset + e.offset), e),
				}
			},
			Node::Comment { content, offset } => {
				match minify_comment(content, opts) {
					Ok(Some(new)) => { *content = StrTendril::from(new); },
					Ok(None) => {},
					// Comment content starts four bytes in, after the <!--.
					Err(e) => report(diag, src, Some(*offset + 4 + e.offset), e),
				}
			},
			_ => {},
		}
	}
}

/// # Element Attributes.
fn element(
	el: &mut Element,
	opts: ExpressionOptions<'_>,
	src: &SourceCode<'_>,
	diag: &mut Diagnostics,
) {
	for attr in &mut el.attributes {
		let Some(value) = attr.value.as_deref() else { continue; };

		let res =
			if opts.knockout && attr.key == "data-bind" {
				minify_expression(value).map(Some)
			}
			else if ! opts.angular { continue; }
			else if opts.is_directive(&attr.key) {
				if value.contains("{{") { minify_interpolations(value) }
				else { minify_expression(value).map(Some) }
			}
			else if attr.key == "class" && value.contains(';') {
				minify_class_directives(value, opts)
			}
			else if value.contains("{{") { minify_interpolations(value) }
			else { continue; };

		match res {
			Ok(Some(new)) => if new != value { attr.value = Some(new); },
			Ok(None) => {},
			Err(e) => {
				let offset = attr_offset(attr, src).map(|o| o + e.offset);
				report(diag, src, offset, e);
			},
		}
	}
}

/// # Attribute Value Offset.
///
/// Return the source offset of the attribute value, but only if it is still
/// exactly as written.
fn attr_offset(attr: &Attribute, src: &SourceCode<'_>) -> Option<usize> {
	if attr.is_pristine(src.as_str()) { Some(attr.value_offset) }
	else { None }
}

/// # Report Error.
fn report(diag: &mut Diagnostics, src: &SourceCode<'_>, offset: Option<usize>, e: ExpressionError) {
	let coords = offset.map(|o| src.coordinates(o));
	diag.error_at(
		ErrorCategory::TemplateExpressionMinification,
		e.message.to_owned(),
		src,
		coords,
	);
}



/// # Minify Expression.
///
/// Strip insignificant whitespace (and block comments) from a JS-like
/// expression.
///
/// ## Errors
///
/// Unterminated strings and comments are errors.
pub(crate) fn minify_expression(src: &str) -> Result<String, ExpressionError> {
	let bytes = src.as_bytes();
	let mut out = String::with_capacity(src.len());
	let mut space = false;
	let mut idx = 0;

	while let Some(c) = src[idx..].chars().next() {
		// Whitespace.
		if u8::try_from(c).is_ok_and(is_whitespace) {
			space = true;
			idx += 1;
		}
		// Strings.
		else if c == '"' || c == '\'' {
			let end = string_end(bytes, idx)?;
			push_token(&mut out, &src[idx..end], &mut space);
			idx = end;
		}
		// Block comments.
		else if c == '/' && bytes.get(idx + 1) == Some(&b'*') {
			let end = src[idx + 2..].find("*/").ok_or(ExpressionError {
				message: "Unterminated comment in the expression.",
				offset: idx,
			})?;
			space = true;
			idx += end + 4;
		}
		else {
			let len = c.len_utf8();
			push_token(&mut out, &src[idx..idx + len], &mut space);
			idx += len;
		}
	}

	Ok(out)
}

/// # String End.
///
/// Return the index just past the closing quote of the string starting at
/// `start`.
fn string_end(bytes: &[u8], start: usize) -> Result<usize, ExpressionError> {
	let quote = bytes[start];
	let mut idx = start + 1;
	while idx < bytes.len() {
		match bytes[idx] {
			b'\\' => { idx += 2; },
			b if b == quote => return Ok(idx + 1),
			_ => { idx += 1; },
		}
	}

	Err(ExpressionError {
		message: "Unterminated string literal in the expression.",
		offset: start,
	})
}

/// # Push Token.
///
/// Append a token, preceded by a space if one was pending and is actually
/// needed.
fn push_token(out: &mut String, token: &str, space: &mut bool) {
	if
		*space &&
		let Some(a) = out.chars().next_back() &&
		let Some(b) = token.chars().next() &&
		needs_space(a, b)
	{
		out.push(' ');
	}
	*space = false;
	out.push_str(token);
}

#[must_use]
/// # Needs Space?
///
/// Returns `true` if characters `a` and `b` would run together if the space
/// between them were removed.
const fn needs_space(a: char, b: char) -> bool {
	(is_word(a) && is_word(b)) ||
	(a == b && matches!(a, '+' | '-')) ||
	(a.is_ascii_digit() && b == '.')
}

#[must_use]
/// # Is Word Character?
const fn is_word(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '_' | '$') || ! c.is_ascii()
}



/// # Minify Interpolations.
///
/// Minify every `{{ expression }}` in the text, returning `None` if nothing
/// changed.
///
/// ## Errors
///
/// Expression errors are passed through, with offsets relative to `src`.
pub(crate) fn minify_interpolations(src: &str) -> Result<Option<String>, ExpressionError> {
	if ! src.contains("{{") { return Ok(None); }

	let mut out = String::with_capacity(src.len());
	let mut pos = 0;
	while let Some(start) = src[pos..].find("{{").map(|i| pos + i) {
		let inner = start + 2;
		let Some(end) = src[inner..].find("}}").map(|i| inner + i) else { break; };

		out.push_str(&src[pos..inner]);
		out.push_str(&minify_expression(&src[inner..end]).map_err(|e| e.shift(inner))?);
		out.push_str("}}");
		pos = end + 2;
	}
	out.push_str(&src[pos..]);

	if out == src { Ok(None) }
	else { Ok(Some(out)) }
}

/// # Minify Class Directives.
///
/// AngularJS lets directives hide in class attributes, like
/// `class="my-dir: expression;"`. Only segments naming known directives are
/// touched.
///
/// ## Errors
///
/// Expression errors are passed through, with offsets relative to `src`.
fn minify_class_directives(src: &str, opts: ExpressionOptions<'_>)
-> Result<Option<String>, ExpressionError> {
	let mut out = String::with_capacity(src.len());
	let mut pos = 0;
	let mut changed = false;
	for (idx, seg) in src.split(';').enumerate() {
		if idx != 0 { out.push(';'); }

		if
			let Some((name, expr)) = seg.split_once(':') &&
			opts.is_directive(name.trim())
		{
			let expr_start = pos + name.len() + 1;
			let new = minify_expression(expr).map_err(|e| e.shift(expr_start))?;
			out.push_str(name.trim());
			out.push(':');
			out.push_str(&new);
			changed = true;
		}
		else { out.push_str(seg); }

		pos += seg.len() + 1;
	}

	if changed && out != src { Ok(Some(out)) }
	else { Ok(None) }
}

/// # Minify Comment.
///
/// Handle Knockout containerless bindings (`<!-- ko … -->`) and AngularJS
/// comment directives (`<!-- directive: name expression -->`).
///
/// ## Errors
///
/// Expression errors are passed through, with offsets relative to `src`.
fn minify_comment(src: &str, opts: ExpressionOptions<'_>)
-> Result<Option<String>, ExpressionError> {
	let trimmed = src.trim_start();
	let lead = src.len() - trimmed.len();
	let trimmed = trimmed.trim_end();

	if opts.knockout && is_knockout_comment(trimmed) {
		let out =
			if let Some(rest) = trimmed.strip_prefix("ko") && ! rest.is_empty() {
				let expr = minify_expression(rest).map_err(|e| e.shift(lead + 2))?;
				format!("ko {expr}")
			}
			else { trimmed.to_owned() };
		return Ok(Some(out).filter(|v| v != src));
	}

	if opts.angular && let Some(rest) = trimmed.strip_prefix("directive:") {
		let body = rest.trim_start();
		let body_start = lead + 10 + (rest.len() - body.len());
		let out = match body.split_once(|c: char| c.is_ascii_whitespace()) {
			Some((name, expr)) => {
				let expr_start = body_start + name.len() + 1;
				let expr = minify_expression(expr).map_err(|e| e.shift(expr_start))?;
				if expr.is_empty() { format!("directive:{name}") }
				else { format!("directive:{name} {expr}") }
			},
			None => format!("directive:{body}"),
		};
		return Ok(Some(out).filter(|v| v != src));
	}

	Ok(None)
}

#[must_use]
/// # Is Knockout Comment?
///
/// Returns `true` for `ko …` and `/ko`. The value should already be
/// trimmed.
pub(crate) fn is_knockout_comment(src: &str) -> bool {
	src == "/ko" ||
	src.strip_prefix("ko").is_some_and(|rest|
		rest.is_empty() || rest.starts_with(|c: char| c.is_ascii_whitespace())
	)
}

#[must_use]
/// # Is AngularJS Comment Directive?
pub(crate) fn is_angular_comment(src: &str) -> bool {
	src.trim_start().starts_with("directive:")
}
