/*!
# MarkMinL: Embedded Code Minifiers.

Markup minification is only half the battle; documents are often stuffed
with CSS and JavaScript too. Rather than reinvent those wheels, the HTML and
XHTML minifiers delegate to whatever implementations of `CssMinifier` and
`JsMinifier` they are given.

The defaults, `NullCssMinifier` and `NullJsMinifier`, leave code exactly as
they find it.
*/

use crate::MinificationErrorInfo;



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Code Minification Result.
///
/// Line and column numbers in the errors and warnings should be relative to
/// the code that was passed in; the markup minifier translates them into
/// document coordinates (and rebuilds the source fragments) itself.
///
/// The minified code is only used if `errors` is empty.
pub struct CodeMinificationResult {
	/// # Minified Code.
	pub minified_code: String,

	/// # Errors.
	pub errors: Vec<MinificationErrorInfo>,

	/// # Warnings.
	pub warnings: Vec<MinificationErrorInfo>,
}

impl From<String> for CodeMinificationResult {
	#[inline]
	fn from(minified_code: String) -> Self {
		Self {
			minified_code,
			errors: Vec::new(),
			warnings: Vec::new(),
		}
	}
}

impl CodeMinificationResult {
	#[must_use]
	/// # Is Okay?
	///
	/// Returns `true` if there were no errors.
	pub fn is_ok(&self) -> bool { self.errors.is_empty() }
}



/// # CSS Minifier.
///
/// Implementations must be safe to share across threads, since a single
/// markup minifier may be used by several at once.
pub trait CssMinifier: Send + Sync {
	/// # Supports Inline Code?
	///
	/// Return `false` if the implementation can only handle whole
	/// stylesheets, in which case `style="…"` attributes will be left alone.
	fn supports_inline(&self) -> bool { true }

	/// # Minify.
	///
	/// `is_inline` is `true` for the contents of a `style` attribute, which
	/// are declaration lists rather than full stylesheets.
	fn minify(&self, content: &str, is_inline: bool) -> CodeMinificationResult;
}

/// # JS Minifier.
///
/// Implementations must be safe to share across threads, since a single
/// markup minifier may be used by several at once.
pub trait JsMinifier: Send + Sync {
	/// # Supports Inline Code?
	///
	/// Return `false` if the implementation can only handle whole scripts,
	/// in which case event handlers and `javascript:` URLs will be left
	/// alone.
	fn supports_inline(&self) -> bool { true }

	/// # Minify.
	///
	/// `is_inline` is `true` for event handlers and `javascript:` URLs.
	fn minify(&self, content: &str, is_inline: bool) -> CodeMinificationResult;
}



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Null CSS Minifier.
///
/// This returns the code unchanged.
pub struct NullCssMinifier;

impl CssMinifier for NullCssMinifier {
	#[inline]
	fn minify(&self, content: &str, _is_inline: bool) -> CodeMinificationResult {
		CodeMinificationResult::from(content.to_owned())
	}
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Null JS Minifier.
///
/// This returns the code unchanged.
pub struct NullJsMinifier;

impl JsMinifier for NullJsMinifier {
	#[inline]
	fn minify(&self, content: &str, _is_inline: bool) -> CodeMinificationResult {
		CodeMinificationResult::from(content.to_owned())
	}
}
