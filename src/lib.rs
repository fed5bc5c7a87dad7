/*!
# MarkMinL

[![License](https://img.shields.io/badge/license-wtfpl-ff1493?style=flat-square)](https://en.wikipedia.org/wiki/WTFPL)

`MarkMinL` minifies HTML, XHTML, and XML documents, along with the CSS,
JavaScript, JSON, and framework binding expressions embedded within them.

Unlike stream processors, it parses the whole document into a tree before
getting down to the business of minification. That adds a little overhead,
but allows for content-model-aware decisions (what can be trimmed, which
end tags can go, etc.) and very precise diagnostics.



## Use

```
use markminl::HtmlMinifier;

let res = HtmlMinifier::default().minify("<p>  Hello   <b>World</b>  </p>");
assert!(res.errors.is_empty());
assert_eq!(res.minified_content, "<p>Hello <b>World</b>");
```

Minification never panics for bad input. If a document is too broken to
parse, the result will have empty content and a single, fatal error; lesser
problems are collected as warnings (or errors, for embedded code that could
not be minified) alongside a best-effort result.



## Embedded Code

CSS and JS minification is delegated to implementations of the
[`CssMinifier`] and [`JsMinifier`] traits. The defaults leave code as-is;
bring your own via `HtmlMinifier::with_css_minifier` and friends.
*/

#![deny(unsafe_code)]

#![warn(
	clippy::filetype_is_file,
	clippy::integer_division,
	clippy::needless_borrow,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::suboptimal_flops,
	clippy::unneeded_field_pattern,
	macro_use_extern_crate,
	missing_copy_implementations,
	missing_debug_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unreachable_pub,
	unused_extern_crates,
	unused_import_braces,
)]

#![allow(clippy::module_name_repetitions)]



mod code;
mod diagnostics;
mod dom;
mod error;
mod logger;
mod minifier;
mod minify;
mod parser;
mod ser;
mod settings;
mod source;
mod spec;
mod stats;

pub use code::{
	CodeMinificationResult,
	CssMinifier,
	JsMinifier,
	NullCssMinifier,
	NullJsMinifier,
};
pub use error::{
	ErrorCategory,
	MarkupParsingError,
	MinificationErrorInfo,
	SettingsError,
};
pub use logger::{
	ConsoleLogger,
	Logger,
	NullLogger,
};
pub use minifier::{
	HtmlMinifier,
	MarkupMinificationResult,
	XhtmlMinifier,
	XmlMinifier,
};
pub use parser::doctype::{
	Doctype,
	ExternalId,
	FormalPublicId,
	FpiPrefix,
	SystemId,
};
pub use settings::{
	AttributeQuotesRemovalMode,
	AttributeQuotesStyle,
	CommonSettings,
	EmptyTagRenderMode,
	HtmlSettings,
	NewLineStyle,
	PreservableAttribute,
	PreservableAttributeList,
	ScriptTypeList,
	ShortDoctypeList,
	TagList,
	WhitespaceMinificationMode,
	XhtmlSettings,
	XmlSettings,
};
pub use source::SourceCoordinates;
pub use stats::MinificationStatistics;
