/*!
# MarkMinL

`MarkMinL` is an in-place minifier for HTML, XHTML, and XML documents.

Like most minifiers it trims and collapses whitespace, strips comments, and
drops redundant attributes and end tags, but it does so from a complete
document tree rather than a stream, so it knows what it can safely get away
with. Embedded styles, scripts, JSON, and binding expressions are handled
too.

If a document cannot be parsed, has any other minification errors, or
somehow winds up bigger than it started, it is left as-was.



## Use

Toss one or more file or directory paths after the command, like:
```bash
# Crunch one file.
markminl /path/to/one.html

# Recursively crunch every supported file in a directory.
markminl /path/to

# Do the same thing, but with a progress bar.
markminl -p /path/to

# For a full list of options, run help:
markminl -h
```

Files are matched by extension: `.htm` and `.html` are treated as HTML,
`.xhtml` as XHTML, and `.xml` and `.svg` as XML.
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



use argyle::Argument;
use dactyl::NiceU64;
use dowser::Dowser;
use fyi_msg::{
	Msg,
	Progless,
};
use markminl::{
	ConsoleLogger,
	HtmlMinifier,
	HtmlSettings,
	MarkupMinificationResult,
	SettingsError,
	WhitespaceMinificationMode,
	XhtmlMinifier,
	XhtmlSettings,
	XmlMinifier,
	XmlSettings,
};
use rayon::iter::{
	IntoParallelRefIterator,
	ParallelIterator,
};
use std::{
	fmt,
	fs,
	io::Read,
	path::{
		Path,
		PathBuf,
	},
	sync::atomic::{
		AtomicU64,
		Ordering::SeqCst,
	},
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # CLI Error.
enum CliError {
	/// # No Documents.
	NoDocuments,

	/// # Unreadable List.
	List,

	/// # Print Help (Not an Error).
	PrintHelp,

	/// # Print Version (Not an Error).
	PrintVersion,

	/// # Too Many Files for Progress.
	Progress,

	/// # Bad Setting.
	Settings(SettingsError),
}

impl fmt::Display for CliError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::error::Error for CliError {}

impl From<SettingsError> for CliError {
	#[inline]
	fn from(src: SettingsError) -> Self { Self::Settings(src) }
}

impl CliError {
	/// # As Str.
	const fn as_str(self) -> &'static str {
		match self {
			Self::NoDocuments => "No documents were found.",
			Self::List => "Unable to read the path list.",
			Self::PrintHelp | Self::PrintVersion => "",
			Self::Progress => "Progress can only be displayed for up to 4,294,967,295 files. Try again with fewer files or without the -p/--progress flag.",
			Self::Settings(e) => e.as_str(),
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Document Kind.
enum Kind {
	/// # HTML.
	Html,

	/// # XHTML.
	Xhtml,

	/// # XML (and SVG).
	Xml,
}

impl Kind {
	/// # From Path.
	///
	/// Match the file extension, case-insensitively.
	fn from_path(path: &Path) -> Option<Self> {
		let ext = path.extension()?.to_str()?;
		if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") {
			Some(Self::Html)
		}
		else if ext.eq_ignore_ascii_case("xhtml") { Some(Self::Xhtml) }
		else if ext.eq_ignore_ascii_case("xml") || ext.eq_ignore_ascii_case("svg") {
			Some(Self::Xml)
		}
		else { None }
	}
}



#[derive(Debug)]
/// # Minifiers.
///
/// One of each kind, shared across all threads.
struct Minifiers {
	/// # HTML.
	html: HtmlMinifier,

	/// # XHTML.
	xhtml: XhtmlMinifier,

	/// # XML.
	xml: XmlMinifier,

	/// # Log Everything?
	verbose: bool,
}

impl Minifiers {
	/// # New.
	fn new(mode: WhitespaceMinificationMode, verbose: bool) -> Self {
		let mut html = HtmlSettings::default();
		html.common.whitespace_minification_mode = mode;

		let mut xhtml = XhtmlSettings::default();
		xhtml.common.whitespace_minification_mode = mode;

		let xml = XmlSettings {
			minify_whitespace: mode != WhitespaceMinificationMode::None,
			..XmlSettings::default()
		};

		let mut out = Self {
			html: HtmlMinifier::new(html),
			xhtml: XhtmlMinifier::new(xhtml),
			xml: XmlMinifier::new(xml),
			verbose,
		};

		if verbose {
			out.html = out.html.with_logger(ConsoleLogger);
			out.xhtml = out.xhtml.with_logger(ConsoleLogger);
			out.xml = out.xml.with_logger(ConsoleLogger);
		}

		out
	}

	/// # Minify File.
	///
	/// Returns the before and after sizes if the file was rewritten.
	fn minify_file(&self, path: &Path) -> Option<(u64, u64)> {
		let kind = Kind::from_path(path)?;
		let raw = fs::read_to_string(path).ok()?;
		if raw.is_empty() { return None; }

		let file_context = path.to_string_lossy();
		let res: MarkupMinificationResult = match kind {
			Kind::Html => self.html.minify_with(&raw, &file_context, self.verbose),
			Kind::Xhtml => self.xhtml.minify_with(&raw, &file_context, self.verbose),
			Kind::Xml => self.xml.minify_with(&raw, &file_context, self.verbose),
		};

		// Only save genuine improvements.
		if
			res.is_ok() &&
			res.minified_content.len() < raw.len() &&
			write_atomic::write_file(path, res.minified_content.as_bytes()).is_ok()
		{
			Some((raw.len() as u64, res.minified_content.len() as u64))
		}
		else {
			if self.verbose && ! res.is_ok() {
				Msg::warning(format!("{file_context} was left as-was.")).eprint();
			}
			None
		}
	}
}



/// # Main.
fn main() {
	match main__() {
		Ok(()) => {},
		Err(CliError::PrintVersion) => {
			println!(concat!("MarkMinL v", env!("CARGO_PKG_VERSION")));
		},
		Err(CliError::PrintHelp) => { helper(); },
		Err(e) => { Msg::error(e.to_string()).die(1); },
	}
}

#[inline]
/// # Actual Main.
fn main__() -> Result<(), CliError> {
	let args = argyle::args()
		.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));

	let mut paths = Dowser::default();
	let mut progress = false;
	let mut verbose = false;
	let mut mode = WhitespaceMinificationMode::Safe;
	for arg in args {
		match arg {
			Argument::Key("-h" | "--help") => return Err(CliError::PrintHelp),
			Argument::Key("-p" | "--progress") => { progress = true; },
			Argument::Key("-v" | "--verbose") => { verbose = true; },
			Argument::Key("-V" | "--version") => return Err(CliError::PrintVersion),

			Argument::KeyWithValue("-l" | "--list", s) => {
				let list = read_list(&s)?;
				paths = paths.with_paths(
					list.lines()
						.map(str::trim)
						.filter(|line| ! line.is_empty())
				);
			},
			Argument::KeyWithValue("-w" | "--whitespace", s) => {
				mode = s.trim().parse()?;
			},

			Argument::Path(s) => { paths = paths.with_path(s); },

			// Nothing else is expected.
			_ => {},
		}
	}

	let paths: Vec<PathBuf> = paths
		.filter(|p| Kind::from_path(p).is_some())
		.collect();
	if paths.is_empty() { return Err(CliError::NoDocuments); }

	let minifiers = Minifiers::new(mode, verbose);
	let before = AtomicU64::new(0);
	let after = AtomicU64::new(0);
	let crunch = |path: &PathBuf| {
		if let Some((b, a)) = minifiers.minify_file(path) {
			before.fetch_add(b, SeqCst);
			after.fetch_add(a, SeqCst);
		}
	};

	if progress {
		let progress = Progless::try_from(paths.len())
			.map_err(|_| CliError::Progress)?
			.with_title(Some(Msg::custom("MarkMinL", 199, "Reticulating &splines;")));

		paths.par_iter().for_each(|x| {
			let tmp = x.to_string_lossy();
			progress.add(&tmp);
			crunch(x);
			progress.remove(&tmp);
		});

		progress.finish();
		summarize(paths.len(), before.load(SeqCst), after.load(SeqCst));
	}
	else {
		paths.par_iter().for_each(crunch);
	}

	Ok(())
}

/// # Read Path List.
///
/// Read the list from STDIN if the path is "-", otherwise from the file.
fn read_list(src: &str) -> Result<String, CliError> {
	if src == "-" {
		let mut out = String::new();
		std::io::stdin().read_to_string(&mut out).map_err(|_| CliError::List)?;
		Ok(out)
	}
	else { fs::read_to_string(src).map_err(|_| CliError::List) }
}

#[expect(clippy::cast_precision_loss, reason = "Close enough for a percentage.")]
/// # Summarize.
fn summarize(total: usize, before: u64, after: u64) {
	let noun = if total == 1 { "document" } else { "documents" };
	if before == 0 || after >= before {
		Msg::info(format!("Checked {} {noun}; no savings were possible.", NiceU64::from(total as u64)))
			.eprint();
	}
	else {
		let saved = before - after;
		Msg::success(format!(
			"Crunched {} {noun}, saving {} bytes ({:.2}%).",
			NiceU64::from(total as u64),
			NiceU64::from(saved),
			saved as f64 * 100.0 / before as f64,
		)).eprint();
	}
}

#[expect(clippy::non_ascii_literal, reason = "Doesn't work with an r\"\" literal.")]
#[cold]
/// # Print Help.
fn helper() {
	println!(concat!(
		r"
     __,---.__
  ,-'         `-.__
&/           `._\ _\
/               ''._    ", "\x1b[38;5;199mMarkMinL\x1b[0;38;5;69m v", env!("CARGO_PKG_VERSION"), "\x1b[0m", r"
|   ,             (∞)   Fast, safe, in-place
|__,'`-..--|__|--''     HTML, XHTML, and XML
                        minification.

USAGE:
    markminl [FLAGS] [OPTIONS] <PATH(S)>...

FLAGS:
    -h, --help        Print help information and exit.
    -p, --progress    Show progress bar while working.
    -v, --verbose     Print minification errors, warnings, and statistics.
    -V, --version     Print version information and exit.

OPTIONS:
    -l, --list <FILE>    Read (absolute) file and/or directory paths from this
                         text file, or STDIN if '-', one entry per line,
                         instead of or in addition to the trailing <PATH(S)>.
    -w, --whitespace <MODE>
                         Whitespace minification mode: none, safe, medium, or
                         aggressive. [default: safe]

ARGS:
    <PATH(S)>...    One or more files or directories to crunch.
"
	));
}
