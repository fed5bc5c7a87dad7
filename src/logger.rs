/*!
# MarkMinL: Logging.

The minifiers report everything they collect to a `Logger`. By default that
is `NullLogger`, which ignores it all; `ConsoleLogger` prints to STDERR.
*/

use crate::{
	ErrorCategory,
	MinificationStatistics,
};
use dactyl::NiceU64;
use fyi_msg::Msg;



/// # Logger.
///
/// Implementations must be safe to share across threads.
pub trait Logger: Send + Sync {
	/// # Error.
	///
	/// Line and column are 1-based; zero means the position is unknown.
	fn error(
		&self,
		category: ErrorCategory,
		message: &str,
		file_context: &str,
		line: usize,
		column: usize,
		source_fragment: &str,
	);

	/// # Warning.
	fn warn(
		&self,
		category: ErrorCategory,
		message: &str,
		file_context: &str,
		line: usize,
		column: usize,
		source_fragment: &str,
	);

	/// # Info.
	fn info(
		&self,
		category: ErrorCategory,
		message: &str,
		file_context: &str,
		statistics: Option<&MinificationStatistics>,
	);
}



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Null Logger.
pub struct NullLogger;

impl Logger for NullLogger {
	#[inline]
	fn error(&self, _: ErrorCategory, _: &str, _: &str, _: usize, _: usize, _: &str) {}

	#[inline]
	fn warn(&self, _: ErrorCategory, _: &str, _: &str, _: usize, _: usize, _: &str) {}

	#[inline]
	fn info(&self, _: ErrorCategory, _: &str, _: &str, _: Option<&MinificationStatistics>) {}
}



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Console Logger.
///
/// Pretty-print everything to STDERR.
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
	fn error(
		&self,
		category: ErrorCategory,
		message: &str,
		file_context: &str,
		line: usize,
		column: usize,
		source_fragment: &str,
	) {
		Msg::error(located(category, message, file_context, line, column, source_fragment))
			.eprint();
	}

	fn warn(
		&self,
		category: ErrorCategory,
		message: &str,
		file_context: &str,
		line: usize,
		column: usize,
		source_fragment: &str,
	) {
		Msg::warning(located(category, message, file_context, line, column, source_fragment))
			.eprint();
	}

	fn info(
		&self,
		category: ErrorCategory,
		message: &str,
		file_context: &str,
		statistics: Option<&MinificationStatistics>,
	) {
		let mut out = format!("[{}] {message}", category.as_str());
		if ! file_context.is_empty() {
			out.push_str(" (");
			out.push_str(file_context);
			out.push(')');
		}

		if let Some(stats) = statistics {
			out.push_str(&format!(
				"\n    {} → {} bytes ({:.2}% saved); gzipped {} → {} bytes ({:.2}% saved); {:.3}s.",
				NiceU64::from(stats.original_size()),
				NiceU64::from(stats.minified_size()),
				stats.saved_percent(),
				NiceU64::from(stats.original_gzip_size()),
				NiceU64::from(stats.minified_gzip_size()),
				stats.gzip_saved_percent(),
				stats.duration().as_secs_f64(),
			));
		}

		Msg::info(out).eprint();
	}
}



#[must_use]
/// # Format Located Message.
fn located(
	category: ErrorCategory,
	message: &str,
	file_context: &str,
	line: usize,
	column: usize,
	source_fragment: &str,
) -> String {
	let mut out = format!("[{}] {message}", category.as_str());
	match (file_context.is_empty(), line) {
		(true, 0) => {},
		(false, 0) => { out.push_str(&format!(" ({file_context})")); },
		(true, _) => { out.push_str(&format!(" (line {line}, column {column})")); },
		(false, _) => { out.push_str(&format!(" ({file_context}:{line}:{column})")); },
	}

	if ! source_fragment.is_empty() {
		out.push('\n');
		out.push_str(source_fragment);
	}

	out
}
