/*!
# MarkMinL: Diagnostics.
*/

use crate::{
	ErrorCategory,
	MinificationErrorInfo,
	source::{
		SourceCode,
		SourceCoordinates,
	},
};



#[derive(Debug, Default)]
/// # Diagnostics.
///
/// Recoverable errors and warnings collected over the course of a single
/// minification call.
pub(crate) struct Diagnostics {
	/// # Errors.
	pub(crate) errors: Vec<MinificationErrorInfo>,

	/// # Warnings.
	pub(crate) warnings: Vec<MinificationErrorInfo>,
}

impl Diagnostics {
	/// # Add Warning.
	pub(crate) fn warn<S>(
		&mut self,
		category: ErrorCategory,
		message: S,
		src: &SourceCode<'_>,
		offset: usize,
	)
	where S: Into<String> {
		self.warnings.push(info(category, message.into(), src, src.coordinates(offset)));
	}

	/// # Add Translated Error.
	///
	/// Record an error reported by an embedded fragment's minifier, moving
	/// its coordinates (if any) from fragment space to document space.
	pub(crate) fn error_at(
		&mut self,
		category: ErrorCategory,
		message: String,
		src: &SourceCode<'_>,
		coords: Option<SourceCoordinates>,
	) {
		self.errors.push(located(category, message, src, coords));
	}

	/// # Add Translated Warning.
	pub(crate) fn warn_at(
		&mut self,
		category: ErrorCategory,
		message: String,
		src: &SourceCode<'_>,
		coords: Option<SourceCoordinates>,
	) {
		self.warnings.push(located(category, message, src, coords));
	}

	#[must_use]
	/// # Has Errors?
	pub(crate) fn has_errors(&self) -> bool { ! self.errors.is_empty() }
}



/// # Build Info.
fn info(
	category: ErrorCategory,
	message: String,
	src: &SourceCode<'_>,
	coords: SourceCoordinates,
) -> MinificationErrorInfo {
	MinificationErrorInfo {
		category,
		message,
		line: coords.line,
		column: coords.column,
		source_fragment: src.fragment(coords),
	}
}

/// # Build Info (Maybe Unlocated).
fn located(
	category: ErrorCategory,
	message: String,
	src: &SourceCode<'_>,
	coords: Option<SourceCoordinates>,
) -> MinificationErrorInfo {
	match coords {
		Some(coords) => info(category, message, src, coords),
		None => MinificationErrorInfo {
			category,
			message,
			line: 0,
			column: 0,
			source_fragment: String::new(),
		},
	}
}
