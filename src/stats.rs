/*!
# MarkMinL: Statistics.
*/

use flate2::{
	Compression,
	write::GzEncoder,
};
use std::{
	io::Write,
	time::Duration,
};



#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// # Minification Statistics.
///
/// Before and after sizes (raw and gzipped) for a single minification run,
/// along with how long it took.
pub struct MinificationStatistics {
	/// # Original Size.
	original_size: u64,

	/// # Original Size (Gzipped).
	original_gzip_size: u64,

	/// # Minified Size.
	minified_size: u64,

	/// # Minified Size (Gzipped).
	minified_gzip_size: u64,

	/// # Duration.
	duration: Duration,
}

impl MinificationStatistics {
	#[must_use]
	/// # New.
	pub fn new(original: &str, minified: &str, duration: Duration) -> Self {
		Self {
			original_size: original.len() as u64,
			original_gzip_size: gzip_len(original.as_bytes()),
			minified_size: minified.len() as u64,
			minified_gzip_size: gzip_len(minified.as_bytes()),
			duration,
		}
	}

	#[must_use]
	/// # Original Size (Bytes).
	pub const fn original_size(&self) -> u64 { self.original_size }

	#[must_use]
	/// # Original Gzip Size (Bytes).
	pub const fn original_gzip_size(&self) -> u64 { self.original_gzip_size }

	#[must_use]
	/// # Minified Size (Bytes).
	pub const fn minified_size(&self) -> u64 { self.minified_size }

	#[must_use]
	/// # Minified Gzip Size (Bytes).
	pub const fn minified_gzip_size(&self) -> u64 { self.minified_gzip_size }

	#[must_use]
	/// # Duration.
	pub const fn duration(&self) -> Duration { self.duration }

	#[must_use]
	/// # Bytes Saved.
	///
	/// This can be negative if the "minified" version is bigger.
	pub const fn saved(&self) -> i64 { diff(self.original_size, self.minified_size) }

	#[must_use]
	/// # Gzip Bytes Saved.
	pub const fn gzip_saved(&self) -> i64 {
		diff(self.original_gzip_size, self.minified_gzip_size)
	}

	#[must_use]
	/// # Percent Saved.
	///
	/// Returns `0.0` if the original was empty.
	pub fn saved_percent(&self) -> f64 { percent(self.saved(), self.original_size) }

	#[must_use]
	/// # Gzip Percent Saved.
	pub fn gzip_saved_percent(&self) -> f64 {
		percent(self.gzip_saved(), self.original_gzip_size)
	}
}



#[must_use]
/// # Gzipped Length.
///
/// Writing to a `Vec` can't fail, but the encoder doesn't know that; a
/// failure just counts as zero.
fn gzip_len(raw: &[u8]) -> u64 {
	let mut enc = GzEncoder::new(Vec::with_capacity(raw.len() / 2 + 32), Compression::default());
	enc.write_all(raw)
		.and_then(|()| enc.finish())
		.map_or(0, |out| out.len() as u64)
}

#[must_use]
#[expect(clippy::cast_possible_wrap, reason = "Document sizes are nowhere near that big.")]
/// # Signed Difference.
const fn diff(before: u64, after: u64) -> i64 { before as i64 - after as i64 }

#[must_use]
#[expect(clippy::cast_precision_loss, reason = "Close enough for a percentage.")]
/// # Percent.
fn percent(saved: i64, total: u64) -> f64 {
	if total == 0 { 0.0 }
	else { saved as f64 * 100.0 / total as f64 }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_stats() {
		let original = "<p>   Hello   World   </p>   ".repeat(20);
		let minified = "<p>Hello World</p>".repeat(20);
		let stats = MinificationStatistics::new(&original, &minified, Duration::from_millis(3));

		assert_eq!(stats.original_size(), original.len() as u64);
		assert_eq!(stats.minified_size(), minified.len() as u64);
		assert_eq!(stats.saved(), (original.len() - minified.len()) as i64);
		assert!(stats.saved_percent() > 0.0 && stats.saved_percent() < 100.0);
		assert!(stats.original_gzip_size() > 0);
		assert!(stats.minified_gzip_size() > 0);
		assert_eq!(stats.duration(), Duration::from_millis(3));
	}

	#[test]
	fn t_empty() {
		let stats = MinificationStatistics::new("", "", Duration::ZERO);
		assert_eq!(stats.original_size(), 0);
		assert_eq!(stats.saved_percent(), 0.0);

		// Gzip has overhead even for nothing.
		assert!(stats.original_gzip_size() > 0);
		assert_eq!(stats.gzip_saved(), 0);
		assert_eq!(stats.gzip_saved_percent(), 0.0);
	}
}
