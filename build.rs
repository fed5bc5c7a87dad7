/*!
# MarkMinL: Build
*/

use argyle::KeyWordsBuilder;
use std::path::PathBuf;



/// # Build.
///
/// Pre-compile the CLI keywords.
pub fn main() {
	println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");

	let mut builder = KeyWordsBuilder::default();
	builder.push_keys([
		"-h", "--help",
		"-p", "--progress",
		"-v", "--verbose",
		"-V", "--version",
	]);
	builder.push_keys_with_values([
		"-l", "--list",
		"-w", "--whitespace",
	]);
	builder.save(out_path("argyle.rs"));
}

/// # Output Path.
fn out_path(name: &str) -> PathBuf {
	std::fs::canonicalize(std::env::var("OUT_DIR").expect("Missing OUT_DIR."))
		.expect("Missing OUT_DIR.")
		.join(name)
}
