//! Shared test helpers for workspace crates.

use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Read a fixture as text with trailing line breaks removed.
pub fn read_fixture(name: &str) -> String {
	let path = fixture_path(name);
	let text = fs::read_to_string(&path).unwrap_or_else(|err| panic!("fixture {} is readable: {err}", path.display()));
	text.trim_end_matches(['\r', '\n']).to_owned()
}

/// Read and parse a JSON fixture.
pub fn read_json_fixture(name: &str) -> serde_json::Value {
	serde_json::from_str(&read_fixture(name)).unwrap_or_else(|err| panic!("fixture {name} is valid json: {err}"))
}
