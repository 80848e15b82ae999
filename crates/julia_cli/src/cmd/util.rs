use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use julia::stream::{DecodeOptions, RawValue, SchemaNode, SchemaSpec, decode_flat_with};
use log::debug;
use serde::Serialize;

use crate::cmd::{CliError, Result};

/// Nested key syntax used by a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
	/// Dots when any key has one, brackets otherwise.
	Auto,
	/// `a[b][]=c` keys.
	Bracket,
	/// `a.b.c=d` keys.
	Dot,
}

/// Payload source and decoding flags shared by `decode` and `parse`.
#[derive(clap::Args)]
pub struct PayloadArgs {
	/// Raw query string; read from stdin when omitted or `-`.
	pub payload: Option<String>,
	#[arg(long, value_enum, default_value_t = Format::Auto)]
	pub format: Format,
	/// Maximum number of components one key may expand into.
	#[arg(long)]
	pub depth: Option<usize>,
}

impl PayloadArgs {
	/// Read and decode the payload into its nested raw structure.
	pub fn decode(self) -> Result<RawValue> {
		let text = read_payload(self.payload)?;
		let mut options = DecodeOptions::default();
		if let Some(depth) = self.depth {
			options.max_depth = depth;
		}

		let mut decoder = decode_flat_with(&text, options);
		match self.format {
			Format::Auto => decoder.expand_auto(),
			Format::Bracket => decoder.expand_bracket(),
			Format::Dot => decoder.expand_dots(),
		};
		Ok(decoder.into_raw())
	}
}

/// Resolve the payload argument, falling back to stdin.
pub(crate) fn read_payload(payload: Option<String>) -> Result<String> {
	let text = match payload {
		Some(text) if text != "-" => text,
		_ => {
			let mut text = String::new();
			io::stdin().read_to_string(&mut text).map_err(CliError::Stdin)?;
			text
		}
	};
	Ok(text.trim_end_matches(['\r', '\n']).to_owned())
}

/// Load and build a JSON schema file.
pub(crate) fn load_schema(path: &Path) -> Result<SchemaNode> {
	let file = File::open(path).map_err(|source| CliError::SchemaFile {
		path: path.to_owned(),
		source,
	})?;
	let spec = SchemaSpec::from_reader(BufReader::new(file))?;
	debug!("loaded schema {} with {} top-level fields", path.display(), spec.len());
	Ok(spec.build()?)
}

/// Narrow `root` to the item schema of the sequence at `item`, when given.
pub(crate) fn item_scope<'s>(root: &'s SchemaNode, item: Option<&str>) -> Result<&'s SchemaNode> {
	let Some(item) = item else {
		return Ok(root);
	};
	root.resolve(item)?
		.item()
		.ok_or_else(|| CliError::NotASequence { path: item.to_owned() })
}

/// Print a serializable value as pretty JSON on stdout.
pub(crate) fn emit_json(value: &impl Serialize) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}
