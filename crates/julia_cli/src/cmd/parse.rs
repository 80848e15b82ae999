use std::path::PathBuf;

use log::debug;

use crate::cmd::Result;
use crate::cmd::print::{PrintOptions, write_value};
use crate::cmd::util::{PayloadArgs, emit_json, load_schema};

#[derive(clap::Args)]
pub struct Args {
	#[arg(long)]
	pub schema: PathBuf,
	#[command(flatten)]
	pub payload: PayloadArgs,
	#[arg(long)]
	pub json: bool,
}

/// Decode a payload, parse it against a schema, and print the value tree.
pub fn run(args: Args) -> Result<()> {
	let root = load_schema(&args.schema)?;
	let raw = args.payload.decode()?;
	let Some(value) = root.parse(Some(raw))? else {
		debug!("schema root produced no value");
		println!("null");
		return Ok(());
	};

	if args.json {
		return emit_json(&value.to_json());
	}
	let mut out = String::new();
	write_value(&mut out, &value, 0, PrintOptions::default())?;
	println!("{out}");
	Ok(())
}
