use julia::stream::RawValue;

use crate::cmd::Result;
use crate::cmd::print::{PrintOptions, write_raw};
use crate::cmd::util::{PayloadArgs, emit_json};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub payload: PayloadArgs,
	#[arg(long)]
	pub json: bool,
}

/// Decode a payload and print the expanded structure.
pub fn run(args: Args) -> Result<()> {
	let raw = args.payload.decode()?;
	if args.json {
		return emit_json(&raw.to_json());
	}
	print_raw(&raw)
}

fn print_raw(raw: &RawValue) -> Result<()> {
	let mut out = String::new();
	write_raw(&mut out, raw, 0, PrintOptions::default())?;
	println!("{out}");
	Ok(())
}
