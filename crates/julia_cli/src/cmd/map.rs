use std::path::PathBuf;

use julia::stream::{Coerce, RawValue, coerce, map, unmap};
use log::debug;

use crate::cmd::Result;
use crate::cmd::util::{emit_json, item_scope, load_schema};

/// Translation direction of a codec command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	/// Wire code to label.
	Forward,
	/// Label to wire code.
	Reverse,
}

#[derive(clap::Args)]
pub struct Args {
	#[arg(long)]
	pub schema: PathBuf,
	/// `__`-separated external names of the mapping node.
	#[arg(long)]
	pub path: String,
	/// Resolve `--path` inside the item schema of this sequence.
	#[arg(long)]
	pub item: Option<String>,
	/// Codes or labels; more than one is translated as a batch.
	#[arg(required = true, num_args = 1..)]
	pub values: Vec<String>,
	/// Convert every result to an integer.
	#[arg(long)]
	pub int: bool,
	#[arg(long)]
	pub json: bool,
}

/// Translate values through the mapping node at `--path`.
pub fn run(args: Args, direction: Direction) -> Result<()> {
	let root = load_schema(&args.schema)?;
	let scope = item_scope(&root, args.item.as_deref())?;

	let mut values: Vec<RawValue> = args.values.into_iter().map(RawValue::Text).collect();
	let input = if values.len() == 1 { values.remove(0) } else { RawValue::Sequence(values) };
	let hook: Option<Coerce<'_>> = if args.int { Some(&coerce::to_int) } else { None };

	debug!("{direction:?} translating {input} through {}", args.path);
	let output = match direction {
		Direction::Forward => map(scope, &args.path, input, hook)?,
		Direction::Reverse => unmap(scope, &args.path, input, hook)?,
	};

	if args.json {
		return emit_json(&output.to_json());
	}
	match output {
		RawValue::Sequence(items) => items.iter().for_each(|item| println!("{item}")),
		single => println!("{single}"),
	}
	Ok(())
}
