use std::path::PathBuf;

use julia::stream::{NodeKind, SchemaNode};
use serde_json::{Value, json};

use crate::cmd::Result;
use crate::cmd::util::{emit_json, item_scope, load_schema};

#[derive(clap::Args)]
pub struct Args {
	#[arg(long)]
	pub schema: PathBuf,
	/// `__`-separated external names of the node.
	#[arg(long)]
	pub path: String,
	/// Resolve `--path` inside the item schema of this sequence.
	#[arg(long)]
	pub item: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Describe the schema node at `--path`.
pub fn run(args: Args) -> Result<()> {
	let root = load_schema(&args.schema)?;
	let node = item_scope(&root, args.item.as_deref())?.resolve(&args.path)?;

	if args.json {
		return emit_json(&describe(&args.path, node));
	}

	println!("path: {}", args.path);
	println!("kind: {}", node.kind().label());
	println!("name: {}", node.name().unwrap_or("-"));
	println!("required: {}", node.is_required());
	match node.default_value() {
		Some(default) => println!("default: {default}"),
		None => println!("default: -"),
	}
	match node.kind() {
		NodeKind::Mapping(table) => {
			println!("table: {} entries", table.len());
			for (code, label) in table.iter() {
				println!("  {code} = {label}");
			}
		}
		NodeKind::Sequence(item) => println!("item: {}", item.kind().label()),
		NodeKind::Structure(fields) => {
			println!("fields: {}", fields.len());
			for (key, child) in fields.iter() {
				println!("  {key} = {} ({})", child.name().unwrap_or("-"), child.kind().label());
			}
		}
		NodeKind::String | NodeKind::Number | NodeKind::Boolean => {}
	}
	Ok(())
}

fn describe(path: &str, node: &SchemaNode) -> Value {
	let mut out = json!({
		"path": path,
		"kind": node.kind().label(),
		"name": node.name(),
		"required": node.is_required(),
		"default": node.default_value().map(|default| default.to_json()),
	});
	match node.kind() {
		NodeKind::Mapping(table) => {
			out["table"] = table.iter().map(|(code, label)| (code.to_owned(), label.to_json())).collect::<serde_json::Map<_, _>>().into();
		}
		NodeKind::Sequence(item) => out["item"] = json!(item.kind().label()),
		NodeKind::Structure(fields) => {
			out["fields"] = fields
				.iter()
				.map(|(key, child)| json!({"key": key, "name": child.name(), "kind": child.kind().label()}))
				.collect::<Vec<_>>()
				.into();
		}
		NodeKind::String | NodeKind::Number | NodeKind::Boolean => {}
	}
	out
}
