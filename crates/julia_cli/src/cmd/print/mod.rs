use std::fmt::{self, Write};

use julia::stream::{Parsed, RawValue, ValueNode};

/// Output truncation limits for rendered values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of elements printed for sequences.
	pub max_array_items: usize,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_string_len: 200,
			max_array_items: 64,
		}
	}
}

/// Render a raw value tree starting at the current line position.
pub fn write_raw(out: &mut impl Write, value: &RawValue, indent: usize, options: PrintOptions) -> fmt::Result {
	match value {
		RawValue::Text(text) => write!(out, "\"{}\"", truncate(text, options.max_string_len)),
		RawValue::Sequence(items) => write_items(out, items, indent, options, |out, item, indent| write_raw(out, item, indent, options)),
		RawValue::Structure(map) => {
			if map.is_empty() {
				return out.write_str("{}");
			}
			let pad = " ".repeat(indent);
			out.write_str("{\n")?;
			for (key, item) in map {
				write!(out, "{pad}  {key} = ")?;
				write_raw(out, item, indent + 2, options)?;
				out.write_char('\n')?;
			}
			write!(out, "{pad}}}")
		}
		scalar => write!(out, "{scalar}"),
	}
}

/// Render a parsed value tree; absent optional fields print as `null`.
pub fn write_value(out: &mut impl Write, value: &ValueNode<'_>, indent: usize, options: PrintOptions) -> fmt::Result {
	match value.value() {
		Parsed::Text(text) => write!(out, "\"{}\"", truncate(text, options.max_string_len)),
		Parsed::Number(number) => write!(out, "{number}"),
		Parsed::Boolean(flag) => write!(out, "{flag}"),
		Parsed::Label(label) => write_raw(out, label, indent, options),
		Parsed::Sequence(items) => write_items(out, items, indent, options, |out, item, indent| write_value(out, item, indent, options)),
		Parsed::Structure(children) => {
			if children.is_empty() {
				return out.write_str("{}");
			}
			let pad = " ".repeat(indent);
			out.write_str("{\n")?;
			for (name, child) in children {
				write!(out, "{pad}  {name} = ")?;
				match child {
					Some(child) => write_value(out, child, indent + 2, options)?,
					None => out.write_str("null")?,
				}
				out.write_char('\n')?;
			}
			write!(out, "{pad}}}")
		}
	}
}

fn write_items<W: Write, T>(
	out: &mut W,
	items: &[T],
	indent: usize,
	options: PrintOptions,
	mut write_item: impl FnMut(&mut W, &T, usize) -> fmt::Result,
) -> fmt::Result {
	if items.is_empty() {
		return out.write_str("[]");
	}
	let pad = " ".repeat(indent);
	out.write_str("[\n")?;
	for item in items.iter().take(options.max_array_items) {
		write!(out, "{pad}  ")?;
		write_item(out, item, indent + 2)?;
		out.write_char('\n')?;
	}
	if items.len() > options.max_array_items {
		writeln!(out, "{pad}  ... {} more", items.len() - options.max_array_items)?;
	}
	write!(out, "{pad}]")
}

fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}
