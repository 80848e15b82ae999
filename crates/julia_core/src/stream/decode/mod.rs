use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::map::Entry;
use log::{debug, trace, warn};
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::stream::{RawMap, RawValue};

static BRACKET_KEY: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(?P<head>[^\[\]]+)(?P<parts>(?:\[[^\[]+\])+)?(?P<append>\[\])?$").expect("bracket key pattern compiles"));

/// Limits applied while expanding compound keys.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum number of path components one key may expand into.
	pub max_depth: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self { max_depth: 32 }
	}
}

/// Flat multi-valued key/value map that expands in place into a nested structure.
///
/// A decoder is single-use: expansion rewrites its own entries, so every
/// payload gets a fresh instance and the result is handed off with
/// [`Decoder::into_raw`].
#[derive(Debug, Clone, Default)]
pub struct Decoder {
	entries: RawMap,
	options: DecodeOptions,
}

/// Decode a raw `&`-separated query string with default options.
pub fn decode_flat(raw: &str) -> Decoder {
	decode_flat_with(raw, DecodeOptions::default())
}

/// Decode a raw `&`-separated query string.
///
/// Repeated keys collect their values into a sequence in first-seen order.
pub fn decode_flat_with(raw: &str, options: DecodeOptions) -> Decoder {
	let mut decoder = Decoder::with_options(options);
	for (key, value) in split_pairs(raw) {
		if key.is_empty() {
			continue;
		}
		decoder.push(key, RawValue::Text(value));
	}
	debug!("decoded {} flat keys", decoder.len());
	decoder
}

/// Decode a bracket-encoded payload (`a[b][]=c`) into a nested structure.
pub fn decode_bracketed(raw: &str) -> RawValue {
	let mut decoder = decode_flat(raw);
	decoder.expand_bracket();
	decoder.into_raw()
}

/// Decode a dot-encoded payload (`a.b.c=d`) into a nested structure.
pub fn decode_dotted(raw: &str) -> RawValue {
	let mut decoder = decode_flat(raw);
	decoder.expand_dots();
	decoder.into_raw()
}

impl Decoder {
	/// Create an empty decoder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an empty decoder with explicit options.
	pub fn with_options(options: DecodeOptions) -> Self {
		Self {
			entries: RawMap::new(),
			options,
		}
	}

	/// Add one value; a key seen before turns into a sequence of its values.
	pub fn push(&mut self, key: String, value: RawValue) {
		match self.entries.entry(key) {
			Entry::Vacant(slot) => {
				slot.insert(value);
			}
			Entry::Occupied(mut slot) => match slot.get_mut() {
				RawValue::Sequence(items) => items.push(value),
				existing => {
					let first = std::mem::replace(existing, RawValue::Sequence(Vec::new()));
					*existing = RawValue::Sequence(vec![first, value]);
				}
			},
		}
	}

	/// Borrow the current entries.
	pub fn entries(&self) -> &RawMap {
		&self.entries
	}

	/// Look up one top-level entry.
	pub fn get(&self, key: &str) -> Option<&RawValue> {
		self.entries.get(key)
	}

	/// Number of top-level entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the decoder holds no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Hand off the entries as a `Structure` value.
	pub fn into_raw(self) -> RawValue {
		RawValue::Structure(self.entries)
	}

	/// Expand `head[part]...[part]` keys into nested structures.
	///
	/// A trailing `[]` appends to a sequence. Keys that do not fit the syntax
	/// are dropped. A deeper key always shadows a shallower one sharing its
	/// prefix, and `a[]` shadows a plain `a` in either order.
	pub fn expand_bracket(&mut self) -> &mut Self {
		let entries = std::mem::take(&mut self.entries);
		let mut out = RawMap::with_capacity(entries.len());
		// leaf paths written by `[]` keys
		let mut appended: HashSet<Vec<String>> = HashSet::new();

		for (key, value) in entries {
			let Some(path) = bracket_path(&key) else {
				debug!("dropping malformed bracket key {key:?}");
				continue;
			};
			if !self.within_depth(&key, &path.components) {
				continue;
			}
			trace!("expanding {key:?} into {:?}", path.components);

			if path.append {
				if appended.insert(path.components.clone()) {
					clear_leaf(&mut out, &path.components);
				}
			} else if appended.contains(&path.components) {
				trace!("dropping {value} shadowed by appends under {key:?}");
				continue;
			}

			let values = match value {
				RawValue::Sequence(items) => items,
				other => vec![other],
			};
			for value in values {
				let value = if path.append { RawValue::Sequence(vec![value]) } else { value };
				insert_path(&mut out, &path.components, value);
			}
		}

		self.entries = out;
		self
	}

	/// Expand `a.b.c` keys into nested structures.
	///
	/// Empty components are skipped and keys containing brackets are kept
	/// verbatim. Shadowing follows [`Decoder::expand_bracket`].
	pub fn expand_dots(&mut self) -> &mut Self {
		let entries = std::mem::take(&mut self.entries);
		let mut out = RawMap::with_capacity(entries.len());

		for (key, value) in entries {
			let components = dot_path(&key);
			if components.is_empty() {
				debug!("dropping component-less dotted key {key:?}");
				continue;
			}
			if !self.within_depth(&key, &components) {
				continue;
			}
			trace!("expanding {key:?} into {components:?}");
			insert_path(&mut out, &components, value);
		}

		self.entries = out;
		self
	}

	/// Expand dots when any key contains one, brackets otherwise.
	pub fn expand_auto(&mut self) -> &mut Self {
		if self.entries.keys().any(|key| key.contains('.')) {
			self.expand_dots()
		} else {
			self.expand_bracket()
		}
	}

	fn within_depth(&self, key: &str, components: &[String]) -> bool {
		if components.len() > self.options.max_depth {
			warn!("dropping key {key:?}: {} components exceed max depth {}", components.len(), self.options.max_depth);
			return false;
		}
		true
	}
}

impl FromIterator<(String, RawValue)> for Decoder {
	fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
		let mut decoder = Self::new();
		for (key, value) in iter {
			decoder.push(key, value);
		}
		decoder
	}
}

/// Split a raw query string into decoded `(key, value)` pairs.
///
/// Empty tokens are skipped, surrounding `=` are stripped from each token, and a
/// token without `=` gets an empty value.
pub(crate) fn split_pairs(raw: &str) -> Vec<(String, String)> {
	raw.split('&')
		.filter(|token| !token.is_empty())
		.map(|token| {
			let token = token.trim_matches('=');
			match token.split_once('=') {
				Some((key, value)) => (form_decode(key), form_decode(value)),
				None => (form_decode(token), String::new()),
			}
		})
		.collect()
}

fn form_decode(input: &str) -> String {
	let spaced = input.replace('+', " ");
	percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

struct BracketPath {
	components: Vec<String>,
	append: bool,
}

fn bracket_path(key: &str) -> Option<BracketPath> {
	let caps = BRACKET_KEY.captures(key)?;
	let mut components = vec![caps["head"].to_owned()];
	if let Some(parts) = caps.name("parts") {
		let parts = parts.as_str();
		components.extend(parts[1..parts.len() - 1].split("][").map(str::to_owned));
	}
	Some(BracketPath {
		components,
		append: caps.name("append").is_some(),
	})
}

fn dot_path(key: &str) -> Vec<String> {
	if key.contains(['[', ']']) {
		return vec![key.to_owned()];
	}
	key.split('.').map(str::trim).filter(|part| !part.is_empty()).map(str::to_owned).collect()
}

fn insert_path(root: &mut RawMap, components: &[String], value: RawValue) {
	let Some((last, parents)) = components.split_last() else {
		return;
	};

	let mut current = root;
	for key in parents {
		let slot = current.entry(key.clone()).or_insert_with(|| RawValue::Structure(RawMap::new()));
		if !matches!(slot, RawValue::Structure(_)) {
			trace!("shadowing {slot} with a nested structure");
			*slot = RawValue::Structure(RawMap::new());
		}
		let RawValue::Structure(map) = slot else {
			return;
		};
		current = map;
	}
	merge_leaf(current, last, value);
}

/// Empty a non-structure leaf so a `[]` key replaces what a plain key left there.
fn clear_leaf(root: &mut RawMap, components: &[String]) {
	let Some((last, parents)) = components.split_last() else {
		return;
	};

	let mut current = root;
	for key in parents {
		match current.get_mut(key) {
			Some(RawValue::Structure(map)) => current = map,
			_ => return,
		}
	}
	if let Some(slot) = current.get_mut(last) {
		if !matches!(slot, RawValue::Structure(_)) {
			trace!("dropping {slot} shadowed by appends at {last:?}");
			*slot = RawValue::Sequence(Vec::new());
		}
	}
}

fn merge_leaf(map: &mut RawMap, key: &str, value: RawValue) {
	let Some(existing) = map.get_mut(key) else {
		map.insert(key.to_owned(), value);
		return;
	};

	match (existing, value) {
		(RawValue::Structure(inner), RawValue::Structure(more)) => {
			for (key, value) in more {
				merge_leaf(inner, &key, value);
			}
		}
		(RawValue::Structure(_), shadowed) => trace!("dropping {shadowed} shadowed by structure at {key:?}"),
		(existing, value @ RawValue::Structure(_)) => *existing = value,
		(RawValue::Sequence(items), RawValue::Sequence(more)) => items.extend(more),
		(RawValue::Sequence(items), value) => items.push(value),
		(existing, value) => {
			let first = std::mem::replace(existing, RawValue::Sequence(Vec::new()));
			let mut items = vec![first];
			match value {
				RawValue::Sequence(more) => items.extend(more),
				other => items.push(other),
			}
			*existing = RawValue::Sequence(items);
		}
	}
}
