use serde_json::json;

use crate::stream::{CodecError, PatternNodeError, RawValue, SchemaNode, SchemaSpec, ValueNodeError, build_schema, coerce, map, unmap};

fn spec() -> SchemaSpec {
	SchemaSpec::from_value(json!({
		"8": {"kind": "mapping", "name": "gametype", "default": "0", "table": {
			"0": "Barricaded Suspects", "1": "VIP Escort", "3": "CO-OP", "5": "CO-OP"
		}},
		"9": {"kind": "number", "name": "round_num"},
		"27": {"kind": "list", "name": "players", "item": {"kind": "dict", "items": {
			"6": {"kind": "mapping", "name": "team", "table": {"0": "swat", "1": "suspects"}},
			"39": {"kind": "dict", "name": "loadout", "items": {
				"0": {"kind": "mapping", "name": "primary", "table": {"0": "None", "1": "M4 Super90", "2": "Nova Pump"}}
			}}
		}}}
	}))
	.expect("schema json is an object")
}

fn player(root: &SchemaNode) -> &SchemaNode {
	root.resolve("players").expect("players").item().expect("players is a list")
}

fn texts(values: &[&str]) -> RawValue {
	RawValue::Sequence(values.iter().map(|value| RawValue::from(*value)).collect())
}

#[test]
fn forward_and_reverse_round_trip_every_code() {
	let root = build_schema(&spec()).expect("schema builds");
	let player = player(&root);
	let table = player.resolve("team").expect("team").table().expect("team is a mapping");

	for (code, label) in table.iter() {
		let mapped = map(player, "team", code.into(), None).expect("code maps");
		assert_eq!(&mapped, label);
		let unmapped = unmap(player, "team", mapped, None).expect("label unmaps");
		assert_eq!(unmapped, RawValue::from(code));
	}
}

#[test]
fn batch_unmap_keeps_input_order() {
	let root = build_schema(&spec()).expect("schema builds");
	let player = player(&root);

	assert_eq!(unmap(player, "team", texts(&["swat", "suspects"]), None).expect("batch unmaps"), texts(&["0", "1"]));
	assert_eq!(unmap(player, "team", texts(&["suspects", "swat"]), None).expect("batch unmaps"), texts(&["1", "0"]));
	assert_eq!(
		unmap(player, "team", texts(&["swat", "suspects"]), Some(&coerce::to_int)).expect("batch unmaps"),
		RawValue::Sequence(vec![RawValue::Int(0), RawValue::Int(1)])
	);
	assert_eq!(
		map(player, "loadout__primary", texts(&["2", "1"]), None).expect("batch maps"),
		texts(&["Nova Pump", "M4 Super90"])
	);
}

#[test]
fn ambiguous_labels_reverse_to_every_code() {
	let spec = spec();
	assert_eq!(unmap(&spec, "gametype", "CO-OP".into(), None).expect("label unmaps"), texts(&["3", "5"]));
	assert_eq!(
		unmap(&spec, "gametype", "CO-OP".into(), Some(&coerce::to_int)).expect("label unmaps"),
		RawValue::Sequence(vec![RawValue::Int(3), RawValue::Int(5)])
	);
	assert_eq!(
		unmap(&spec, "gametype", texts(&["VIP Escort", "CO-OP"]), Some(&coerce::to_int)).expect("batch unmaps"),
		RawValue::Sequence(vec![RawValue::Int(1), RawValue::Int(3), RawValue::Int(5)])
	);
	assert_eq!(unmap(&spec, "gametype", "Barricaded Suspects".into(), Some(&coerce::to_int)), Ok(RawValue::Int(0)));
}

#[test]
fn failures_keep_schema_and_value_errors_apart() {
	let spec = spec();

	assert_eq!(
		unmap(&spec, "gametype", "Smash And Grab".into(), None),
		Err(CodecError::Value(ValueNodeError::Irreversible { value: "Smash And Grab".to_owned() }))
	);
	assert_eq!(map(&spec, "gametype", "7".into(), None), Err(CodecError::Value(ValueNodeError::Unmapped { value: "7".to_owned() })));
	assert_eq!(
		map(&spec, "round_num", "1".into(), None),
		Err(CodecError::Value(ValueNodeError::NotAMapping { path: "round_num".to_owned() }))
	);
	assert!(matches!(map(&spec, "mapname", "1".into(), None), Err(CodecError::Pattern(PatternNodeError::NoSuchField { .. }))));
	assert!(matches!(map(&spec, "", "1".into(), None), Err(CodecError::Pattern(PatternNodeError::InvalidPath { .. }))));

	let structure = RawValue::from_json(&json!({"a": "0"})).expect("test json has no nulls");
	assert!(matches!(map(&spec, "gametype", structure, None), Err(CodecError::Value(ValueNodeError::Unmapped { .. }))));

	let broken = SchemaSpec::from_value(json!({"0": {"kind": "mapping", "name": "x"}})).expect("schema json is an object");
	assert!(matches!(map(&broken, "x", "0".into(), None), Err(CodecError::Pattern(PatternNodeError::InvalidTable { .. }))));
}

#[test]
fn coercions_convert_scalars() {
	assert_eq!(coerce::to_int("42".into()), Ok(RawValue::Int(42)));
	assert_eq!(coerce::to_int(" -1 ".into()), Ok(RawValue::Int(-1)));
	assert_eq!(coerce::to_int(RawValue::Float(3.0)), Ok(RawValue::Int(3)));
	assert_eq!(coerce::to_int(RawValue::Bool(true)), Ok(RawValue::Int(1)));
	assert!(coerce::to_int("swat".into()).is_err());
	assert!(coerce::to_int(RawValue::Float(2.5)).is_err());

	assert_eq!(coerce::to_text(RawValue::Int(7)), Ok(RawValue::from("7")));
	assert_eq!(coerce::to_text("x".into()), Ok(RawValue::from("x")));
	assert!(coerce::to_text(RawValue::Sequence(Vec::new())).is_err());
}

mod fixtures_stream_schema {
	use julia_testkit::{read_fixture, read_json_fixture};

	use super::texts;
	use crate::stream::{Decoder, RawValue, SchemaSpec, coerce, decode_bracketed, decode_dotted, decode_flat, unmap};

	fn fixture_spec() -> SchemaSpec {
		SchemaSpec::from_value(read_json_fixture("stream_schema.json")).expect("fixture schema is an object")
	}

	#[test]
	fn both_wire_formats_decode_to_the_same_structure() {
		let bracketed = decode_bracketed(&read_fixture("stream_v1.txt"));
		let dotted = decode_dotted(&read_fixture("stream_v2.txt"));
		assert_eq!(bracketed, dotted);

		let mut auto: Decoder = decode_flat(&read_fixture("stream_v2.txt"));
		auto.expand_auto();
		assert_eq!(auto.into_raw(), bracketed);
	}

	#[test]
	fn stream_payload_parses_to_expected_tree() {
		let root = fixture_spec().build().expect("fixture schema builds");
		let expected = read_json_fixture("stream_expected.json");

		for (name, raw) in [
			("stream_v1.txt", decode_bracketed(&read_fixture("stream_v1.txt"))),
			("stream_v2.txt", decode_dotted(&read_fixture("stream_v2.txt"))),
		] {
			let value = root.parse(Some(raw)).expect("fixture payload parses").expect("present");
			assert_eq!(value.to_json(), expected, "parsed {name}");
		}
	}

	#[test]
	fn stream_payload_exposes_nested_values() {
		let root = fixture_spec().build().expect("fixture schema builds");
		let value = root.parse(Some(decode_bracketed(&read_fixture("stream_v1.txt")))).expect("parses").expect("present");

		let players = value.get("players").and_then(|players| players.items()).expect("players list");
		assert_eq!(players.len(), 2);
		let king = &players[1];
		assert_eq!(king.get("name").and_then(|name| name.as_text()), Some("[SU]King"));
		assert_eq!(king.get("vip").and_then(|vip| vip.as_bool()), Some(true));
		assert_eq!(king.get("team").map(|team| team.raw()), Some(&RawValue::from("1")));
		assert!(king.get("weapons").is_none());
	}

	#[test]
	fn tracker_style_constants_unmap_through_item_schema() {
		let root = fixture_spec().build().expect("fixture schema builds");
		let player = root.resolve("players").expect("players").item().expect("players is a list");

		let thrown = unmap(player, "loadout__primary", texts(&["Stinger", "CS Gas", "Flashbang"]), Some(&coerce::to_int)).expect("thrown weapons unmap");
		assert_eq!(thrown, RawValue::Sequence(vec![RawValue::Int(23), RawValue::Int(18), RawValue::Int(22)]));

		let coop = unmap(&root, "gametype", "CO-OP".into(), Some(&coerce::to_int)).expect("coop modes unmap");
		assert_eq!(coop, RawValue::Sequence(vec![RawValue::Int(3), RawValue::Int(5)]));
	}
}
