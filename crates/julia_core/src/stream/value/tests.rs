use serde_json::{Value, json};

use super::is_int_literal;
use crate::stream::{Number, Parsed, RawValue, SchemaNode, SchemaSpec, ValueNodeError, build_schema, decode_bracketed};

fn raw(value: Value) -> RawValue {
	RawValue::from_json(&value).expect("test json has no nulls")
}

fn schema(value: Value) -> SchemaNode {
	build_schema(&SchemaSpec::from_value(value).expect("schema json is an object")).expect("schema builds")
}

fn parse_json(node: &SchemaNode, input: Value) -> Result<Value, ValueNodeError> {
	node.parse(Some(raw(input))).map(|value| value.map_or(Value::Null, |value| value.to_json()))
}

#[test]
fn int_literals_follow_integer_syntax() {
	for text in ["0", "10", "-10", "+7", "1_000", "0001"] {
		assert!(is_int_literal(text), "{text:?} should be an int literal");
	}
	for text in ["", "-", "1.0", "-10.1", "1__0", "_1", "1_", "foo", "0x10", "1e5"] {
		assert!(!is_int_literal(text), "{text:?} should not be an int literal");
	}
}

#[test]
fn string_node_coerces_scalars() {
	let node = SchemaNode::string();
	let cases = [
		(RawValue::from("swat"), "swat"),
		(RawValue::from(""), ""),
		(RawValue::Int(42), "42"),
		(RawValue::Float(1.5), "1.5"),
		(RawValue::Bool(true), "true"),
	];
	for (input, expected) in cases {
		let value = node.parse(Some(input)).expect("string parses").expect("present");
		assert_eq!(value.as_text(), Some(expected));
	}

	let err = node.parse(Some(raw(json!(["a"])))).expect_err("sequence is not a string");
	assert!(matches!(err, ValueNodeError::BadValue { expected: "string", .. }));
}

#[test]
fn number_node_coerces_numeric_text() {
	let node = SchemaNode::number();
	let cases = [
		(RawValue::from("10480"), Number::Int(10480)),
		(RawValue::from(" -3 "), Number::Int(-3)),
		(RawValue::from("1_000"), Number::Int(1000)),
		(RawValue::from("1.25"), Number::Float(1.25)),
		(RawValue::from("1e3"), Number::Float(1000.0)),
		(RawValue::Int(7), Number::Int(7)),
		(RawValue::Float(0.5), Number::Float(0.5)),
		(RawValue::Bool(true), Number::Int(1)),
	];
	for (input, expected) in cases {
		let value = node.parse(Some(input.clone())).expect("number parses").expect("present");
		assert_eq!(value.as_number(), Some(expected), "number from {input}");
	}

	for input in ["", "foo", "1.2.3"] {
		let err = node.parse(Some(input.into())).expect_err("not a number");
		assert_eq!(err.to_string(), format!("{input} is not a valid number"));
	}
}

#[test]
fn boolean_node_requires_integer_literals() {
	let node = SchemaNode::boolean();
	let cases = [
		(RawValue::from("0"), false),
		(RawValue::from("1"), true),
		(RawValue::from("-1"), true),
		(RawValue::from("000"), false),
		(RawValue::from("10"), true),
		(RawValue::Int(0), false),
		(RawValue::Float(0.9), false),
		(RawValue::Float(-2.5), true),
		(RawValue::Bool(true), true),
	];
	for (input, expected) in cases {
		let value = node.parse(Some(input.clone())).expect("boolean parses").expect("present");
		assert_eq!(value.as_bool(), Some(expected), "boolean from {input}");
	}

	for input in ["-10.1", "foo", "", "true"] {
		let err = node.parse(Some(input.into())).expect_err("not a boolean");
		assert_eq!(err.to_string(), format!("{input} is not a valid boolean value"));
	}
	assert!(node.parse(Some(RawValue::Float(f64::NAN))).is_err());
}

#[test]
fn mapping_node_matches_text_codes_exactly() {
	let node = schema(json!({"0": {"kind": "mapping", "name": "team", "table": {"0": "swat", "1": "suspects"}}}));
	assert_eq!(parse_json(&node, json!({"0": "1"})).expect("mapped"), json!({"team": "suspects"}));

	let err = parse_json(&node, json!({"0": "2"})).expect_err("unknown code");
	assert_eq!(err.to_string(), "team: failed to map 2");

	let err = parse_json(&node, json!({"0": 0})).expect_err("integer is not a code");
	assert!(matches!(err.root_cause(), ValueNodeError::Unmapped { .. }));
}

#[test]
fn required_overrides_default() {
	let node = schema(json!({
		"0": {"kind": "string", "name": "tag", "required": true, "default": "fallback"},
		"1": {"kind": "number", "name": "port", "default": "10480"},
		"2": {"kind": "string", "name": "hostname"}
	}));

	let err = parse_json(&node, json!({})).expect_err("required field missing");
	assert_eq!(err, ValueNodeError::nested("tag", ValueNodeError::MissingRequired { name: "tag".to_owned() }));
	assert_eq!(err.to_string(), "tag: tag requires a value");

	let value = node.parse(Some(raw(json!({"0": "MOD"})))).expect("parses").expect("present");
	assert_eq!(value.to_json(), json!({"tag": "MOD", "port": 10480, "hostname": null}));
	assert_eq!(value.get("port").map(|port| port.raw()), Some(&RawValue::from("10480")));
	assert!(value.contains("hostname"));
	assert!(value.get("hostname").is_none());
	assert!(!value.contains("missing"));
}

#[test]
fn absent_root_values() {
	let optional = SchemaNode::number();
	assert_eq!(optional.parse(None).expect("absent optional"), None);

	let defaulted = SchemaNode::number().with_default(5);
	let value = defaulted.parse(None).expect("default parses").expect("present");
	assert_eq!(value.as_number(), Some(Number::Int(5)));

	let required = SchemaNode::boolean().required(true).with_default("1");
	assert_eq!(required.parse(None), Err(ValueNodeError::MissingRequired { name: "boolean".to_owned() }));
}

#[test]
fn structures_are_closed_world() {
	let node = schema(json!({"0": {"kind": "string", "name": "tag"}}));
	let err = parse_json(&node, json!({"0": "a", "7": "x", "9": "y"})).expect_err("unexpected keys");
	assert_eq!(err, ValueNodeError::UnexpectedKeys { keys: vec!["7".to_owned(), "9".to_owned()] });
	assert_eq!(err.to_string(), "the dict keys 7, 9 are not expected");

	let err = parse_json(&node, json!("flat")).expect_err("not a structure");
	assert!(matches!(err, ValueNodeError::NotAStructure { .. }));
}

#[test]
fn structures_accept_key_value_pairs() {
	let node = schema(json!({"0": {"kind": "string", "name": "tag"}, "1": {"kind": "bool", "name": "ok"}}));
	assert_eq!(parse_json(&node, json!([["0", "x"], ["1", "1"]])).expect("pairs parse"), json!({"tag": "x", "ok": true}));
	assert!(matches!(parse_json(&node, json!([["0"]])), Err(ValueNodeError::NotAStructure { .. })));
}

#[test]
fn sequences_accept_lists_and_structures() {
	let node = schema(json!({"0": {"kind": "list", "name": "ids", "item": {"kind": "number"}}}));
	assert_eq!(parse_json(&node, json!({"0": ["1", "2"]})).expect("list parses"), json!({"ids": [1, 2]}));
	assert_eq!(parse_json(&node, json!({"0": {"5": "7", "2": "3"}})).expect("structure parses"), json!({"ids": [7, 3]}));

	let err = parse_json(&node, json!({"0": "1"})).expect_err("scalar is not a list");
	assert_eq!(err.to_string(), "ids: 1 is not a valid list");

	let err = parse_json(&node, json!({"0": ["1", "x"]})).expect_err("bad item");
	assert_eq!(err.field_path(), ["ids", "1"]);
	assert_eq!(err.to_string(), "ids: 1: x is not a valid number");
}

#[test]
fn nested_errors_carry_full_field_paths() {
	let node = schema(json!({
		"27": {"kind": "list", "name": "players", "item": {"kind": "dict", "items": {
			"0": {"kind": "number", "name": "id", "required": true},
			"5": {"kind": "enum", "name": "team", "table": {"0": "swat", "1": "suspects"}}
		}}}
	}));

	let payload = decode_bracketed("27[0][0]=0&27[0][5]=1&27[1][0]=1&27[1][5]=2");
	let err = node.parse(Some(payload)).expect_err("second player has a bad team");
	assert_eq!(err.field_path(), ["players", "1", "team"]);
	assert_eq!(err.to_string(), "players: 1: team: failed to map 2");
	assert!(matches!(err.root_cause(), ValueNodeError::Unmapped { value } if value == "2"));
}

#[test]
fn end_to_end_tag_and_flag() {
	let node = schema(json!({
		"0": {"kind": "string", "name": "tag", "required": true},
		"1": {"kind": "boolean", "name": "ok"}
	}));

	let value = node.parse(Some(decode_bracketed("0=tag1&1=1"))).expect("parses").expect("present");
	assert_eq!(value.to_json(), json!({"tag": "tag1", "ok": true}));
	assert!(matches!(value.value(), Parsed::Structure(children) if children.len() == 2));
	assert_eq!(value.get("tag").and_then(|tag| tag.pattern().name()), Some("tag"));

	let err = node.parse(Some(decode_bracketed("1=1"))).expect_err("tag missing");
	assert_eq!(err.field_path(), ["tag"]);
}

#[test]
fn parsed_values_expose_items_and_labels() {
	let node = schema(json!({
		"0": {"kind": "list", "name": "teams", "item": {"kind": "mapping", "table": {"0": "swat", "1": "suspects"}}}
	}));
	let value = node.parse(Some(raw(json!({"0": ["1", "0"]})))).expect("parses").expect("present");
	let teams = value.get("teams").and_then(|teams| teams.items()).expect("teams list");
	let labels: Vec<_> = teams.iter().filter_map(|team| team.as_label()).cloned().collect();
	assert_eq!(labels, [RawValue::from("suspects"), RawValue::from("swat")]);
}
