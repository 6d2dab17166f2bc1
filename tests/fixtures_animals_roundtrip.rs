#![allow(missing_docs)]

use bendec::codec::{BendecError, ByteLength, DecodeOptions, RecordValue, Schema, UnionValue, Value};
use bendec_testkit::{animals_schema_text, fixture_json};

fn schema() -> Schema {
	Schema::from_json_str(&animals_schema_text()).expect("animals schema builds")
}

fn header(id: u32, flags: &[&str]) -> Value {
	RecordValue::builder("Header")
		.field("id", id)
		.field("flags", Value::flags(flags.iter().copied()))
		.build()
		.into()
}

fn zebra() -> Value {
	let payload = RecordValue::builder("Zebra")
		.field("header", header(1, &["B"]))
		.field("legs", 4_u8)
		.field("name", "marty")
		.build();
	UnionValue::new("Animal", "Zebra", payload).into()
}

fn toucan() -> Value {
	let payload = RecordValue::builder("Toucan").field("header", header(2, &["A", "Long"])).field("wingspan", 0.75_f32).build();
	UnionValue::new("Animal", "Toucan", payload).into()
}

#[test]
fn single_byte_union_matches_wire_layout() {
	let schema = schema();
	let animal = schema.codec("Animal2").expect("Animal2 exists");
	let value: Value = UnionValue::new("Animal2", "Zebra2", RecordValue::builder("Zebra2").field("legs", 4_u8).build()).into();

	assert_eq!(animal.byte_length(), ByteLength::Fixed(2));
	assert_eq!(animal.to_bytes(&value).expect("encode succeeds"), [0x01, 0x04]);
	assert_eq!(animal.decode(&[0x01, 0x04], 0).expect("decode succeeds"), value);

	let err = animal.decode(&[0x03, 0x04], 0).expect_err("tag 3 is not declared");
	assert!(matches!(err, BendecError::UnknownDiscriminant { raw: 3, .. }));
}

#[test]
fn every_variant_round_trips_with_nested_records() {
	let schema = schema();
	let animal = schema.codec("Animal").expect("Animal exists");

	for value in [zebra(), toucan()] {
		let bytes = animal.to_bytes(&value).expect("encode succeeds");
		assert_eq!(bytes.len(), animal.encoded_len(&value).expect("length known"));
		assert!(bytes.len() <= animal.byte_length().max());

		let decoded = animal.decode(&bytes, 0).expect("decode succeeds");
		assert_eq!(decoded, value);

		let payload = decoded.as_union().expect("union value").payload();
		let nested = payload.get("header").and_then(Value::as_record).expect("nested header");
		assert!(nested.get("id").is_some());
		assert!(nested.get("flags").is_some());
	}
}

#[test]
fn record_with_union_slot_round_trips_from_json_fixture() {
	let schema = schema();
	let pen = schema.codec("Pen").expect("Pen exists");
	let fixture = fixture_json("pen.json");

	let value = pen.from_json(&fixture).expect("fixture matches schema");
	let bytes = pen.to_bytes(&value).expect("encode succeeds");
	assert_eq!(bytes.len(), 28);
	assert!(bytes[23..].iter().all(|byte| *byte == 0), "short variant leaves zero padding");

	let (decoded, used) = pen.decode_with(&bytes, 0, &DecodeOptions::strict()).expect("strict decode succeeds");
	assert_eq!(used, 28);
	assert_eq!(decoded, value);
	assert_eq!(pen.to_json(&decoded).expect("mirror succeeds"), fixture);
}

#[test]
fn alias_shares_its_target_codec() {
	let schema = schema();
	let price = schema.codec("Price").expect("Price exists");

	assert_eq!(price.name(), "u64");
	assert_eq!(price.to_bytes(&Value::U64(0x0102)).expect("encode succeeds"), [0, 0, 0, 0, 0, 0, 0x01, 0x02]);
}

#[test]
fn truncated_buffer_is_out_of_bounds_for_every_fixed_type() {
	let schema = schema();
	for name in ["Header", "Zebra", "Toucan", "Pen"] {
		let codec = schema.codec(name).expect("type exists");
		let ByteLength::Fixed(len) = codec.byte_length() else {
			panic!("{name} should have a fixed length");
		};
		let buf = vec![0_u8; len - 1];
		let err = codec.decode(&buf, 0).expect_err("buffer is one byte short");
		assert!(matches!(err, BendecError::OutOfBounds { need, .. } if need == len), "{name}: {err}");
	}
}
