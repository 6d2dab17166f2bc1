use crate::codec::{BendecError, DecodeOptions, RecordValue, Schema, UnionValue, Value};

fn schema() -> Schema {
	Schema::from_json_str(
		r#"[
			{ "kind": "Enum", "name": "AnimalKind", "underlying": "u8", "variants": [["Zebra", 1], ["Toucan", 2]] },
			{ "kind": "Struct", "name": "Zebra", "fields": [{ "name": "legs", "type": "u8" }] },
			{ "kind": "Struct", "name": "Toucan", "fields": [{ "name": "wingspan", "type": "u16" }] },
			{ "kind": "Union", "name": "Animal", "discriminant": "AnimalKind", "members": ["Zebra", "Toucan"] },
			{ "kind": "Struct", "name": "Point", "fields": [{ "name": "x", "type": "i16" }, { "name": "y", "type": "i16" }] },
			{ "kind": "Struct", "name": "Pen", "size": 15, "fields": [
				{ "name": "id", "type": "u32" },
				{ "name": "label", "type": "char", "length": 4 },
				{ "name": "pos", "type": "Point" },
				{ "name": "resident", "type": "Animal" }
			] },
			{ "kind": "Struct", "name": "Path", "fields": [{ "name": "points", "type": "Point", "length": 2 }] }
		]"#,
	)
	.expect("schema builds")
}

fn point(x: i16, y: i16) -> Value {
	RecordValue::builder("Point").field("x", x).field("y", y).build().into()
}

fn zebra_pen() -> Value {
	let zebra = RecordValue::builder("Zebra").field("legs", 4_u8).build();
	RecordValue::builder("Pen")
		.field("id", 7_u32)
		.field("label", "ab")
		.field("pos", point(-1, 2))
		.field("resident", UnionValue::new("Animal", "Zebra", zebra))
		.build()
		.into()
}

#[test]
fn fields_land_at_their_offsets() {
	let schema = schema();
	let pen = schema.codec("Pen").expect("Pen exists");

	let bytes = pen.to_bytes(&zebra_pen()).expect("encode succeeds");
	assert_eq!(
		bytes,
		[
			0x00, 0x00, 0x00, 0x07, // id
			b'a', b'b', 0x00, 0x00, // label
			0xff, 0xff, 0x00, 0x02, // pos
			0x01, 0x04, 0x00, // resident, zero-padded to the Toucan length
		]
	);
}

#[test]
fn nested_record_round_trips() {
	let schema = schema();
	let pen = schema.codec("Pen").expect("Pen exists");
	let value = zebra_pen();

	let bytes = pen.to_bytes(&value).expect("encode succeeds");
	let decoded = pen.decode(&bytes, 0).expect("decode succeeds");
	assert_eq!(decoded, value);

	let record = decoded.as_record().expect("record value");
	assert_eq!(record.get("pos").and_then(Value::as_record).and_then(|pos| pos.get("x")), Some(&Value::I64(-1)));
}

#[test]
fn decode_honours_offset() {
	let schema = schema();
	let path = schema.codec("Path").expect("Path exists");
	let value: Value = RecordValue::builder("Path").field("points", Value::Array(vec![point(1, 2), point(3, 4)])).build().into();

	let mut buf = vec![0xee_u8; 3];
	buf.extend(path.to_bytes(&value).expect("encode succeeds"));
	assert_eq!(path.decode(&buf, 3).expect("decode succeeds"), value);
}

#[test]
fn short_buffer_is_out_of_bounds() {
	let schema = schema();
	let pen = schema.codec("Pen").expect("Pen exists");
	let bytes = pen.to_bytes(&zebra_pen()).expect("encode succeeds");

	let err = pen.decode(&bytes[..14], 0).expect_err("one byte short");
	assert!(matches!(err, BendecError::OutOfBounds { need: 15, len: 14, .. }));

	let mut small = [0_u8; 14];
	let err = pen.encode(&zebra_pen(), &mut small, 0).expect_err("one byte short");
	assert!(matches!(err, BendecError::OutOfBounds { .. }));
}

#[test]
fn padding_is_checked_only_when_strict() {
	let schema = schema();
	let pen = schema.codec("Pen").expect("Pen exists");
	let mut bytes = pen.to_bytes(&zebra_pen()).expect("encode succeeds");
	bytes[14] = 0xaa;

	assert_eq!(pen.decode(&bytes, 0).expect("lenient decode succeeds"), zebra_pen());
	let err = pen.decode_with(&bytes, 0, &DecodeOptions::strict()).expect_err("padding is dirty");
	assert!(matches!(err, BendecError::NonZeroPadding { offset: 14, .. }));
}

#[test]
fn raw_chars_decode_as_bytes() {
	let schema = schema();
	let pen = schema.codec("Pen").expect("Pen exists");
	let bytes = pen.to_bytes(&zebra_pen()).expect("encode succeeds");
	let opt = DecodeOptions {
		char_arrays_as_string: false,
		..DecodeOptions::default()
	};

	let (value, used) = pen.decode_with(&bytes, 0, &opt).expect("decode succeeds");
	assert_eq!(used, 15);
	let label = value.as_record().and_then(|record| record.get("label")).expect("label present");
	assert_eq!(label, &Value::Array(vec![Value::U64(97), Value::U64(98), Value::U64(0), Value::U64(0)]));
}

#[test]
fn value_shape_is_checked_on_encode() {
	let schema = schema();
	let point_codec = schema.codec("Point").expect("Point exists");

	let missing: Value = RecordValue::builder("Point").field("x", 1_i16).build().into();
	assert!(matches!(point_codec.to_bytes(&missing), Err(BendecError::MissingField { field, .. }) if field == "y"));

	let extra: Value = RecordValue::builder("Point").field("x", 1_i16).field("y", 2_i16).field("z", 3_i16).build().into();
	assert!(matches!(point_codec.to_bytes(&extra), Err(BendecError::UnexpectedField { field, .. }) if field == "z"));

	let other: Value = RecordValue::builder("Zebra").field("legs", 4_u8).build().into();
	assert!(matches!(point_codec.to_bytes(&other), Err(BendecError::TypeNameMismatch { .. })));

	let too_big: Value = RecordValue::builder("Point").field("x", 40_000_u32).field("y", 0_i16).build().into();
	assert!(matches!(point_codec.to_bytes(&too_big), Err(BendecError::IntegerOutOfRange { width: 2, .. })));
}

#[test]
fn array_and_text_lengths_are_checked() {
	let schema = schema();
	let path = schema.codec("Path").expect("Path exists");
	let short: Value = RecordValue::builder("Path").field("points", Value::Array(vec![point(1, 2)])).build().into();
	assert!(matches!(path.to_bytes(&short), Err(BendecError::ArrayLengthMismatch { expected: 2, got: 1 })));

	let pen = schema.codec("Pen").expect("Pen exists");
	let Value::Record(record) = zebra_pen() else {
		panic!("expected record");
	};
	let mut builder = RecordValue::builder("Pen");
	for field in record.fields() {
		builder = builder.field(&field.name, field.value.clone());
	}
	let long: Value = builder.field("label", "zebra").build().into();
	assert!(matches!(pen.to_bytes(&long), Err(BendecError::StringTooLong { len: 5, capacity: 4 })));
}

#[test]
fn untyped_literals_and_field_order_still_compare_equal() {
	let schema = schema();
	let pen = schema.codec("Pen").expect("Pen exists");

	let zebra = RecordValue::builder("Zebra").field("legs", 4).build();
	let shuffled: Value = RecordValue::builder("Pen")
		.field("resident", UnionValue::new("Animal", "Zebra", zebra))
		.field("pos", RecordValue::builder("Point").field("y", 2).field("x", -1).build())
		.field("label", "ab")
		.field("id", 7)
		.build()
		.into();

	let bytes = pen.to_bytes(&shuffled).expect("encode succeeds");
	assert_eq!(bytes, pen.to_bytes(&zebra_pen()).expect("encode succeeds"));
	let decoded = pen.decode(&bytes, 0).expect("decode succeeds");
	assert_eq!(decoded, shuffled);
	assert_eq!(decoded, zebra_pen());

	assert_ne!(Value::U64(u64::MAX), Value::I64(-1));
	assert_ne!(point(1, 2), point(2, 1));
}

fn tag_schema() -> Schema {
	Schema::from_json_str(
		r#"[{ "kind": "Struct", "name": "Tag", "fields": [{ "name": "code", "type": "char", "length": 2 }, { "name": "mark", "type": "char" }] }]"#,
	)
	.expect("schema builds")
}

#[test]
fn text_that_is_not_utf8_decodes_as_bytes() {
	let schema = tag_schema();
	let tag = schema.codec("Tag").expect("Tag exists");
	let bytes = [0xe9, 0x41, 0xe9];

	let value = tag.decode(&bytes, 0).expect("decode succeeds");
	let record = value.as_record().expect("record value");
	assert_eq!(record.get("code"), Some(&Value::Array(vec![Value::U64(0xe9), Value::U64(0x41)])));
	assert_eq!(record.get("mark"), Some(&Value::U64(0xe9)));
	assert_eq!(tag.to_bytes(&value).expect("re-encode succeeds"), bytes);

	let value = tag.decode(&[b'o', b'k', b'!'], 0).expect("decode succeeds");
	let record = value.as_record().expect("record value");
	assert_eq!(record.get("code"), Some(&Value::from("ok")));
	assert_eq!(record.get("mark"), Some(&Value::from("!")));
}

#[test]
fn raw_chars_apply_to_single_chars() {
	let schema = tag_schema();
	let tag = schema.codec("Tag").expect("Tag exists");
	let opt = DecodeOptions {
		char_arrays_as_string: false,
		..DecodeOptions::default()
	};

	let (value, used) = tag.decode_with(&[b'o', b'k', b'!'], 0, &opt).expect("decode succeeds");
	assert_eq!(used, 3);
	let record = value.as_record().expect("record value");
	assert_eq!(record.get("mark"), Some(&Value::U64(u64::from(b'!'))));
	assert_eq!(tag.to_bytes(&value).expect("re-encode succeeds"), [b'o', b'k', b'!']);
}
