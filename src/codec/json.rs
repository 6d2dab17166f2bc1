//! JSON mirror: object per record, enum by name, unions flattened beside their discriminator key.

use serde_json::{Map, Value as JsonValue};

use crate::codec::enums::check_enum;
use crate::codec::record::{check_record, expect_record, is_char_array};
use crate::codec::union::{check_embedded_tag, expect_union, member, variant_by_name};
use crate::codec::{BendecError, Discriminator, Field, Primitive, RecordDef, RecordValue, Result, ScalarKind, Schema, TypeId, TypeKind, UnionValue, Value};

pub(crate) fn value_to_json(schema: &Schema, id: TypeId, value: &Value) -> Result<JsonValue> {
	let def = schema.get(id);
	match &def.kind {
		TypeKind::Primitive(prim) => primitive_to_json(*prim, value),
		TypeKind::Enum(item) => {
			check_enum(&def.name, item, value)?;
			Ok(match value {
				Value::Flags(names) => JsonValue::Array(names.iter().map(|name| JsonValue::String(name.to_string())).collect()),
				Value::Enum(name) => JsonValue::String(name.to_string()),
				other => {
					return Err(BendecError::ValueMismatch {
						expected: "enum",
						got: other.kind_label(),
					});
				}
			})
		}
		TypeKind::Record(item) => {
			let record = expect_record(&def.name, item, value)?;
			Ok(JsonValue::Object(record_to_json(schema, &def.name, item, record)?))
		}
		TypeKind::Union(item) => {
			let union = expect_union(&def.name, value)?;
			let variant = variant_by_name(&def.name, item, union.variant())?;
			let (member_name, member_def) = member(schema, &def.name, variant)?;
			check_record(member_name, member_def, union.payload())?;

			let mut out = Map::new();
			match &item.discriminator {
				Discriminator::Key(key) => {
					out.insert(key.to_string(), JsonValue::String(variant.name.to_string()));
				}
				Discriminator::Path(path) => check_embedded_tag(&def.name, path, variant, union.payload())?,
			}
			out.extend(record_to_json(schema, member_name, member_def, union.payload())?);
			Ok(JsonValue::Object(out))
		}
	}
}

pub(crate) fn value_from_json(schema: &Schema, id: TypeId, json: &JsonValue, path: &str) -> Result<Value> {
	let def = schema.get(id);
	match &def.kind {
		TypeKind::Primitive(prim) => primitive_from_json(*prim, json, path),
		TypeKind::Enum(item) => {
			let value = if item.bitflags {
				let names = json.as_array().ok_or_else(|| mismatch(path, "array of flag names"))?;
				let names = names
					.iter()
					.map(|name| name.as_str().map(Box::from).ok_or_else(|| mismatch(path, "flag name")))
					.collect::<Result<Vec<_>>>()?;
				Value::Flags(names)
			} else {
				Value::Enum(json.as_str().ok_or_else(|| mismatch(path, "enum name"))?.into())
			};
			check_enum(&def.name, item, &value)?;
			Ok(value)
		}
		TypeKind::Record(item) => {
			let map = json.as_object().ok_or_else(|| mismatch(path, "object"))?;
			Ok(Value::Record(record_from_json(schema, &def.name, item, map, None, path)?))
		}
		TypeKind::Union(item) => {
			let map = json.as_object().ok_or_else(|| mismatch(path, "object"))?;
			let (tag, skip) = match &item.discriminator {
				Discriminator::Key(key) => (map.get(&**key), Some(&**key)),
				Discriminator::Path(keys) => (keys.iter().try_fold(json, |node, key| node.get(&**key)), None),
			};
			let tag = tag
				.and_then(JsonValue::as_str)
				.ok_or_else(|| mismatch(&format!("{path}.{}", item.discriminator.label()), "variant name"))?;
			let variant = variant_by_name(&def.name, item, tag)?;
			let (member_name, member_def) = member(schema, &def.name, variant)?;
			let payload = record_from_json(schema, member_name, member_def, map, skip, path)?;
			Ok(Value::Union(UnionValue::new(&def.name, &variant.name, payload)))
		}
	}
}

fn record_to_json(schema: &Schema, type_name: &str, def: &RecordDef, record: &RecordValue) -> Result<Map<String, JsonValue>> {
	let mut out = Map::new();
	for field in &def.fields {
		let item = record.get(&field.name).ok_or_else(|| BendecError::MissingField {
			type_name: type_name.to_owned(),
			field: field.name.to_string(),
		})?;
		out.insert(field.name.to_string(), field_to_json(schema, field, item)?);
	}
	Ok(out)
}

fn field_to_json(schema: &Schema, field: &Field, value: &Value) -> Result<JsonValue> {
	let Some(count) = field.count else {
		return value_to_json(schema, field.ty, value);
	};

	match value {
		Value::String(text) if is_char_array(schema, field) => {
			check_text_len(text, count)?;
			Ok(JsonValue::String(text.to_string()))
		}
		Value::Array(items) => {
			check_count(items.len(), count)?;
			items.iter().map(|item| value_to_json(schema, field.ty, item)).collect::<Result<Vec<_>>>().map(JsonValue::Array)
		}
		other => Err(BendecError::ValueMismatch {
			expected: "array",
			got: other.kind_label(),
		}),
	}
}

fn record_from_json(schema: &Schema, type_name: &str, def: &RecordDef, map: &Map<String, JsonValue>, skip: Option<&str>, path: &str) -> Result<RecordValue> {
	if let Some(extra) = map
		.keys()
		.find(|key| Some(key.as_str()) != skip && def.fields.iter().all(|field| *field.name != ***key))
	{
		return Err(BendecError::UnexpectedField {
			type_name: type_name.to_owned(),
			field: extra.clone(),
		});
	}

	let mut builder = RecordValue::builder(type_name);
	for field in &def.fields {
		let node = map.get(&*field.name).ok_or_else(|| BendecError::MissingField {
			type_name: type_name.to_owned(),
			field: field.name.to_string(),
		})?;
		let value = field_from_json(schema, field, node, &format!("{path}.{}", field.name))?;
		builder = builder.field(&field.name, value);
	}
	Ok(builder.build())
}

fn field_from_json(schema: &Schema, field: &Field, json: &JsonValue, path: &str) -> Result<Value> {
	let Some(count) = field.count else {
		return value_from_json(schema, field.ty, json, path);
	};

	if is_char_array(schema, field)
		&& let Some(text) = json.as_str()
	{
		check_text_len(text, count)?;
		return Ok(Value::from(text));
	}

	let items = json.as_array().ok_or_else(|| mismatch(path, "array"))?;
	check_count(items.len(), count)?;
	items
		.iter()
		.enumerate()
		.map(|(idx, item)| value_from_json(schema, field.ty, item, &format!("{path}[{idx}]")))
		.collect::<Result<Vec<_>>>()
		.map(Value::Array)
}

fn primitive_to_json(prim: Primitive, value: &Value) -> Result<JsonValue> {
	prim.encode(value, &mut [0_u8; 8], 0)?;
	Ok(match value {
		Value::Bool(v) => JsonValue::from(*v),
		Value::U64(v) => JsonValue::from(*v),
		Value::I64(v) => JsonValue::from(*v),
		Value::F32(v) => float_to_json(f64::from(*v)),
		Value::F64(v) => float_to_json(*v),
		Value::String(v) => JsonValue::String(v.to_string()),
		other => {
			return Err(BendecError::ValueMismatch {
				expected: prim.label(),
				got: other.kind_label(),
			});
		}
	})
}

fn primitive_from_json(prim: Primitive, json: &JsonValue, path: &str) -> Result<Value> {
	let value = match prim.kind {
		ScalarKind::Unsigned => json.as_u64().map(Value::U64).or_else(|| json.as_i64().map(Value::I64)),
		ScalarKind::Signed => json.as_i64().map(Value::I64).or_else(|| json.as_u64().map(Value::U64)),
		ScalarKind::Float if prim.width == 4 => float_from_json(json).map(|v| Value::F32(if v.is_nan() { f32::NAN } else { v as f32 })),
		ScalarKind::Float => float_from_json(json).map(Value::F64),
		ScalarKind::Bool => json.as_bool().map(Value::Bool),
		ScalarKind::Char => json.as_str().map(Value::from).or_else(|| json.as_u64().map(Value::U64)),
	}
	.ok_or_else(|| mismatch(path, prim.label()))?;

	prim.encode(&value, &mut [0_u8; 8], 0)?;
	Ok(value)
}

/// Finite floats are JSON numbers; NaN and the infinities, which JSON numbers cannot hold, are the strings
/// `"NaN"`, `"Infinity"` and `"-Infinity"`.
fn float_to_json(value: f64) -> JsonValue {
	match serde_json::Number::from_f64(value) {
		Some(number) => JsonValue::Number(number),
		None if value.is_nan() => JsonValue::from("NaN"),
		None if value > 0.0 => JsonValue::from("Infinity"),
		None => JsonValue::from("-Infinity"),
	}
}

fn float_from_json(json: &JsonValue) -> Option<f64> {
	match json.as_str() {
		Some("NaN") => Some(f64::NAN),
		Some("Infinity") => Some(f64::INFINITY),
		Some("-Infinity") => Some(f64::NEG_INFINITY),
		Some(_) => None,
		None => json.as_f64(),
	}
}

fn check_text_len(text: &str, capacity: usize) -> Result<()> {
	if text.len() > capacity {
		return Err(BendecError::StringTooLong { len: text.len(), capacity });
	}
	Ok(())
}

fn check_count(got: usize, expected: usize) -> Result<()> {
	if got != expected {
		return Err(BendecError::ArrayLengthMismatch { expected, got });
	}
	Ok(())
}

fn mismatch(path: &str, expected: &'static str) -> BendecError {
	BendecError::JsonMismatch {
		path: path.to_owned(),
		expected,
	}
}
