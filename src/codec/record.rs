use crate::codec::dispatch::{DecodeOptions, decode_type, encode_type};
use crate::codec::primitive::{check_bounds, decode_chars, encode_chars, raw_chars};
use crate::codec::{BendecError, Field, FieldValue, Primitive, RecordDef, RecordValue, Result, ScalarKind, Schema, TypeKind, Value};

/// Encode a record value field by field at `offset + field.offset`.
pub(crate) fn encode_record(schema: &Schema, type_name: &str, def: &RecordDef, value: &Value, buf: &mut [u8], offset: usize) -> Result<()> {
	let Some(record) = value.as_record() else {
		return Err(BendecError::ValueMismatch {
			expected: "record",
			got: value.kind_label(),
		});
	};
	encode_record_value(schema, type_name, def, record, buf, offset)
}

pub(crate) fn encode_record_value(schema: &Schema, type_name: &str, def: &RecordDef, record: &RecordValue, buf: &mut [u8], offset: usize) -> Result<()> {
	check_record(type_name, def, record)?;
	check_bounds(buf.len(), offset, def.byte_len)?;

	for field in &def.fields {
		let item = record.get(&field.name).ok_or_else(|| BendecError::MissingField {
			type_name: type_name.to_owned(),
			field: field.name.to_string(),
		})?;
		encode_field(schema, field, item, buf, offset + field.offset)?;
	}
	Ok(())
}

/// Decode every field in declared order and assemble the record.
pub(crate) fn decode_record(schema: &Schema, type_name: &str, def: &RecordDef, buf: &[u8], offset: usize, opt: &DecodeOptions) -> Result<RecordValue> {
	check_bounds(buf.len(), offset, def.byte_len)?;

	let mut fields = Vec::with_capacity(def.fields.len());
	for field in &def.fields {
		let value = decode_field(schema, field, buf, offset + field.offset, opt)?;
		fields.push(FieldValue {
			name: field.name.clone(),
			value,
		});
	}
	Ok(RecordValue::from_parts(type_name, fields))
}

pub(crate) fn expect_record<'v>(type_name: &str, def: &RecordDef, value: &'v Value) -> Result<&'v RecordValue> {
	let Value::Record(record) = value else {
		return Err(BendecError::ValueMismatch {
			expected: "record",
			got: value.kind_label(),
		});
	};
	check_record(type_name, def, record)?;
	Ok(record)
}

/// Reject a record value naming another type or carrying fields the layout does not declare.
pub(crate) fn check_record(type_name: &str, def: &RecordDef, record: &RecordValue) -> Result<()> {
	if record.type_name() != type_name {
		return Err(BendecError::TypeNameMismatch {
			expected: type_name.to_owned(),
			got: record.type_name().to_owned(),
		});
	}
	if let Some(extra) = record.fields().iter().find(|item| def.fields.iter().all(|field| field.name != item.name)) {
		return Err(BendecError::UnexpectedField {
			type_name: type_name.to_owned(),
			field: extra.name.to_string(),
		});
	}
	Ok(())
}

/// `char[N]` fields hold text; other arrays repeat their element codec.
pub(crate) fn is_char_array(schema: &Schema, field: &Field) -> bool {
	field.count.is_some()
		&& matches!(
			schema.get(field.ty).kind,
			TypeKind::Primitive(Primitive {
				kind: ScalarKind::Char,
				..
			})
		)
}

fn encode_field(schema: &Schema, field: &Field, value: &Value, buf: &mut [u8], offset: usize) -> Result<()> {
	let Some(count) = field.count else {
		return encode_slot(schema, field, value, buf, offset);
	};

	if is_char_array(schema, field) && matches!(value, Value::String(_)) {
		return encode_chars(value, buf, offset, count);
	}

	let Value::Array(items) = value else {
		return Err(BendecError::ValueMismatch {
			expected: "array",
			got: value.kind_label(),
		});
	};
	if items.len() != count {
		return Err(BendecError::ArrayLengthMismatch {
			expected: count,
			got: items.len(),
		});
	}

	let stride = schema.slot_len(field.ty);
	for (idx, item) in items.iter().enumerate() {
		encode_slot(schema, field, item, buf, offset + idx * stride)?;
	}
	Ok(())
}

/// Encode one element into its fixed slot, zero-filling whatever a short union variant leaves.
fn encode_slot(schema: &Schema, field: &Field, value: &Value, buf: &mut [u8], offset: usize) -> Result<()> {
	let slot = schema.slot_len(field.ty);
	let written = encode_type(schema, field.ty, value, buf, offset)?;
	buf[offset + written..offset + slot].fill(0);
	Ok(())
}

fn decode_field(schema: &Schema, field: &Field, buf: &[u8], offset: usize, opt: &DecodeOptions) -> Result<Value> {
	let Some(count) = field.count else {
		return decode_slot(schema, field, buf, offset, opt);
	};

	if opt.char_arrays_as_string && is_char_array(schema, field) {
		return decode_chars(buf, offset, count);
	}

	if is_char_array(schema, field) {
		check_bounds(buf.len(), offset, count)?;
		return Ok(raw_chars(&buf[offset..offset + count]));
	}

	let stride = schema.slot_len(field.ty);
	let mut items = Vec::with_capacity(count);
	for idx in 0..count {
		items.push(decode_slot(schema, field, buf, offset + idx * stride, opt)?);
	}
	Ok(Value::Array(items))
}

fn decode_slot(schema: &Schema, field: &Field, buf: &[u8], offset: usize, opt: &DecodeOptions) -> Result<Value> {
	let slot = schema.slot_len(field.ty);
	let (value, used) = decode_type(schema, field.ty, buf, offset, opt)?;
	if opt.strict_padding
		&& let Some(pos) = buf[offset + used..offset + slot].iter().position(|byte| *byte != 0)
	{
		return Err(BendecError::NonZeroPadding {
			type_name: schema.get(field.ty).name.to_string(),
			offset: offset + used + pos,
		});
	}
	Ok(value)
}

#[cfg(test)]
mod tests;
