use crate::codec::enums::{decode_enum, encode_enum};
use crate::codec::json::{value_from_json, value_to_json};
use crate::codec::primitive::check_bounds;
use crate::codec::record::{decode_record, encode_record};
use crate::codec::union::{decode_union, encode_union};
use crate::codec::{BendecError, ByteLength, Result, ScalarKind, Schema, TypeId, TypeKind, Value, read_uint};

/// Runtime switches for decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Reject non-zero padding after a short union variant inside a record slot.
	pub strict_padding: bool,
	/// Decode `char` and `char[N]` fields as text instead of byte values.
	pub char_arrays_as_string: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			strict_padding: false,
			char_arrays_as_string: true,
		}
	}
}

impl DecodeOptions {
	/// Preset that rejects any byte the layout does not account for.
	pub fn strict() -> Self {
		Self {
			strict_padding: true,
			..Self::default()
		}
	}
}

/// Codec handle for one schema type.
#[derive(Debug, Clone, Copy)]
pub struct TypeCodec<'s> {
	schema: &'s Schema,
	id: TypeId,
}

impl Schema {
	/// Codec for the named type (aliases resolve to their target).
	pub fn codec(&self, name: &str) -> Result<TypeCodec<'_>> {
		Ok(TypeCodec {
			schema: self,
			id: self.type_id(name)?,
		})
	}
}

impl<'s> TypeCodec<'s> {
	/// Canonical type name.
	pub fn name(&self) -> &'s str {
		&self.schema.get(self.id).name
	}

	/// Resolved type id.
	pub fn id(&self) -> TypeId {
		self.id
	}

	/// Encoded length contract.
	pub fn byte_length(&self) -> ByteLength {
		self.schema.byte_length(self.id)
	}

	/// Exact encoded length of `value`; for unions this depends on the selected variant.
	pub fn encoded_len(&self, value: &Value) -> Result<usize> {
		encoded_len(self.schema, self.id, value)
	}

	/// Encode `value` at `offset`, returning the number of bytes written.
	pub fn encode(&self, value: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
		let len = self.encoded_len(value)?;
		check_bounds(buf.len(), offset, len)?;
		encode_type(self.schema, self.id, value, buf, offset)
	}

	/// Encode `value` into a fresh buffer of its exact length.
	///
	/// Resolution caps every record at [`MAX_LAYOUT_BYTES`](crate::codec::MAX_LAYOUT_BYTES), so the buffer is
	/// bounded by the schema and not by the value.
	pub fn to_bytes(&self, value: &Value) -> Result<Vec<u8>> {
		let mut buf = vec![0_u8; self.encoded_len(value)?];
		encode_type(self.schema, self.id, value, &mut buf, 0)?;
		Ok(buf)
	}

	/// Decode one value at `offset` with default options.
	pub fn decode(&self, buf: &[u8], offset: usize) -> Result<Value> {
		self.decode_with(buf, offset, &DecodeOptions::default()).map(|(value, _)| value)
	}

	/// Decode one value at `offset`, returning it with the number of bytes consumed.
	pub fn decode_with(&self, buf: &[u8], offset: usize, opt: &DecodeOptions) -> Result<(Value, usize)> {
		decode_type(self.schema, self.id, buf, offset, opt)
	}

	/// Project `value` onto its JSON mirror.
	pub fn to_json(&self, value: &Value) -> Result<serde_json::Value> {
		value_to_json(self.schema, self.id, value)
	}

	/// Rebuild a value from its JSON mirror.
	pub fn from_json(&self, json: &serde_json::Value) -> Result<Value> {
		value_from_json(self.schema, self.id, json, "$")
	}
}

pub(crate) fn encoded_len(schema: &Schema, id: TypeId, value: &Value) -> Result<usize> {
	let def = schema.get(id);
	match &def.kind {
		TypeKind::Union(item) => {
			let Value::Union(union) = value else {
				return Err(BendecError::ValueMismatch {
					expected: "union",
					got: value.kind_label(),
				});
			};
			let variant = item.by_name(union.variant()).ok_or_else(|| BendecError::UnknownVariant {
				type_name: def.name.to_string(),
				variant: union.variant().to_owned(),
			})?;
			Ok(item.header_len + variant.byte_len)
		}
		_ => Ok(schema.slot_len(id)),
	}
}

/// Encode `value` as type `id`, returning bytes written.
pub(crate) fn encode_type(schema: &Schema, id: TypeId, value: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
	let def = schema.get(id);
	match &def.kind {
		TypeKind::Primitive(prim) => {
			prim.encode(value, buf, offset)?;
			Ok(prim.width)
		}
		TypeKind::Enum(item) => {
			encode_enum(&def.name, item, value, buf, offset)?;
			Ok(item.underlying.width)
		}
		TypeKind::Record(item) => {
			encode_record(schema, &def.name, item, value, buf, offset)?;
			Ok(item.byte_len)
		}
		TypeKind::Union(item) => encode_union(schema, &def.name, item, value, buf, offset),
	}
}

/// Decode type `id` at `offset`, returning the value and bytes consumed.
pub(crate) fn decode_type(schema: &Schema, id: TypeId, buf: &[u8], offset: usize, opt: &DecodeOptions) -> Result<(Value, usize)> {
	let def = schema.get(id);
	match &def.kind {
		TypeKind::Primitive(prim) if prim.kind == ScalarKind::Char && !opt.char_arrays_as_string => Ok((Value::U64(read_uint(buf, offset, 1)?), 1)),
		TypeKind::Primitive(prim) => Ok((prim.decode(buf, offset)?, prim.width)),
		TypeKind::Enum(item) => Ok((decode_enum(&def.name, item, buf, offset)?, item.underlying.width)),
		TypeKind::Record(item) => Ok((Value::Record(decode_record(schema, &def.name, item, buf, offset, opt)?), item.byte_len)),
		TypeKind::Union(item) => {
			let (value, used) = decode_union(schema, &def.name, item, buf, offset, opt)?;
			Ok((Value::Union(value), used))
		}
	}
}
