use crate::codec::dispatch::DecodeOptions;
use crate::codec::enums::{decode_discriminant, encode_discriminant};
use crate::codec::record::{decode_record, encode_record_value};
use crate::codec::{BendecError, ByteLength, Discriminator, EnumDef, RecordDef, RecordValue, Result, Schema, TypeKind, UnionDef, UnionValue, UnionVariant, Value};

impl UnionDef {
	/// Variant selected by the discriminant constant name.
	pub fn by_name(&self, name: &str) -> Option<&UnionVariant> {
		self.variants.iter().find(|item| &*item.name == name)
	}

	/// Variant selected by the raw discriminant value.
	pub fn by_tag(&self, tag: u64) -> Option<&UnionVariant> {
		self.variants.iter().find(|item| item.tag == tag)
	}

	/// `Fixed` when all variants share one length, otherwise the per-variant bounds.
	pub fn byte_length(&self) -> ByteLength {
		let min = self.variants.iter().map(|item| item.byte_len).min().unwrap_or(0);
		let max = self.variants.iter().map(|item| item.byte_len).max().unwrap_or(0);
		if min == max {
			return ByteLength::Fixed(self.header_len + max);
		}
		ByteLength::PerVariant {
			header: self.header_len,
			min: self.header_len + min,
			max: self.header_len + max,
		}
	}
}

/// Write the variant payload and its tag (a header, or the embedded field the payload carries). Returns bytes written.
pub(crate) fn encode_union(schema: &Schema, type_name: &str, def: &UnionDef, value: &Value, buf: &mut [u8], offset: usize) -> Result<usize> {
	let union = expect_union(type_name, value)?;
	let variant = variant_by_name(type_name, def, union.variant())?;
	let (member_name, member_def) = member(schema, type_name, variant)?;

	match &def.discriminator {
		Discriminator::Key(_) => {
			let (disc_name, disc_def) = discriminant(schema, type_name, def)?;
			encode_discriminant(disc_name, disc_def, &variant.name, buf, offset)?;
		}
		Discriminator::Path(path) => check_embedded_tag(type_name, path, variant, union.payload())?,
	}
	encode_record_value(schema, member_name, member_def, union.payload(), buf, offset + def.header_len)?;
	Ok(def.header_len + variant.byte_len)
}

/// Read the tag at its offset, then decode exactly the variant it selects. Returns the value and bytes consumed.
pub(crate) fn decode_union(schema: &Schema, type_name: &str, def: &UnionDef, buf: &[u8], offset: usize, opt: &DecodeOptions) -> Result<(UnionValue, usize)> {
	let (disc_name, disc_def) = discriminant(schema, type_name, def)?;
	let constant = decode_discriminant(disc_name, disc_def, buf, offset + def.tag_offset)?;
	let variant = def.by_tag(constant.value).ok_or_else(|| BendecError::UnknownDiscriminant {
		type_name: type_name.to_owned(),
		raw: constant.value,
	})?;

	let (member_name, member_def) = member(schema, type_name, variant)?;
	let payload = decode_record(schema, member_name, member_def, buf, offset + def.header_len, opt)?;
	Ok((UnionValue::new(type_name, &variant.name, payload), def.header_len + variant.byte_len))
}

pub(crate) fn expect_union<'v>(type_name: &str, value: &'v Value) -> Result<&'v UnionValue> {
	let Value::Union(union) = value else {
		return Err(BendecError::ValueMismatch {
			expected: "union",
			got: value.kind_label(),
		});
	};
	if union.type_name() != type_name {
		return Err(BendecError::TypeNameMismatch {
			expected: type_name.to_owned(),
			got: union.type_name().to_owned(),
		});
	}
	Ok(union)
}

pub(crate) fn variant_by_name<'d>(type_name: &str, def: &'d UnionDef, name: &str) -> Result<&'d UnionVariant> {
	def.by_name(name).ok_or_else(|| BendecError::UnknownVariant {
		type_name: type_name.to_owned(),
		variant: name.to_owned(),
	})
}

/// An embedded tag must name the variant it sits in.
pub(crate) fn check_embedded_tag(type_name: &str, path: &[Box<str>], variant: &UnionVariant, payload: &RecordValue) -> Result<()> {
	let Some((last, parents)) = path.split_last() else {
		return Ok(());
	};
	let mut record = payload;
	for section in parents {
		match record.get(section).and_then(Value::as_record) {
			Some(inner) => record = inner,
			None => return Err(missing_tag(record, section)),
		}
	}

	match record.get(last) {
		Some(Value::Enum(name)) if *name == variant.name => Ok(()),
		Some(Value::Enum(name)) => Err(BendecError::VariantTagMismatch {
			type_name: type_name.to_owned(),
			variant: variant.name.to_string(),
			found: name.to_string(),
		}),
		Some(other) => Err(BendecError::ValueMismatch {
			expected: "enum",
			got: other.kind_label(),
		}),
		None => Err(missing_tag(record, last)),
	}
}

fn missing_tag(record: &RecordValue, field: &str) -> BendecError {
	BendecError::MissingField {
		type_name: record.type_name().to_owned(),
		field: field.to_owned(),
	}
}

/// Payload record name and layout of a variant.
pub(crate) fn member<'s>(schema: &'s Schema, type_name: &str, variant: &UnionVariant) -> Result<(&'s str, &'s RecordDef)> {
	let item = schema.get(variant.record);
	match &item.kind {
		TypeKind::Record(def) => Ok((&*item.name, def)),
		_ => Err(BendecError::InvalidUnionMember {
			type_name: type_name.to_owned(),
			member: item.name.to_string(),
			role: "record member",
		}),
	}
}

fn discriminant<'s>(schema: &'s Schema, type_name: &str, def: &UnionDef) -> Result<(&'s str, &'s EnumDef)> {
	let disc = schema.get(def.discriminant);
	match &disc.kind {
		TypeKind::Enum(item) => Ok((&*disc.name, item)),
		_ => Err(BendecError::InvalidUnionMember {
			type_name: type_name.to_owned(),
			member: disc.name.to_string(),
			role: "discriminant enum",
		}),
	}
}
