use crate::codec::primitive::{read_uint, write_uint};
use crate::codec::{BendecError, EnumDef, EnumVariant, Result, Value};

impl EnumDef {
	/// Constant with the given value.
	pub fn by_value(&self, value: u64) -> Option<&EnumVariant> {
		self.variants.iter().find(|item| item.value == value)
	}

	/// Constant with the given name.
	pub fn by_name(&self, name: &str) -> Option<&EnumVariant> {
		self.variants.iter().find(|item| &*item.name == name)
	}

	/// Union of all declared bits.
	pub fn mask(&self) -> u64 {
		self.variants.iter().fold(0, |acc, item| acc | item.value)
	}
}

/// Read a discriminant and resolve it against the closed constant set.
pub(crate) fn decode_discriminant<'d>(type_name: &str, def: &'d EnumDef, buf: &[u8], offset: usize) -> Result<&'d EnumVariant> {
	let raw = read_uint(buf, offset, def.underlying.width)?;
	def.by_value(raw).ok_or_else(|| BendecError::UnknownDiscriminant {
		type_name: type_name.to_owned(),
		raw,
	})
}

/// Write the named constant as the underlying integer.
pub(crate) fn encode_discriminant(type_name: &str, def: &EnumDef, name: &str, buf: &mut [u8], offset: usize) -> Result<()> {
	let variant = def.by_name(name).ok_or_else(|| unknown_name(type_name, name))?;
	write_uint(buf, offset, def.underlying.width, variant.value)
}

pub(crate) fn decode_enum(type_name: &str, def: &EnumDef, buf: &[u8], offset: usize) -> Result<Value> {
	if !def.bitflags {
		let variant = decode_discriminant(type_name, def, buf, offset)?;
		return Ok(Value::Enum(variant.name.clone()));
	}

	let raw = read_uint(buf, offset, def.underlying.width)?;
	let unknown = raw & !def.mask();
	if unknown != 0 {
		return Err(BendecError::UnknownFlags {
			type_name: type_name.to_owned(),
			bits: unknown,
		});
	}
	let names = def
		.variants
		.iter()
		.filter(|item| item.value != 0 && raw & item.value == item.value)
		.map(|item| item.name.clone())
		.collect();
	Ok(Value::Flags(names))
}

pub(crate) fn encode_enum(type_name: &str, def: &EnumDef, value: &Value, buf: &mut [u8], offset: usize) -> Result<()> {
	match (def.bitflags, value) {
		(false, Value::Enum(name)) => encode_discriminant(type_name, def, name, buf, offset),
		(true, Value::Flags(names)) => {
			let bits = flag_bits(type_name, def, names)?;
			write_uint(buf, offset, def.underlying.width, bits)
		}
		(bitflags, other) => Err(BendecError::ValueMismatch {
			expected: if bitflags { "flags" } else { "enum" },
			got: other.kind_label(),
		}),
	}
}

/// Check an enum or flags value against the constant set without encoding it.
pub(crate) fn check_enum(type_name: &str, def: &EnumDef, value: &Value) -> Result<()> {
	let mut scratch = [0_u8; 8];
	encode_enum(type_name, def, value, &mut scratch, 0)
}

fn flag_bits(type_name: &str, def: &EnumDef, names: &[Box<str>]) -> Result<u64> {
	names.iter().try_fold(0_u64, |acc, name| {
		let variant = def.by_name(name).ok_or_else(|| unknown_name(type_name, name))?;
		Ok(acc | variant.value)
	})
}

fn unknown_name(type_name: &str, name: &str) -> BendecError {
	BendecError::UnknownEnumName {
		type_name: type_name.to_owned(),
		name: name.to_owned(),
	}
}

#[cfg(test)]
mod tests {
	use super::{decode_enum, encode_enum};
	use crate::codec::{BendecError, EnumDef, EnumVariant, Primitive, ScalarKind, Value};

	fn def(bitflags: bool, width: usize, variants: &[(&str, u64)]) -> EnumDef {
		EnumDef {
			underlying: Primitive {
				kind: ScalarKind::Unsigned,
				width,
			},
			variants: variants
				.iter()
				.map(|(name, value)| EnumVariant {
					name: (*name).into(),
					value: *value,
				})
				.collect(),
			bitflags,
		}
	}

	#[test]
	fn enum_encodes_as_underlying_integer() {
		let kinds = def(false, 2, &[("Zebra", 0x1001), ("Toucan", 0x1002)]);
		let mut buf = [0_u8; 2];
		encode_enum("AnimalKind", &kinds, &Value::enum_variant("Toucan"), &mut buf, 0).expect("encode succeeds");
		assert_eq!(buf, [0x10, 0x02]);
		assert_eq!(decode_enum("AnimalKind", &kinds, &buf, 0).expect("decode succeeds"), Value::enum_variant("Toucan"));
	}

	#[test]
	fn unknown_value_is_a_hard_failure() {
		let kinds = def(false, 1, &[("Zebra2", 1), ("Toucan2", 2)]);
		let err = decode_enum("AnimalKind2", &kinds, &[3], 0).expect_err("3 is not declared");
		assert!(matches!(err, BendecError::UnknownDiscriminant { raw: 3, .. }));
	}

	#[test]
	fn unknown_name_is_rejected_on_encode() {
		let kinds = def(false, 1, &[("Zebra2", 1)]);
		let mut buf = [0_u8; 1];
		let err = encode_enum("AnimalKind2", &kinds, &Value::enum_variant("Horse"), &mut buf, 0).expect_err("Horse is not declared");
		assert!(matches!(err, BendecError::UnknownEnumName { .. }));
	}

	#[test]
	fn flags_decode_in_declaration_order() {
		let flags = def(true, 1, &[("A", 1), ("B", 2), ("Long", 4)]);
		let mut buf = [0_u8; 1];
		encode_enum("Bitflags", &flags, &Value::flags(["Long", "A"]), &mut buf, 0).expect("encode succeeds");
		assert_eq!(buf, [0x05]);
		assert_eq!(decode_enum("Bitflags", &flags, &buf, 0).expect("decode succeeds"), Value::flags(["A", "Long"]));
	}

	#[test]
	fn undeclared_flag_bits_are_rejected() {
		let flags = def(true, 1, &[("A", 1), ("B", 2)]);
		let err = decode_enum("Bitflags", &flags, &[0x09], 0).expect_err("bit 3 is not declared");
		assert!(matches!(err, BendecError::UnknownFlags { bits: 0x08, .. }));
	}
}
