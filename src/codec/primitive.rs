use crate::codec::{BendecError, Result, Value};

/// Scalar family of a primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
	/// Unsigned integer, zero-extended on decode.
	Unsigned,
	/// Two's complement integer, sign-extended on decode.
	Signed,
	/// IEEE 754 float (`f32` or `f64`).
	Float,
	/// One byte, non-zero is `true`.
	Bool,
	/// One byte of text.
	Char,
}

/// Fixed-width scalar type. All multi-byte values are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
	/// Scalar family.
	pub kind: ScalarKind,
	/// Byte width.
	pub width: usize,
}

impl Primitive {
	/// Built-in primitive names with their byte widths.
	pub const BUILTINS: [(&'static str, usize); 12] = [
		("u8", 1),
		("u16", 2),
		("u32", 4),
		("u64", 8),
		("i8", 1),
		("i16", 2),
		("i32", 4),
		("i64", 8),
		("f32", 4),
		("f64", 8),
		("bool", 1),
		("char", 1),
	];

	/// Derive the scalar kind from the type name and validate the width.
	pub fn from_decl(name: &str, size: usize) -> Result<Self> {
		let kind = scalar_kind_for_name(name);
		let valid = match kind {
			ScalarKind::Unsigned | ScalarKind::Signed => (1..=8).contains(&size),
			ScalarKind::Float => size == 4 || size == 8,
			ScalarKind::Bool | ScalarKind::Char => size == 1,
		};
		if !valid {
			return Err(BendecError::InvalidPrimitive { name: name.to_owned(), size });
		}
		Ok(Self { kind, width: size })
	}

	/// Whether this primitive can underlie an enum.
	pub fn is_unsigned_integer(self) -> bool {
		self.kind == ScalarKind::Unsigned
	}

	/// Decode one scalar at `offset`.
	pub fn decode(self, buf: &[u8], offset: usize) -> Result<Value> {
		let raw = read_uint(buf, offset, self.width)?;
		Ok(match self.kind {
			ScalarKind::Unsigned => Value::U64(raw),
			ScalarKind::Signed => Value::I64(sign_extend(raw, self.width)),
			ScalarKind::Float if self.width == 4 => Value::F32(f32::from_bits(raw as u32)),
			ScalarKind::Float => Value::F64(f64::from_bits(raw)),
			ScalarKind::Bool => Value::Bool(raw != 0),
			ScalarKind::Char => match raw as u8 {
				0 => Value::from(""),
				byte if byte.is_ascii() => Value::from(char::from(byte).to_string()),
				byte => Value::U64(u64::from(byte)),
			},
		})
	}

	/// Encode one scalar at `offset`.
	pub fn encode(self, value: &Value, buf: &mut [u8], offset: usize) -> Result<()> {
		let raw = match (self.kind, value) {
			(ScalarKind::Unsigned, _) => {
				let v = value.as_u64().ok_or_else(|| integer_error(value, self.width))?;
				check_unsigned_range(v, self.width)?;
				v
			}
			(ScalarKind::Signed, _) => {
				let v = value.as_i64().ok_or_else(|| integer_error(value, self.width))?;
				check_signed_range(v, self.width)?;
				(v as u64) & width_mask(self.width)
			}
			(ScalarKind::Float, Value::F32(v)) if self.width == 4 => u64::from(v.to_bits()),
			(ScalarKind::Float, Value::F64(v)) if self.width == 8 => v.to_bits(),
			(ScalarKind::Bool, Value::Bool(v)) => u64::from(*v),
			(ScalarKind::Char, Value::String(_)) => return encode_chars(value, buf, offset, 1),
			(ScalarKind::Char, Value::U64(v)) => {
				check_unsigned_range(*v, 1)?;
				*v
			}
			_ => {
				return Err(BendecError::ValueMismatch {
					expected: self.label(),
					got: value.kind_label(),
				});
			}
		};
		write_uint(buf, offset, self.width, raw)
	}

	/// Stable label of the scalar family.
	pub fn label(self) -> &'static str {
		match (self.kind, self.width) {
			(ScalarKind::Unsigned, _) => "unsigned integer",
			(ScalarKind::Signed, _) => "signed integer",
			(ScalarKind::Float, 4) => "f32",
			(ScalarKind::Float, _) => "f64",
			(ScalarKind::Bool, _) => "bool",
			(ScalarKind::Char, _) => "char",
		}
	}
}

fn scalar_kind_for_name(name: &str) -> ScalarKind {
	match name {
		"bool" => ScalarKind::Bool,
		"char" => ScalarKind::Char,
		"f32" | "f64" | "float" | "double" => ScalarKind::Float,
		_ if name.starts_with('i') => ScalarKind::Signed,
		_ => ScalarKind::Unsigned,
	}
}

/// Fail with `OutOfBounds` unless `need` bytes are available at `offset`.
pub(crate) fn check_bounds(buf_len: usize, offset: usize, need: usize) -> Result<()> {
	match offset.checked_add(need) {
		Some(end) if end <= buf_len => Ok(()),
		_ => Err(BendecError::OutOfBounds {
			offset,
			need,
			len: buf_len,
		}),
	}
}

/// Read a big-endian unsigned integer of `width` bytes.
pub fn read_uint(buf: &[u8], offset: usize, width: usize) -> Result<u64> {
	check_bounds(buf.len(), offset, width)?;
	Ok(buf[offset..offset + width].iter().fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}

/// Write a big-endian unsigned integer of `width` bytes.
pub fn write_uint(buf: &mut [u8], offset: usize, width: usize, value: u64) -> Result<()> {
	check_bounds(buf.len(), offset, width)?;
	for (idx, slot) in buf[offset..offset + width].iter_mut().enumerate() {
		let shift = 8 * (width - 1 - idx);
		*slot = (value >> shift) as u8;
	}
	Ok(())
}

/// Decode a NUL-padded text field of `capacity` bytes. Text that is not UTF-8 comes back as the raw byte array.
pub(crate) fn decode_chars(buf: &[u8], offset: usize, capacity: usize) -> Result<Value> {
	check_bounds(buf.len(), offset, capacity)?;
	let bytes = &buf[offset..offset + capacity];
	let end = bytes.iter().position(|byte| *byte == 0).unwrap_or(bytes.len());
	Ok(match std::str::from_utf8(&bytes[..end]) {
		Ok(text) => Value::from(text),
		Err(_) => raw_chars(bytes),
	})
}

/// Byte values of a `char[N]` field, one element per byte.
pub(crate) fn raw_chars(bytes: &[u8]) -> Value {
	Value::Array(bytes.iter().map(|byte| Value::U64(u64::from(*byte))).collect())
}

/// Encode text into a NUL-padded field of `capacity` bytes.
pub(crate) fn encode_chars(value: &Value, buf: &mut [u8], offset: usize, capacity: usize) -> Result<()> {
	let Value::String(text) = value else {
		return Err(BendecError::ValueMismatch {
			expected: "string",
			got: value.kind_label(),
		});
	};
	let bytes = text.as_bytes();
	if bytes.len() > capacity {
		return Err(BendecError::StringTooLong {
			len: bytes.len(),
			capacity,
		});
	}
	check_bounds(buf.len(), offset, capacity)?;
	let slot = &mut buf[offset..offset + capacity];
	slot[..bytes.len()].copy_from_slice(bytes);
	slot[bytes.len()..].fill(0);
	Ok(())
}

fn width_mask(width: usize) -> u64 {
	if width >= 8 { u64::MAX } else { (1_u64 << (width * 8)) - 1 }
}

fn sign_extend(raw: u64, width: usize) -> i64 {
	let shift = 64 - (width as u32) * 8;
	((raw << shift) as i64) >> shift
}

fn check_unsigned_range(value: u64, width: usize) -> Result<()> {
	if value & !width_mask(width) != 0 {
		return Err(BendecError::IntegerOutOfRange {
			value: value.to_string(),
			width,
		});
	}
	Ok(())
}

fn check_signed_range(value: i64, width: usize) -> Result<()> {
	if width < 8 {
		let bits = (width * 8) as u32;
		let min = -(1_i64 << (bits - 1));
		let max = (1_i64 << (bits - 1)) - 1;
		if value < min || value > max {
			return Err(BendecError::IntegerOutOfRange {
				value: value.to_string(),
				width,
			});
		}
	}
	Ok(())
}

fn integer_error(value: &Value, width: usize) -> BendecError {
	match value {
		Value::I64(v) => BendecError::IntegerOutOfRange { value: v.to_string(), width },
		Value::U64(v) => BendecError::IntegerOutOfRange { value: v.to_string(), width },
		other => BendecError::ValueMismatch {
			expected: "integer",
			got: other.kind_label(),
		},
	}
}
