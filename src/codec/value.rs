/// In-memory value of a schema type, produced by decoding or built directly.
///
/// Equality is by meaning rather than by representation: integers compare by numeric value whichever
/// signedness they were built with, floats compare bit for bit (so a decoded NaN equals itself), and
/// records compare field by field regardless of the order the fields were supplied in.
#[derive(Debug, Clone)]
pub enum Value {
	/// Boolean scalar.
	Bool(bool),
	/// Signed integer scalar.
	I64(i64),
	/// Unsigned integer scalar.
	U64(u64),
	/// 32-bit float scalar.
	F32(f32),
	/// 64-bit float scalar.
	F64(f64),
	/// Text stored in a `char` field, NUL-padded on the wire.
	String(Box<str>),
	/// Enum constant, carried by name.
	Enum(Box<str>),
	/// Bit-flag set, carried by flag names in declaration order.
	Flags(Vec<Box<str>>),
	/// Fixed-length array field.
	Array(Vec<Value>),
	/// Record value.
	Record(RecordValue),
	/// Union value with its selected variant.
	Union(UnionValue),
}

impl Value {
	/// Enum constant value from its name.
	pub fn enum_variant(name: &str) -> Self {
		Self::Enum(name.into())
	}

	/// Flag set value from flag names.
	pub fn flags<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
		Self::Flags(names.into_iter().map(Box::from).collect())
	}

	/// Stable label of the value kind, used in mismatch errors.
	pub fn kind_label(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::I64(_) => "signed integer",
			Self::U64(_) => "unsigned integer",
			Self::F32(_) => "f32",
			Self::F64(_) => "f64",
			Self::String(_) => "string",
			Self::Enum(_) => "enum",
			Self::Flags(_) => "flags",
			Self::Array(_) => "array",
			Self::Record(_) => "record",
			Self::Union(_) => "union",
		}
	}

	/// Borrow the record payload, if any.
	pub fn as_record(&self) -> Option<&RecordValue> {
		match self {
			Self::Record(item) => Some(item),
			_ => None,
		}
	}

	/// Borrow the union payload, if any.
	pub fn as_union(&self) -> Option<&UnionValue> {
		match self {
			Self::Union(item) => Some(item),
			_ => None,
		}
	}

	/// Read an integer value as `u64` when non-negative.
	pub fn as_u64(&self) -> Option<u64> {
		match *self {
			Self::U64(v) => Some(v),
			Self::I64(v) => u64::try_from(v).ok(),
			_ => None,
		}
	}

	/// Read an integer value as `i64` when representable.
	pub fn as_i64(&self) -> Option<i64> {
		match *self {
			Self::I64(v) => Some(v),
			Self::U64(v) => i64::try_from(v).ok(),
			_ => None,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::U64(a), Self::U64(b)) => a == b,
			(Self::I64(a), Self::I64(b)) => a == b,
			(Self::U64(a), Self::I64(b)) | (Self::I64(b), Self::U64(a)) => i64::try_from(*a).is_ok_and(|a| a == *b),
			(Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
			(Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
			(Self::String(a), Self::String(b)) | (Self::Enum(a), Self::Enum(b)) => a == b,
			(Self::Flags(a), Self::Flags(b)) => a == b,
			(Self::Array(a), Self::Array(b)) => a == b,
			(Self::Record(a), Self::Record(b)) => a == b,
			(Self::Union(a), Self::Union(b)) => a == b,
			_ => false,
		}
	}
}

macro_rules! value_from {
	($variant:ident: $($ty:ty),+) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Self::$variant(value.into())
				}
			}
		)+
	};
}

value_from!(U64: u8, u16, u32, u64);
value_from!(I64: i8, i16, i32, i64);
value_from!(F32: f32);
value_from!(F64: f64);
value_from!(Bool: bool);
value_from!(String: &str, String);
value_from!(Record: RecordValue);
value_from!(Union: UnionValue);

/// Immutable record value. Field order is kept as supplied but does not take part in equality.
#[derive(Debug, Clone)]
pub struct RecordValue {
	type_name: Box<str>,
	fields: Vec<FieldValue>,
}

/// Named record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field identifier.
	pub name: Box<str>,
	/// Field payload.
	pub value: Value,
}

impl RecordValue {
	/// Start building a record of the named type.
	pub fn builder(type_name: &str) -> RecordBuilder {
		RecordBuilder {
			type_name: type_name.into(),
			fields: Vec::new(),
		}
	}

	pub(crate) fn from_parts(type_name: &str, fields: Vec<FieldValue>) -> Self {
		Self {
			type_name: type_name.into(),
			fields,
		}
	}

	/// Record type name.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Fields in the order they were supplied or decoded.
	pub fn fields(&self) -> &[FieldValue] {
		&self.fields
	}

	/// Look up a field by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| &*field.name == name).map(|field| &field.value)
	}
}

impl PartialEq for RecordValue {
	fn eq(&self, other: &Self) -> bool {
		self.type_name == other.type_name
			&& self.fields.len() == other.fields.len()
			&& self.fields.iter().all(|field| other.get(&field.name) == Some(&field.value))
	}
}

/// Construction-time builder for [`RecordValue`].
#[derive(Debug)]
pub struct RecordBuilder {
	type_name: Box<str>,
	fields: Vec<FieldValue>,
}

impl RecordBuilder {
	/// Append a field; a repeated name replaces the earlier value.
	pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
		let value = value.into();
		if let Some(slot) = self.fields.iter_mut().find(|field| &*field.name == name) {
			slot.value = value;
		} else {
			self.fields.push(FieldValue { name: name.into(), value });
		}
		self
	}

	/// Freeze the record.
	pub fn build(self) -> RecordValue {
		RecordValue {
			type_name: self.type_name,
			fields: self.fields,
		}
	}
}

/// Union value: the selected variant name and its record payload.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionValue {
	type_name: Box<str>,
	variant: Box<str>,
	payload: RecordValue,
}

impl UnionValue {
	/// Select `variant` of union `type_name` with its payload record.
	pub fn new(type_name: &str, variant: &str, payload: RecordValue) -> Self {
		Self {
			type_name: type_name.into(),
			variant: variant.into(),
			payload,
		}
	}

	/// Union type name.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Discriminant constant name of the selected variant.
	pub fn variant(&self) -> &str {
		&self.variant
	}

	/// Variant payload.
	pub fn payload(&self) -> &RecordValue {
		&self.payload
	}
}
