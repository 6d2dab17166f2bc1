use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, BendecError>;

/// Errors produced while building schemas, encoding, decoding, and mirroring values.
#[derive(Debug, Error)]
pub enum BendecError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// JSON text could not be parsed or written.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Hex input text was malformed.
	#[error("invalid hex input at byte {at}")]
	InvalidHex {
		/// Character offset of the offending digit.
		at: usize,
	},

	/// Buffer too short for a read or write at the given offset.
	#[error("out of bounds at offset {offset}, need {need} bytes, buffer length {len}")]
	OutOfBounds {
		/// Byte offset where the access was attempted.
		offset: usize,
		/// Requested bytes.
		need: usize,
		/// Total buffer length.
		len: usize,
	},
	/// Decoded tag value is not part of the closed constant set.
	#[error("unknown discriminant {raw:#x} for {type_name}")]
	UnknownDiscriminant {
		/// Enum type being decoded.
		type_name: String,
		/// Raw decoded value.
		raw: u64,
	},
	/// Decoded flag set contains bits outside the declared mask.
	#[error("unknown flag bits {bits:#x} for {type_name}")]
	UnknownFlags {
		/// Flags type being decoded.
		type_name: String,
		/// Undeclared bits.
		bits: u64,
	},
	/// Declared record size disagrees with the sum of its field lengths.
	#[error("length mismatch in {type_name}: declared {declared}, fields sum to {computed}")]
	LengthMismatch {
		/// Record type name.
		type_name: String,
		/// Declared byte length.
		declared: usize,
		/// Computed byte length.
		computed: usize,
	},
	/// Strict decoding found non-zero bytes in a union slot's padding.
	#[error("non-zero padding in {type_name} at offset {offset}")]
	NonZeroPadding {
		/// Union type name.
		type_name: String,
		/// Offset of the first non-zero padding byte.
		offset: usize,
	},

	/// Referenced type name is not declared.
	#[error("unknown type: {name}")]
	UnknownType {
		/// Requested type name.
		name: String,
	},
	/// Field layout overflows or exceeds the byte length ceiling.
	#[error("layout of {type_name} is too large at field {field} (limit {limit} bytes)")]
	LayoutTooLarge {
		/// Record type name.
		type_name: String,
		/// Field whose length or offset breaks the limit.
		field: String,
		/// Maximum byte length of a type.
		limit: usize,
	},
	/// Union with a header tag does not name its discriminant enum, or has no members to infer it from.
	#[error("union {type_name} has no discriminant enum")]
	MissingDiscriminant {
		/// Union type name.
		type_name: String,
	},
	/// Discriminator field path does not lead to the same enum field in every member.
	#[error("invalid discriminator path in {type_name} at {member}: {reason}")]
	InvalidDiscriminatorPath {
		/// Union type name.
		type_name: String,
		/// Member struct (or declared discriminant) at fault.
		member: String,
		/// What is wrong with the path.
		reason: &'static str,
	},
	/// Embedded tag in a union payload disagrees with the selected variant.
	#[error("variant {variant} of {type_name} carries tag {found}")]
	VariantTagMismatch {
		/// Union type name.
		type_name: String,
		/// Selected variant.
		variant: String,
		/// Tag found at the discriminator path.
		found: String,
	},
	/// Type name declared more than once.
	#[error("duplicate type declaration: {name}")]
	DuplicateType {
		/// Duplicated type name.
		name: String,
	},
	/// Type refers to itself through its fields or members.
	#[error("recursive type: {name}")]
	RecursiveType {
		/// Type where the cycle was detected.
		name: String,
	},
	/// Primitive declaration has an unusable size for its kind.
	#[error("invalid primitive {name}: size {size}")]
	InvalidPrimitive {
		/// Primitive type name.
		name: String,
		/// Declared size.
		size: usize,
	},
	/// Enum underlying type is not an unsigned integer primitive.
	#[error("enum {name} has non-integer underlying type {underlying}")]
	InvalidEnumUnderlying {
		/// Enum type name.
		name: String,
		/// Declared underlying type.
		underlying: String,
	},
	/// Enum constant does not fit the underlying width.
	#[error("enum {type_name} constant {variant}={value} does not fit {width} bytes")]
	DiscriminantOutOfRange {
		/// Enum type name.
		type_name: String,
		/// Constant name.
		variant: String,
		/// Constant value.
		value: u64,
		/// Underlying byte width.
		width: usize,
	},
	/// Two enum constants share a name or a value.
	#[error("enum {type_name} repeats constant {variant}")]
	DuplicateDiscriminant {
		/// Enum type name.
		type_name: String,
		/// Repeated constant.
		variant: String,
	},
	/// Union discriminant constant and members do not map one-to-one.
	#[error("union {type_name}: discriminant {variant} has no matching member")]
	UnmappedDiscriminant {
		/// Union type name.
		type_name: String,
		/// Constant or member name left unmatched.
		variant: String,
	},
	/// Union member or discriminant has the wrong kind.
	#[error("union {type_name}: {member} is not a valid {role}")]
	InvalidUnionMember {
		/// Union type name.
		type_name: String,
		/// Offending member type.
		member: String,
		/// Expected role.
		role: &'static str,
	},
	/// Variant field shares its name with the union discriminator key.
	#[error("union {type_name}: member {member} has a field named {discriminator}")]
	DiscriminatorCollision {
		/// Union type name.
		type_name: String,
		/// Member record name.
		member: String,
		/// Discriminator key.
		discriminator: String,
	},
	/// Record declares the same field twice.
	#[error("duplicate field {field} in {type_name}")]
	DuplicateField {
		/// Record type name.
		type_name: String,
		/// Repeated field name.
		field: String,
	},

	/// Value kind does not match the schema type.
	#[error("type mismatch: expected {expected}, got {got}")]
	ValueMismatch {
		/// Expected logical value kind.
		expected: &'static str,
		/// Actual logical value kind.
		got: &'static str,
	},
	/// Record value lacks a declared field.
	#[error("missing field {field} on {type_name}")]
	MissingField {
		/// Record type name.
		type_name: String,
		/// Missing field.
		field: String,
	},
	/// Record value has a field the schema does not declare.
	#[error("unexpected field {field} on {type_name}")]
	UnexpectedField {
		/// Record type name.
		type_name: String,
		/// Extra field.
		field: String,
	},
	/// Integer does not fit the target width.
	#[error("integer {value} does not fit {width} bytes")]
	IntegerOutOfRange {
		/// Offending value rendered as text.
		value: String,
		/// Target byte width.
		width: usize,
	},
	/// String longer than its fixed `char` array.
	#[error("string of {len} bytes exceeds capacity {capacity}")]
	StringTooLong {
		/// UTF-8 byte length.
		len: usize,
		/// Field capacity.
		capacity: usize,
	},
	/// Array value has the wrong element count.
	#[error("array length mismatch: expected {expected}, got {got}")]
	ArrayLengthMismatch {
		/// Declared element count.
		expected: usize,
		/// Provided element count.
		got: usize,
	},
	/// Enum or flag name is not a declared constant.
	#[error("unknown constant {name} for {type_name}")]
	UnknownEnumName {
		/// Enum type name.
		type_name: String,
		/// Offending name.
		name: String,
	},
	/// Union variant name is not declared.
	#[error("unknown variant {variant} for {type_name}")]
	UnknownVariant {
		/// Union type name.
		type_name: String,
		/// Offending variant name.
		variant: String,
	},
	/// JSON node kind does not match the schema type.
	#[error("json mismatch at {path}: expected {expected}")]
	JsonMismatch {
		/// Dotted path of the node.
		path: String,
		/// Expected node kind.
		expected: &'static str,
	},
	/// Value names a different type than the one being encoded.
	#[error("type name mismatch: expected {expected}, got {got}")]
	TypeNameMismatch {
		/// Schema type name.
		expected: String,
		/// Type name carried by the value.
		got: String,
	},
}
