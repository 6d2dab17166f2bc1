use serde::{Deserialize, Serialize};

/// One type declaration, in the JSON shape bendec type definitions use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeDecl {
	/// Fixed-width scalar; its family is inferred from the name.
	Primitive {
		/// Type name.
		name: String,
		/// Byte width.
		size: usize,
	},
	/// Second name for an existing type.
	Alias {
		/// Alias name.
		name: String,
		/// Target type name.
		alias: String,
	},
	/// Closed set of named unsigned constants, or a bit-flag set.
	Enum {
		/// Type name.
		name: String,
		/// Underlying unsigned primitive.
		underlying: String,
		/// `(name, value)` constants in declaration order.
		variants: Vec<(String, u64)>,
		/// Treat constants as combinable bit flags.
		#[serde(default)]
		bitflags: bool,
	},
	/// Ordered fixed-width fields.
	Struct {
		/// Type name.
		name: String,
		/// Declared total byte length, checked against the field sum.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		size: Option<usize>,
		/// Fields in wire order.
		fields: Vec<FieldDecl>,
	},
	/// Discriminated choice among struct members.
	Union {
		/// Type name.
		name: String,
		/// Where the variant tag lives: a header before the member, or a field path inside every member.
		#[serde(default)]
		discriminator: DiscriminatorDecl,
		/// Enum type of the tag. Required for a header; inferred from the members for a field path.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		discriminant: Option<String>,
		/// Member structs, matched to discriminant constants.
		members: Vec<MemberDecl>,
	},
}

impl TypeDecl {
	/// Declared type name.
	pub fn name(&self) -> &str {
		match self {
			Self::Primitive { name, .. } | Self::Alias { name, .. } | Self::Enum { name, .. } | Self::Struct { name, .. } | Self::Union { name, .. } => name,
		}
	}
}

/// One struct field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
	/// Field name.
	pub name: String,
	/// Field type name.
	#[serde(rename = "type")]
	pub ty: String,
	/// Fixed element count for array fields.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub length: Option<usize>,
}

/// Union member: a struct name matched to the constant of the same name, or an explicit pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberDecl {
	/// Struct whose name is also the discriminant constant.
	Named(String),
	/// Struct paired with a differently named constant.
	Tagged {
		/// Member struct name.
		#[serde(rename = "type")]
		ty: String,
		/// Discriminant constant name.
		tag: String,
	},
}

impl MemberDecl {
	/// Member struct name.
	pub fn type_name(&self) -> &str {
		match self {
			Self::Named(name) => name,
			Self::Tagged { ty, .. } => ty,
		}
	}

	/// Discriminant constant name.
	pub fn tag(&self) -> &str {
		match self {
			Self::Named(name) => name,
			Self::Tagged { tag, .. } => tag,
		}
	}
}

/// Location of a union's variant tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiscriminatorDecl {
	/// The tag is a header before the member payload; the string is the JSON key that mirrors it.
	Key(String),
	/// The tag is an enum field inside every member, reached by this field path.
	Path(Vec<String>),
}

impl Default for DiscriminatorDecl {
	fn default() -> Self {
		Self::Key("kind".to_owned())
	}
}
