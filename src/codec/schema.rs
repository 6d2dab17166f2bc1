use std::collections::{HashMap, HashSet};

use crate::codec::decl::{DiscriminatorDecl, FieldDecl, MemberDecl, TypeDecl};
use crate::codec::{BendecError, Primitive, Result};

/// Largest byte length any resolved type may have.
pub const MAX_LAYOUT_BYTES: usize = 64 * 1024 * 1024;

/// Index of a resolved type inside a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
	/// Position in the schema type table.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Resolved, immutable schema: type table plus name lookup (aliases included).
#[derive(Debug)]
pub struct Schema {
	types: Vec<TypeDef>,
	by_name: HashMap<Box<str>, TypeId>,
}

/// One resolved type.
#[derive(Debug)]
pub struct TypeDef {
	/// Canonical type name.
	pub name: Box<str>,
	/// Shape and layout.
	pub kind: TypeKind,
}

/// Resolved type shapes.
#[derive(Debug)]
pub enum TypeKind {
	/// Fixed-width scalar.
	Primitive(Primitive),
	/// Named constants or bit flags.
	Enum(EnumDef),
	/// Ordered fields at fixed offsets.
	Record(RecordDef),
	/// Discriminant header plus one record variant.
	Union(UnionDef),
}

impl TypeKind {
	/// Stable lowercase label of the kind.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Primitive(_) => "primitive",
			Self::Enum(item) if item.bitflags => "flags",
			Self::Enum(_) => "enum",
			Self::Record(_) => "record",
			Self::Union(_) => "union",
		}
	}
}

/// Closed set of named constants over an unsigned primitive.
#[derive(Debug)]
pub struct EnumDef {
	/// Underlying unsigned integer.
	pub underlying: Primitive,
	/// Constants in declaration order.
	pub variants: Vec<EnumVariant>,
	/// Constants combine as bit flags.
	pub bitflags: bool,
}

/// One named enum constant.
#[derive(Debug, Clone)]
pub struct EnumVariant {
	/// Constant name.
	pub name: Box<str>,
	/// Constant value.
	pub value: u64,
}

/// Record layout.
#[derive(Debug)]
pub struct RecordDef {
	/// Fields in wire order with resolved offsets.
	pub fields: Vec<Field>,
	/// Total byte length, the sum of field lengths.
	pub byte_len: usize,
}

/// One resolved record field.
#[derive(Debug)]
pub struct Field {
	/// Field name.
	pub name: Box<str>,
	/// Element type.
	pub ty: TypeId,
	/// Element count for array fields.
	pub count: Option<usize>,
	/// Offset from the start of the record.
	pub offset: usize,
	/// Bytes occupied by the field.
	pub byte_len: usize,
}

/// Union layout.
#[derive(Debug)]
pub struct UnionDef {
	/// Where the variant tag lives.
	pub discriminator: Discriminator,
	/// Enum type of the tag.
	pub discriminant: TypeId,
	/// Bytes before the member payload: the tag width for a header, zero for an embedded tag.
	pub header_len: usize,
	/// Offset of the tag from the start of the union.
	pub tag_offset: usize,
	/// Variants in member order.
	pub variants: Vec<UnionVariant>,
}

/// Resolved location of a union's variant tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discriminator {
	/// Header before the payload, mirrored in JSON under this key beside the member fields.
	Key(Box<str>),
	/// Enum field inside every member at the same offset, reached by this field path.
	Path(Vec<Box<str>>),
}

impl Discriminator {
	/// Dotted label, e.g. `kind` or `header.animalKind`.
	pub fn label(&self) -> String {
		match self {
			Self::Key(key) => key.to_string(),
			Self::Path(path) => path.join("."),
		}
	}
}

/// One union variant.
#[derive(Debug)]
pub struct UnionVariant {
	/// Discriminant constant name, also the variant name.
	pub name: Box<str>,
	/// Discriminant constant value.
	pub tag: u64,
	/// Payload record type.
	pub record: TypeId,
	/// Payload byte length.
	pub byte_len: usize,
}

/// Encoded length contract of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteLength {
	/// Every value encodes to exactly this many bytes.
	Fixed(usize),
	/// Union whose variants differ in length: `header + variant length`.
	PerVariant {
		/// Header length.
		header: usize,
		/// Shortest encoding.
		min: usize,
		/// Longest encoding, also the slot width inside records.
		max: usize,
	},
}

impl ByteLength {
	/// Longest possible encoding.
	pub fn max(self) -> usize {
		match self {
			Self::Fixed(len) => len,
			Self::PerVariant { max, .. } => max,
		}
	}
}

impl Schema {
	/// Resolve declarations into layouts, enforcing schema-time invariants.
	pub fn from_decls(decls: &[TypeDecl]) -> Result<Self> {
		let mut decl_map = HashMap::with_capacity(decls.len());
		for decl in decls {
			if decl_map.insert(decl.name(), decl).is_some() {
				return Err(BendecError::DuplicateType { name: decl.name().to_owned() });
			}
		}

		let mut resolver = Resolver {
			decls: decl_map,
			types: Vec::new(),
			by_name: HashMap::new(),
			visiting: Vec::new(),
		};

		for (name, size) in Primitive::BUILTINS {
			if !resolver.decls.contains_key(name) {
				let prim = Primitive::from_decl(name, size)?;
				resolver.push(name, TypeKind::Primitive(prim));
			}
		}
		for decl in decls {
			resolver.resolve(decl.name())?;
		}

		Ok(Self {
			types: resolver.types,
			by_name: resolver.by_name,
		})
	}

	/// Parse a JSON declaration list and resolve it.
	pub fn from_json_str(text: &str) -> Result<Self> {
		let decls: Vec<TypeDecl> = serde_json::from_str(text)?;
		Self::from_decls(&decls)
	}

	/// Look up a type (or alias) by name.
	pub fn type_id(&self, name: &str) -> Result<TypeId> {
		self.by_name.get(name).copied().ok_or_else(|| BendecError::UnknownType { name: name.to_owned() })
	}

	/// Resolved type by id.
	///
	/// # Panics
	///
	/// A [`TypeId`] is only meaningful for the schema that issued it; an id from another schema may be out
	/// of range.
	pub fn get(&self, id: TypeId) -> &TypeDef {
		&self.types[id.index()]
	}

	/// All resolved types in table order.
	pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeDef)> {
		self.types.iter().enumerate().map(|(idx, item)| (TypeId(idx as u32), item))
	}

	/// Encoded length contract of a type. Same id rules as [`Schema::get`].
	pub fn byte_length(&self, id: TypeId) -> ByteLength {
		byte_length_in(&self.types, id)
	}

	/// Bytes a type occupies when embedded in a record. Same id rules as [`Schema::get`].
	pub fn slot_len(&self, id: TypeId) -> usize {
		self.byte_length(id).max()
	}
}

fn byte_length_in(types: &[TypeDef], id: TypeId) -> ByteLength {
	match &types[id.index()].kind {
		TypeKind::Primitive(prim) => ByteLength::Fixed(prim.width),
		TypeKind::Enum(item) => ByteLength::Fixed(item.underlying.width),
		TypeKind::Record(item) => ByteLength::Fixed(item.byte_len),
		TypeKind::Union(item) => item.byte_length(),
	}
}

struct Resolver<'d> {
	decls: HashMap<&'d str, &'d TypeDecl>,
	types: Vec<TypeDef>,
	by_name: HashMap<Box<str>, TypeId>,
	visiting: Vec<&'d str>,
}

impl<'d> Resolver<'d> {
	fn push(&mut self, name: &str, kind: TypeKind) -> TypeId {
		let id = TypeId(self.types.len() as u32);
		self.types.push(TypeDef { name: name.into(), kind });
		self.by_name.insert(name.into(), id);
		id
	}

	fn resolve(&mut self, name: &str) -> Result<TypeId> {
		if let Some(id) = self.by_name.get(name) {
			return Ok(*id);
		}
		let (&key, &decl) = self
			.decls
			.get_key_value(name)
			.ok_or_else(|| BendecError::UnknownType { name: name.to_owned() })?;
		if self.visiting.contains(&key) {
			return Err(BendecError::RecursiveType { name: name.to_owned() });
		}

		self.visiting.push(key);
		let resolved = self.resolve_decl(decl);
		self.visiting.pop();

		match resolved? {
			Resolved::Alias(target) => {
				self.by_name.insert(key.into(), target);
				Ok(target)
			}
			Resolved::Kind(kind) => Ok(self.push(key, kind)),
		}
	}

	fn resolve_decl(&mut self, decl: &'d TypeDecl) -> Result<Resolved> {
		match decl {
			TypeDecl::Primitive { name, size } => Ok(Resolved::Kind(TypeKind::Primitive(Primitive::from_decl(name, *size)?))),
			TypeDecl::Alias { alias, .. } => Ok(Resolved::Alias(self.resolve(alias)?)),
			TypeDecl::Enum {
				name,
				underlying,
				variants,
				bitflags,
			} => self.resolve_enum(name, underlying, variants, *bitflags).map(Resolved::Kind),
			TypeDecl::Struct { name, size, fields } => self.resolve_struct(name, *size, fields).map(Resolved::Kind),
			TypeDecl::Union {
				name,
				discriminator,
				discriminant,
				members,
			} => self.resolve_union(name, discriminator, discriminant.as_deref(), members).map(Resolved::Kind),
		}
	}

	fn resolve_enum(&mut self, name: &str, underlying: &str, variants: &[(String, u64)], bitflags: bool) -> Result<TypeKind> {
		let base = self.resolve(underlying)?;
		let prim = match &self.types[base.index()].kind {
			TypeKind::Primitive(prim) if prim.is_unsigned_integer() => *prim,
			_ => {
				return Err(BendecError::InvalidEnumUnderlying {
					name: name.to_owned(),
					underlying: underlying.to_owned(),
				});
			}
		};

		let limit = if prim.width >= 8 { u64::MAX } else { (1_u64 << (prim.width * 8)) - 1 };
		let mut seen_names = HashSet::new();
		let mut seen_values = HashSet::new();
		let mut out = Vec::with_capacity(variants.len());
		for (variant, value) in variants {
			if *value > limit {
				return Err(BendecError::DiscriminantOutOfRange {
					type_name: name.to_owned(),
					variant: variant.clone(),
					value: *value,
					width: prim.width,
				});
			}
			if !seen_names.insert(variant.as_str()) || !seen_values.insert(*value) {
				return Err(BendecError::DuplicateDiscriminant {
					type_name: name.to_owned(),
					variant: variant.clone(),
				});
			}
			out.push(EnumVariant {
				name: variant.as_str().into(),
				value: *value,
			});
		}

		Ok(TypeKind::Enum(EnumDef {
			underlying: prim,
			variants: out,
			bitflags,
		}))
	}

	fn resolve_struct(&mut self, name: &str, size: Option<usize>, fields: &[FieldDecl]) -> Result<TypeKind> {
		let mut out: Vec<Field> = Vec::with_capacity(fields.len());
		let mut offset = 0_usize;
		for field in fields {
			if out.iter().any(|item| *item.name == *field.name) {
				return Err(BendecError::DuplicateField {
					type_name: name.to_owned(),
					field: field.name.clone(),
				});
			}
			let ty = self.resolve(&field.ty)?;
			let element = byte_length_in(&self.types, ty).max();
			let too_large = || BendecError::LayoutTooLarge {
				type_name: name.to_owned(),
				field: field.name.clone(),
				limit: MAX_LAYOUT_BYTES,
			};
			let byte_len = element.checked_mul(field.length.unwrap_or(1)).ok_or_else(too_large)?;
			let end = offset.checked_add(byte_len).filter(|end| *end <= MAX_LAYOUT_BYTES).ok_or_else(too_large)?;
			out.push(Field {
				name: field.name.as_str().into(),
				ty,
				count: field.length,
				offset,
				byte_len,
			});
			offset = end;
		}

		if let Some(declared) = size
			&& declared != offset
		{
			return Err(BendecError::LengthMismatch {
				type_name: name.to_owned(),
				declared,
				computed: offset,
			});
		}

		Ok(TypeKind::Record(RecordDef { fields: out, byte_len: offset }))
	}

	fn resolve_union(&mut self, name: &str, discriminator: &DiscriminatorDecl, discriminant: Option<&str>, members: &[MemberDecl]) -> Result<TypeKind> {
		let mut records = Vec::with_capacity(members.len());
		for member in members {
			let record = self.resolve(member.type_name())?;
			self.member_record(name, record)?;
			records.push(record);
		}

		let (discriminator, disc_id, in_header, tag_offset) = match discriminator {
			DiscriminatorDecl::Key(key) => {
				let Some(discriminant) = discriminant else {
					return Err(BendecError::MissingDiscriminant { type_name: name.to_owned() });
				};
				let disc_id = self.resolve(discriminant)?;
				for (member, record) in members.iter().zip(&records) {
					if self.member_record(name, *record)?.fields.iter().any(|field| *field.name == **key) {
						return Err(BendecError::DiscriminatorCollision {
							type_name: name.to_owned(),
							member: member.type_name().to_owned(),
							discriminator: key.clone(),
						});
					}
				}
				(Discriminator::Key(key.as_str().into()), disc_id, true, 0)
			}
			DiscriminatorDecl::Path(path) => {
				let mut located: Option<(TypeId, usize)> = None;
				for (member, record) in members.iter().zip(&records) {
					let found = self.locate_tag(name, member.type_name(), *record, path)?;
					if located.is_some_and(|first| first != found) {
						return Err(BendecError::InvalidDiscriminatorPath {
							type_name: name.to_owned(),
							member: member.type_name().to_owned(),
							reason: "tag type or offset differs between members",
						});
					}
					located = Some(found);
				}
				let Some((disc_id, tag_offset)) = located else {
					return Err(BendecError::MissingDiscriminant { type_name: name.to_owned() });
				};
				if let Some(declared) = discriminant
					&& self.resolve(declared)? != disc_id
				{
					return Err(BendecError::InvalidDiscriminatorPath {
						type_name: name.to_owned(),
						member: declared.to_owned(),
						reason: "path does not end at the declared discriminant",
					});
				}
				(Discriminator::Path(path.iter().map(|item| item.as_str().into()).collect()), disc_id, false, tag_offset)
			}
		};

		let tag = self.tag_enum(name, disc_id)?;
		let header_len = if in_header { tag.underlying.width } else { 0 };
		let constants = tag.variants.clone();
		let mut variants: Vec<UnionVariant> = Vec::with_capacity(members.len());
		for (member, record) in members.iter().zip(records) {
			let constant = constants
				.iter()
				.find(|item| *item.name == *member.tag())
				.ok_or_else(|| BendecError::UnmappedDiscriminant {
					type_name: name.to_owned(),
					variant: member.tag().to_owned(),
				})?;
			if variants.iter().any(|item| item.tag == constant.value) {
				return Err(BendecError::DuplicateDiscriminant {
					type_name: name.to_owned(),
					variant: member.tag().to_owned(),
				});
			}
			variants.push(UnionVariant {
				name: constant.name.clone(),
				tag: constant.value,
				record,
				byte_len: self.member_record(name, record)?.byte_len,
			});
		}

		if let Some(unmapped) = constants.iter().find(|item| variants.iter().all(|variant| variant.tag != item.value)) {
			return Err(BendecError::UnmappedDiscriminant {
				type_name: name.to_owned(),
				variant: unmapped.name.to_string(),
			});
		}

		Ok(TypeKind::Union(UnionDef {
			discriminator,
			discriminant: disc_id,
			header_len,
			tag_offset,
			variants,
		}))
	}

	/// Walk `path` through nested member fields to the tag enum, returning its type and offset.
	fn locate_tag(&self, name: &str, member: &str, record: TypeId, path: &[String]) -> Result<(TypeId, usize)> {
		let invalid = |reason| BendecError::InvalidDiscriminatorPath {
			type_name: name.to_owned(),
			member: member.to_owned(),
			reason,
		};
		let (last, parents) = path.split_last().ok_or_else(|| invalid("path is empty"))?;

		let mut current = record;
		let mut offset = 0;
		for section in parents {
			let field = self.path_field(current, section).ok_or_else(|| invalid("path names a missing field"))?;
			if !matches!(self.types[field.ty.index()].kind, TypeKind::Record(_)) {
				return Err(invalid("path passes through a non-struct field"));
			}
			offset += field.offset;
			current = field.ty;
		}

		let field = self.path_field(current, last).ok_or_else(|| invalid("path names a missing field"))?;
		if !matches!(&self.types[field.ty.index()].kind, TypeKind::Enum(item) if !item.bitflags) {
			return Err(invalid("path does not end at an enum field"));
		}
		Ok((field.ty, offset + field.offset))
	}

	/// Scalar (non-array) field of a resolved record.
	fn path_field(&self, record: TypeId, name: &str) -> Option<&Field> {
		let TypeKind::Record(def) = &self.types[record.index()].kind else {
			return None;
		};
		def.fields.iter().find(|field| &*field.name == name && field.count.is_none())
	}

	fn member_record(&self, name: &str, id: TypeId) -> Result<&RecordDef> {
		let item = &self.types[id.index()];
		match &item.kind {
			TypeKind::Record(def) => Ok(def),
			_ => Err(BendecError::InvalidUnionMember {
				type_name: name.to_owned(),
				member: item.name.to_string(),
				role: "record member",
			}),
		}
	}

	fn tag_enum(&self, name: &str, id: TypeId) -> Result<&EnumDef> {
		let item = &self.types[id.index()];
		match &item.kind {
			TypeKind::Enum(def) if !def.bitflags => Ok(def),
			_ => Err(BendecError::InvalidUnionMember {
				type_name: name.to_owned(),
				member: item.name.to_string(),
				role: "discriminant enum",
			}),
		}
	}
}

enum Resolved {
	Alias(TypeId),
	Kind(TypeKind),
}
