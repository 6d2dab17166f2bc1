mod compression;
mod decl;
mod dispatch;
mod enums;
mod error;
mod json;
mod primitive;
mod record;
mod schema;
mod source;
mod union;
mod value;

/// Input compression detection result.
pub use compression::Compression;
/// Serializable type declarations.
pub use decl::{DiscriminatorDecl, FieldDecl, MemberDecl, TypeDecl};
/// Per-type codec handle and decode switches.
pub use dispatch::{DecodeOptions, TypeCodec};
/// Error and result aliases.
pub use error::{BendecError, Result};
/// Fixed-width scalar codec.
pub use primitive::{Primitive, ScalarKind, read_uint, write_uint};
/// Resolved schema representation.
pub use schema::{ByteLength, Discriminator, EnumDef, EnumVariant, Field, MAX_LAYOUT_BYTES, RecordDef, Schema, TypeDef, TypeId, TypeKind, UnionDef, UnionVariant};
/// File loading helpers.
pub use source::{SchemaFile, parse_hex, read_input, render_hex};
/// In-memory value types.
pub use value::{FieldValue, RecordBuilder, RecordValue, UnionValue, Value};
