use std::fs;
use std::path::Path;

use crate::codec::compression::decode_bytes;
use crate::codec::{BendecError, Compression, Result, Schema, TypeDecl};

/// Schema loaded from disk together with its declarations.
#[derive(Debug)]
pub struct SchemaFile {
	/// Compression detected on the schema file.
	pub compression: Compression,
	/// Declarations as written.
	pub decls: Vec<TypeDecl>,
	/// Resolved schema.
	pub schema: Schema,
}

impl SchemaFile {
	/// Read, decompress, parse, and resolve a JSON declaration file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let (compression, bytes) = read_input(path)?;
		let decls: Vec<TypeDecl> = serde_json::from_slice(&bytes)?;
		let schema = Schema::from_decls(&decls)?;
		Ok(Self { compression, decls, schema })
	}
}

/// Read a file, unwrapping zstd compression when present.
pub fn read_input(path: impl AsRef<Path>) -> Result<(Compression, Vec<u8>)> {
	let raw = fs::read(path)?;
	decode_bytes(raw)
}

/// Parse hex text into bytes. Whitespace is ignored and an optional `0x` prefix is accepted.
///
/// [`BendecError::InvalidHex`] reports the offending position in `text` after leading whitespace is trimmed.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
	let text = text.trim();
	let (skipped, body) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
		Some(rest) => (2, rest),
		None => (0, text),
	};

	let mut digits = String::with_capacity(body.len());
	let mut positions = Vec::with_capacity(body.len());
	for (at, ch) in body.char_indices().filter(|(_, ch)| !ch.is_ascii_whitespace()) {
		digits.push(ch);
		positions.extend(std::iter::repeat_n(at, ch.len_utf8()));
	}
	hex::decode(&digits).map_err(|err| {
		let at = match err {
			hex::FromHexError::InvalidHexCharacter { index, .. } => positions.get(index).copied().unwrap_or(body.len()),
			hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => body.len(),
		};
		BendecError::InvalidHex { at: skipped + at }
	})
}

/// Render bytes as lowercase hex without separators.
pub fn render_hex(bytes: &[u8]) -> String {
	hex::encode(bytes)
}
