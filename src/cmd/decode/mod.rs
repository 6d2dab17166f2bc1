use std::path::PathBuf;

use bendec::codec::{DecodeOptions, Result, SchemaFile, parse_hex, read_input};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long = "type")]
	pub type_name: String,
	pub input: PathBuf,
	#[arg(long, default_value_t = 0)]
	pub offset: usize,
	#[arg(long)]
	pub hex: bool,
	#[arg(long)]
	pub strict_padding: bool,
	#[arg(long)]
	pub raw_chars: bool,
}

/// Decode one value from a binary (or hex) input and print its JSON mirror.
pub fn run(args: Args) -> Result<()> {
	let Args {
		schema,
		type_name,
		input,
		offset,
		hex,
		strict_padding,
		raw_chars,
	} = args;

	let file = SchemaFile::open(&schema)?;
	let codec = file.schema.codec(&type_name)?;

	let (_, mut bytes) = read_input(&input)?;
	if hex {
		bytes = parse_hex(&String::from_utf8_lossy(&bytes))?;
	}

	let options = DecodeOptions {
		strict_padding,
		char_arrays_as_string: !raw_chars,
	};
	let (value, _) = codec.decode_with(&bytes, offset, &options)?;
	emit_json(&codec.to_json(&value)?)
}
