use std::fs;
use std::path::PathBuf;

use bendec::codec::{Result, SchemaFile, read_input, render_hex};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long = "type")]
	pub type_name: String,
	pub value: PathBuf,
	#[arg(long)]
	pub out: Option<PathBuf>,
}

/// Encode a JSON value; raw bytes go to `--out`, otherwise lowercase hex goes to stdout.
pub fn run(args: Args) -> Result<()> {
	let Args {
		schema,
		type_name,
		value,
		out,
	} = args;

	let file = SchemaFile::open(&schema)?;
	let codec = file.schema.codec(&type_name)?;

	let (_, text) = read_input(&value)?;
	let json: serde_json::Value = serde_json::from_slice(&text)?;
	let bytes = codec.to_bytes(&codec.from_json(&json)?)?;

	match out {
		Some(path) => {
			fs::write(&path, &bytes)?;
			println!("wrote {} bytes to {}", bytes.len(), path.display());
		}
		None => println!("{}", render_hex(&bytes)),
	}
	Ok(())
}
