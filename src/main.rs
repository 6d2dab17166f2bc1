#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "bendec", about = "Fixed-width binary record codec")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// List schema types, or one type's layout.
	Schema(cmd::schema::Args),
	/// Decode a binary value and print its JSON mirror.
	Decode(cmd::decode::Args),
	/// Encode a JSON value into bytes.
	Encode(cmd::encode::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> bendec::codec::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Schema(args) => cmd::schema::run(args),
		Commands::Decode(args) => cmd::decode::run(args),
		Commands::Encode(args) => cmd::encode::run(args),
	}
}
