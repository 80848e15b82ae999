#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "julia", about = "Stream payload decoding and schema tools")]
struct Cli {
	/// Raise log verbosity (-v debug, -vv trace).
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode a flat payload and print the expanded structure.
	Decode(cmd::decode::Args),
	/// Decode a payload and parse it against a schema.
	Parse(cmd::parse::Args),
	/// Translate wire codes to labels.
	Map(cmd::map::Args),
	/// Translate labels back to wire codes.
	Unmap(cmd::map::Args),
	/// Describe the schema node addressed by a path.
	Resolve(cmd::resolve::Args),
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};
	env_logger::Builder::new().filter_level(level).parse_default_env().init();
}

fn run(command: Commands) -> cmd::Result<()> {
	match command {
		Commands::Decode(args) => cmd::decode::run(args),
		Commands::Parse(args) => cmd::parse::run(args),
		Commands::Map(args) => cmd::map::run(args, cmd::map::Direction::Forward),
		Commands::Unmap(args) => cmd::map::run(args, cmd::map::Direction::Reverse),
		Commands::Resolve(args) => cmd::resolve::run(args),
	}
}
