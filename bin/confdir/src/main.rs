//! Configurable property inspector.
//!
//! Loads a property manifest, registers its declarations into a fresh
//! directory and answers one query as JSON on stdout. Logs go to stderr, or
//! to a per-process file under `CONFDIR_LOG_DIR` when that is set.

mod commands;

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "confdir")]
#[command(about = "Inspect configurable properties declared in a manifest")]
struct Args {
	/// Property manifest to load
	#[arg(short, long, value_name = "PATH", default_value = "confdir.toml")]
	manifest: PathBuf,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
	/// Register the manifest and report what was filed where
	Check,
	/// List active entry set names
	Prefixes,
	/// List active properties, optionally one entry set
	List {
		prefix: Option<String>,
		/// Restrict to one alias (requires PREFIX)
		#[arg(long, requires = "prefix")]
		alias: Option<String>,
	},
	/// Show one active property
	Get { name: String },
	/// List pending properties, optionally one entry set
	Pending { prefix: Option<String> },
	/// Management summary of one entry set
	Summary {
		prefix: String,
		#[arg(long)]
		alias: Option<String>,
	},
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let stdout = std::io::stdout();
	commands::run(&args.manifest, &args.command, &mut stdout.lock())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::fmt::format::FmtSpan;
	use tracing_subscriber::prelude::*;

	match log_file() {
		Some((path, file)) => {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_span_events(FmtSpan::CLOSE)
				.with_target(true);

			tracing_subscriber::registry()
				.with(env_filter(verbose))
				.with(file_layer)
				.init();

			tracing::info!(path = ?path, "tracing initialized");
		}
		None => tracing_subscriber::fmt()
			.with_env_filter(env_filter(verbose))
			.with_writer(std::io::stderr)
			.init(),
	}
}

/// `RUST_LOG` when set, else the crate-level default for `verbose`.
fn env_filter(verbose: bool) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

fn default_directive(verbose: bool) -> &'static str {
	if verbose { "confdir=debug" } else { "confdir=info" }
}

/// Opens `confdir.<pid>.log` under `CONFDIR_LOG_DIR` for appending.
fn log_file() -> Option<(PathBuf, File)> {
	let log_dir = PathBuf::from(std::env::var_os("CONFDIR_LOG_DIR")?);
	std::fs::create_dir_all(&log_dir).ok()?;
	let path = log_dir.join(format!("confdir.{}.log", std::process::id()));
	let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
	Some((path, file))
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn cli_is_well_formed() {
		Args::command().debug_assert();
	}

	#[test]
	fn parses_list_with_alias() {
		let args = Args::try_parse_from(["confdir", "-m", "cloud.toml", "list", "storage", "--alias", "zone1"]).unwrap();
		assert_eq!(args.manifest, PathBuf::from("cloud.toml"));
		assert_eq!(
			args.command,
			Command::List {
				prefix: Some("storage".into()),
				alias: Some("zone1".into()),
			}
		);
	}

	#[test]
	fn alias_requires_prefix() {
		assert!(Args::try_parse_from(["confdir", "list", "--alias", "zone1"]).is_err());
	}

	#[test]
	fn verbose_raises_default_log_level() {
		assert_eq!(default_directive(false), "confdir=info");
		assert_eq!(default_directive(true), "confdir=debug");
	}

	#[test]
	fn manifest_defaults_to_working_directory() {
		let args = Args::try_parse_from(["confdir", "prefixes"]).unwrap();
		assert_eq!(args.manifest, PathBuf::from("confdir.toml"));
		assert!(!args.verbose);
	}
}
