//! Wayfinder dashboard binary.
//!
//! Replays a navigation script (from `--script` or stdin) against the
//! dashboard and prints the breadcrumb and rendered screen after every step.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use wayfinder_dashboard::{App, DashboardConfig, Step, parse_line, parse_script};

/// Dashboard command line arguments.
#[derive(Parser, Debug)]
#[command(name = "wayfinder")]
#[command(about = "Drive the wayfinder dashboard with a navigation script")]
struct Args {
	/// TOML configuration file
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Script to replay instead of reading commands from stdin
	#[arg(short, long, value_name = "PATH")]
	script: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => DashboardConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => DashboardConfig::default(),
	};
	setup_tracing(args.verbose, config.log.filter.as_deref());

	info!(config = ?args.config, "starting wayfinder");
	let app = App::new(&config)?;
	println!("{}", app.render());

	match &args.script {
		Some(path) => {
			let source = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
			let steps = parse_script(&source).with_context(|| format!("parsing {}", path.display()))?;
			for step in &steps {
				run_step(&app, step).await;
			}
		}
		None => {
			let mut lines = BufReader::new(tokio::io::stdin()).lines();
			let mut line_no = 0;
			while let Some(line) = lines.next_line().await? {
				line_no += 1;
				match parse_line(line_no, &line) {
					Ok(Some(step)) => run_step(&app, &step).await,
					Ok(None) => {}
					Err(err) => eprintln!("{err}"),
				}
			}
		}
	}

	info!(delivered = app.bus().delivered(), faults = app.bus().faults(), "wayfinder finished");
	Ok(())
}

async fn run_step(app: &App, step: &Step) {
	println!("\n> {step}");
	if let Err(err) = app.apply(step).await {
		// A bad url is reported and the script continues.
		eprintln!("{step}: {err}");
	}
	println!("{}", app.render());
}

fn setup_tracing(verbose: bool, configured: Option<&str>) {
	use tracing_subscriber::EnvFilter;

	let filter = if verbose {
		EnvFilter::new("wayfinder=debug")
	} else {
		EnvFilter::try_from_default_env()
			.or_else(|_| EnvFilter::try_new(configured.unwrap_or("wayfinder=info")))
			.unwrap_or_else(|_| EnvFilter::new("wayfinder=info"))
	};

	// Tracing goes to stderr; stdout carries the rendered screens.
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
