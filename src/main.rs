use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_batch_release::cli::{run_session, SessionArgs};
use git_batch_release::config;
use git_batch_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-batch-release",
    version,
    about = "Bump, commit and push every git working tree with pending changes under a directory"
)]
struct Args {
    #[arg(short, long, help = "Directory to scan for git working trees")]
    root: Option<PathBuf>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "List repositories and their change state, then exit")]
    list: bool,

    #[arg(long, help = "Save the root path to the configuration file")]
    remember: bool,

    #[arg(short, long, help = "Start the release run without asking")]
    yes: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let session = SessionArgs {
        root: args.root,
        config_path: args.config,
        list: args.list,
        remember: args.remember,
        yes: args.yes,
    };

    if let Err(e) = run_session(session, config) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
