mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "devstack",
    about = "Developer workflows for the Flutter + Firebase stack - dev loop, setup, validation, tests, deploy",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from devstack.yaml or .git/)
    #[arg(long, global = true, env = "DEVSTACK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a devstack.yaml describing the default dev stack
    Init {
        /// Overwrite an existing devstack.yaml
        #[arg(long)]
        force: bool,
    },

    /// Run the dev stack (Flutter dev server + Firebase emulators) until Ctrl-C
    Dev,

    /// Prepare the development environment (dependencies, env files)
    Setup,

    /// Validate the environment and project structure
    Doctor {
        /// Also probe the emulator endpoints over HTTP
        #[arg(long)]
        health: bool,
    },

    /// Run the project's check suite (analyze, format, tests, functions build)
    Test,

    /// Build and deploy to Firebase
    Deploy {
        /// Skip the pre-deploy test suite
        #[arg(long)]
        skip_tests: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Dev => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init { force } => cmd::init::run(&root, force),
        Commands::Dev => cmd::dev::run(&root),
        Commands::Setup => cmd::setup::run(&root, cli.json),
        Commands::Doctor { health } => cmd::doctor::run(&root, health, cli.json),
        Commands::Test => cmd::test::run(&root, cli.json),
        Commands::Deploy { skip_tests } => cmd::deploy::run(&root, skip_tests),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
