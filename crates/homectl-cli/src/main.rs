//! homectl - render Dhall services into Kubernetes manifests and deploy them

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod display;
mod error;
mod exit_codes;
mod prompt;
mod settings;

#[derive(Parser)]
#[command(name = "homectl")]
#[command(version)]
#[command(about = "Render Dhall services into Kubernetes manifests and deploy them", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    overrides: settings::Overrides,
}

#[derive(Subcommand)]
enum Commands {
    /// Render and compile the declared resources of each service
    Generate {
        /// Service directories
        #[arg(required = true)]
        services: Vec<PathBuf>,

        /// Process the resources declared under `secrets`, prompting for their values
        #[arg(long)]
        secrets: bool,

        /// Do not echo secret values while typing
        #[arg(long, requires = "secrets")]
        hide_input: bool,

        /// Resource template replacing the built-in one
        #[arg(long, value_name = "FILE")]
        template: Option<PathBuf>,
    },

    /// Apply generated manifests and install charts
    Apply {
        /// Service directories
        #[arg(required = true)]
        services: Vec<PathBuf>,
    },

    /// Delete chart releases and generated manifests
    Delete {
        /// Service directories
        #[arg(required = true)]
        services: Vec<PathBuf>,
    },

    /// Clone or update the Dhall dependency repositories
    Init {
        /// Checkout directory
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("homectl=info,warn"))
    };

    // Already initialized when embedded; keep the existing subscriber
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = settings::load(&cli.overrides).and_then(|config| match cli.command {
        Commands::Generate {
            services,
            secrets,
            hide_input,
            template,
        } => commands::generate::run(&config, &services, secrets, hide_input, template.as_deref()),
        Commands::Apply { services } => commands::apply::run(&config, &services),
        Commands::Delete { services } => commands::delete::run(&config, &services),
        Commands::Init { dir } => commands::init::run(&config, dir.as_deref()),
    });

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(e) => {
            let code = e.exit_code();
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::from(code)
        }
    }
}
