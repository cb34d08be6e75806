//! storaudit CLI - demonstrates browser localStorage token exposure against
//! the user's own machine, and decodes what it finds

use clap::Parser;

mod cli;
mod config;
mod error;
mod jwt;
mod locator;
mod output;
mod pipeline;
mod scanner;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan(args) => cli::scan::run(&args, cli.format, cli.config.as_deref()),
        Commands::Decode { token } => cli::decode::run(&token, cli.format),
        Commands::Profiles => cli::profiles::run(cli.format),
        Commands::Version => {
            println!("storaudit version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => {
            cli::completions::run(shell);
            Ok(())
        }
    }
}
