// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};

mod cli;
mod commands;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::HashPassword { password, cost } => {
            println!("{}", commands::hash_password(&password, cost)?);
        }
        Commands::Migrate { database_url } => {
            runtime()?.block_on(commands::migrate(&database_url))?;
        }
        Commands::Seed {
            database_url,
            admin_email,
            admin_password,
            cost,
        } => {
            let admin = admin_email.zip(admin_password);
            runtime()?.block_on(commands::seed(&database_url, admin, cost))?;
        }
    }

    Ok(())
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
