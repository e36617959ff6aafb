//! Salus CLI - medicine inventory search from the terminal

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;

use clap::Parser;
use salus_core::forms::RegistrationForm;
use salus_core::search::SearchSettings;

use crate::cli::{Cli, Commands};
use crate::commands::add::add_medicine;
use crate::commands::auth_cmd::run_auth;
use crate::commands::catalog::{run_catalog, CatalogList};
use crate::commands::common::CliContext;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::register::run_register;
use crate::commands::search::run_search;
use crate::commands::suggest::{run_suggest_session, stdin_lines};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "salus=info".parse::<tracing_subscriber::filter::Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Search { query, limit, json } => {
            run_search(&query, limit, json, &CliContext::load(profile)?).await?;
        }
        Commands::Suggest => {
            let context = CliContext::load(profile)?;
            let mut stdout = std::io::stdout();
            run_suggest_session(
                context.client()?,
                SearchSettings::from(&context.config),
                stdin_lines(),
                &mut stdout,
            )
            .await?;
        }
        Commands::Add {
            name,
            company,
            location,
        } => {
            let client = CliContext::load(profile)?.client()?;
            println!("{}", add_medicine(&client, &name, &company, &location).await?);
        }
        Commands::Companies { filter, json } => {
            let client = CliContext::load(profile)?.client()?;
            run_catalog(&client, CatalogList::Companies, filter.as_deref(), json).await?;
        }
        Commands::Locations { filter, json } => {
            let client = CliContext::load(profile)?.client()?;
            run_catalog(&client, CatalogList::Locations, filter.as_deref(), json).await?;
        }
        Commands::Register {
            username,
            email,
            password,
            repeat_password,
            no_wait,
        } => {
            let client = CliContext::load(profile)?.client()?;
            let form = RegistrationForm {
                username,
                email,
                repeat_password: repeat_password.unwrap_or_else(|| password.clone()),
                password,
            };
            run_register(&client, &form, !no_wait).await?;
        }
        Commands::Config { command } => run_config(command, profile)?,
        Commands::Auth { command } => run_auth(command, profile)?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
