//! entradas-cli: command-line front-end for administering an Entradas blog.
//! Every command drives the same controllers an interactive front-end would.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;
#[cfg(test)]
mod tests;

use std::process;

use clap::Parser;
use entradas_admin::infra::telemetry;
use tracing::debug;

use args::{Cli, Commands};
use client::{CliError, Ctx, load_settings};
use handlers::{auth, authors, categories, posts, profile};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(&cli)?;
    telemetry::init(&settings.logging)?;
    debug!(api = %settings.api.base_url, session = %settings.session.path.display(), "settings loaded");

    let ctx = Ctx::new(&settings)?;
    let _guard = ctx.lifetime.end_on_drop();
    let interrupt = ctx.lifetime.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupted; abandoning in-flight requests");
            interrupt.end();
        }
    });

    dispatch(&ctx, cli.command).await
}

async fn dispatch(ctx: &Ctx, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Login { username, password } => auth::login(ctx, username, &password).await,
        Commands::Logout => auth::logout(ctx),
        Commands::Register {
            username,
            email,
            first_name,
            last_name,
            password,
        } => {
            let input = auth::Registration {
                username,
                email,
                first_name,
                last_name,
            };
            auth::register(ctx, input, &password).await
        }
        Commands::Profile(cmd) => profile::handle(ctx, cmd.action).await,
        Commands::Authors(cmd) => authors::handle(ctx, cmd.action).await,
        Commands::Categories(cmd) => categories::handle(ctx, cmd.action).await,
        Commands::Posts(cmd) => posts::handle(ctx, cmd.action).await,
    }
}
