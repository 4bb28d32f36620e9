//! # Affili CLI Entry Point
//!
//! The main executable for the Affili tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Installs the log subscriber and parses arguments using [`cli::Cli`].
//! 2. **Configuration**: Maps credentials and environment into an `affili_core::ClientConfig`.
//! 3. **Execution**: Delegates the action call or listing to the `ServiceRegistry`.
//! 4. **Presentation**: Formats and prints the resulting data or error to standard output/error.
//!
//! Logs go to standard error and are controlled with `RUST_LOG` (e.g. `RUST_LOG=affili_core=debug`).

mod cli;
mod formatter;

use affili_core::{ServiceKey, ServiceRegistry, soap::client::SoapConnector};
use clap::Parser;
use cli::{Cli, Commands};
use formatter::{ActionList, FormattedString, GenericError};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let registry = connect_or_exit(&args);

    match args.command {
        Commands::Call {
            service,
            action,
            params,
        } => run_call(&registry, service, &action, params).await,
        Commands::List { service } => list_actions(&registry, service).await,
    }
}

fn connect_or_exit(args: &Cli) -> ServiceRegistry<SoapConnector> {
    let config = match args.config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", FormattedString::from(GenericError("Invalid configuration", err)));
            process::exit(1);
        }
    };

    match ServiceRegistry::connect(config) {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

async fn run_call(
    registry: &ServiceRegistry<SoapConnector>,
    service: ServiceKey,
    action: &str,
    params: serde_json::Value,
) {
    match registry.invoke(service, action, params).await {
        Ok(value) => println!("{}", FormattedString::from(value)),
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

async fn list_actions(registry: &ServiceRegistry<SoapConnector>, service: ServiceKey) {
    let dispatcher = registry.dispatcher_for(service).await;

    match dispatcher.actions().await {
        Ok(actions) => {
            println!(
                "{}",
                FormattedString::from(ActionList(service.to_string(), actions))
            );
        }
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}
