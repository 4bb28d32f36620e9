//! # CLI
//!
//! This module defines the command-line interface of `affili` using `clap`.
//!
//! Credentials and the target environment are global arguments. Each of them can also be
//! supplied through an `AFFILINET_*` environment variable, which is how the publisher
//! password is usually provided.
use affili_core::{ClientConfig, Environment, ServiceKey, service::UnknownServiceError};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "affili", version, about = "Generic affilinet publisher web services CLI")]
pub struct Cli {
    /// Publisher id used to log on
    #[arg(long, env = "AFFILINET_USER", global = true)]
    pub user: Option<String>,

    /// Publisher web services password
    #[arg(
        long,
        env = "AFFILINET_PUBLISHER_PASSWORD",
        hide_env_values = true,
        global = true
    )]
    pub password: Option<String>,

    /// Which affilinet environment to talk to
    #[arg(
        long,
        value_enum,
        env = "AFFILINET_ENVIRONMENT",
        default_value_t = Target::Production,
        global = true
    )]
    pub environment: Target,

    /// Overrides the environment's base URL (e.g. a local mock server)
    #[arg(long, env = "AFFILINET_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Publisher id to impersonate on the sandbox environment
    #[arg(long, env = "AFFILINET_SANDBOX_PUBLISHER_ID", global = true)]
    pub sandbox_publisher_id: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Invoke an action of a service
    ///
    /// Logs on, sends the parameters and prints the unwrapped response payload.
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// affili call statistics get_sub_id_statistics --params '{"StartDate": "2024-01-01", "EndDate": "2024-01-31"}'
    /// ```
    Call {
        /// Service name (creative, product, inbox, account, statistics, program_list)
        #[arg(value_parser = parse_service)]
        service: ServiceKey,
        /// Action name in snake_case (e.g. get_payments)
        action: String,
        /// JSON parameters of the action
        #[arg(long, value_parser = parse_params, default_value = "{}")]
        params: serde_json::Value,
    },

    /// List the actions advertised by a service
    List {
        /// Service name (creative, product, inbox, account, statistics, program_list)
        #[arg(value_parser = parse_service)]
        service: ServiceKey,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Production,
    Sandbox,
}

impl Cli {
    /// Builds the client configuration, failing when a credential is missing.
    pub fn config(&self) -> Result<ClientConfig, String> {
        let user = self
            .user
            .clone()
            .ok_or("Missing publisher id: pass --user or set AFFILINET_USER")?;
        let password = self.password.clone().ok_or(
            "Missing password: pass --password or set AFFILINET_PUBLISHER_PASSWORD",
        )?;

        let mut config = ClientConfig::new(user, password).with_environment(self.environment());

        if let Some(publisher_id) = &self.sandbox_publisher_id {
            config = config.with_sandbox_publisher_id(publisher_id.clone());
        }

        Ok(config)
    }

    fn environment(&self) -> Environment {
        match (&self.base_url, self.environment) {
            (Some(url), _) => Environment::Custom(url.clone()),
            (None, Target::Production) => Environment::Production,
            (None, Target::Sandbox) => Environment::Sandbox,
        }
    }
}

fn parse_service(value: &str) -> Result<ServiceKey, String> {
    value.parse().map_err(|err: UnknownServiceError| err.to_string())
}

fn parse_params(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}
