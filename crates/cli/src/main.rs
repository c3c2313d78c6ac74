//! Cartflow command-line interface.
//!
//! - `cartflow place --order order.yaml` places an order against the configured cart API
//! - `cartflow plan --order order.yaml` previews the calls a placement would make

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use cartflow_api::CartflowClient;
use cartflow_engine::config::BASE_URL_ENV;
use cartflow_engine::{
    CheckoutConfig, CheckoutExecutor, StaticMetadataProvider, TracingEventSink, default_config_path, parse_order_file,
    plan,
};
use cartflow_util::http::HttpTransport;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cartflow", version)]
#[command(about = "Place orders through a shop's cart API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place an order and print its id as JSON
    Place {
        /// Order request file (YAML or JSON)
        #[arg(short, long)]
        order: PathBuf,

        /// Product metadata catalog used by the option translators
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Configuration file; defaults to CARTFLOW_CONFIG_PATH or the user config directory
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Cart API base URL, overriding the configuration file
        #[arg(long, env = BASE_URL_ENV)]
        base_url: Option<String>,
    },

    /// Print the step plan for an order without contacting the API
    Plan {
        /// Order request file (YAML or JSON)
        #[arg(short, long)]
        order: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Place {
            order,
            metadata,
            config,
            base_url,
        } => place(&order, metadata.as_deref(), config.as_deref(), base_url),
        Commands::Plan { order } => {
            let request = parse_order_file(&order)?;
            println!("{}", serde_json::to_string_pretty(&plan(&request))?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn place(order: &Path, metadata: Option<&Path>, config: Option<&Path>, base_url: Option<String>) -> Result<()> {
    let request = parse_order_file(order)?;
    let config = load_config(config, base_url)?;
    let metadata = match metadata {
        Some(path) => StaticMetadataProvider::from_path(path)?,
        None => StaticMetadataProvider::default(),
    };
    debug!(products = metadata.len(), base_url = %config.base_url, "starting placement");

    let executor = CheckoutExecutor::new(&config, Arc::new(metadata), Arc::new(TracingEventSink))?;
    let client = CartflowClient::new(config.api_token.as_deref(), config.timeout())?;
    let mut transport = HttpTransport::new(client);

    let run = executor.run(&request, &mut transport);
    for record in &run.steps {
        info!(step = %record.step, status = ?record.status, calls = record.calls, "step finished");
    }
    let placed = run.outcome.context("order placement failed")?;
    println!("{}", serde_json::to_string_pretty(&placed)?);
    Ok(())
}

/// Resolve configuration: explicit file, then the default file when present, then environment.
/// `--base-url` wins over every other source.
fn load_config(path: Option<&Path>, base_url: Option<String>) -> Result<CheckoutConfig> {
    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Some(default_config_path()).filter(|path| path.exists()),
    };

    let mut config = match file {
        Some(file) => CheckoutConfig::from_path(&file).with_context(|| format!("loading {}", file.display()))?,
        None => CheckoutConfig::new(String::new()),
    };
    config.apply_env_overrides();
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }

    if config.base_url.trim().is_empty() {
        bail!("no cart API base URL configured; pass --base-url, set CARTFLOW_BASE_URL, or add base_url to the config file");
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartflow_engine::config::{API_TOKEN_ENV, CONFIG_PATH_ENV};

    #[test]
    fn flag_overrides_environment_base_url() {
        temp_env::with_vars(
            [
                (CONFIG_PATH_ENV, Some("/nonexistent/cartflow/config.yaml")),
                (BASE_URL_ENV, Some("https://env.example.com/rest/V1")),
                (API_TOKEN_ENV, Some("token-from-env")),
            ],
            || {
                let config = load_config(None, Some("https://flag.example.com/rest/V1".into())).expect("config");
                assert_eq!(config.base_url, "https://flag.example.com/rest/V1");
                assert_eq!(config.api_token.as_deref(), Some("token-from-env"));
            },
        );
    }

    #[test]
    fn missing_base_url_is_reported() {
        temp_env::with_vars(
            [
                (CONFIG_PATH_ENV, Some("/nonexistent/cartflow/config.yaml")),
                (BASE_URL_ENV, None::<&str>),
            ],
            || {
                let error = load_config(None, None).unwrap_err();
                assert!(error.to_string().contains("no cart API base URL configured"));
            },
        );
    }

    #[test]
    fn config_file_may_leave_base_url_to_the_environment() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "api_token: file-token\n").unwrap();

        temp_env::with_vars(
            [(BASE_URL_ENV, Some("https://env.example.com/rest/V1")), (API_TOKEN_ENV, None::<&str>)],
            || {
                let config = load_config(Some(&path), None).expect("config");
                assert_eq!(config.base_url, "https://env.example.com/rest/V1");
                assert_eq!(config.api_token.as_deref(), Some("file-token"));
            },
        );
    }

    #[test]
    fn cli_parses_place_arguments() {
        temp_env::with_var_unset(BASE_URL_ENV, || {
            let cli =
                Cli::try_parse_from(["cartflow", "place", "--order", "order.yaml", "-m", "products.yaml"]).expect("parse");
            match cli.command {
                Commands::Place { order, metadata, config, base_url } => {
                    assert_eq!(order, PathBuf::from("order.yaml"));
                    assert_eq!(metadata, Some(PathBuf::from("products.yaml")));
                    assert!(config.is_none());
                    assert!(base_url.is_none());
                }
                Commands::Plan { .. } => panic!("expected place"),
            }
        });
    }

    #[test]
    fn base_url_flag_falls_back_to_the_environment() {
        temp_env::with_var(BASE_URL_ENV, Some("https://env.example.com/rest/V1"), || {
            let cli = Cli::try_parse_from(["cartflow", "place", "--order", "order.yaml"]).expect("parse");
            match cli.command {
                Commands::Place { base_url, .. } => assert_eq!(base_url.as_deref(), Some("https://env.example.com/rest/V1")),
                Commands::Plan { .. } => panic!("expected place"),
            }
        });
    }
}
