//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod resolve;
pub mod session;
pub mod suggest;

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_renderer, ViewRenderer};
use crate::geo::Backend;
use crate::widget::WidgetOptions;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Place autocomplete input backed by a geocoder
#[derive(Parser)]
#[command(name = "place-input")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format: text or json
    #[arg(long, short = 'f', global = true)]
    pub format: Option<String>,

    /// Provider backend: nominatim or memory
    #[arg(long, short = 'b', global = true)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch suggestions for some text
    Suggest(suggest::SuggestArgs),

    /// Resolve a place id or an address to coordinates
    Resolve(resolve::ResolveArgs),

    /// Drive a place input with line commands
    Session(session::SessionArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Weighting overrides shared by commands that fetch suggestions
#[derive(Args, Debug, Default)]
pub struct WeightArgs {
    /// Weighting center latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Weighting center longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Weighting radius in meters
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Restrict results to a country code
    #[arg(long, short = 'c')]
    pub country: Option<String>,

    /// Place type filter (repeatable)
    #[arg(long = "type", short = 't')]
    pub types: Vec<String>,
}

impl WeightArgs {
    /// Widget options from config with these overrides applied
    pub fn apply(&self, config: &Config) -> Result<WidgetOptions> {
        let mut options = config.widget_options();

        if let Some(lat) = self.lat {
            options.center = Coordinates::new(lat, options.center.lng);
        }
        if let Some(lng) = self.lng {
            options.center = Coordinates::new(options.center.lat, lng);
        }
        if let Some(radius) = self.radius {
            options.radius = radius;
        }
        if let Some(country) = &self.country {
            options.country = Some(country.clone()).filter(|c| !c.is_empty());
        }
        if !self.types.is_empty() {
            options.types = self.types.clone();
        }

        options.validate()?;
        Ok(options)
    }
}

/// Loaded configuration plus global overrides
pub struct Context {
    pub config: Config,
    pub format: String,
}

impl Context {
    fn new(format: Option<String>, backend: Option<String>, mut config: Config) -> Self {
        if let Some(backend) = backend {
            config.provider.backend = backend;
        }
        let format = format.unwrap_or_else(|| config.output.format.clone());
        Self { config, format }
    }

    pub fn backend(&self) -> Result<Backend> {
        Backend::from_config(&self.config.provider)
    }

    pub fn renderer(&self) -> Result<Box<dyn ViewRenderer>> {
        get_renderer(&self.format).ok_or_else(|| {
            let known: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
            Error::Config(format!(
                "Unknown format: {} (available: {})",
                self.format,
                known.join(", ")
            ))
        })
    }
}

/// Initialize logging to stderr, honouring RUST_LOG
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let command = match cli.command {
        Commands::Config(args) => return config::run(args),
        command => command,
    };

    let ctx = Context::new(cli.format, cli.backend, Config::load()?);

    match command {
        Commands::Suggest(args) => suggest::run(args, &ctx).await,
        Commands::Resolve(args) => resolve::run(args, &ctx).await,
        Commands::Session(args) => session::run(args, &ctx).await,
        Commands::Config(args) => config::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "place-input",
            "suggest",
            "10 Down",
            "--lat",
            "51.5",
            "--lng",
            "-0.12",
            "-t",
            "address",
            "-t",
            "poi",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format.as_deref(), Some("json"));
        let Commands::Suggest(args) = cli.command else {
            panic!("expected suggest");
        };
        assert_eq!(args.text, "10 Down");
        assert_eq!(args.weight.lng, Some(-0.12));
        assert_eq!(args.weight.types, vec!["address", "poi"]);
    }

    #[test]
    fn test_weight_args_override_config() {
        let config = Config::default();
        let args = WeightArgs {
            lat: Some(51.5),
            radius: Some(1500.0),
            country: Some("gb".to_string()),
            ..Default::default()
        };

        let options = args.apply(&config).unwrap();
        assert_eq!(options.center, Coordinates::new(51.5, 0.0));
        assert_eq!(options.radius, 1500.0);
        assert_eq!(options.country.as_deref(), Some("gb"));
        assert_eq!(options.types, vec!["geocode"]);
    }

    #[test]
    fn test_weight_args_reject_invalid() {
        let args = WeightArgs {
            radius: Some(-5.0),
            ..Default::default()
        };
        assert!(args.apply(&Config::default()).is_err());
    }

    #[test]
    fn test_context_overrides() {
        let cli = Cli::try_parse_from(["place-input", "-b", "memory", "resolve", "Paris"]).unwrap();
        let ctx = Context::new(cli.format, cli.backend, Config::default());
        assert_eq!(ctx.config.provider.backend, "memory");
        assert_eq!(ctx.format, "text");
        assert!(ctx.renderer().is_ok());
    }

    #[test]
    fn test_unknown_format() {
        let cli = Cli::try_parse_from(["place-input", "-f", "gpx", "resolve", "Paris"]).unwrap();
        let ctx = Context::new(cli.format, cli.backend, Config::default());
        assert!(ctx.renderer().is_err());
    }
}
