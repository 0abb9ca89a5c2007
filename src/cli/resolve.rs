//! Resolve command handler
//!
//! Resolves a place id or free-form address to coordinates.

use crate::cli::Context;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::format::ViewRenderer;
use crate::geo::{PlaceId, Query};
use crate::resolve::LocationResolver;
use clap::Args;
use tracing::info;

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Address text to geocode
    #[arg(conflicts_with = "id")]
    pub address: Option<String>,

    /// Place id from a suggestion
    #[arg(long)]
    pub id: Option<String>,
}

impl ResolveArgs {
    fn query(&self) -> Result<Query> {
        match (&self.id, &self.address) {
            (Some(id), _) => Ok(Query::ById(PlaceId::new(id.clone()))),
            (None, Some(address)) => Ok(Query::ByAddress(address.clone())),
            (None, None) => Err(Error::Config(
                "Provide an address or --id <place id>".to_string(),
            )),
        }
    }
}

/// Format a resolved coordinate for the selected renderer
fn render_location(renderer: &dyn ViewRenderer, location: &Coordinates) -> Result<String> {
    match renderer.name() {
        "json" => Ok(serde_json::to_string_pretty(location)?),
        _ => Ok(location.to_string()),
    }
}

/// Run the resolve command
pub async fn run(args: ResolveArgs, ctx: &Context) -> Result<()> {
    let query = args.query()?;
    let renderer = ctx.renderer()?;
    let backend = ctx.backend()?;
    info!(backend = backend.name(), %query, "resolving");

    let location = LocationResolver::new(backend).resolve(&query).await?;
    println!("{}", render_location(renderer.as_ref(), &location)?);

    Ok(())
}
