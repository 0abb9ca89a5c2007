//! Suggest command handler
//!
//! Runs one suggestion fetch and renders the result as an open dropdown.

use crate::cli::{Context, WeightArgs};
use crate::error::Result;
use crate::fetch::{SuggestionFetcher, Weighting};
use crate::resolve::Resolution;
use crate::view::View;
use crate::widget::WidgetState;
use clap::Args;
use tracing::info;

/// Suggest command arguments
#[derive(Args)]
pub struct SuggestArgs {
    /// Text typed so far
    pub text: String,

    #[command(flatten)]
    pub weight: WeightArgs,
}

/// Run the suggest command
pub async fn run(args: SuggestArgs, ctx: &Context) -> Result<()> {
    let options = args.weight.apply(&ctx.config)?;
    let renderer = ctx.renderer()?;
    let backend = ctx.backend()?;
    info!(backend = backend.name(), text = %args.text, "fetching suggestions");

    let fetcher = SuggestionFetcher::new(backend, Weighting::from(&options));
    let suggestions = fetcher.fetch(&args.text).await?;

    let state = WidgetState {
        input_text: args.text,
        suggestions,
        interested: true,
        ..WidgetState::new()
    };
    let view = View::project(&state, Resolution::Unset, &options);
    print!("{}", renderer.render(&view)?);

    Ok(())
}
