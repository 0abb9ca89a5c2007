//! place-input CLI entry point
//!
//! Place autocomplete input - suggestions, geocoding and interactive sessions

use place_input::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
