use anyhow::Result;
use clap::Parser;

// ──────────────────────────────────────────────────────────────
//  Entry point
// ──────────────────────────────────────────────────────────────
fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    env_logger::init();

    let args = engines_builder::ui::cli::Cli::parse();
    engines_builder::app_controller::run(args)
}
