use anyhow::Result;
use serde_json::json;

use crate::engine::instance::Engine;
use crate::ui::cli::OutputFormat;

#[cfg(feature = "colors")]
use colored::Colorize;

/// Prints the resolved engines in the requested format.
pub fn print_engines(engines: &[Engine], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", render_json(engines)?),
        OutputFormat::Text => print!("{}", render_text(engines)?),
    }
    Ok(())
}

pub fn render_json(engines: &[Engine]) -> Result<String> {
    let out: Vec<_> = engines
        .iter()
        .map(|e| {
            json!({
                "name": e.name(),
                "image": e.image(),
                "config": e.config(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn render_text(engines: &[Engine]) -> Result<String> {
    let mut out = String::new();
    for e in engines {
        out.push_str(&format!("{} ({})\n", heading(e.name()), e.image()));
        out.push_str(&format!("  {}\n", e.config_json()?));
    }
    if engines.is_empty() {
        out.push_str("[i] No engines resolved.\n");
    }
    Ok(out)
}

#[cfg(feature = "colors")]
fn heading(name: &str) -> String {
    name.bold().green().to_string()
}

#[cfg(not(feature = "colors"))]
fn heading(name: &str) -> String {
    name.to_owned()
}
