//! Workspace tasks: `cargo xtask schema` and `cargo xtask preset`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glyphfx::Options;

/// glyphfx build tasks.
#[derive(Parser)]
#[command(name = "xtask")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Write the options JSON schema.
    Schema {
        /// Output path.
        #[arg(long, default_value = "assets/options.schema.json")]
        out: PathBuf,
    },
    /// Write the default options as a TOML preset.
    Preset {
        /// Output path.
        #[arg(long, default_value = "assets/presets/default.toml")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().task {
        Task::Schema { out } => {
            let schema = serde_json::to_string_pretty(&Options::json_schema())
                .context("serializing schema")?;
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(&out, schema)
                .with_context(|| format!("writing {}", out.display()))?;
        }
        Task::Preset { out } => {
            Options::default()
                .save(&out)
                .with_context(|| format!("writing {}", out.display()))?;
        }
    }
    Ok(())
}
