//! siteplan config - Show the effective configuration

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{OutputFormat, emit_json, robot_ok};
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::{PlanError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show which config files are consulted instead of the values
    #[arg(long)]
    pub paths: bool,
}

#[derive(Debug, Serialize)]
struct ConfigSource {
    layer: &'static str,
    path: String,
    exists: bool,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    if args.paths {
        return emit_paths(ctx, &sources(ctx));
    }

    match ctx.output_format {
        OutputFormat::Json | OutputFormat::Jsonl => emit_json(&robot_ok(&ctx.config)),
        _ => {
            let rendered = toml::to_string_pretty(&ctx.config)
                .map_err(|err| PlanError::Config(format!("render config: {err}")))?;
            if !ctx.silent() {
                println!("{}", rendered.trim_end());
            }
            Ok(())
        }
    }
}

fn sources(ctx: &AppContext) -> Vec<ConfigSource> {
    if let Some(path) = &ctx.config_path {
        return vec![ConfigSource {
            layer: "explicit",
            path: path.display().to_string(),
            exists: path.exists(),
        }];
    }

    let mut sources = Vec::new();
    if let Some(global) = Config::global_path() {
        sources.push(ConfigSource {
            layer: "global",
            exists: global.exists(),
            path: global.display().to_string(),
        });
    }
    let project = ctx.project_dir.join(PROJECT_CONFIG_FILE);
    sources.push(ConfigSource {
        layer: "project",
        exists: project.exists(),
        path: project.display().to_string(),
    });
    sources
}

fn emit_paths(ctx: &AppContext, sources: &[ConfigSource]) -> Result<()> {
    if ctx.output_format.is_machine_readable() {
        return emit_json(&robot_ok(sources));
    }
    if ctx.silent() {
        return Ok(());
    }
    for source in sources {
        let marker = if source.exists { "found" } else { "missing" };
        println!("{:<8} {:<8} {}", source.layer, marker, source.path);
    }
    Ok(())
}
