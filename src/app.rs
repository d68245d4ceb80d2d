//! Per-invocation state shared by every command.

use std::path::PathBuf;

use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;

pub struct AppContext {
    pub config: Config,
    /// Explicit config file, when one was given.
    pub config_path: Option<PathBuf>,
    pub project_dir: PathBuf,
    pub output_format: OutputFormat,
    pub quiet: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &project_dir)?;

        let output_format = match cli.output_format() {
            Some(format) => format,
            None => OutputFormat::parse(&config.output.format)?,
        };
        debug!(?output_format, config = ?cli.config, "app context ready");

        Ok(Self {
            config,
            config_path: cli.config.clone(),
            project_dir,
            output_format,
            quiet: cli.quiet,
        })
    }

    /// `-q` silences human output; machine formats are always written.
    #[must_use]
    pub const fn silent(&self) -> bool {
        self.quiet && !self.output_format.is_machine_readable()
    }
}
