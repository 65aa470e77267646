use std::path::PathBuf;

use crate::cli::CliArgs;

/// Run-time options, fixed when the launcher starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub exit_after_launch: bool,
    pub discovery: bool,
}

impl Settings {
    pub fn from_args(args: &CliArgs) -> std::io::Result<Self> {
        // launching changes the working directory, so the config location must be absolute
        let current_dir = std::env::current_dir()?;
        let base_dir = match &args.config_dir {
            Some(dir) => current_dir.join(&*shellexpand::tilde(dir)),
            None => current_dir,
        };

        Ok(Self {
            base_dir,
            exit_after_launch: args.exit_after_launch,
            discovery: !args.no_discovery,
        })
    }
}
