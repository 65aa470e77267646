#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    /// What the launcher should do (opens the interactive menu if omitted)
    #[clap(subcommand)]
    pub subcommand: Option<SubCommand>,

    /// Directory the gd_config folder lives in (default: the current directory)
    #[arg(short, long)]
    pub config_dir: Option<String>,

    /// Quit the launcher as soon as a server has been started
    #[arg(short, long)]
    pub exit_after_launch: bool,

    /// Don't search the Steam libraries for Geometry Dash on startup
    #[arg(long)]
    pub no_discovery: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    /// Register a server executable, replacing any server with the same name
    Add {
        /// Name the server is listed under
        #[arg(short, long)]
        name: String,
        /// Path to the server's executable
        #[arg(short, long)]
        exe: String,
    },
    /// List all registered servers
    List,
    /// Launch a registered server
    Launch {
        /// Launch the server with this name
        #[arg(short, long)]
        name: String,
    },
    /// Search the Steam libraries for Geometry Dash and register it if found
    Discover,
}
