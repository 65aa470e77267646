use std::{
    fmt::{Display, Formatter},
    path::PathBuf,
    process::exit,
};

use clap::Parser;
use cli::SubCommand;
use inquire::{error::InquireResult, InquireError};
use strum::{EnumIter, IntoEnumIterator};

use crate::config::Settings;
use launcherlib::{
    prelude::LauncherError, ConfigStore, Discovery, LaunchController, LauncherEvent,
};

mod cli;
mod config;
mod tui;

#[derive(Debug, EnumIter)]
enum MenuOption {
    AddServer,
    ChooseServer,
    Launch,
    ToggleExitOnLaunch,
    Quit,
}

impl Display for MenuOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuOption::AddServer => write!(f, "Add new server"),
            MenuOption::ChooseServer => write!(f, "Choose server"),
            MenuOption::Launch => write!(f, "Launch selected server"),
            MenuOption::ToggleExitOnLaunch => write!(f, "Toggle exit when launching"),
            MenuOption::Quit => write!(f, "Quit"),
        }
    }
}

fn add_server(controller: &mut LaunchController) -> InquireResult<()> {
    let name = tui::prompt_server_name()?;
    let name = name.trim();
    if name.is_empty() {
        return Ok(());
    }

    let exe_path = match tui::prompt_exe_path() {
        Ok(exe_path) => Some(exe_path),
        Err(InquireError::OperationCanceled) => None,
        Err(e) => return Err(e),
    };

    if exe_path.is_some()
        && controller.store().load()?.contains(name)
        && !tui::prompt_confirm_overwrite(name)?
    {
        return Ok(());
    }

    if controller.add_server(name, exe_path.as_deref())? {
        tui::print_server_added(name);
    }
    Ok(())
}

fn choose_server(controller: &mut LaunchController) -> InquireResult<()> {
    let servers = controller.servers()?;
    if servers.is_empty() {
        tui::print_no_servers();
        return Ok(());
    }

    let name = tui::prompt_select_server(servers)?;
    controller.select_server(&name)?;
    Ok(())
}

fn tui(controller: &mut LaunchController) -> InquireResult<()> {
    controller.subscribe(|event| match event {
        LauncherEvent::SelectionChanged(name) => tui::print_selected(name.as_deref()),
        LauncherEvent::Launched { name, pid } => tui::print_launched(name, *pid),
        LauncherEvent::ServersChanged(names) => {
            log::debug!("{} server(s) registered", names.len())
        }
    });
    tui::print_selected(controller.selection());

    loop {
        let option =
            match inquire::Select::new("Select an option", MenuOption::iter().collect()).prompt() {
                Ok(option) => option,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(e) => return Err(e),
            };

        let result = match option {
            MenuOption::AddServer => add_server(controller),
            MenuOption::ChooseServer => choose_server(controller),
            MenuOption::Launch => match controller.launch() {
                Ok(launched) if launched.exit_requested => break,
                Ok(_) => Ok(()),
                Err(LauncherError::TargetMissing(name)) => {
                    tui::print_target_missing(&name);
                    Ok(())
                }
                Err(e) => Err(e.into()),
            },
            MenuOption::ToggleExitOnLaunch => {
                let enabled = !controller.exit_after_launch();
                controller.set_exit_after_launch(enabled);
                tui::print_exit_after_launch(enabled);
                Ok(())
            }
            MenuOption::Quit => break,
        };

        match result {
            Ok(()) | Err(InquireError::OperationCanceled) => {}
            Err(InquireError::OperationInterrupted) => break,
            Err(e) => tui::print_error(e),
        }
    }

    Ok(())
}

fn cli(subcommand: SubCommand, controller: &mut LaunchController) -> InquireResult<()> {
    match subcommand {
        SubCommand::Add { name, exe } => {
            let exe_path = PathBuf::from(shellexpand::tilde(&exe).to_string());
            let exe_path = if exe_path.is_absolute() {
                exe_path
            } else {
                std::env::current_dir()?.join(exe_path)
            };

            if controller.add_server(&name, Some(&exe_path))? {
                tui::print_server_added(name.trim());
            } else {
                tui::print_empty_name();
                exit(1);
            }
        }
        SubCommand::List => {
            let config = controller.store().load()?;
            if config.is_empty() {
                tui::print_no_servers();
                return Ok(());
            }

            let servers = config
                .iter()
                .map(|(name, target)| (name.clone(), target.exe_path.clone()))
                .collect::<Vec<_>>();
            tui::print_servers(&servers);
        }
        SubCommand::Launch { name } => {
            controller.select_server(&name)?;
            let launched = controller.launch()?;
            tui::print_launched(&launched.name, launched.pid);
        }
        SubCommand::Discover => {
            match controller.auto_register_default(&Discovery::from_env())? {
                Some(exe_path) => tui::print_discovered(&exe_path),
                None => tui::print_not_discovered(),
            }
        }
    }

    Ok(())
}

/// Makes sure the configuration can be read, offering a reset when it's corrupt
fn check_config(store: &ConfigStore, interactive: bool) -> InquireResult<()> {
    match store.load() {
        Ok(_) => Ok(()),
        Err(LauncherError::ConfigRead { path, source }) => {
            log::error!("Failed to parse config at {}: {source}", path.display());
            tui::print_config_deserialization_error(&path);

            if interactive && tui::prompt_reset_config(&path).unwrap_or(false) {
                store.reset()?;
                Ok(())
            } else {
                exit(1);
            }
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> InquireResult<()> {
    if let Err(e) = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .init()
    {
        eprintln!("Unable to initialize logging: {e}");
    }

    let args = cli::CliArgs::parse();
    let settings = Settings::from_args(&args)?;
    let interactive = args.subcommand.is_none();

    let store = ConfigStore::in_base_dir(&settings.base_dir);
    check_config(&store, interactive)?;

    let mut controller = LaunchController::new(store);
    controller.set_exit_after_launch(settings.exit_after_launch);

    if settings.discovery && !matches!(args.subcommand, Some(SubCommand::Discover)) {
        if let Err(e) = controller.auto_register_default(&Discovery::from_env()) {
            log::warn!("Unable to register the default server: {e}");
        }
    }

    let result = if let Some(subcommand) = args.subcommand {
        cli(subcommand, &mut controller)
    } else {
        tui(&mut controller)
    };

    if let Err(e) = result {
        tui::print_error(e);
        exit(1);
    }

    Ok(())
}
