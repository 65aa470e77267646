use std::{
    path::{Path, PathBuf},
    process::{Child, Command},
};

use crate::{
    discovery::{Discovery, DEFAULT_SERVER_NAME},
    prelude::*,
    store::{ConfigStore, LaunchTarget},
};

/// Starts a server executable without waiting for it
pub trait Spawner {
    /// Returns the id of the started process
    fn spawn(&mut self, target: &LaunchTarget) -> std::io::Result<u32>;
}

/// Spawns real processes from the target's folder
///
/// The launcher's own working directory is switched to the folder as well, since some servers
/// resolve their resources relative to the parent process. Started servers are never waited on,
/// but the ones that already exited are collected on the next launch.
#[derive(Debug, Default)]
pub struct ProcessSpawner {
    children: Vec<Child>,
}

impl ProcessSpawner {
    /// Collects exited servers and returns how many are still running
    pub fn reap(&mut self) -> usize {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                log::debug!("Server process {} exited with {status}", child.id());
                false
            }
            Ok(None) => true,
            Err(e) => {
                log::debug!("Unable to poll server process {}: {e}", child.id());
                false
            }
        });
        self.children.len()
    }
}

/// Resolves `path` against the current directory before it gets changed
fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

impl Spawner for ProcessSpawner {
    fn spawn(&mut self, target: &LaunchTarget) -> std::io::Result<u32> {
        self.reap();

        let folder_path = absolute(&target.folder_path)?;
        let exe_path = absolute(&target.exe_path)?;
        std::env::set_current_dir(&folder_path)?;
        let child = Command::new(&exe_path).current_dir(&folder_path).spawn()?;

        let pid = child.id();
        self.children.push(child);
        Ok(pid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchState {
    NoSelection,
    Selected(String),
    Launched(String),
}

/// Notifications sent to subscribers whenever the model changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherEvent {
    ServersChanged(Vec<String>),
    SelectionChanged(Option<String>),
    Launched { name: String, pid: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launched {
    pub name: String,
    pub pid: u32,
    /// The launcher should quit now
    pub exit_requested: bool,
}

type Observer = Box<dyn FnMut(&LauncherEvent)>;

pub struct LaunchController<S = ProcessSpawner> {
    store: ConfigStore,
    spawner: S,
    state: LaunchState,
    exit_after_launch: bool,
    observers: Vec<Observer>,
}

impl LaunchController<ProcessSpawner> {
    pub fn new(store: ConfigStore) -> Self {
        Self::with_spawner(store, ProcessSpawner::default())
    }
}

impl<S: Spawner> LaunchController<S> {
    pub fn with_spawner(store: ConfigStore, spawner: S) -> Self {
        Self {
            store,
            spawner,
            state: LaunchState::NoSelection,
            exit_after_launch: false,
            observers: Vec::new(),
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    pub fn state(&self) -> &LaunchState {
        &self.state
    }

    pub fn selection(&self) -> Option<&str> {
        match &self.state {
            LaunchState::NoSelection => None,
            LaunchState::Selected(name) | LaunchState::Launched(name) => Some(name),
        }
    }

    pub fn exit_after_launch(&self) -> bool {
        self.exit_after_launch
    }

    pub fn set_exit_after_launch(&mut self, exit: bool) {
        self.exit_after_launch = exit;
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&LauncherEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: LauncherEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Names of all configured servers
    pub fn servers(&self) -> LauncherResult<Vec<String>> {
        Ok(self.store.load()?.names())
    }

    /// Registers `exe_path` under `name`, replacing any server with that name
    ///
    /// An empty name or a cancelled path selection does nothing and returns `false`.
    pub fn add_server(&mut self, name: &str, exe_path: Option<&Path>) -> LauncherResult<bool> {
        let name = name.trim();
        let Some(exe_path) = exe_path else {
            return Ok(false);
        };
        if name.is_empty() {
            return Ok(false);
        }

        let target = LaunchTarget::from_exe(exe_path)?;
        let mut config = self.store.load()?;
        if let Some(previous) = config.upsert(name, target) {
            log::warn!(
                "Replacing server \"{name}\" (was {})",
                previous.exe_path.display()
            );
        }
        self.store.save(&config)?;
        log::info!("Added server \"{name}\" at {}", exe_path.display());

        self.notify(LauncherEvent::ServersChanged(config.names()));
        Ok(true)
    }

    pub fn select_server(&mut self, name: &str) -> LauncherResult<()> {
        if !self.store.load()?.contains(name) {
            return Err(LauncherError::UnknownServer(name.to_string()));
        }

        self.state = LaunchState::Selected(name.to_string());
        self.notify(LauncherEvent::SelectionChanged(Some(name.to_string())));
        Ok(())
    }

    /// Starts the selected server
    ///
    /// The configuration is re-read first, so a server removed since it was selected is reported
    /// as [`LauncherError::TargetMissing`] and nothing is started.
    pub fn launch(&mut self) -> LauncherResult<Launched> {
        let name = self
            .selection()
            .ok_or(LauncherError::NoSelection)?
            .to_string();
        let config = self.store.load()?;
        let target = config
            .get(&name)
            .ok_or_else(|| LauncherError::TargetMissing(name.clone()))?;

        let pid = self
            .spawner
            .spawn(target)
            .map_err(|source| LauncherError::Spawn {
                exe: target.exe_path.clone(),
                source,
            })?;
        log::info!(
            "Launched \"{name}\" ({}) with pid {pid}",
            target.exe_path.display()
        );

        self.state = LaunchState::Launched(name.clone());
        self.notify(LauncherEvent::Launched {
            name: name.clone(),
            pid,
        });

        Ok(Launched {
            name,
            pid,
            exit_requested: self.exit_after_launch,
        })
    }

    /// Registers the default server if it isn't configured yet and `discovery` finds it
    ///
    /// Returns the registered executable.
    pub fn auto_register_default(&mut self, discovery: &Discovery) -> LauncherResult<Option<PathBuf>> {
        let mut config = self.store.load()?;
        if config.contains(DEFAULT_SERVER_NAME) {
            return Ok(None);
        }

        let Some(exe_path) = discovery.find_default_executable() else {
            log::info!("{DEFAULT_SERVER_NAME} was not found in any install root");
            return Ok(None);
        };

        config.upsert(DEFAULT_SERVER_NAME, LaunchTarget::from_exe(&exe_path)?);
        self.store.save(&config)?;
        log::info!("Registered {DEFAULT_SERVER_NAME} at {}", exe_path.display());

        self.notify(LauncherEvent::ServersChanged(config.names()));
        Ok(Some(exe_path))
    }
}
