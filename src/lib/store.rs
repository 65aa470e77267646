use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Name of the directory holding the configuration, relative to the base directory
pub static CONFIG_DIR_NAME: &str = "gd_config";
static CONFIG_FILE_NAME: &str = "config.json";

/// The installation folder and executable of a server
///
/// Both paths are absolute and `folder_path` is always the parent of `exe_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchTarget {
    pub folder_path: PathBuf,
    pub exe_path: PathBuf,
}

impl LaunchTarget {
    /// Builds a target for an absolute executable path, using its parent directory as the folder
    pub fn from_exe(exe_path: impl Into<PathBuf>) -> LauncherResult<Self> {
        let exe_path = exe_path.into();
        if !exe_path.is_absolute() {
            return Err(LauncherError::InvalidExecutable(exe_path));
        }
        let folder_path = match exe_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && exe_path.file_name().is_some() => {
                parent.to_path_buf()
            }
            _ => return Err(LauncherError::InvalidExecutable(exe_path)),
        };

        Ok(Self {
            folder_path,
            exe_path,
        })
    }
}

/// All registered servers, keyed by display name, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    servers: IndexMap<String, LaunchTarget>,
}

impl Config {
    pub fn get(&self, name: &str) -> Option<&LaunchTarget> {
        self.servers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    /// Inserts or replaces a server, returning the target it replaced
    ///
    /// A replaced server keeps its position.
    pub fn upsert(&mut self, name: impl Into<String>, target: LaunchTarget) -> Option<LaunchTarget> {
        self.servers.insert(name.into(), target)
    }

    pub fn remove(&mut self, name: &str) -> Option<LaunchTarget> {
        self.servers.shift_remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.servers.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LaunchTarget)> {
        self.servers.iter()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

/// Owns the configuration file. Nothing else reads or writes it.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// A store keeping its file in `<base_dir>/gd_config`
    pub fn in_base_dir(base_dir: &Path) -> Self {
        Self {
            dir: base_dir.join(CONFIG_DIR_NAME),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    /// Reads the configuration, or an empty one if the file doesn't exist yet
    pub fn load(&self) -> LauncherResult<Config> {
        let path = self.path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&contents).map_err(|source| LauncherError::ConfigRead { path, source })
    }

    /// Overwrites the configuration file with `config`
    ///
    /// The contents go to a temporary file next to the config first, which is then renamed
    /// over it, so an interrupted write never leaves a truncated file behind.
    pub fn save(&self, config: &Config) -> LauncherResult<()> {
        let path = self.path();
        let write_err = |source| LauncherError::ConfigWrite {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        config
            .serialize(&mut serializer)
            .map_err(|e| write_err(e.into()))?;

        let tmp_path = self.dir.join(format!("{CONFIG_FILE_NAME}.tmp"));
        let mut tmp = fs::File::create(&tmp_path).map_err(write_err)?;
        tmp.write_all(&buf).map_err(write_err)?;
        tmp.sync_all().map_err(write_err)?;
        drop(tmp);
        fs::rename(&tmp_path, &path).map_err(write_err)?;

        log::debug!("Saved {} server(s) to {}", config.len(), path.display());
        Ok(())
    }

    /// Replaces the configuration with an empty one
    pub fn reset(&self) -> LauncherResult<()> {
        log::warn!("Resetting configuration at {}", self.path().display());
        self.save(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn target(exe: &str) -> LaunchTarget {
        LaunchTarget::from_exe(exe).unwrap()
    }

    #[test]
    fn target_folder_is_exe_parent() {
        let t = target("/tmp/bin/game.exe");
        assert_eq!(t.folder_path, PathBuf::from("/tmp/bin"));
        assert_eq!(t.exe_path.parent(), Some(t.folder_path.as_path()));
    }

    #[test]
    fn target_without_parent_is_rejected() {
        assert!(matches!(
            LaunchTarget::from_exe("game.exe"),
            Err(LauncherError::InvalidExecutable(_))
        ));
        assert!(matches!(
            LaunchTarget::from_exe("/"),
            Err(LauncherError::InvalidExecutable(_))
        ));
    }

    #[test]
    fn relative_exe_is_rejected() {
        assert!(matches!(
            LaunchTarget::from_exe("bin/game.exe"),
            Err(LauncherError::InvalidExecutable(path)) if path == PathBuf::from("bin/game.exe")
        ));
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new("launcher_store").unwrap();
        let store = ConfigStore::in_base_dir(tmp.path());

        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn save_creates_directory_and_round_trips() {
        let tmp = TempDir::new("launcher_store").unwrap();
        let store = ConfigStore::in_base_dir(tmp.path());

        let mut config = Config::default();
        config.upsert("Geometry Dash", target("/games/gd/GeometryDash.exe"));
        config.upsert("GDPS", target("/srv/gdps/gdps.exe"));
        store.save(&config).unwrap();

        assert!(tmp.path().join("gd_config").is_dir());
        let loaded = store.load().unwrap();
        assert_eq!(loaded, config);

        store.save(&loaded).unwrap();
        assert_eq!(store.load().unwrap(), loaded);
        assert!(!tmp.path().join("gd_config/config.json.tmp").exists());
    }

    #[test]
    fn file_uses_plain_name_to_target_schema() {
        let tmp = TempDir::new("launcher_store").unwrap();
        let store = ConfigStore::in_base_dir(tmp.path());

        let mut config = Config::default();
        config.upsert("Test", target("/tmp/bin/game.exe"));
        store.save(&config).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "Test": { "folder_path": "/tmp/bin", "exe_path": "/tmp/bin/game.exe" }
            })
        );
    }

    #[test]
    fn file_order_survives_load_and_save() {
        let tmp = TempDir::new("launcher_store").unwrap();
        let store = ConfigStore::in_base_dir(tmp.path());
        fs::create_dir_all(tmp.path().join("gd_config")).unwrap();
        fs::write(
            store.path(),
            r#"{
                "Zeta": { "folder_path": "/srv/zeta", "exe_path": "/srv/zeta/zeta.exe" },
                "Alpha": { "folder_path": "/srv/alpha", "exe_path": "/srv/alpha/alpha.exe" }
            }"#,
        )
        .unwrap();

        let mut config = store.load().unwrap();
        assert_eq!(config.names(), vec!["Zeta", "Alpha"]);

        config.upsert("Zeta", target("/srv/zeta2/zeta.exe"));
        config.upsert("Mid", target("/srv/mid/mid.exe"));
        store.save(&config).unwrap();

        assert_eq!(store.load().unwrap().names(), vec!["Zeta", "Alpha", "Mid"]);
        let raw = fs::read_to_string(store.path()).unwrap();
        let zeta = raw.find("\"Zeta\"").unwrap();
        let alpha = raw.find("\"Alpha\"").unwrap();
        let mid = raw.find("\"Mid\"").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn removing_keeps_remaining_order() {
        let mut config = Config::default();
        config.upsert("C", target("/c/c.exe"));
        config.upsert("A", target("/a/a.exe"));
        config.upsert("B", target("/b/b.exe"));

        config.remove("C");
        assert_eq!(config.names(), vec!["A", "B"]);
    }

    #[test]
    fn invalid_json_is_a_read_error() {
        let tmp = TempDir::new("launcher_store").unwrap();
        let store = ConfigStore::in_base_dir(tmp.path());
        fs::create_dir_all(tmp.path().join("gd_config")).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(
            store.load(),
            Err(LauncherError::ConfigRead { .. })
        ));
    }

    #[test]
    fn wrong_shape_is_a_read_error() {
        let tmp = TempDir::new("launcher_store").unwrap();
        let store = ConfigStore::in_base_dir(tmp.path());
        fs::create_dir_all(tmp.path().join("gd_config")).unwrap();
        fs::write(store.path(), r#"{"Test": "/tmp/bin/game.exe"}"#).unwrap();

        assert!(matches!(
            store.load(),
            Err(LauncherError::ConfigRead { .. })
        ));
    }

    #[test]
    fn reset_replaces_corrupt_file() {
        let tmp = TempDir::new("launcher_store").unwrap();
        let store = ConfigStore::in_base_dir(tmp.path());
        fs::create_dir_all(tmp.path().join("gd_config")).unwrap();
        fs::write(store.path(), "garbage").unwrap();

        store.reset().unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
