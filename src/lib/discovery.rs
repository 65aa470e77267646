use std::{
    ffi::{OsStr, OsString},
    fs,
    path::{Path, PathBuf},
};

/// Config entry the discovered executable is registered under
pub static DEFAULT_SERVER_NAME: &str = "Geometry Dash";
/// File name searched for under the install roots
pub static DEFAULT_EXECUTABLE: &str = "GeometryDash.exe";

/// Best-effort search for an executable under a fixed list of install roots
#[derive(Debug, Clone)]
pub struct Discovery {
    roots: Vec<PathBuf>,
    file_name: OsString,
}

impl Discovery {
    pub fn new(roots: Vec<PathBuf>, file_name: impl Into<OsString>) -> Self {
        Self {
            roots,
            file_name: file_name.into(),
        }
    }

    /// Searches the Steam library roots derived from the process environment
    pub fn from_env() -> Self {
        Self::with_env(|key| std::env::var_os(key))
    }

    /// Like [`Discovery::from_env`], but reads variables through `var`
    ///
    /// Roots whose variable is unset are left out.
    pub fn with_env<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let program_files_x86 = var("ProgramFiles(x86)").map(PathBuf::from);
        let program_files = var("ProgramFiles").map(PathBuf::from);
        let common = |base: &Option<PathBuf>, library: &str| {
            base.as_ref()
                .map(|base| base.join(library).join("steamapps").join("common"))
        };

        let mut roots: Vec<PathBuf> = [
            common(&program_files_x86, "Steam"),
            common(&program_files, "Steam"),
            common(&program_files, "SteamLibrary"),
            common(&program_files_x86, "SteamLibrary"),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !cfg!(windows) {
            if let Some(home) = var("HOME").map(PathBuf::from) {
                roots.push(home.join(".steam/steam/steamapps/common"));
                roots.push(home.join(".local/share/Steam/steamapps/common"));
            }
        }

        Self::new(roots, DEFAULT_EXECUTABLE)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Returns the first match, trying roots in order
    pub fn find_default_executable(&self) -> Option<PathBuf> {
        self.roots.iter().filter(|root| root.is_dir()).find_map(|root| {
            log::debug!("Searching {} for {:?}", root.display(), self.file_name);
            find_in(root, &self.file_name)
        })
    }
}

/// Walks `dir` top-down: the files of a directory are checked before descending
fn find_in(dir: &Path, file_name: &OsStr) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Skipping {}: {e}", dir.display());
            return None;
        }
    };

    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            subdirs.push(entry.path());
        } else if entry.file_name() == file_name {
            return Some(entry.path());
        }
    }

    subdirs.iter().find_map(|subdir| find_in(subdir, file_name))
}
