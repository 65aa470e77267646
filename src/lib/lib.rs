//! Register game server executables, persist them and launch them.
//!
//! The [`store::ConfigStore`] owns the JSON configuration, [`discovery::Discovery`] looks for the
//! default Geometry Dash install and [`controller::LaunchController`] ties both together with the
//! current selection.

pub mod controller;
pub mod discovery;
pub mod prelude;
pub mod store;

pub use controller::{
    LaunchController, LaunchState, Launched, LauncherEvent, ProcessSpawner, Spawner,
};
pub use discovery::{Discovery, DEFAULT_EXECUTABLE, DEFAULT_SERVER_NAME};
pub use store::{Config, ConfigStore, LaunchTarget};
