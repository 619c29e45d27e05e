pub mod protocol;
pub mod rest;
pub mod state;

// Re-export the state so the binary can build the router without reaching into submodules.
pub use rest::ApiDoc;
pub use state::{spawn_idle_sweeper, AppState, SessionStore};
