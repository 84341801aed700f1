// Submodules
pub mod handlers;
pub mod process;
pub mod raster;
pub mod routes;
pub mod runtime;
pub mod session;

// Public API (what main.rs imports)
pub use process::{ServerProcess, ServerState};
pub use runtime::ControlEvent;
pub use session::{AccessPoint, SessionController, SessionSettings, SessionState};
