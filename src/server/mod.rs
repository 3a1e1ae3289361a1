//! Process-level pieces: the accept loop and the state it shares with
//! every connection.

pub mod debug;
pub mod listener;
pub mod state;

pub use debug::DebugReport;
pub use state::ServerState;
