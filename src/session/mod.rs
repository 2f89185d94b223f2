//! The interactive session: menu states, terminal I/O and the operations
//! behind each menu entry.

pub mod console;
pub mod flow;
pub mod reveal;
pub mod state;

pub use console::Console;
pub use console::TerminalConsole;
pub use flow::SessionFlow;
pub use reveal::RevealPolicy;
pub use state::MenuChoice;
pub use state::SessionEvent;
pub use state::SessionState;
