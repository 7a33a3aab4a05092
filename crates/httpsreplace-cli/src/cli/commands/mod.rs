//! CLI command handlers, one file per subcommand.

mod columns;
mod completions;
mod man;
mod probe;
mod scan;
mod upgrade;

pub use columns::run_columns;
pub use completions::run_completions;
pub use man::run_man;
pub use probe::run_probe;
pub use scan::run_scan;
pub use upgrade::run_upgrade;
