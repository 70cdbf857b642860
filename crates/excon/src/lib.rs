//! External containerizer adapter: one lifecycle operation per process.
pub mod cli;
pub use cli::{Cli, Lifecycle, Settings};

mod context;
pub use context::Context;

pub mod ops;
pub use ops::Outcome;

mod dispatch;
pub use dispatch::dispatch;
