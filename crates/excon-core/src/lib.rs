pub mod config;
pub use config::{AdapterConfig, RuntimeCommand};

pub mod error;
pub use error::AdapterError;

pub mod host;
pub use host::{HostImageMatcher, OsReleaseMatcher};

pub mod resolve;
pub use resolve::{ResolvedTask, resolve};

pub mod runtime;
pub use runtime::CommandBuilder;
