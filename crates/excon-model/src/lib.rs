//! Runtime-agnostic view of a task and the names it goes by.
mod kv;
pub use kv::KeyValue;

mod task_env;
pub use task_env::TaskEnv;

mod limits;
pub use limits::ResourceLimits;

mod image;
pub use image::{IMAGE_SCHEME, ImageLocator};

mod runtime_name;
pub use runtime_name::{NAME_PREFIX, RuntimeName};

mod exit;
pub use exit::collapse_exit_code;

mod error;
pub use error::ModelError;
