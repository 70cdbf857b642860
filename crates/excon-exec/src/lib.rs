mod error;
pub use error::{ExecError, ExecResult};

mod invocation;
pub use invocation::Invocation;

mod util;
pub use util::{SHELL, exit_code};

pub mod proc;
pub use proc::{Captured, Detached, DetachedIo, Supervisor};
