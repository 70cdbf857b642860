//! Wire types and codec for the external containerizer protocol.
//!
//! The orchestrator hands a serialized [`TaskInfo`] to `launch` on stdin and
//! expects a single [`PluggableStatus`] or [`PluggableTermination`] back on
//! stdout. Everything here is pure: reading and writing the streams is the
//! caller's job.
#[allow(clippy::all)]
pub mod proto {
    include!(concat!(env!("OUT_DIR"), "/mesos.rs"));
}
pub use proto::*;

mod codec;
pub use codec::{Reply, decode_status, decode_task, decode_termination};

mod error;
pub use error::CodecError;
