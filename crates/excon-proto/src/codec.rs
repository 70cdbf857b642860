use prost::Message;

use crate::{CodecError, PluggableStatus, PluggableTermination, TaskInfo};

/// Decode the task descriptor handed to `launch`.
///
/// Protobuf happily decodes an empty buffer into an all-default message, so the
/// bytes are rejected up front when empty and the result is rejected when it
/// carries no task identifier.
pub fn decode_task(bytes: &[u8]) -> Result<TaskInfo, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::Empty);
    }
    let task = TaskInfo::decode(bytes)?;
    if task.task_id.value.is_empty() {
        return Err(CodecError::MissingField("task_id"));
    }
    Ok(task)
}

pub fn decode_status(bytes: &[u8]) -> Result<PluggableStatus, CodecError> {
    Ok(PluggableStatus::decode(bytes)?)
}

pub fn decode_termination(bytes: &[u8]) -> Result<PluggableTermination, CodecError> {
    Ok(PluggableTermination::decode(bytes)?)
}

/// A single message written back to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Status(PluggableStatus),
    Termination(PluggableTermination),
}

impl Reply {
    pub fn status(message: impl Into<String>) -> Self {
        Reply::Status(PluggableStatus {
            message: message.into(),
        })
    }

    /// `status` is already collapsed into the byte range the protocol expects.
    pub fn termination(status: u8, killed: bool, message: impl Into<String>) -> Self {
        Reply::Termination(PluggableTermination {
            killed,
            message: message.into(),
            status: Some(i32::from(status)),
        })
    }

    /// Short symbolic name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Status(_) => "status",
            Reply::Termination(_) => "termination",
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Reply::Status(m) => m.encode_to_vec(),
            Reply::Termination(m) => m.encode_to_vec(),
        }
    }
}
