use thiserror::Error;

use excon_exec::ExecError;
use excon_model::ModelError;
use excon_proto::CodecError;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("malformed task descriptor: {0}")]
    MalformedInput(#[from] CodecError),

    #[error("invalid image reference: {0}")]
    InvalidImageReference(String),

    #[error("runtime exited with code {code}: {argv}")]
    RuntimeInvocationFailed { argv: String, code: i32 },

    #[error("cannot parse runtime output {output:?}: {reason}")]
    ReplyParseFailure { output: String, reason: String },

    #[error("supervisor error: {0}")]
    Exec(#[from] ExecError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<ModelError> for AdapterError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidLocator(locator) => {
                AdapterError::InvalidImageReference(format!("'{locator}' is not a docker:/// URL"))
            }
        }
    }
}

impl AdapterError {
    /// Exit code the orchestrator sees for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AdapterError::RuntimeInvocationFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_failures_keep_their_code() {
        let err = AdapterError::RuntimeInvocationFailed {
            argv: "docker wait x".into(),
            code: 125,
        };
        assert_eq!(err.exit_code(), 125);
    }

    #[test]
    fn everything_else_exits_one() {
        assert_eq!(AdapterError::MalformedInput(CodecError::Empty).exit_code(), 1);
        assert_eq!(AdapterError::InvalidImageReference("x".into()).exit_code(), 1);
        let parse = AdapterError::ReplyParseFailure {
            output: "abc".into(),
            reason: "invalid digit".into(),
        };
        assert_eq!(parse.exit_code(), 1);
    }

    #[test]
    fn bad_locator_maps_to_invalid_image() {
        let err = AdapterError::from(ModelError::InvalidLocator("docker://h/x".into()));
        assert!(matches!(
            err,
            AdapterError::InvalidImageReference(m) if m.contains("docker://h/x")
        ));
    }
}
