use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("no bytes to decode")]
    Empty,
    #[error("malformed protobuf payload: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("required field is missing or empty: {0}")]
    MissingField(&'static str),
}
