use std::fmt;

use tracing::info;

/// Prefix marking names that were hex-encoded from an unsafe identifier.
pub const NAME_PREFIX: &str = "mesos-";

/// Container name as the runtime sees it.
///
/// Every adapter invocation derives it independently from the orchestrator's
/// container id, so the mapping is deterministic: safe ids pass through,
/// anything else becomes `mesos-<HEX>` of its bytes.
///
/// Distinct ids get distinct names within each class. Across classes it is
/// not injective: a safe id spelled like an encoded name (`mesos-615F62`)
/// shares that name with the id it encodes (`a_b`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeName(String);

impl RuntimeName {
    pub fn for_container(id: &str) -> Self {
        if is_legal(id) {
            return Self(id.to_string());
        }
        let encoded = format!("{NAME_PREFIX}{}", hex::encode_upper(id.as_bytes()));
        info!(container_id = id, name = %encoded, "created a safe runtime name for container id");
        Self(encoded)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuntimeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RuntimeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_legal(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-')
}
