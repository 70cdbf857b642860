use crate::KeyValue;

/// Variables handed to a container, one `-e KEY=VALUE` flag each.
///
/// Order matters: the runtime applies the flags left to right, so a later
/// entry shadows an earlier one with the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEnv(Vec<KeyValue>);

impl TaskEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self(vec![KeyValue::new(key, value)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// `self` followed by `other`.
    pub fn merged(&self, other: &TaskEnv) -> TaskEnv {
        TaskEnv(self.0.iter().chain(&other.0).cloned().collect())
    }
}

impl<K, V> FromIterator<(K, V)> for TaskEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| KeyValue::new(k, v)).collect())
    }
}
