use std::{fs, path::PathBuf};

use tracing::debug;

use crate::error::AdapterError;

/// Picks an image when the task did not name one.
pub trait HostImageMatcher {
    fn matching_image(&self) -> Result<String, AdapterError>;
}

/// Guesses `<id>:<version>` from an os-release file, e.g. `ubuntu:20.04`.
#[derive(Debug, Clone)]
pub struct OsReleaseMatcher {
    path: PathBuf,
}

impl OsReleaseMatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HostImageMatcher for OsReleaseMatcher {
    fn matching_image(&self) -> Result<String, AdapterError> {
        let unusable = |why: &str| {
            AdapterError::InvalidImageReference(format!(
                "no image given and {} {why}",
                self.path.display()
            ))
        };

        let content = fs::read_to_string(&self.path).map_err(|e| unusable(&e.to_string()))?;
        let image = image_from_os_release(&content).ok_or_else(|| unusable("has no ID"))?;
        debug!(target: "excon.host", %image, path = %self.path.display(), "matched host image");
        Ok(image)
    }
}

/// `ID:VERSION_ID`, lowercased. Rolling releases without a version get the bare `ID`.
fn image_from_os_release(content: &str) -> Option<String> {
    let mut id = None;
    let mut version = None;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        match key.trim() {
            "ID" => id = Some(value),
            "VERSION_ID" => version = Some(value),
            _ => {}
        }
    }

    let id = id.filter(|v| !v.is_empty())?.to_ascii_lowercase();
    match version.filter(|v| !v.is_empty()) {
        Some(version) => Some(format!("{id}:{}", version.to_ascii_lowercase())),
        None => Some(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UBUNTU: &str = r#"NAME="Ubuntu"
VERSION="20.04.6 LTS (Focal Fossa)"
ID=ubuntu
ID_LIKE=debian
VERSION_ID="20.04"
"#;

    #[test]
    fn ubuntu_release() {
        assert_eq!(image_from_os_release(UBUNTU).as_deref(), Some("ubuntu:20.04"));
    }

    #[test]
    fn values_are_lowercased_and_unquoted() {
        let content = "# comment\nID='CentOS'\nVERSION_ID=\"7\"\n";
        assert_eq!(image_from_os_release(content).as_deref(), Some("centos:7"));
    }

    #[test]
    fn rolling_release_has_no_tag() {
        assert_eq!(image_from_os_release("ID=arch\n").as_deref(), Some("arch"));
    }

    #[test]
    fn missing_id_is_none() {
        assert_eq!(image_from_os_release("VERSION_ID=1\n"), None);
        assert_eq!(image_from_os_release(""), None);
    }

    #[test]
    fn matcher_reads_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("os-release");
        fs::write(&path, UBUNTU).unwrap();
        assert_eq!(OsReleaseMatcher::new(&path).matching_image().unwrap(), "ubuntu:20.04");
    }

    #[test]
    fn unreadable_file_is_an_image_error() {
        let err = OsReleaseMatcher::new("/definitely/not/here").matching_image().unwrap_err();
        assert!(matches!(err, AdapterError::InvalidImageReference(_)));
    }
}
