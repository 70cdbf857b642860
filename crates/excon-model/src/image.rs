use crate::ModelError;

/// Scheme every image locator must carry, with an empty authority.
pub const IMAGE_SCHEME: &str = "docker:///";

/// Where the container image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocator {
    /// An image reference such as `ubuntu:20.04`.
    Explicit(String),
    /// Bare `docker:///`: pick an image resembling the host.
    HostDefault,
}

impl ImageLocator {
    pub fn parse(locator: &str) -> Result<Self, ModelError> {
        let image = locator
            .strip_prefix(IMAGE_SCHEME)
            .ok_or_else(|| ModelError::InvalidLocator(locator.to_string()))?;
        if image.contains(IMAGE_SCHEME) {
            return Err(ModelError::InvalidLocator(locator.to_string()));
        }
        if image.is_empty() {
            Ok(ImageLocator::HostDefault)
        } else {
            Ok(ImageLocator::Explicit(image.to_string()))
        }
    }
}

impl Default for ImageLocator {
    fn default() -> Self {
        ImageLocator::HostDefault
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_image() {
        assert_eq!(
            ImageLocator::parse("docker:///ubuntu:20.04"),
            Ok(ImageLocator::Explicit("ubuntu:20.04".into()))
        );
        assert_eq!(
            ImageLocator::parse("docker:///registry.local:5000/team/app:1"),
            Ok(ImageLocator::Explicit("registry.local:5000/team/app:1".into()))
        );
    }

    #[test]
    fn bare_scheme_means_host_default() {
        assert_eq!(ImageLocator::parse("docker:///"), Ok(ImageLocator::HostDefault));
    }

    #[test]
    fn authority_or_foreign_scheme_is_rejected() {
        for bad in ["docker://host/ubuntu", "ubuntu:20.04", "http:///x", "", "x docker:///y"] {
            assert!(
                matches!(ImageLocator::parse(bad), Err(ModelError::InvalidLocator(_))),
                "{bad} should be rejected"
            );
        }
    }
}
