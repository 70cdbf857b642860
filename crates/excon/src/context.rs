use excon_core::{AdapterConfig, CommandBuilder, HostImageMatcher, OsReleaseMatcher};
use excon_exec::Supervisor;

/// Everything an operation may touch, assembled once at startup.
pub struct Context {
    pub config: AdapterConfig,
    pub supervisor: Supervisor,
    pub matcher: Box<dyn HostImageMatcher>,
}

impl Context {
    pub fn new(config: AdapterConfig) -> Self {
        let matcher = Box::new(OsReleaseMatcher::new(config.os_release.clone()));
        Self {
            config,
            supervisor: Supervisor::new(),
            matcher,
        }
    }

    pub fn with_matcher(mut self, matcher: impl HostImageMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    #[inline]
    pub fn commands(&self) -> CommandBuilder<'_> {
        CommandBuilder::new(&self.config)
    }
}
