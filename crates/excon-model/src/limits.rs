/// CPU shares granted per whole CPU.
pub const SHARES_PER_CPU: f64 = 256.0;

/// Resource limits a task asked for, in runtime units.
///
/// Only `cpus` and `mem` scalars are understood. Anything else (ports, disk,
/// custom resources) is dropped without complaint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Relative CPU weight, `cpus × 256`.
    pub cpu_shares: Option<u64>,
    /// Memory ceiling in whole megabytes.
    pub memory_mb: Option<u64>,
}

impl ResourceLimits {
    /// Fold one named scalar into the limits. A repeated name replaces the earlier value.
    pub fn absorb(&mut self, name: &str, value: f64) {
        match name {
            "cpus" => self.cpu_shares = Some((value * SHARES_PER_CPU) as u64),
            "mem" => self.memory_mb = Some(value as u64),
            _ => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cpu_shares.is_none() && self.memory_mb.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpus_scale_and_truncate() {
        for (cpus, shares) in [(0.0, 0), (0.1, 25), (0.5, 128), (1.0, 256), (2.75, 704)] {
            let mut limits = ResourceLimits::default();
            limits.absorb("cpus", cpus);
            assert_eq!(limits.cpu_shares, Some(shares), "cpus = {cpus}");
        }
    }

    #[test]
    fn mem_truncates_to_whole_megabytes() {
        let mut limits = ResourceLimits::default();
        limits.absorb("mem", 127.9);
        assert_eq!(limits.memory_mb, Some(127));
    }

    #[test]
    fn unknown_resources_are_ignored() {
        let mut limits = ResourceLimits::default();
        limits.absorb("ports", 31000.0);
        limits.absorb("disk", 1024.0);
        assert!(limits.is_empty());
    }
}
