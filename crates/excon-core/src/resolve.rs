use excon_model::{ImageLocator, ResourceLimits, TaskEnv};
use excon_proto::{CommandInfo, TaskInfo};
use tracing::debug;

use crate::{error::AdapterError, host::HostImageMatcher};

/// Runtime-agnostic view of a task descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTask {
    /// Image reference handed to the runtime, never empty.
    pub image: String,
    /// Opaque runtime options from the container block, in order.
    pub options: Vec<String>,
    /// `sh -c <command>`, or empty to run the image's entrypoint.
    pub argv: Vec<String>,
    /// Variables the task itself declared.
    pub env: TaskEnv,
    pub limits: ResourceLimits,
    /// The task brought no executor, so the orchestrator's one should wrap the runtime.
    pub needs_executor_wrapper: bool,
}

/// The executor's command wins over the task's own when both exist.
fn effective_command(task: &TaskInfo) -> Option<&CommandInfo> {
    match &task.executor {
        Some(executor) => Some(&executor.command),
        None => task.command.as_ref(),
    }
}

pub fn resolve(
    task: &TaskInfo,
    matcher: &dyn HostImageMatcher,
) -> Result<ResolvedTask, AdapterError> {
    let command = effective_command(task);

    let (locator, options) = match command.and_then(|c| c.container.as_ref()) {
        Some(container) => (
            ImageLocator::parse(&container.image)?,
            container.options.clone(),
        ),
        None => (ImageLocator::HostDefault, Vec::new()),
    };

    let image = match locator {
        ImageLocator::Explicit(image) => image,
        ImageLocator::HostDefault => matcher.matching_image()?,
    };

    let argv = match command.and_then(|c| c.value.as_deref()) {
        Some(value) if !value.is_empty() => {
            vec!["sh".to_string(), "-c".to_string(), value.to_string()]
        }
        _ => Vec::new(),
    };

    let env: TaskEnv = task
        .command
        .as_ref()
        .and_then(|c| c.environment.as_ref())
        .map(|e| {
            e.variables
                .iter()
                .map(|v| (v.name.as_str(), v.value.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let mut limits = ResourceLimits::default();
    for resource in &task.resources {
        if let Some(scalar) = &resource.scalar {
            limits.absorb(&resource.name, scalar.value);
        }
    }

    let resolved = ResolvedTask {
        image,
        options,
        argv,
        env,
        limits,
        needs_executor_wrapper: task.executor.is_none(),
    };
    debug!(
        target: "excon.resolve",
        task_id = %task.task_id.value,
        image = %resolved.image,
        wrapper = resolved.needs_executor_wrapper,
        "resolved task"
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use excon_proto::{
        Environment, ExecutorId, ExecutorInfo, Resource, TaskId, command_info::ContainerInfo,
        environment::Variable, value,
    };

    struct Fixed(&'static str);

    impl HostImageMatcher for Fixed {
        fn matching_image(&self) -> Result<String, AdapterError> {
            Ok(self.0.to_string())
        }
    }

    fn scalar(name: &str, v: f64) -> Resource {
        Resource {
            name: name.into(),
            r#type: value::Type::Scalar as i32,
            scalar: Some(value::Scalar { value: v }),
            ..Default::default()
        }
    }

    fn command(value: Option<&str>, image: Option<&str>) -> CommandInfo {
        CommandInfo {
            value: value.map(str::to_string),
            container: image.map(|image| ContainerInfo {
                image: image.into(),
                options: Vec::new(),
            }),
            ..Default::default()
        }
    }

    fn task(command: Option<CommandInfo>) -> TaskInfo {
        TaskInfo {
            name: "t".into(),
            task_id: TaskId { value: "t-1".into() },
            command,
            ..Default::default()
        }
    }

    #[test]
    fn plain_command_uses_host_image_and_wrapper() {
        let t = task(Some(command(Some("echo hi"), None)));
        let r = resolve(&t, &Fixed("debian:12")).unwrap();
        assert_eq!(r.argv, ["sh", "-c", "echo hi"]);
        assert_eq!(r.image, "debian:12");
        assert!(r.options.is_empty());
        assert!(r.needs_executor_wrapper);
    }

    #[test]
    fn explicit_image_without_command_runs_entrypoint() {
        let t = task(Some(command(None, Some("docker:///ubuntu:20.04"))));
        let r = resolve(&t, &Fixed("unused")).unwrap();
        assert_eq!(r.image, "ubuntu:20.04");
        assert!(r.argv.is_empty());
    }

    #[test]
    fn empty_command_value_runs_entrypoint() {
        let t = task(Some(command(Some(""), Some("docker:///busybox"))));
        assert!(resolve(&t, &Fixed("unused")).unwrap().argv.is_empty());
    }

    #[test]
    fn bare_scheme_falls_back_to_host() {
        let t = task(Some(command(None, Some("docker:///"))));
        assert_eq!(resolve(&t, &Fixed("centos:7")).unwrap().image, "centos:7");
    }

    #[test]
    fn foreign_locator_is_rejected() {
        let t = task(Some(command(None, Some("docker://registry/ubuntu"))));
        let err = resolve(&t, &Fixed("unused")).unwrap_err();
        assert!(matches!(err, AdapterError::InvalidImageReference(_)));
    }

    #[test]
    fn executor_command_wins() {
        let mut t = task(Some(command(Some("ignored"), Some("docker:///task-image"))));
        let mut exec_cmd = command(Some("./executor"), Some("docker:///exec-image"));
        if let Some(c) = exec_cmd.container.as_mut() {
            c.options = vec!["--privileged".into(), "-v=/a:/b".into()];
        }
        t.executor = Some(ExecutorInfo {
            executor_id: ExecutorId { value: "e".into() },
            command: exec_cmd,
            ..Default::default()
        });

        let r = resolve(&t, &Fixed("unused")).unwrap();
        assert_eq!(r.image, "exec-image");
        assert_eq!(r.options, ["--privileged", "-v=/a:/b"]);
        assert_eq!(r.argv, ["sh", "-c", "./executor"]);
        assert!(!r.needs_executor_wrapper);
    }

    #[test]
    fn env_and_limits_come_from_the_task() {
        let mut cmd = command(Some("true"), None);
        cmd.environment = Some(Environment {
            variables: vec![
                Variable { name: "A".into(), value: "1".into() },
                Variable { name: "B".into(), value: "2".into() },
            ],
        });
        let mut t = task(Some(cmd));
        t.resources = vec![scalar("cpus", 0.5), scalar("mem", 64.0), scalar("ports", 1.0)];

        let r = resolve(&t, &Fixed("x")).unwrap();
        let env: Vec<_> = r.env.iter().map(|kv| kv.to_assignment()).collect();
        assert_eq!(env, ["A=1", "B=2"]);
        assert_eq!(r.limits.cpu_shares, Some(128));
        assert_eq!(r.limits.memory_mb, Some(64));
    }

    #[test]
    fn missing_command_means_no_argv() {
        let r = resolve(&task(None), &Fixed("alpine:3")).unwrap();
        assert!(r.argv.is_empty());
        assert_eq!(r.image, "alpine:3");
        assert!(r.env.is_empty());
    }
}
