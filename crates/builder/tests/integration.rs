//! Integration tests for the conda build driver

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use hcb_builder::*;
    use hcb_config::{RecipeFormat, TargetConfig};
    use hcb_errors::{BuildError, Error};
    use hcb_events::{AppEvent, BuildEvent, BuildPhase, GeneralEvent};
    use hcb_metadata::ProjectMetadata;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    #[derive(Debug, Clone)]
    struct Invocation {
        program: String,
        args: Vec<String>,
        recipe_dir: PathBuf,
        recipe: Option<String>,
    }

    /// Records invocations instead of spawning conda
    struct RecordingRunner {
        exit_code: Option<i32>,
        calls: Mutex<Vec<Invocation>>,
    }

    impl RecordingRunner {
        fn exiting_with(exit_code: Option<i32>) -> Arc<Self> {
            Arc::new(Self {
                exit_code,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BuildRunner for RecordingRunner {
        async fn run(&self, program: &str, args: &[String]) -> Result<BuildCommandResult, Error> {
            let recipe_dir = PathBuf::from(&args[1]);
            let recipe = std::fs::read_to_string(recipe_dir.join("meta.yaml")).ok();
            self.calls.lock().unwrap().push(Invocation {
                program: program.to_string(),
                args: args.to_vec(),
                recipe_dir,
                recipe,
            });
            Ok(BuildCommandResult {
                success: self.exit_code == Some(0),
                exit_code: self.exit_code,
            })
        }
    }

    fn project_a() -> ProjectMetadata {
        let mut meta = ProjectMetadata::new("project-a", "0.1.0", "/src/project-a");
        meta.requires_python = Some(">=3.8".into());
        meta.dependencies = vec!["requests".into(), "Flask>=2".into()];
        meta.build_requires = vec!["hatchling".into(), "hatch-conda-build".into()];
        meta
    }

    fn builder(config: TargetConfig, runner: &Arc<RecordingRunner>) -> CondaBuilder {
        CondaBuilder::new(config).with_runner(runner.clone())
    }

    #[tokio::test]
    async fn test_build_returns_noarch_artifact() {
        let out = tempdir().unwrap();
        let runner = RecordingRunner::exiting_with(Some(0));

        let artifact = builder(TargetConfig::default(), &runner)
            .build(&project_a(), out.path())
            .await
            .unwrap();

        assert_eq!(
            artifact,
            out.path().join("noarch").join("project-a-0.1.0-py_0.tar.bz2")
        );
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_command_line_and_channel_order() {
        let out = tempdir().unwrap();
        let runner = RecordingRunner::exiting_with(Some(0));
        let config = TargetConfig {
            channels: vec!["conda-forge".into(), "defaults".into()],
            conda_executable: "mamba".into(),
            ..TargetConfig::default()
        };

        builder(config, &runner)
            .build(&project_a(), out.path())
            .await
            .unwrap();

        let call = &runner.calls()[0];
        assert_eq!(call.program, "mamba");
        assert_eq!(call.args[0], "build");
        assert_eq!(call.args[2], "--output-folder");
        assert_eq!(PathBuf::from(&call.args[3]), out.path());
        assert_eq!(
            &call.args[4..],
            [
                "--override-channels",
                "--channel",
                "conda-forge",
                "--channel",
                "defaults",
            ]
        );
    }

    #[tokio::test]
    async fn test_numpy_only_when_configured() {
        let out = tempdir().unwrap();

        let runner = RecordingRunner::exiting_with(Some(0));
        builder(TargetConfig::default(), &runner)
            .build(&project_a(), out.path())
            .await
            .unwrap();
        assert!(!runner.calls()[0].args.iter().any(|a| a == "--numpy"));

        let runner = RecordingRunner::exiting_with(Some(0));
        let config = TargetConfig {
            default_numpy_version: Some("1.22".into()),
            ..TargetConfig::default()
        };
        builder(config, &runner)
            .build(&project_a(), out.path())
            .await
            .unwrap();
        let args = &runner.calls()[0].args;
        let pos = args.iter().position(|a| a == "--numpy").unwrap();
        assert_eq!(args[pos + 1], "1.22");
    }

    #[tokio::test]
    async fn test_recipe_written_for_run_and_removed_after() {
        let out = tempdir().unwrap();
        let runner = RecordingRunner::exiting_with(Some(0));

        builder(TargetConfig::default(), &runner)
            .build(&project_a(), out.path())
            .await
            .unwrap();

        let call = &runner.calls()[0];
        let recipe: serde_json::Value =
            serde_json::from_str(call.recipe.as_deref().unwrap()).unwrap();
        assert_eq!(recipe["package"]["name"], "project-a");
        assert_eq!(recipe["build"]["noarch"], "python");
        assert_eq!(
            recipe["requirements"]["run"],
            serde_json::json!(["python >=3.8", "requests", "flask >=2"])
        );
        assert_eq!(
            recipe["requirements"]["host"],
            serde_json::json!(["python >=3.8", "pip", "hatchling"])
        );
        assert!(!call.recipe_dir.exists());
    }

    #[tokio::test]
    async fn test_yaml_recipe_format() {
        let out = tempdir().unwrap();
        let runner = RecordingRunner::exiting_with(Some(0));
        let config = TargetConfig {
            recipe_format: RecipeFormat::Yaml,
            ..TargetConfig::default()
        };

        builder(config, &runner)
            .build(&project_a(), out.path())
            .await
            .unwrap();

        let recipe = runner.calls()[0].recipe.clone().unwrap();
        assert!(!recipe.trim_start().starts_with('{'));
        assert!(recipe.contains("noarch: python"));
    }

    #[tokio::test]
    async fn test_failed_build_surfaces_exit_code() {
        let out = tempdir().unwrap();
        let runner = RecordingRunner::exiting_with(Some(3));

        let err = builder(TargetConfig::default(), &runner)
            .build(&project_a(), out.path())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Build(BuildError::CondaBuildFailed {
                exit_code: Some(3),
                ..
            })
        ));
        assert_eq!(err.external_exit_code(), Some(3));
        assert!(!runner.calls()[0].recipe_dir.exists());
    }

    #[tokio::test]
    async fn test_invalid_requirement_never_runs_conda() {
        let out = tempdir().unwrap();
        let runner = RecordingRunner::exiting_with(Some(0));
        let mut meta = project_a();
        meta.dependencies.push("flask >= >= 2".into());

        let err = builder(TargetConfig::default(), &runner)
            .build(&meta, out.path())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Recipe(_)));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_phase_events_on_success() {
        let out = tempdir().unwrap();
        let runner = RecordingRunner::exiting_with(Some(0));
        let (tx, mut rx) = hcb_events::channel();

        builder(TargetConfig::default(), &runner)
            .with_event_sender(tx)
            .build(&project_a(), out.path())
            .await
            .unwrap();

        let mut phases = Vec::new();
        let mut completed = None;
        while let Ok(event) = rx.try_recv() {
            match event {
                AppEvent::Build(BuildEvent::PhaseChanged { to, .. }) => phases.push(to),
                AppEvent::Build(BuildEvent::Completed { artifact, .. }) => {
                    completed = Some(artifact);
                }
                _ => {}
            }
        }

        assert_eq!(
            phases,
            vec![
                BuildPhase::MetadataCollected,
                BuildPhase::RequirementsNormalized,
                BuildPhase::RecipeAssembled,
                BuildPhase::RecipeWritten,
                BuildPhase::ExternalBuildRunning,
                BuildPhase::Completed,
            ]
        );
        assert!(completed.unwrap().ends_with("project-a-0.1.0-py_0.tar.bz2"));
    }

    #[tokio::test]
    async fn test_dropped_marker_reaches_event_channel() {
        let out = tempdir().unwrap();
        let runner = RecordingRunner::exiting_with(Some(0));
        let (tx, mut rx) = hcb_events::channel();
        let mut meta = project_a();
        meta.dependencies.push("tomli>=1.1; python_version < '3.11'".into());

        builder(TargetConfig::default(), &runner)
            .with_event_sender(tx)
            .build(&meta, out.path())
            .await
            .unwrap();

        let mut warnings = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::General(GeneralEvent::Warning { message }) = event {
                warnings.push(message);
            }
        }
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("tomli"));
    }

    #[tokio::test]
    async fn test_failure_event_names_phase() {
        let out = tempdir().unwrap();
        let runner = RecordingRunner::exiting_with(None);
        let (tx, mut rx) = hcb_events::channel();

        let err = builder(TargetConfig::default(), &runner)
            .with_event_sender(tx)
            .build(&project_a(), out.path())
            .await
            .unwrap_err();
        assert_eq!(err.external_exit_code(), None);

        let mut failed = None;
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::Build(BuildEvent::Failed { phase, failure, .. }) = event {
                failed = Some((phase, failure));
            }
        }
        let (phase, failure) = failed.unwrap();
        assert_eq!(phase, BuildPhase::ExternalBuildRunning);
        assert_eq!(failure.code.as_deref(), Some("build.conda_build_failed"));
        assert!(failure.message.contains("terminated by signal"));
    }

    #[tokio::test]
    async fn test_clean_removes_directory() {
        let root = tempdir().unwrap();
        let dir = root.path().join("conda");
        std::fs::create_dir_all(dir.join("noarch")).unwrap();
        std::fs::write(dir.join("noarch").join("pkg.tar.bz2"), b"x").unwrap();

        let runner = RecordingRunner::exiting_with(Some(0));
        builder(TargetConfig::default(), &runner)
            .clean(&dir)
            .await
            .unwrap();

        assert!(!dir.exists());
        assert!(root.path().exists());
    }

    #[tokio::test]
    async fn test_clean_missing_directory_is_ok() {
        let root = tempdir().unwrap();
        let runner = RecordingRunner::exiting_with(Some(0));

        builder(TargetConfig::default(), &runner)
            .clean(&root.path().join("never-built"))
            .await
            .unwrap();
    }
}
