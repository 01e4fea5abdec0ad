//! Full pipeline scheduling tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use landing_core::ExecutionPhase;
    use landing_modules::{LOGGING_STAGE, PREPARE_STAGE, default_registry};
    use landing_runner::{
        EnvSkipPredicate, ModuleError, ModuleRegistry, RunParams, RunnerError, StageDefinition,
    };

    use crate::{AUDIT, FakeAssumer, Recorder, runner};

    fn scenario(recorder: &Arc<Recorder>, m1_fails: bool) -> ModuleRegistry {
        let m1 = recorder.module("m1", 1, 20, m1_fails);
        let m2 = recorder.module("m2", 1, 30, false);
        let m3 = recorder.module("m3", 1, 5, false);
        ModuleRegistry::default()
            .with_stage(StageDefinition::new("A", 1).with_module(m1))
            .with_stage(StageDefinition::new("B", 1).with_module(m2))
            .with_stage(StageDefinition::new("C", 2).with_module(m3))
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_run_group_members_together_and_groups_in_order() {
        let recorder = Arc::new(Recorder::default());
        let report = runner(scenario(&recorder, false), Arc::new(FakeAssumer::new()), true)
            .execute(RunParams::default())
            .await
            .unwrap();

        assert_eq!(report, "m1 done\nm2 done\nm3 done");
        let at = |e: &str| recorder.position(e).unwrap();
        assert!(at("start m2") < at("end m1"));
        assert!(at("end m1") < at("start m3"));
        assert!(at("end m2") < at("start m3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_never_start_later_group_after_rejection() {
        let recorder = Arc::new(Recorder::default());
        let err = runner(scenario(&recorder, true), Arc::new(FakeAssumer::new()), true)
            .execute(RunParams::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunnerError::ModuleFailed { ref stage, ref module, source: ModuleError::Failed(_) }
                if stage == "A" && module == "m1"
        ));
        // The sibling still settles before the run fails.
        assert!(recorder.position("end m2").is_some());
        assert!(recorder.position("start m3").is_none());
        assert_eq!(err.to_string(), "module \"m1\" in stage \"A\" failed: m1 rejected");
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_invoke_every_handler_exactly_once() {
        let recorder = Arc::new(Recorder::default());
        let mut registry = ModuleRegistry::default();
        let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
        for (i, name) in names.iter().enumerate() {
            let order = i32::try_from(i % 3).unwrap();
            let delay = u64::try_from(10 * (names.len() - i)).unwrap();
            let module = recorder.module(*name, 1, delay, false);
            let stage = StageDefinition::new(format!("stage-{name}"), order).with_module(module);
            registry = registry.with_stage(stage);
        }

        runner(registry, Arc::new(FakeAssumer::new()), true)
            .execute(RunParams::default())
            .await
            .unwrap();

        let mut started = recorder.started();
        assert_eq!(started.len(), names.len());
        started.sort();
        assert_eq!(started, names);

        // Every module of group k ends before any module of group k+1 starts.
        let events = recorder.events();
        let group_of = |name: &str| names.iter().position(|n| *n == name).unwrap() % 3;
        for (i, event) in events.iter().enumerate() {
            let Some(name) = event.strip_prefix("start ") else {
                continue;
            };
            for later in &events[i..] {
                if let Some(other) = later.strip_prefix("end ") {
                    assert!(
                        group_of(other) >= group_of(name),
                        "{other} ended after {name} started"
                    );
                }
            }
        }
    }

    #[tokio::test]
    async fn test_should_report_no_modules_and_run_nothing() {
        let recorder = Arc::new(Recorder::default());
        let registry = scenario(&recorder, false).with_stage(StageDefinition::new("empty", 9));
        let assumer = Arc::new(FakeAssumer::new());
        let runner = runner(registry, Arc::clone(&assumer), true);

        for stage in ["empty", "unknown"] {
            let report = runner
                .execute(RunParams::builder().stage(stage).build())
                .await
                .unwrap();
            assert_eq!(report, format!("No modules found for stage \"{stage}\""));
        }
        assert!(recorder.events().is_empty());
        assert_eq!(assumer.calls(), 0);
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_stage_in_either_mode() {
        let recorder = Arc::new(Recorder::default());
        let m4 = recorder.module("m4", 1, 0, false);
        let registry =
            scenario(&recorder, false).with_stage(StageDefinition::new("B", 4).with_module(m4));
        let runner = runner(registry, Arc::new(FakeAssumer::new()), true);

        let named = runner.execute(RunParams::builder().stage("B").build()).await;
        let full = runner.execute(RunParams::default()).await;

        assert!(matches!(named, Err(RunnerError::DuplicateStage(ref s)) if s == "B"));
        assert!(matches!(full, Err(RunnerError::DuplicateStage(ref s)) if s == "B"));
        assert!(recorder.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_run_default_pipeline_end_to_end() {
        let assumer = Arc::new(FakeAssumer::new());
        let report = runner(default_registry(), Arc::clone(&assumer), true)
            .execute(RunParams::default())
            .await
            .unwrap();

        let lines: Vec<_> = report.lines().collect();
        assert!(
            lines[0].starts_with("Module \"validate-management-access\" completed successfully")
        );
        assert!(lines.last().unwrap().ends_with(
            "222222222222/us-east-1: central log bucket \
             landing-zone-central-logs-222222222222-us-east-1"
        ));
        // Two member accounts in two regions; the log archive target is reused.
        assert_eq!(assumer.distinct_targets(), 4);
        assert_eq!(assumer.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_fail_prepare_stage_when_member_is_unreachable() {
        let assumer = Arc::new(FakeAssumer::new().deny(AUDIT));
        let params = RunParams::builder()
            .stage(PREPARE_STAGE)
            .phase(ExecutionPhase::Synth)
            .build();
        let err = runner(default_registry(), assumer, true)
            .execute(params)
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("stage \"prepare\""));
        assert!(message.contains("333333333333/us-east-1"));
        assert!(message.contains("333333333333/eu-west-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_tolerate_failed_modules_when_asked() {
        let assumer = Arc::new(FakeAssumer::new().deny(AUDIT));
        let params = RunParams::builder().tolerate_module_failures(true).build();
        let report = runner(default_registry(), assumer, false)
            .execute(params)
            .await
            .unwrap();

        let lines: Vec<_> = report.lines().collect();
        assert!(lines[0].starts_with(
            "Module \"validate-management-access\" failed: check failed for 2 target(s)"
        ));
        assert_eq!(
            lines.last().unwrap(),
            &"Module \"resolve-central-log-target\" execution skipped, \
              central logging is not enabled"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_skip_modules_disabled_by_environment() {
        // The access check would fail, but it is suppressed and never runs.
        let assumer = Arc::new(FakeAssumer::new().deny(AUDIT));
        let report = runner(default_registry(), Arc::clone(&assumer), true)
            .with_skip_predicate(EnvSkipPredicate::from_list("validate-management-access"))
            .execute(RunParams::default())
            .await
            .unwrap();

        assert!(report.starts_with("Module \"resolve-central-log-target\" completed"));
        assert_eq!(report.lines().count(), 1);
        assert_eq!(assumer.calls(), 1);
    }

    #[tokio::test]
    async fn test_should_report_no_modules_when_phase_does_not_match() {
        let report = runner(default_registry(), Arc::new(FakeAssumer::new()), true)
            .execute(RunParams::builder().stage(LOGGING_STAGE).phase(ExecutionPhase::Synth).build())
            .await
            .unwrap();
        assert_eq!(report, "No modules found for stage \"logging\"");
    }
}
