//! Worker pool applying one action across a list of targets.

use std::collections::VecDeque;
use std::fmt::Display;
use std::future::Future;

use futures::future::join_all;
use landing_core::{ExecutionOutcome, Target};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{FanOutError, FanOutResult};
use crate::report::FanOutReport;

/// Verdict of a fail-fast target check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCheck {
    /// The target satisfies the check; the message goes into the report.
    Passed(String),
    /// The target does not satisfy the check; the reason goes into the report
    /// and fails the whole fan-out once every target has settled.
    Failed(String),
}

/// Runs a per-target action over many targets with bounded concurrency.
///
/// A fixed pool of `min(concurrency, targets)` workers pulls targets from a
/// shared queue. A worker takes the next target as soon as its previous one
/// settles, so slow targets never hold back the rest of the queue. Failures
/// are isolated into `ERROR` lines and never stop other targets.
///
/// Workers are polled from the calling task; nothing is spawned.
#[derive(Debug, Clone, Copy)]
pub struct FanOutExecutor {
    concurrency: usize,
}

impl FanOutExecutor {
    /// Create an executor. A bound of zero is treated as one.
    #[must_use]
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Maximum number of actions in flight.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Apply `action` to every target, isolating failures.
    pub async fn run<F, Fut, E>(&self, targets: Vec<Target>, action: F) -> FanOutReport
    where
        F: Fn(Target) -> Fut,
        Fut: Future<Output = Result<String, E>>,
        E: Display,
    {
        let outcomes = self
            .drive(targets, |target| {
                let fut = action(target.clone());
                async move {
                    match fut.await {
                        Ok(message) => ExecutionOutcome::success(target, message),
                        Err(e) => {
                            warn!(target = %target, error = %e, "target failed");
                            ExecutionOutcome::failure(target, e.to_string())
                        }
                    }
                }
            })
            .await;
        FanOutReport::new(outcomes)
    }

    /// Apply a check to every target and fail if any target failed it.
    ///
    /// Every target runs to completion first. Errors returned by `action`
    /// stay isolated `ERROR` lines and do not fail the call; only
    /// [`TargetCheck::Failed`] verdicts do.
    pub async fn run_checked<F, Fut, E>(
        &self,
        targets: Vec<Target>,
        action: F,
    ) -> FanOutResult<FanOutReport>
    where
        F: Fn(Target) -> Fut,
        Fut: Future<Output = Result<TargetCheck, E>>,
        E: Display,
    {
        let results = self
            .drive(targets, |target| {
                let fut = action(target.clone());
                async move {
                    match fut.await {
                        Ok(TargetCheck::Passed(message)) => {
                            (ExecutionOutcome::success(target, message), false)
                        }
                        Ok(TargetCheck::Failed(reason)) => {
                            (ExecutionOutcome::failure(target, reason), true)
                        }
                        Err(e) => {
                            warn!(target = %target, error = %e, "target failed");
                            (ExecutionOutcome::failure(target, e.to_string()), false)
                        }
                    }
                }
            })
            .await;

        let failures: Vec<_> = results
            .iter()
            .filter(|(_, check_failed)| *check_failed)
            .map(|(outcome, _)| outcome.clone())
            .collect();
        let report = FanOutReport::new(results.into_iter().map(|(o, _)| o).collect());
        if failures.is_empty() {
            Ok(report)
        } else {
            Err(FanOutError::ChecksFailed { failures, report })
        }
    }

    async fn drive<T, F, Fut>(&self, targets: Vec<Target>, work: F) -> Vec<T>
    where
        F: Fn(Target) -> Fut,
        Fut: Future<Output = T>,
    {
        let total = targets.len();
        if total == 0 {
            return Vec::new();
        }

        let workers = self.concurrency.min(total);
        debug!(targets = total, workers, "starting fan-out");

        let queue = Mutex::new(VecDeque::from(targets));
        let settled = Mutex::new(Vec::with_capacity(total));
        let (queue_ref, settled_ref, work) = (&queue, &settled, &work);

        join_all((0..workers).map(|worker| async move {
            loop {
                let next = queue_ref.lock().pop_front();
                let Some(target) = next else {
                    break;
                };
                debug!(worker, target = %target, "running target");
                let result = work(target).await;
                settled_ref.lock().push(result);
            }
        }))
        .await;

        settled.into_inner()
    }
}

impl Default for FanOutExecutor {
    fn default() -> Self {
        Self::new(1)
    }
}
