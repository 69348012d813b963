//! Summary of a checkout run.

use serde::Serialize;
use std::path::PathBuf;

use crate::identifier::ProjectId;
use crate::layout::ProjectLayout;
use crate::project_page::ProjectInfo;

/// How a single step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum StepOutcome {
    Done,
    /// Nothing to do; the run carried on.
    Skipped(String),
    /// The step failed but the run carried on.
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub step: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReport {
    pub command: &'static str,
    pub project_id: ProjectId,
    pub title: String,
    pub author: String,
    pub project_name: String,
    pub project_dir: PathBuf,
    pub steps: Vec<StepRecord>,
    pub skipped: u32,
    pub tolerated_failures: u32,
}

impl CheckoutReport {
    pub fn new(project_id: ProjectId, info: &ProjectInfo, layout: &ProjectLayout) -> Self {
        Self {
            command: "checkout",
            project_id,
            title: info.title.clone(),
            author: info.author.clone(),
            project_name: layout.name().to_string(),
            project_dir: layout.root().to_path_buf(),
            steps: Vec::new(),
            skipped: 0,
            tolerated_failures: 0,
        }
    }

    pub fn record(&mut self, step: impl Into<String>, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Done => {}
            StepOutcome::Skipped(_) => self.skipped += 1,
            StepOutcome::Failed(_) => self.tolerated_failures += 1,
        }
        self.steps.push(StepRecord {
            step: step.into(),
            outcome,
        });
    }

    pub fn done(&mut self, step: impl Into<String>) {
        self.record(step, StepOutcome::Done);
    }

    pub fn skipped(&mut self, step: impl Into<String>, reason: impl Into<String>) {
        self.record(step, StepOutcome::Skipped(reason.into()));
    }

    pub fn failed(&mut self, step: impl Into<String>, reason: impl Into<String>) {
        self.record(step, StepOutcome::Failed(reason.into()));
    }

    /// Outcome of the first step recorded under `step`.
    pub fn outcome(&self, step: &str) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| &record.outcome)
    }
}
