//! Pass/fail reporting for scenario runs.
//!
//! Each exchange grades into a [`StepOutcome`] carrying a short excerpt of
//! the observed response for operator review. The rollup renders to plain
//! text on stdout; tracing output stays on stderr.

use chrono::{DateTime, Local};

/// The graded result of one exchange.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// What the step did, e.g. `query irate(cpu_usage[5m])`.
    pub label: String,
    pub passed: bool,
    /// Excerpt of the response, or the failure reason.
    pub detail: String,
}

impl StepOutcome {
    pub fn pass(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: true,
            detail: detail.into(),
        }
    }

    pub fn fail(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: false,
            detail: detail.into(),
        }
    }
}

/// All step outcomes for one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub scenario: String,
    pub steps: Vec<StepOutcome>,
}

impl ScenarioReport {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: StepOutcome) {
        if outcome.passed {
            tracing::info!(scenario = %self.scenario, step = %outcome.label, "step ok");
        } else {
            tracing::warn!(
                scenario = %self.scenario,
                step = %outcome.label,
                detail = %outcome.detail,
                "step failed"
            );
        }
        self.steps.push(outcome);
    }

    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.passed).count()
    }

    pub fn passed(&self) -> bool {
        self.failed_steps() == 0
    }
}

/// Rollup across every scenario of one harness invocation.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started: DateTime<Local>,
    pub scenarios: Vec<ScenarioReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started: Local::now(),
            scenarios: Vec::new(),
        }
    }

    pub fn record(&mut self, scenario: ScenarioReport) {
        self.scenarios.push(scenario);
    }

    pub fn failed_steps(&self) -> usize {
        self.scenarios.iter().map(ScenarioReport::failed_steps).sum()
    }

    pub fn total_steps(&self) -> usize {
        self.scenarios.iter().map(|s| s.steps.len()).sum()
    }

    /// Render the report as human-readable text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "metric-probe run, started {}\n",
            self.started.format("%Y-%m-%d %H:%M:%S")
        ));
        for scenario in &self.scenarios {
            let verdict = if scenario.passed() { "ok" } else { "FAILED" };
            out.push_str(&format!("\nscenario {} ... {verdict}\n", scenario.scenario));
            for step in &scenario.steps {
                let mark = if step.passed { "ok" } else { "FAILED" };
                out.push_str(&format!("  {mark:<6} {}\n", step.label));
                for line in step.detail.lines() {
                    out.push_str(&format!("         | {line}\n"));
                }
            }
        }
        let failed = self.failed_steps();
        out.push_str(&format!(
            "\n{} steps, {} failed\n",
            self.total_steps(),
            failed
        ));
        out
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
