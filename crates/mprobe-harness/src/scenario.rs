//! Scenario scripts and the driver that runs them.
//!
//! A scenario is a fixed ordered script: the handshake (always first, issued
//! by the driver itself), then tool-discovery and tool-call steps with an
//! expected response shape each. Steps are data — the driver interprets
//! them, grades each response, and records the outcome with an excerpt.
//!
//! Failure policy: a contract violation fails the step and the script
//! continues; a transport failure (dead pipe, end of stream) fails the step
//! and skips the rest, since every later exchange would block against a
//! dead child. Cleanup runs on every path. Only a launch failure aborts a
//! run.

use serde_json::{Value, json};

use mprobe_core::contract::{
    self, Outcome, excerpt_lines, excerpt_prefix, first_text_block, split_outcome,
    tool_descriptors,
};
use mprobe_core::query::{QueryExpr, Selector};
use mprobe_core::rpc::Incoming;
use mprobe_core::suggestion;

use crate::config::HarnessConfig;
use crate::exchange::ProbeClient;
use crate::report::{ScenarioReport, StepOutcome};
use crate::session::{LaunchError, Session};

/// Expected shape of one step's response.
#[derive(Debug, Clone)]
pub enum Expect {
    /// Tool discovery returns a non-empty descriptor list.
    NonEmptyToolList,
    /// Tool call succeeds with non-empty text in content block zero.
    SuccessText,
    /// Tool call fails with a metric-not-found error naming `metric`,
    /// carrying the "not found" marker and a non-empty suggestion list.
    SuggestionError { metric: String },
}

/// One scripted exchange.
#[derive(Debug, Clone)]
pub enum Step {
    ListTools,
    Call {
        label: String,
        tool: String,
        arguments: Value,
        expect: Expect,
    },
}

impl Step {
    fn label(&self) -> &str {
        match self {
            Self::ListTools => "tools/list",
            Self::Call { label, .. } => label,
        }
    }

    fn query(data_source: &str, expr: &QueryExpr, expect: Expect) -> Self {
        let query = expr.render();
        Self::Call {
            label: format!("query {query}"),
            tool: "query_metrics".to_string(),
            arguments: json!({ "data_source": data_source, "query": query }),
            expect,
        }
    }
}

/// A named, ordered script.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub summary: &'static str,
    pub steps: Vec<Step>,
}

/// The built-in scenario catalog, parameterized by the configured data source.
pub fn catalog(cfg: &HarnessConfig) -> Vec<Scenario> {
    let ds = cfg.data_source.as_str();

    let smoke = Scenario {
        name: "smoke",
        summary: "handshake, tool discovery, and a system_health call",
        steps: vec![
            Step::ListTools,
            Step::Call {
                label: "system_health".to_string(),
                tool: "system_health".to_string(),
                arguments: json!({ "data_source": ds }),
                expect: Expect::SuccessText,
            },
        ],
    };

    let drill_down = Scenario {
        name: "drill-down",
        summary: "detailed drill-down into the network subsystem over a time window",
        steps: vec![Step::Call {
            label: "drill_down network".to_string(),
            tool: "drill_down".to_string(),
            arguments: json!({
                "data_source": ds,
                "subsystem": "network",
                "start_time": 1754359535.0,
                "end_time": 1754359836.0,
                "detailed": true,
            }),
            expect: Expect::SuccessText,
        }],
    };

    // Misspellings observed in the wild, each close enough to a real metric
    // that the engine should offer alternatives.
    let suggestions = Scenario {
        name: "suggestions",
        summary: "unknown metric names draw a non-empty Did-you-mean list",
        steps: vec![
            "tcp_receive_segments",
            "network_rx_bytes",
            "cpu_freq",
            "memory_usage",
        ]
        .into_iter()
        .map(|wrong| {
            Step::query(
                ds,
                &QueryExpr::irate(Selector::metric(wrong).range("5m")),
                Expect::SuggestionError {
                    metric: wrong.to_string(),
                },
            )
        })
        .chain(std::iter::once(Step::query(
            ds,
            &QueryExpr::avg(QueryExpr::irate(Selector::metric("cpu_usage").range("5m"))),
            Expect::SuccessText,
        )))
        .collect(),
    };

    let tcp_suggestions = Scenario {
        name: "tcp-suggestions",
        summary: "a wrong TCP metric is corrected to its labeled counterpart",
        steps: vec![
            Step::query(
                ds,
                &QueryExpr::rate(Selector::metric("tcp_receive_segments").range("1m")),
                Expect::SuggestionError {
                    metric: "tcp_receive_segments".to_string(),
                },
            ),
            Step::Call {
                label: "query rate(tcp_packets{direction=\"receive\"}[1m]) windowed".to_string(),
                tool: "query_metrics".to_string(),
                arguments: json!({
                    "data_source": ds,
                    "query": QueryExpr::rate(
                        Selector::metric("tcp_packets")
                            .label("direction", "receive")
                            .range("1m"),
                    )
                    .render(),
                    "start_time": 1754359540.0,
                    "end_time": 1754359600.0,
                    "step": 10.0,
                }),
                expect: Expect::SuccessText,
            },
        ],
    };

    let label_filters = Scenario {
        name: "label-filters",
        summary: "label-filter and range-selector queries over tcp/network metrics",
        steps: [
            QueryExpr::from(Selector::metric("tcp_bytes")),
            Selector::metric("tcp_bytes").label("direction", "receive").into(),
            QueryExpr::rate(
                Selector::metric("tcp_bytes")
                    .label("direction", "receive")
                    .range("1m"),
            ),
            Selector::metric("tcp_packets").into(),
            Selector::metric("network_bytes").label("direction", "receive").into(),
        ]
        .iter()
        .map(|expr| Step::query(ds, expr, Expect::SuccessText))
        .collect(),
    };

    let validation = Scenario {
        name: "validation",
        summary: "unknown metric rejected, histogram quantile over a known one accepted",
        steps: vec![
            Step::query(
                ds,
                &QueryExpr::rate(Selector::metric("tcp_receive_segments").range("1m")),
                Expect::SuggestionError {
                    metric: "tcp_receive_segments".to_string(),
                },
            ),
            Step::query(
                ds,
                &QueryExpr::histogram_quantile(
                    0.99,
                    Selector::metric("tcp_packet_latency").range("5m"),
                ),
                Expect::SuccessText,
            ),
        ],
    };

    let idempotence = {
        let expr = QueryExpr::avg(QueryExpr::irate(Selector::metric("cpu_usage").range("5m")));
        Scenario {
            name: "idempotence",
            summary: "the identical valid query succeeds twice within one session",
            steps: vec![
                Step::query(ds, &expr, Expect::SuccessText),
                Step::query(ds, &expr, Expect::SuccessText),
            ],
        }
    };

    vec![
        smoke,
        drill_down,
        suggestions,
        tcp_suggestions,
        label_filters,
        validation,
        idempotence,
    ]
}

/// Run one scenario against a fresh session.
///
/// # Errors
///
/// Returns [`LaunchError`] when the server cannot be spawned; every other
/// failure is recorded in the report.
pub async fn run_scenario(
    cfg: &HarnessConfig,
    scenario: &Scenario,
) -> Result<ScenarioReport, LaunchError> {
    let session = Session::start(&cfg.server_bin, &cfg.server_args)?;
    let mut client = ProbeClient::new(session);
    let mut report = ScenarioReport::new(scenario.name);

    // The handshake precedes all tool calls; its response is only checked
    // for presence.
    let mut transport_down = match client
        .initialize(&cfg.protocol_version, &cfg.client_name, &cfg.client_version)
        .await
    {
        Ok(Incoming::Absent) => {
            report.record(StepOutcome::fail(
                "initialize",
                "no response before end of stream",
            ));
            true
        }
        Ok(_) => {
            report.record(StepOutcome::pass("initialize", "response received"));
            false
        }
        Err(e) => {
            report.record(StepOutcome::fail("initialize", e.to_string()));
            true
        }
    };

    for step in &scenario.steps {
        if transport_down {
            report.record(StepOutcome::fail(
                step.label(),
                "skipped: transport unavailable",
            ));
            continue;
        }

        let exchanged = match step {
            Step::ListTools => client.list_tools().await,
            Step::Call {
                tool, arguments, ..
            } => client.call_tool(tool, arguments.clone()).await,
        };

        match exchanged {
            Err(e) => {
                report.record(StepOutcome::fail(step.label(), e.to_string()));
                transport_down = true;
            }
            Ok(incoming) => {
                if incoming.is_absent() {
                    transport_down = true;
                }
                report.record(grade(step, &incoming));
            }
        }
    }

    if let Err(e) = client.terminate_and_wait().await {
        tracing::warn!(scenario = scenario.name, error = %e, "session teardown failed");
    }
    Ok(report)
}

/// Grade one response against a step's expectation.
pub fn grade(step: &Step, incoming: &Incoming) -> StepOutcome {
    let label = step.label();
    let parsed = match incoming {
        Incoming::Absent => {
            return StepOutcome::fail(label, "no response before end of stream");
        }
        Incoming::Raw(text) => {
            return StepOutcome::fail(
                label,
                format!("response was not valid JSON: {}", excerpt_prefix(text, 100)),
            );
        }
        Incoming::Parsed(value) => value,
    };

    let list_tools_expect = Expect::NonEmptyToolList;
    let expect = match step {
        Step::ListTools => &list_tools_expect,
        Step::Call { expect, .. } => expect,
    };

    let outcome = match split_outcome(parsed) {
        Ok(outcome) => outcome,
        Err(violation) => return StepOutcome::fail(label, violation.to_string()),
    };

    match (expect, outcome) {
        (Expect::NonEmptyToolList, Outcome::Success(result)) => match tool_descriptors(result) {
            Ok(descriptors) => {
                let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
                StepOutcome::pass(label, format!("{} tools: {}", names.len(), names.join(", ")))
            }
            Err(violation) => StepOutcome::fail(label, violation.to_string()),
        },

        (Expect::SuccessText, Outcome::Success(result)) => match first_text_block(result) {
            Ok(text) => StepOutcome::pass(label, excerpt_lines(text, 3)),
            Err(violation) => StepOutcome::fail(label, violation.to_string()),
        },

        (Expect::SuggestionError { metric }, Outcome::Failure { message, .. }) => {
            grade_suggestion_error(label, metric, message)
        }

        (Expect::SuggestionError { .. }, Outcome::Success(_)) => StepOutcome::fail(
            label,
            contract::ContractViolation::UnexpectedSuccess.to_string(),
        ),

        (_, Outcome::Failure { code, message }) => StepOutcome::fail(
            label,
            contract::ContractViolation::UnexpectedError {
                code,
                excerpt: excerpt_prefix(message, 100),
            }
            .to_string(),
        ),
    }
}

fn grade_suggestion_error(label: &str, metric: &str, message: &str) -> StepOutcome {
    use contract::ContractViolation;

    if !message.contains(metric) {
        return StepOutcome::fail(
            label,
            ContractViolation::MissingMetricName {
                metric: metric.to_string(),
            }
            .to_string(),
        );
    }
    let Some(block) = suggestion::parse(message) else {
        return StepOutcome::fail(
            label,
            ContractViolation::MissingMarker {
                marker: suggestion::NOT_FOUND_MARKER,
            }
            .to_string(),
        );
    };
    if !block.has_suggestions() {
        return StepOutcome::fail(label, ContractViolation::NoSuggestions.to_string());
    }
    StepOutcome::pass(
        label,
        format!("suggested: {}", block.suggestions.join(", ")),
    )
}
