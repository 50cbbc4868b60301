//! Stub analytics MCP server for integration testing.
//!
//! Reads newline-delimited JSON-RPC from stdin and writes newline-delimited
//! responses to stdout. Implements enough of the analytics server protocol
//! to exercise the harness: handshake, tool discovery, and the three tools
//! with their success/error shapes, including the metric-not-found error
//! with a "Did you mean" suggestion list ranked by edit distance.
//!
//! # Supported methods
//!
//! - `initialize` — returns protocol version and server info
//! - `tools/list` — returns `system_health`, `drill_down`, `query_metrics`
//! - `tools/call` — text content on success, `-32000` errors on bad queries
//! - `notifications/*` — accepted, no response

use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Write};

/// Metrics the stub engine knows about.
const KNOWN_METRICS: &[&str] = &[
    "cpu_usage",
    "cpu_cores",
    "cpu_cycles",
    "cpu_frequency",
    "memory_used",
    "memory_total",
    "memory_free",
    "network_bytes",
    "network_packets",
    "tcp_bytes",
    "tcp_packets",
    "tcp_packet_latency",
    "scheduler_runqueue_latency",
];

/// Function names of the query language; never metric identifiers.
const QUERY_FUNCTIONS: &[&str] = &["rate", "irate", "avg", "histogram_quantile"];

fn main() {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let reader = BufReader::new(stdin.lock());
    let mut writer = stdout.lock();

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let msg: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(_) => continue,
        };

        handle_message(&msg, &mut writer);
    }
}

fn handle_message(msg: &Value, writer: &mut impl Write) {
    let method = msg.get("method").and_then(|v| v.as_str());
    let id = msg.get("id").cloned();

    match method {
        Some("initialize") => {
            let resp = json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2025-06-18",
                    "capabilities": {
                        "tools": {}
                    },
                    "serverInfo": {
                        "name": "stub-analytics-server",
                        "version": "0.1.0"
                    }
                }
            });
            write_msg(writer, &resp);
        }

        Some("tools/list") => {
            let resp = json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "tools": [
                        {
                            "name": "system_health",
                            "description": "Overall health assessment of the captured system",
                            "inputSchema": {
                                "type": "object",
                                "properties": {
                                    "data_source": {"type": "string"}
                                },
                                "required": ["data_source"]
                            }
                        },
                        {
                            "name": "drill_down",
                            "description": "Detailed analysis of one subsystem over a time window",
                            "inputSchema": {
                                "type": "object",
                                "properties": {
                                    "data_source": {"type": "string"},
                                    "subsystem": {"type": "string"},
                                    "start_time": {"type": "number"},
                                    "end_time": {"type": "number"},
                                    "detailed": {"type": "boolean"}
                                },
                                "required": ["data_source", "subsystem"]
                            }
                        },
                        {
                            "name": "query_metrics",
                            "description": "Evaluate a metric query expression against the capture",
                            "inputSchema": {
                                "type": "object",
                                "properties": {
                                    "data_source": {"type": "string"},
                                    "query": {"type": "string"},
                                    "start_time": {"type": "number"},
                                    "end_time": {"type": "number"},
                                    "step": {"type": "number"}
                                },
                                "required": ["data_source", "query"]
                            }
                        }
                    ]
                }
            });
            write_msg(writer, &resp);
        }

        Some("tools/call") => {
            let resp = handle_tool_call(id, msg);
            write_msg(writer, &resp);
        }

        Some(m) if m.starts_with("notifications/") => {
            // Notifications have no response
        }

        Some(unknown) => {
            if let Some(req_id) = id {
                let resp = json!({
                    "jsonrpc": "2.0",
                    "id": req_id,
                    "error": {
                        "code": -32601,
                        "message": format!("Method not found: {unknown}")
                    }
                });
                write_msg(writer, &resp);
            }
        }

        None => {}
    }
}

fn handle_tool_call(id: Option<Value>, msg: &Value) -> Value {
    let tool = msg.pointer("/params/name").and_then(|v| v.as_str());
    let args = msg
        .pointer("/params/arguments")
        .cloned()
        .unwrap_or(json!({}));

    if args.get("data_source").and_then(|v| v.as_str()).is_none() {
        return error_resp(id, -32602, "Invalid params: data_source is required");
    }

    match tool {
        Some("system_health") => text_resp(
            id,
            "System Health Report\n\
             ====================\n\
             CPU: 12% busy, no saturation observed\n\
             Memory: 5.1 GiB used of 16 GiB\n\
             Network: receive 18 Mbit/s, transmit 4 Mbit/s, no drops\n\
             Verdict: healthy",
        ),

        Some("drill_down") => {
            let subsystem = args
                .get("subsystem")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            let start = args.get("start_time").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let end = args.get("end_time").and_then(|v| v.as_f64()).unwrap_or(0.0);
            text_resp(
                id,
                &format!(
                    "Drill-down: {subsystem}\n\
                     Window: {start:.1} .. {end:.1}\n\
                     Top contributors:\n\
                       1. {subsystem}_bytes burst at +42s\n\
                       2. steady baseline elsewhere"
                ),
            )
        }

        Some("query_metrics") => {
            let Some(query) = args.get("query").and_then(|v| v.as_str()) else {
                return error_resp(id, -32602, "Invalid params: query is required");
            };
            let missing: Vec<String> = metric_names(query)
                .into_iter()
                .filter(|name| !KNOWN_METRICS.contains(&name.as_str()))
                .collect();
            if !missing.is_empty() {
                return error_resp(id, -32000, &metric_error_message(&missing));
            }
            text_resp(
                id,
                &format!(
                    "Query: {query}\n\
                     timestamp        value\n\
                     1754359540.0     0.4183\n\
                     1754359550.0     0.4267\n\
                     1754359560.0     0.4095"
                ),
            )
        }

        Some(other) => error_resp(id, -32601, &format!("Unknown tool: {other}")),
        None => error_resp(id, -32602, "Invalid params: tool name is required"),
    }
}

/// Extract candidate metric identifiers from a query expression.
///
/// Label blocks and range selectors are stripped first, so label keys and
/// values never count; what remains is every identifier that is not a
/// query-language function name.
fn metric_names(query: &str) -> Vec<String> {
    let mut cleaned = String::new();
    let mut brace = 0usize;
    let mut bracket = 0usize;
    for c in query.chars() {
        match c {
            '{' => brace += 1,
            '}' => brace = brace.saturating_sub(1),
            '[' => bracket += 1,
            ']' => bracket = bracket.saturating_sub(1),
            _ if brace == 0 && bracket == 0 => cleaned.push(c),
            _ => {}
        }
    }

    let mut names = Vec::new();
    for token in cleaned.split(|c: char| !c.is_ascii_alphanumeric() && c != '_') {
        if token.is_empty() || token.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            continue;
        }
        if QUERY_FUNCTIONS.contains(&token) || names.iter().any(|n| n == token) {
            continue;
        }
        names.push(token.to_string());
    }
    names
}

/// Build the "not found" error text, with per-metric suggestion lists.
fn metric_error_message(missing: &[String]) -> String {
    let mut message = String::from("Query failed: The following metrics were not found:\n");

    for metric in missing {
        message.push_str(&format!("  - {metric}\n"));

        // Common TCP confusion: direction lives in a label, not the name.
        if metric.contains("tcp_receive") || metric.contains("tcp_transmit") {
            message.push_str("    Did you mean:\n");
            let direction = if metric.contains("receive") {
                "receive"
            } else {
                "transmit"
            };
            for base in ["tcp_packets", "tcp_bytes", "network_bytes"] {
                message.push_str(&format!(
                    "      • {base}{{direction=\"{direction}\"}} - {} {direction}d\n",
                    base.replace('_', " ")
                ));
            }
            continue;
        }

        let suggestions = similar_metrics(metric, 3);
        if !suggestions.is_empty() {
            message.push_str("    Did you mean:\n");
            for name in suggestions {
                message.push_str(&format!("      • {name}\n"));
            }
        }
    }

    message.push_str("\nHint: Common metric patterns:\n");
    message.push_str("  • CPU: cpu_usage, cpu_cores, cpu_cycles\n");
    message.push_str("  • Memory: memory_used, memory_total, memory_free\n");
    message.push_str("  • Network: network_bytes, tcp_bytes, tcp_packets\n");
    message
}

/// Known metrics ranked by similarity to `target`, best first.
fn similar_metrics(target: &str, limit: usize) -> Vec<&'static str> {
    let mut scored: Vec<(f64, &str)> = KNOWN_METRICS
        .iter()
        .map(|name| (similarity(target, name), *name))
        .filter(|(score, _)| *score > 0.3)
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored.into_iter().map(|(_, name)| name).collect()
}

/// Normalized similarity in `[0, 1]` from Levenshtein distance, with a
/// token-overlap bonus so `network_rx_bytes` still lands near
/// `network_bytes`.
fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let edit = 1.0 - levenshtein(a, b) as f64 / max_len as f64;

    let a_tokens: Vec<&str> = a.split('_').collect();
    let shared = b.split('_').filter(|t| a_tokens.contains(t)).count();
    let overlap = shared as f64 / a_tokens.len().max(1) as f64;

    edit.max(overlap * 0.8)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn text_resp(id: Option<Value>, text: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "content": [{
                "type": "text",
                "text": text
            }]
        }
    })
}

fn error_resp(id: Option<Value>, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
}

fn write_msg(writer: &mut impl Write, msg: &Value) {
    let s = serde_json::to_string(msg).expect("serialize JSON");
    writeln!(writer, "{s}").expect("write to stdout");
    writer.flush().expect("flush stdout");
}
