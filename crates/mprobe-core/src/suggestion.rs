//! The "Did you mean" suggestion block inside metric-not-found errors.
//!
//! The analytics engine reports unknown metric names as human-readable text,
//! not structured JSON:
//!
//! ```text
//! Query failed: The following metrics were not found:
//!   - tcp_receive_segments
//!     Did you mean:
//!       • tcp_packets{direction="receive"} - TCP packets received
//!       • tcp_bytes{direction="receive"} - TCP bytes received
//!
//! Hint: Common metric patterns:
//!   • CPU: cpu_usage, cpu_cores, cpu_cycles
//! ```
//!
//! The structure is positional: a "not found" marker line, `- name` items
//! for the missing metrics, and bullet candidates after each "Did you mean"
//! marker. Parsing scans lines; the trailing hint section (after a blank
//! line) is not part of the suggestion block.

/// Marker phrase on the line introducing missing metric names.
pub const NOT_FOUND_MARKER: &str = "not found:";

/// Marker phrase introducing candidate alternatives.
pub const DID_YOU_MEAN_MARKER: &str = "Did you mean:";

/// Bullet prefix on candidate lines.
const CANDIDATE_BULLET: char = '•';

/// The parsed suggestion portion of an error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionBlock {
    /// Metric names the engine reported as missing.
    pub missing: Vec<String>,
    /// Candidate alternatives, across all missing metrics, in engine order.
    pub suggestions: Vec<String>,
}

impl SuggestionBlock {
    /// Whether at least one candidate was offered.
    pub fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }
}

/// Scan an error message for its suggestion block.
///
/// Returns `None` when the message has no "not found" marker at all. A
/// message with the marker but no candidates parses to a block with empty
/// `suggestions` — the caller decides whether that violates the contract.
pub fn parse(message: &str) -> Option<SuggestionBlock> {
    let mut lines = message.lines();
    lines.find(|line| line.contains(NOT_FOUND_MARKER))?;

    let mut block = SuggestionBlock::default();
    let mut in_candidates = false;
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            // Blank line ends the block; anything after is hint text.
            break;
        }
        if trimmed.contains(DID_YOU_MEAN_MARKER) {
            in_candidates = true;
            continue;
        }
        if let Some(name) = trimmed.strip_prefix("- ") {
            block.missing.push(name.trim().to_string());
            in_candidates = false;
            continue;
        }
        if in_candidates && trimmed.starts_with(CANDIDATE_BULLET) {
            let candidate = trimmed.trim_start_matches(CANDIDATE_BULLET).trim();
            // Candidates may carry a ` - note` tail; the name is the head.
            let name = candidate.split(" - ").next().unwrap_or(candidate).trim();
            if !name.is_empty() {
                block.suggestions.push(name.to_string());
            }
        }
    }
    Some(block)
}
