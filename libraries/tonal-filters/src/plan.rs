//! Command plans handed to the audio engine

use serde::Serialize;

/// Label of the final output pad of every filter graph
pub const GRAPH_OUTPUT_LABEL: &str = "out";

/// Everything the engine needs for one invocation
///
/// `filters` is applied as a single filter chain, in list order. The other
/// fields are command-level settings and do not depend on filter order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandPlan {
    pub filters: Vec<String>,

    /// Multi-input graph (layering); when set, `filters` run after the mix-down
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<FilterGraph>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate_hz: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,

    /// Engine codec identifier (already alias-mapped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seek_sec: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<f64>,
}

impl CommandPlan {
    /// The filter list as one engine filter-chain expression
    pub fn filter_chain(&self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }

    /// Complete multi-input graph expression, with `filters` appended after
    /// the mix-down
    pub fn filter_complex(&self) -> Option<String> {
        self.graph.as_ref().map(|g| g.render(&self.filters))
    }
}

/// A multi-input filter graph ending in a mix-down
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGraph {
    /// Per-input processing chains, each ending in its own output label
    pub chains: Vec<String>,
    /// Mix-down directive including its input labels
    pub mix: String,
    /// Number of engine inputs the graph reads
    pub input_count: usize,
}

impl FilterGraph {
    /// Render the graph, routing the mix through `post` when non-empty
    pub fn render(&self, post: &[String]) -> String {
        let mut parts = self.chains.clone();
        if post.is_empty() {
            parts.push(format!("{}[{}]", self.mix, GRAPH_OUTPUT_LABEL));
        } else {
            parts.push(format!("{}[mixed]", self.mix));
            parts.push(format!("[mixed]{}[{}]", post.join(","), GRAPH_OUTPUT_LABEL));
        }
        parts.join(";")
    }
}
