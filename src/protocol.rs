use crate::error::VizError;
use crate::graph::Graph;
use crate::types::{
    EdgeStylePatch, HighlightStyle, NodeStylePatch, ARC_STROKE_NORMAL, BOOTSTRAP_COLOUR,
    NODE_HIGHLIGHT_STROKE_WIDTH,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;

// ===== Message schemas =====
// Both directions share one envelope: an "event" string tag plus
// command-specific fields. Unrecognized inbound tags are ignored, never fatal.

/// Controller -> view commands; each applies an immediate visual mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum InboundEvent {
    #[serde(rename = "highlightArcs", rename_all = "camelCase")]
    HighlightArcs {
        // None means every edge
        #[serde(default)]
        arc_ids: Option<Vec<String>>,
        // None keeps each edge's current stroke and only changes width
        #[serde(default)]
        colour: Option<String>,
        #[serde(default)]
        style: HighlightStyle,
    },
    #[serde(rename = "highlightNodes", rename_all = "camelCase")]
    HighlightNodes {
        node_ids: Vec<String>,
        colour: String,
    },
    #[serde(rename = "setDomains", rename_all = "camelCase")]
    SetDomains {
        node_ids: Vec<String>,
        domains: Vec<Vec<String>>,
    },
    #[serde(rename = "chooseDomainSplit")]
    ChooseDomainSplit { domain: Vec<String> },
    #[serde(rename = "output")]
    Output { text: String },
}

const KNOWN_EVENTS: [&str; 5] = [
    "highlightArcs",
    "highlightNodes",
    "setDomains",
    "chooseDomainSplit",
    "output",
];

/// View -> controller notifications, all fire-and-forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum OutboundEvent {
    #[serde(rename = "arcClick", rename_all = "camelCase")]
    ArcClick {
        constraint_id: String,
        var_name: String,
    },
    #[serde(rename = "varClick", rename_all = "camelCase")]
    VarClick { var_name: String },
    #[serde(rename = "fineStepClick")]
    FineStepClick,
    #[serde(rename = "stepClick")]
    StepClick,
    #[serde(rename = "autoStepClick")]
    AutoStepClick,
    // None asks the controller to pick its default split
    #[serde(rename = "domainSplitReply")]
    DomainSplitReply { domain: Option<Vec<String>> },
    #[serde(rename = "initialRender")]
    InitialRender,
}

/// Per-view protocol state machine.
///
/// Normally fire-and-forget in both directions; the one departure is
/// `ChooseDomainSplit`, which suspends dispatch (messages queue up) until
/// [`Dispatcher::resolve_split`] produces the reply. Outbound events collect
/// in a queue the host drains with [`Dispatcher::take_outbound`].
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    pending_split: Option<Vec<String>>,
    deferred: VecDeque<InboundEvent>,
    outbound: VecDeque<OutboundEvent>,
    previously_rendered: bool,
    status: String,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher::default()
    }

    /// Parses and dispatches one raw message from the channel.
    pub fn dispatch_json(&mut self, g: &mut Graph, json: &str) -> Result<(), VizError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| VizError::ProtocolShape(format!("invalid JSON: {e}")))?;
        self.dispatch_value(g, value)
    }

    /// Dispatches a JSON-shaped message, discriminating on its `event` tag.
    pub fn dispatch_value(&mut self, g: &mut Graph, value: Value) -> Result<(), VizError> {
        let Some(tag) = value.get("event").and_then(Value::as_str) else {
            return Err(VizError::ProtocolShape("missing event tag".to_string()));
        };
        if !KNOWN_EVENTS.contains(&tag) {
            debug!("ignoring unrecognized event {tag:?}");
            return Ok(());
        }
        let event: InboundEvent = serde_json::from_value(value)
            .map_err(|e| VizError::ProtocolShape(e.to_string()))?;
        self.dispatch(g, event)
    }

    /// Dispatches an already-decoded command. While a domain split awaits
    /// its reply, commands queue instead of applying; a second split request
    /// in that window fails fast.
    pub fn dispatch(&mut self, g: &mut Graph, event: InboundEvent) -> Result<(), VizError> {
        if self.pending_split.is_some() {
            if matches!(event, InboundEvent::ChooseDomainSplit { .. }) {
                return Err(VizError::SplitPending);
            }
            self.deferred.push_back(event);
            return Ok(());
        }
        self.apply(g, event)
    }

    fn apply(&mut self, g: &mut Graph, event: InboundEvent) -> Result<(), VizError> {
        match event {
            InboundEvent::HighlightArcs {
                arc_ids,
                colour,
                style,
            } => self.highlight_arcs(g, arc_ids, colour, style),
            InboundEvent::HighlightNodes { node_ids, colour } => {
                self.highlight_nodes(g, &node_ids, colour)
            }
            InboundEvent::SetDomains { node_ids, domains } => {
                self.set_domains(g, node_ids, domains)
            }
            InboundEvent::ChooseDomainSplit { domain } => {
                self.pending_split = Some(domain);
                Ok(())
            }
            InboundEvent::Output { text } => {
                self.status = text;
                Ok(())
            }
        }
    }

    fn highlight_arcs(
        &mut self,
        g: &mut Graph,
        arc_ids: Option<Vec<String>>,
        colour: Option<String>,
        style: HighlightStyle,
    ) -> Result<(), VizError> {
        let patch = EdgeStylePatch {
            stroke: colour,
            stroke_width: Some(style.stroke_width()),
            ..Default::default()
        };
        let targets: Vec<String> = match arc_ids {
            Some(ids) => ids,
            None => g.edges.keys().map(|id| id.as_ref().to_string()).collect(),
        };

        let mut first_err = None;
        for id in &targets {
            if let Err(e) = g.set_edge_style(id, &patch) {
                warn!("dropping arc highlight: {e}");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn highlight_nodes(
        &mut self,
        g: &mut Graph,
        node_ids: &[String],
        colour: String,
    ) -> Result<(), VizError> {
        let patch = NodeStylePatch {
            stroke: Some(colour),
            stroke_width: Some(NODE_HIGHLIGHT_STROKE_WIDTH),
            ..Default::default()
        };

        let mut first_err = None;
        for id in node_ids {
            if let Err(e) = g.set_node_style(id, &patch) {
                warn!("dropping node highlight: {e}");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn set_domains(
        &mut self,
        g: &mut Graph,
        node_ids: Vec<String>,
        domains: Vec<Vec<String>>,
    ) -> Result<(), VizError> {
        // Positional pairing: a length mismatch rejects the whole message
        // before any domain changes
        if node_ids.len() != domains.len() {
            return Err(VizError::ProtocolShape(format!(
                "setDomains pairs {} node id(s) with {} domain(s)",
                node_ids.len(),
                domains.len()
            )));
        }

        let mut first_err = None;
        for (id, domain) in node_ids.iter().zip(domains) {
            if let Err(e) = g.set_domain(id, domain) {
                warn!("dropping domain write: {e}");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Supplies the user's answer to the pending split: a subset of the
    /// offered domain, or `None` to let the controller pick its default.
    /// Queued messages drain afterwards (stopping again if one of them is
    /// itself a split request).
    pub fn resolve_split(
        &mut self,
        g: &mut Graph,
        choice: Option<Vec<String>>,
    ) -> Result<(), VizError> {
        if self.pending_split.take().is_none() {
            return Err(VizError::NoSplitPending);
        }
        self.outbound
            .push_back(OutboundEvent::DomainSplitReply { domain: choice });

        while self.pending_split.is_none() {
            let Some(event) = self.deferred.pop_front() else {
                break;
            };
            if let Err(e) = self.apply(g, event) {
                warn!("dropping deferred message: {e}");
            }
        }
        Ok(())
    }

    /// The domain offered by an unanswered `ChooseDomainSplit`, if any.
    pub fn pending_split(&self) -> Option<&[String]> {
        self.pending_split.as_deref()
    }

    /// First-display bootstrap: emits `InitialRender` and paints every edge
    /// with the default highlight. Subsequent calls are no-ops until
    /// [`Dispatcher::reset`] — re-rendering the same logical view instance
    /// must not repeat the bootstrap.
    pub fn bootstrap(&mut self, g: &mut Graph) -> bool {
        if self.previously_rendered {
            return false;
        }
        self.previously_rendered = true;

        let patch = EdgeStylePatch {
            stroke: Some(BOOTSTRAP_COLOUR.to_string()),
            stroke_width: Some(ARC_STROKE_NORMAL),
            ..Default::default()
        };
        for edge in g.edges.values_mut() {
            edge.styles.apply(&patch);
        }
        self.outbound.push_back(OutboundEvent::InitialRender);
        true
    }

    pub fn previously_rendered(&self) -> bool {
        self.previously_rendered
    }

    /// Queues an outbound notification (used by the gesture handlers).
    pub fn emit(&mut self, event: OutboundEvent) {
        self.outbound.push_back(event);
    }

    /// Drains everything queued for the controller.
    pub fn take_outbound(&mut self) -> Vec<OutboundEvent> {
        self.outbound.drain(..).collect()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the dispatcher to its just-constructed state. Only an
    /// explicit reset clears the bootstrap flag.
    pub fn reset(&mut self) {
        *self = Dispatcher::default();
    }
}
