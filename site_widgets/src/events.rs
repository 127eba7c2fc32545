// src/events.rs
//! Document-scope event delegation
//!
//! Listeners are registered once on the dispatcher and see every event of
//! their kind, whatever the target. After all listeners have run, the
//! built-in default action runs unless a listener prevented it.

use crate::disclosure;
use crate::dom::{Document, DomError, NodeId};
use highlight_lexer::log_debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Click,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    target: NodeId,
    default_prevented: bool,
}

impl Event {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            default_prevented: false,
        }
    }

    pub fn click(target: NodeId) -> Self {
        Self::new(EventKind::Click, target)
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Observable effects of a default action beyond attribute changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SideEffect {
    ScrollIntoView { node: NodeId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub listeners_run: usize,
    pub side_effects: Vec<SideEffect>,
}

pub trait EventListener {
    fn name(&self) -> &str;

    fn handle_event(&self, document: &mut Document, event: &mut Event);
}

impl<F> EventListener for F
where
    F: Fn(&mut Document, &mut Event),
{
    fn name(&self) -> &str {
        "anonymous"
    }

    fn handle_event(&self, document: &mut Document, event: &mut Event) {
        self(document, event)
    }
}

#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<(EventKind, Box<dyn EventListener>)>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<L>(&mut self, kind: EventKind, listener: L)
    where
        L: EventListener + 'static,
    {
        log_debug!("Listener registered",
            "kind" => kind.as_str(),
            "listener" => listener.name()
        );
        self.listeners.push((kind, Box::new(listener)));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listener_names(&self) -> Vec<&str> {
        self.listeners.iter().map(|(_, l)| l.name()).collect()
    }

    /// Run matching listeners in registration order, then the default action
    pub fn dispatch(
        &self,
        document: &mut Document,
        mut event: Event,
    ) -> Result<DispatchOutcome, DomError> {
        if !document.contains(event.target()) {
            return Err(DomError::UnknownNode {
                id: event.target(),
            });
        }

        let mut outcome = DispatchOutcome::default();
        for (kind, listener) in &self.listeners {
            if *kind == event.kind() {
                listener.handle_event(document, &mut event);
                outcome.listeners_run += 1;
            }
        }

        outcome.default_prevented = event.default_prevented();
        if !outcome.default_prevented {
            outcome.side_effects = default_action(document, &event)?;
        }
        Ok(outcome)
    }
}

/// What the document does on its own when nothing prevents it.
///
/// Only a click whose target is the summary itself toggles. Browsers also
/// toggle for clicks on elements inside the summary; this model leaves
/// those alone.
fn default_action(document: &mut Document, event: &Event) -> Result<Vec<SideEffect>, DomError> {
    match event.kind() {
        EventKind::Click => {
            let Some(details) = disclosure::disclosure_container(document, event.target()) else {
                return Ok(Vec::new());
            };
            let open = disclosure::toggle_open(document, details)?;
            log_debug!("Default disclosure toggle",
                "node" => details,
                "open" => open
            );
            Ok(vec![SideEffect::ScrollIntoView { node: details }])
        }
    }
}
