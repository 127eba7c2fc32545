// src/disclosure.rs
//! Manual toggling for `<details>`/`<summary>` widgets
//!
//! The default toggle scrolls the widget into view. The listener here takes
//! over clicks on a summary whose parent is a details element, prevents the
//! default and flips `open` itself.

use crate::dom::{Document, DomError, NodeId};
use crate::events::{Event, EventDispatcher, EventKind, EventListener};
use highlight_lexer::logging::codes;
use highlight_lexer::{log_debug, log_success};

pub const SUMMARY_TAG: &str = "SUMMARY";
pub const DETAILS_TAG: &str = "DETAILS";
pub const OPEN_ATTRIBUTE: &str = "open";

/// The details element controlled by a click on `target`, if any
pub fn disclosure_container(document: &Document, target: NodeId) -> Option<NodeId> {
    if document.tag_name(target)? != SUMMARY_TAG {
        return None;
    }
    let parent = document.parent_element(target)?;
    (document.tag_name(parent)? == DETAILS_TAG).then_some(parent)
}

pub fn is_open(document: &Document, details: NodeId) -> bool {
    document.has_attribute(details, OPEN_ATTRIBUTE)
}

/// Flip `open` and return the new state
pub fn toggle_open(document: &mut Document, details: NodeId) -> Result<bool, DomError> {
    if document.remove_attribute(details, OPEN_ATTRIBUTE)? {
        Ok(false)
    } else {
        document.set_attribute(details, OPEN_ATTRIBUTE, OPEN_ATTRIBUTE)?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisclosureToggle;

impl EventListener for DisclosureToggle {
    fn name(&self) -> &str {
        "disclosure-toggle"
    }

    fn handle_event(&self, document: &mut Document, event: &mut Event) {
        if event.kind() != EventKind::Click {
            return;
        }
        let Some(details) = disclosure_container(document, event.target()) else {
            log_debug!("Click outside a disclosure summary", "target" => event.target());
            return;
        };

        event.prevent_default();
        match toggle_open(document, details) {
            Ok(open) => log_success!(codes::success::DISCLOSURE_TOGGLED, "Disclosure toggled",
                "node" => details,
                "open" => open
            ),
            Err(error) => highlight_lexer::logging::safe_log_error(
                codes::system::INTERNAL_ERROR,
                &error.to_string(),
            ),
        }
    }
}

pub fn install_disclosure_toggle(dispatcher: &mut EventDispatcher) {
    dispatcher.add_listener(EventKind::Click, DisclosureToggle);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(doc: &mut Document) -> (NodeId, NodeId) {
        let details = doc.append_element(doc.document_element(), "details").unwrap();
        let summary = doc.append_element(details, "summary").unwrap();
        (details, summary)
    }

    #[test]
    fn test_disclosure_container() {
        let mut doc = Document::new();
        let (details, summary) = widget(&mut doc);
        let body = doc.append_element(details, "p").unwrap();

        assert_eq!(disclosure_container(&doc, summary), Some(details));
        assert_eq!(disclosure_container(&doc, details), None);
        assert_eq!(disclosure_container(&doc, body), None);
    }

    #[test]
    fn test_orphan_summary() {
        let mut doc = Document::new();
        let summary = doc.create_element("summary").unwrap();
        assert_eq!(disclosure_container(&doc, summary), None);

        let div = doc.append_element(doc.document_element(), "div").unwrap();
        doc.append_child(div, summary).unwrap();
        assert_eq!(disclosure_container(&doc, summary), None);
    }

    #[test]
    fn test_toggle_open_sets_open_value() {
        let mut doc = Document::new();
        let (details, _) = widget(&mut doc);

        assert!(toggle_open(&mut doc, details).unwrap());
        assert_eq!(doc.get_attribute(details, OPEN_ATTRIBUTE), Some("open"));
        assert!(!toggle_open(&mut doc, details).unwrap());
        assert!(!is_open(&doc, details));
    }

    #[test]
    fn test_listener_prevents_default() {
        let mut doc = Document::new();
        let (details, summary) = widget(&mut doc);
        let mut event = Event::click(summary);

        DisclosureToggle.handle_event(&mut doc, &mut event);
        assert!(event.default_prevented());
        assert!(is_open(&doc, details));
    }

    #[test]
    fn test_install() {
        let mut dispatcher = EventDispatcher::new();
        install_disclosure_toggle(&mut dispatcher);
        assert_eq!(dispatcher.listener_names(), vec!["disclosure-toggle"]);
    }
}
