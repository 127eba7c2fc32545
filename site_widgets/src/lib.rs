//! # Site widgets
//!
//! A small element tree with document-scope click delegation, and the
//! listener that toggles `<details>` widgets without the default scroll.

pub mod disclosure;
pub mod dom;
pub mod events;

// Convenience re-exports
pub use disclosure::{install_disclosure_toggle, DisclosureToggle};
pub use dom::{Document, DomError, NodeId};
pub use events::{DispatchOutcome, Event, EventDispatcher, EventKind, EventListener, SideEffect};

pub mod prelude {
    pub use crate::disclosure::{
        disclosure_container, install_disclosure_toggle, is_open, toggle_open, DisclosureToggle,
    };
    pub use crate::dom::{Document, DomError, NodeId};
    pub use crate::events::{
        DispatchOutcome, Event, EventDispatcher, EventKind, EventListener, SideEffect,
    };
}
