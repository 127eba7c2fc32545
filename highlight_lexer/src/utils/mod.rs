//! Shared source-location primitives

pub mod span;

pub use span::{Position, Span};
