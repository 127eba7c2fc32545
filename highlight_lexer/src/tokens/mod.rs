//! Token model for highlighting
//!
//! A scan turns source text into a [`TokenStream`]: every byte of the input
//! belongs to exactly one [`Token`], and each token carries a
//! [`TokenCategory`] that formatters map to CSS classes.

pub mod category;
pub mod token;
pub mod token_stream;

pub use category::{TokenCategory, UnknownCategory};
pub use token::Token;
pub use token_stream::TokenStream;
