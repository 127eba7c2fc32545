//! Built-in lexers

pub mod c_family;
pub mod custom_cpp;
pub mod plaintext;

pub use c_family::{C_TAG, CPP_TAG};
pub use plaintext::PLAINTEXT_TAG;
