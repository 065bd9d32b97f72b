//! Chat completion providers

pub mod openai;

pub use openai::ChatClient;
