//! LLM provider implementations for Copymill.
//!
//! All providers implement the `copymill_core::Provider` trait. The
//! pipeline holds a `dyn Provider` and never knows which backend is
//! configured.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
