//! Etag engine for streaming content.
//!
//! - [`Engine`] - Stateful block-hash pipeline with `update()`/`finalize()` API
//! - [`EngineState`] - Lifecycle of one computation

mod pipeline;

pub use pipeline::{Engine, EngineState};
