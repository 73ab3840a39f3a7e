//! # External Collaborators
//!
//! Trait seams for the two managed services the connector talks to, plus their
//! concrete clients. The orchestrator only ever sees the traits.

pub mod analysis;
pub mod store;
