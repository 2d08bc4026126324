//! Domain layer for the slotwise booking service.
//!
//! This crate holds everything that is independent of storage and transport:
//! the wire-visible models, the error taxonomy, the rule resolver that
//! derives a slot's effective configuration from its override layers, and
//! the window layout used by slot generation. The database and API crates
//! both build on these definitions so that listing and admission can never
//! disagree about what a slot's effective configuration is.

pub mod errors;
pub mod generation;
pub mod models;
pub mod notify;
pub mod resolver;
