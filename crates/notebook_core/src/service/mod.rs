//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate persisted collections into note/tag use-cases.
//! - Keep CLI and other front ends decoupled from slot storage details.

pub mod listing;
pub mod notebook;
