//! Core types: descriptors, invocation output, and the error taxonomy.

pub mod content;
pub mod error;
pub mod tool;
