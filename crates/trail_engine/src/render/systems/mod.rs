//! Rendering systems

pub mod chain;
