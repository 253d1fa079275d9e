//! Heuristic parsing stages
//!
//! Each heuristic lives as an isolated, independently testable function so
//! its tunable constants stay swappable without touching the control flow
//! around it.

pub(crate) mod books;
pub(crate) mod classify;
pub(crate) mod extract;
pub(crate) mod verses;
