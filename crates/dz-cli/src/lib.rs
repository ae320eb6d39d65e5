//! CLI library components for DataZen.

#![allow(missing_docs)]

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod render;
