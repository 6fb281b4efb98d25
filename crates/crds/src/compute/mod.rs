//! Compute CRDs

pub mod network;

pub use network::*;
