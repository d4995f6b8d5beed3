//! Library crate for host-scan-rs exposing the scan engine and its collaborators.
pub mod error;
pub mod logging;
pub mod probe;
pub mod report;
pub mod scanner;
pub mod target;
pub mod types;
