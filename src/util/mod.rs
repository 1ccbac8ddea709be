//! Shared utilities.

pub mod proc;
