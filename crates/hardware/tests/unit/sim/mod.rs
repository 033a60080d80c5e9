//! Trace loading and replay tests.

pub mod replay;
