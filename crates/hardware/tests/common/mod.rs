//! Shared helpers for prefetcher tests.


/// Cache probe implementations for tests.
pub mod mocks;
