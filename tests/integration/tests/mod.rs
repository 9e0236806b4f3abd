//! Integration test modules

mod api;
mod concurrency;
mod forwarding;
