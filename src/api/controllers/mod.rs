//! # API Controllers Module
//!
//! Handles HTTP endpoints for the relayer service API.

pub mod relayer;
