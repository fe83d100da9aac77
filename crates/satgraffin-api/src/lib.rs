//! satgraffin-api: Wire contract and HTTP client for the SatGraffin backend
//!
//! This crate defines the request/response shapes exchanged with the
//! retrieval-augmented backend and a reqwest-based client that performs
//! one request/response cycle per call.

pub mod client;
pub mod error;
pub mod types;

pub use client::{Backend, QueryClient};
pub use error::{Error, Result};
pub use types::{QueryRequest, QueryResponse};
