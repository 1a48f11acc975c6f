//! Minimal note-taking HTTP service.
//!
//! Notes are created with a POST and read back by uuid with a GET. Storage
//! is pluggable: see [`store`] for the backends and the contract they share.

pub mod api;
pub mod config;
pub mod logging;
pub mod store;
