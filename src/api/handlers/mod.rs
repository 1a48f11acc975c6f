//! HTTP handlers.

mod notes;

#[cfg(test)]
mod notes_test;

pub use notes::*;
