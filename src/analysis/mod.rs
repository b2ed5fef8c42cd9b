//! Read-only analysis over a validated dataset.
//!
//! Every function here borrows the record slice; nothing mutates the
//! canonical dataset produced by ingestion.

pub mod engagement;
pub mod keywords;
pub mod sentiment;
