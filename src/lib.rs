//! Loader, validator, and query layer for analyzer rule-settings documents.
//!
//! A settings document names the rules an external static-analysis tool
//! should run (`Rules`, each with `Enable` and optional scalar `Options`)
//! and the rules it must never run (`ExcludeRules`). This crate parses that
//! document into a typed model, answers effective-enablement queries, and
//! lints it for conflicts the format itself cannot reject.

pub mod check;
pub mod cli;
pub mod config;
pub mod document;
pub mod lint;
pub mod staged;
