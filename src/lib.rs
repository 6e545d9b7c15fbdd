//! Reactive to-do list store: ordered lists of checkable items with
//! single-level undo, filtered/sorted projections and autocomplete, over an
//! in-memory or plain-text repository.

pub mod cli;
pub mod io;
pub mod logging;
pub mod model;
pub mod parse;
pub mod repo;
pub mod store;
