//! Lookup, history, and static-data workflows shared by the CLI and web server.

pub(crate) mod catalog;
pub(crate) mod history;
pub(crate) mod medicine;
