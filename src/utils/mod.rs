//! Internal utility helpers for query escaping and serde helpers.

pub(crate) mod query;
pub(crate) mod serde;
