//! Transform adapters from upstream API shapes into lookup-facing models.

pub(crate) mod medicine;
