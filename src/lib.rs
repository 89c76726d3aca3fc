#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod cli;
pub mod error;
pub mod server;

mod entities;
mod render;
mod sources;
mod transform;
mod utils;

pub use entities::catalog::{CatalogEntry, Quote, StaticData};
pub use entities::history::{HISTORY_CAPACITY, SearchHistory};
pub use entities::medicine::{LabelLookup, MedicineInfo, lookup, resolve};
