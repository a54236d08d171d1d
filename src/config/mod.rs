// src/config/mod.rs
pub mod consts;
pub mod options;
pub mod taxonomy;

pub use options::{Job, Layout, Markers, Naming, RowPattern};
pub use taxonomy::{PartitionSpec, Taxonomy};
