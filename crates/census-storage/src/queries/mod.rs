//! Query modules for each table of the index schema.

pub mod util;
pub mod scan_meta;
pub mod files;
pub mod compare;
