//! CLI command implementations

mod compare;
mod index;

pub use compare::cmd_compare;
pub use index::{cmd_index, IndexArgs};

use census_core::errors::CensusErrorCode;

/// Carry a library error to the binary edge as `[CODE] message`.
pub(crate) fn coded<E: CensusErrorCode + std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!(e.coded_message())
}
