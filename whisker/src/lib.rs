//! The whisker binary: entry point, tracing setup, and the command tree
//! for the bundled terminal tools.

#![deny(missing_docs)]

mod entry;
mod events;
mod productinfo;
pub mod tree;

pub use entry::run;
pub use productinfo::{PRODUCT_NAME, PRODUCT_VERSION};
