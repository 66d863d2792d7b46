//! Product identity constants.

/// The product name, as invoked from a shell.
pub const PRODUCT_NAME: &str = "whisker";

/// The product version.
pub const PRODUCT_VERSION: &str = env!("CARGO_PKG_VERSION");
