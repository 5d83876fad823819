//! Where export runs leave their output and import runs pick it up.
//!
//! The pipeline only talks to [`BundleStore`]; [`LocalStore`] keeps the
//! manifest and bundles in a plain directory.

mod local;
mod traits;

pub use local::LocalStore;
pub use traits::BundleStore;
