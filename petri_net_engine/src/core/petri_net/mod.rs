//! Petri net
pub(crate) mod error;
#[cfg(feature = "incidence-matrix")]
pub mod incidence;
pub mod macros;
pub(crate) mod options;
pub(crate) mod petri_net_struct;
pub use error::*;
pub use options::*;
pub use petri_net_struct::*;
