//! Core identifiers, status codes, and error types for the Strata memory runtime.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the rest of the workspace: allocation tags, backing
//! region identities, the unified [`Status`] value, and the allocation error
//! type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod status;

pub use error::AllocError;
pub use id::{Addr, AllocTag, RegionId};
pub use status::{Status, StatusOrigin};
