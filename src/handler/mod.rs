//! Request handler module
//!
//! Routes requests to the slides API or to one of the two file trees.

pub mod router;
pub mod static_files;

pub use router::handle_request;
