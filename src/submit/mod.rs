//! Document submission over the rate gate.

mod document;
mod submitter;

pub use document::{Description, Document, Product};
pub use submitter::DocumentSubmitter;
