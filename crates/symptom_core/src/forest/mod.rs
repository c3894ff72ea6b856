//! Random-forest classification model
//!
//! Flat-array decision trees and the majority-vote ensemble that the
//! trainer produces and the predictor consumes.

pub mod model;
pub mod tree;

pub use model::{ForestMetadata, ForestModel, FORMAT_VERSION};
pub use tree::{Node, Tree};
