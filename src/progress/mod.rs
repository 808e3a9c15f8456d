mod tracker;

pub use tracker::{ChildProgressTracker, ProgressCallback, ProgressTracker};
