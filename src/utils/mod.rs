//! Utility helpers shared across the pipeline.

pub mod cancel;

pub use cancel::{CancelHandle, run_cancellable};
