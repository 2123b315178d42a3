pub mod activity;
pub mod aggregate;
pub mod classify;
pub mod error;
pub mod identity;
pub mod paginate;
pub mod pipeline;
pub mod sampling;
pub mod source;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{FailureKind, PipelineError};
pub use pipeline::{PipelineSettings, RepoPipeline};
pub use source::RepoSource;
