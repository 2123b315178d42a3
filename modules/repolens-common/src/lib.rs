pub mod types;
pub mod config;
pub mod error;
pub mod repo_ref;

pub use types::*;
pub use config::{Config, MAX_PAGE_SIZE};
pub use error::RepoLensError;
pub use repo_ref::RepoRef;
