use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoLensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),
}
