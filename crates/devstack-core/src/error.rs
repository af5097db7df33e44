use thiserror::Error;

#[derive(Debug, Error)]
pub enum DevstackError {
    #[error("not a devstack project: no devstack.yaml found (run 'devstack init')")]
    NotInitialized,

    #[error("config already exists at {0} (use --force to overwrite)")]
    ConfigExists(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, DevstackError>;
