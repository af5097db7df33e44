use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to launch '{service}' ({command}): {source}")]
    Launch {
        service: String,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("service '{0}' has an empty command")]
    EmptyCommand(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
