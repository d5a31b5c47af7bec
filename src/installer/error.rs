use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("empty command")]
    EmptyCommand,

    #[error("no write permission for {}", path.display())]
    WritePermission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed")]
    Prompt(#[from] dialoguer::Error),
}
