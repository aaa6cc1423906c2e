use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to read run state from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write run state to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
