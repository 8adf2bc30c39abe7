use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("An arena of size {size} cannot hold {obstacles} obstacle(s) and two robots")]
    Crowded { size: usize, obstacles: usize },

    #[error("{path}: {count} error(s)")]
    Script { path: String, count: usize },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
