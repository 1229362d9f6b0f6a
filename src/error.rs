use thiserror::Error;

/// Errors reported by the checked trie operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("key must not be empty")]
    EmptyKey,
    #[error("node arena exhausted at {nodes} nodes")]
    ArenaExhausted { nodes: usize },
    #[error("invalid direction `{0}`, expected `forward` or `reversed`")]
    InvalidDirection(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
