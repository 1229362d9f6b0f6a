/// Construction options for a [`Tst`](crate::Tst).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Number of nodes to reserve up front. A key of length `n` needs at most
    /// `n` new nodes.
    pub node_capacity: usize,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_capacity(mut self, node_capacity: usize) -> Self {
        self.node_capacity = node_capacity;
        self
    }
}
