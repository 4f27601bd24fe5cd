//! Dependency graph and longest-path leveling
//!
//! Nodes are the shapes of one layout pass, edges come from connectors.
//! Levels are assigned with Kahn's algorithm: a node's level is one more than
//! the highest level among the predecessors processed before it. Nodes caught
//! in a cycle are never dequeued; they keep whatever level their processed
//! predecessors gave them, or 0 if none did.

use std::collections::{HashMap, VecDeque};

/// Directed graph over node keys, in declaration order
#[derive(Debug, Clone, Default)]
pub struct LevelGraph {
    index: HashMap<String, usize>,
    successors: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl LevelGraph {
    /// Create a graph with one node per key
    ///
    /// Nodes without a key take part in leveling but cannot be an edge
    /// endpoint.
    pub fn new<'a>(keys: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut graph = Self::default();
        for (i, key) in keys.into_iter().enumerate() {
            if let Some(key) = key {
                graph.index.entry(key.to_string()).or_insert(i);
            }
            graph.successors.push(Vec::new());
            graph.in_degree.push(0);
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    /// Add an edge; edges naming keys outside the graph are ignored
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&f), Some(&t)) => {
                self.successors[f].push(t);
                self.in_degree[t] += 1;
                true
            }
            _ => false,
        }
    }

    /// Level of every node, in node order
    pub fn levels(&self) -> Vec<usize> {
        let mut in_degree = self.in_degree.clone();
        let mut levels: Vec<Option<usize>> = vec![None; self.len()];
        let mut queue = VecDeque::new();

        for (node, degree) in in_degree.iter().enumerate() {
            if *degree == 0 {
                levels[node] = Some(0);
                queue.push_back(node);
            }
        }

        while let Some(current) = queue.pop_front() {
            let next_level = levels[current].unwrap_or(0) + 1;
            for &next in &self.successors[current] {
                if levels[next].map_or(true, |level| level < next_level) {
                    levels[next] = Some(next_level);
                }
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        levels.into_iter().map(|level| level.unwrap_or(0)).collect()
    }
}
