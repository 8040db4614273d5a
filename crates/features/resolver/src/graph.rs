use fxhash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;

/// Reachability over token identifiers: base → generated ∪ affected tokens.
///
/// Carries no values and is only consulted for cycle detection. Edges are
/// append-only; re-registering a relationship adds edges but never removes any.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    edges: RwLock<FxHashMap<String, Vec<String>>>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `from → target` for every target not already present.
    pub fn add_edges<'a>(&self, from: &str, targets: impl IntoIterator<Item = &'a str>) {
        let mut edges = self.edges.write();
        let successors = edges.entry(from.to_owned()).or_default();
        for target in targets {
            if !successors.iter().any(|s| s == target) {
                successors.push(target.to_owned());
            }
        }
    }

    /// Direct successors in insertion order.
    #[must_use]
    pub fn successors(&self, token: &str) -> Vec<String> {
        self.edges.read().get(token).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.read().values().map(Vec::len).sum()
    }

    /// Path `start → … → start` when `start` can reach itself.
    ///
    /// Iterative depth-first search with a visited set local to this call, so
    /// the graph depth never touches the call stack.
    #[must_use]
    pub fn find_cycle(&self, start: &str) -> Option<Vec<String>> {
        let edges = self.edges.read();
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        visited.insert(start);

        while let Some(&(node, cursor)) = stack.last() {
            let next = edges.get(node).and_then(|successors| successors.get(cursor));
            let Some(child) = next.map(String::as_str) else {
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            if child == start {
                let mut path: Vec<String> = stack.iter().map(|(n, _)| (*n).to_owned()).collect();
                path.push(start.to_owned());
                return Some(path);
            }
            if visited.insert(child) {
                stack.push((child, 0));
            }
        }

        None
    }

    #[must_use]
    pub fn has_cycle(&self, start: &str) -> bool {
        self.find_cycle(start).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_two_node_cycle_path() {
        let graph = DependencyGraph::new();
        graph.add_edges("a", ["b"]);
        graph.add_edges("b", ["a"]);
        assert_eq!(graph.find_cycle("a").unwrap(), ["a", "b", "a"]);
        assert_eq!(graph.find_cycle("b").unwrap(), ["b", "a", "b"]);
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let graph = DependencyGraph::new();
        graph.add_edges("a", ["b", "c"]);
        graph.add_edges("b", ["d"]);
        graph.add_edges("c", ["d"]);
        assert!(!graph.has_cycle("a"));
    }

    #[test]
    fn cycle_not_through_start_is_ignored() {
        let graph = DependencyGraph::new();
        graph.add_edges("a", ["b"]);
        graph.add_edges("b", ["c"]);
        graph.add_edges("c", ["b"]);
        assert!(!graph.has_cycle("a"));
        assert!(graph.has_cycle("b"));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let graph = DependencyGraph::new();
        graph.add_edges("a", ["a"]);
        assert_eq!(graph.find_cycle("a").unwrap(), ["a", "a"]);
    }

    #[test]
    fn edges_are_deduplicated_and_never_pruned() {
        let graph = DependencyGraph::new();
        graph.add_edges("a", ["b", "c"]);
        graph.add_edges("a", ["b"]);
        assert_eq!(graph.successors("a"), ["b", "c"]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let graph = DependencyGraph::new();
        let names: Vec<String> = (0..50_000).map(|i| format!("t{i}")).collect();
        for pair in names.windows(2) {
            graph.add_edges(&pair[0], [pair[1].as_str()]);
        }
        assert!(!graph.has_cycle("t0"));

        graph.add_edges("t49999", ["t0"]);
        assert_eq!(graph.find_cycle("t0").map(|p| p.len()), Some(50_001));
    }
}
