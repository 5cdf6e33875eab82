//! Reverse dependency graph over layout families.

use std::collections::{BTreeMap, BTreeSet};

use layoutbind_common::LayoutName;
use layoutbind_store::DependencyLog;

/// Edges of a [`DependencyLog`] turned around: for each family, the families that
/// depend on it.
///
/// Edges whose target no longer names anything known are dropped when the graph
/// is built, so they can neither seed nor carry invalidation.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependents: BTreeMap<LayoutName, BTreeSet<LayoutName>>,
    dangling: BTreeSet<(LayoutName, LayoutName)>,
}

impl DependencyGraph {
    /// Builds the reverse graph of `log`, keeping only edges whose target satisfies
    /// `known`.
    pub fn build(log: &DependencyLog, known: impl Fn(&str) -> bool) -> Self {
        let mut graph = Self::default();
        for (from, to) in log.edges() {
            if known(to.as_str()) {
                graph
                    .dependents
                    .entry(to.clone())
                    .or_default()
                    .insert(from.clone());
            } else {
                graph.dangling.insert((from.clone(), to.clone()));
            }
        }
        graph
    }

    /// Families with a live edge to `name`.
    pub fn dependents_of(&self, name: &str) -> impl Iterator<Item = &LayoutName> {
        self.dependents.get(name).into_iter().flatten()
    }

    /// Returns `true` if the edge `from -> to` was dropped as dangling.
    pub fn is_dangling(&self, from: &str, to: &str) -> bool {
        self.dangling.contains(&(from.to_string(), to.to_string()))
    }

    /// Number of dropped edges.
    pub fn dangling_count(&self) -> usize {
        self.dangling.len()
    }

    /// Every family reachable from `seeds` by following edges backwards, seeds
    /// included. Terminates on cycles.
    pub fn invalidation_closure(
        &self,
        seeds: impl IntoIterator<Item = LayoutName>,
    ) -> BTreeSet<LayoutName> {
        let mut closure = BTreeSet::new();
        let mut worklist: Vec<LayoutName> = seeds.into_iter().collect();

        while let Some(name) = worklist.pop() {
            if !closure.insert(name.clone()) {
                continue;
            }
            for dependent in self.dependents_of(&name) {
                if !closure.contains(dependent) {
                    worklist.push(dependent.clone());
                }
            }
        }
        closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<LayoutName> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn log_with(edges: &[(&str, &str)]) -> DependencyLog {
        let mut log = DependencyLog::new();
        for (from, to) in edges {
            log.add_dependency(*from, *to);
        }
        log
    }

    #[test]
    fn closure_follows_edges_backwards() {
        let log = log_with(&[("a", "b"), ("b", "c"), ("d", "e")]);
        let graph = DependencyGraph::build(&log, |_| true);
        assert_eq!(graph.invalidation_closure(set(&["c"])), set(&["a", "b", "c"]));
        assert_eq!(graph.invalidation_closure(set(&["a"])), set(&["a"]));
        assert_eq!(graph.invalidation_closure(set(&["e"])), set(&["d", "e"]));
    }

    #[test]
    fn closure_terminates_on_cycles() {
        let log = log_with(&[("a", "b"), ("b", "a"), ("c", "c"), ("x", "a")]);
        let graph = DependencyGraph::build(&log, |_| true);
        assert_eq!(graph.invalidation_closure(set(&["a"])), set(&["a", "b", "x"]));
        assert_eq!(graph.invalidation_closure(set(&["c"])), set(&["c"]));
    }

    #[test]
    fn empty_seeds_give_empty_closure() {
        let graph = DependencyGraph::build(&log_with(&[("a", "b")]), |_| true);
        assert!(graph.invalidation_closure(Vec::new()).is_empty());
    }

    #[test]
    fn dangling_edges_do_not_propagate() {
        let log = log_with(&[("a", "ghost"), ("b", "c")]);
        let graph = DependencyGraph::build(&log, |name| name != "ghost");
        assert_eq!(graph.dangling_count(), 1);
        assert!(graph.is_dangling("a", "ghost"));
        assert!(!graph.is_dangling("b", "c"));
        assert_eq!(graph.invalidation_closure(set(&["ghost"])), set(&["ghost"]));
        assert_eq!(graph.dependents_of("c").count(), 1);
    }
}
