//! Per-snapshot call graph store
//!
//! Holds canonical edges between procedure signatures with attached
//! branch-condition annotations, plus a declaring-type membership index.
//! Lifecycle is two-phase: populate with `add_edge`, run
//! `expand_constructors` once, then read-only for the rest of the pass.
//! There is no lock; the engine is single-threaded by design.

use std::collections::{BTreeSet, VecDeque};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::shared::models::signature;
use crate::shared::models::ApiLevel;

/// Call graph for one platform snapshot
///
/// Nodes are procedure signatures, edge weights are the branch-condition
/// strings observed on paths to the call site. Edge identity is canonical:
/// repeated requests for the same `(source, target)` pair return the same
/// edge.
#[derive(Debug, Clone)]
pub struct CallGraphStore {
    api_level: ApiLevel,
    graph: DiGraph<String, Vec<String>>,
    nodes: FxHashMap<String, NodeIndex>,
    /// Declaring type -> non-constructor member procedure signatures
    members: FxHashMap<String, BTreeSet<String>>,
    expanded: bool,
}

impl CallGraphStore {
    /// Create an empty store for one snapshot
    pub fn new(api_level: ApiLevel) -> Self {
        Self {
            api_level,
            graph: DiGraph::new(),
            nodes: FxHashMap::default(),
            members: FxHashMap::default(),
            expanded: false,
        }
    }

    /// Snapshot this store belongs to
    pub fn api_level(&self) -> ApiLevel {
        self.api_level
    }

    fn node(&mut self, sig: &str) -> NodeIndex {
        if let Some(idx) = self.nodes.get(sig) {
            return *idx;
        }
        let idx = self.graph.add_node(sig.to_string());
        self.nodes.insert(sig.to_string(), idx);
        idx
    }

    /// Canonical edge factory. Rejects empty signatures and self-edges;
    /// repeated calls for the same pair return the same edge.
    pub fn get_edge(&mut self, source: &str, target: &str) -> Option<EdgeIndex> {
        if source.is_empty() || target.is_empty() || source == target {
            return None;
        }
        let src = self.node(source);
        let tgt = self.node(target);
        if let Some(existing) = self.graph.find_edge(src, tgt) {
            return Some(existing);
        }
        Some(self.graph.add_edge(src, tgt, Vec::new()))
    }

    /// Index an edge under both endpoints, append its branch conditions and
    /// record class membership for each endpoint's declaring type.
    /// Constructors are skipped for membership indexing; they are handled
    /// separately by `expand_constructors`.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        conditions: &[String],
    ) -> Option<EdgeIndex> {
        let edge = self.get_edge(source, target)?;
        let weight = &mut self.graph[edge];
        for condition in conditions {
            if !condition.is_empty() && !weight.contains(condition) {
                weight.push(condition.clone());
            }
        }
        for sig in [source, target] {
            if !signature::is_constructor(sig) {
                self.members
                    .entry(signature::declaring_type(sig).to_string())
                    .or_default()
                    .insert(sig.to_string());
            }
        }
        Some(edge)
    }

    /// Branch conditions attached to an edge
    pub fn conditions(&self, edge: EdgeIndex) -> &[String] {
        &self.graph[edge]
    }

    /// Source and target signatures of an edge
    pub fn endpoints(&self, edge: EdgeIndex) -> Option<(&str, &str)> {
        let (src, tgt) = self.graph.edge_endpoints(edge)?;
        Some((self.graph[src].as_str(), self.graph[tgt].as_str()))
    }

    /// Non-constructor members recorded for a declaring type
    pub fn members_of(&self, declaring_type: &str) -> Option<&BTreeSet<String>> {
        self.members.get(declaring_type)
    }

    /// Class-membership query
    pub fn is_member(&self, declaring_type: &str, sig: &str) -> bool {
        self.members
            .get(declaring_type)
            .map_or(false, |set| set.contains(sig))
    }

    /// Number of edges currently interned
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Conservatively connect every constructor appearing as an edge target
    /// to every other member of its declaring type: any method may observe
    /// state set up by any constructor. Must run to completion before any
    /// traversal reads the store.
    pub fn expand_constructors(&mut self) {
        debug_assert!(!self.expanded, "expand_constructors runs once per store");
        let constructors: Vec<String> = self
            .graph
            .edge_references()
            .map(|e| self.graph[e.target()].clone())
            .filter(|sig| signature::is_constructor(sig))
            .collect();
        for ctor in constructors {
            let declaring = signature::declaring_type(&ctor).to_string();
            let members: Vec<String> = self
                .members
                .get(&declaring)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();
            for member in members {
                if member != ctor {
                    self.add_edge(&ctor, &member, &[]);
                }
            }
        }
        self.expanded = true;
        debug!(
            api_level = %self.api_level,
            edges = self.graph.edge_count(),
            "constructor expansion complete"
        );
    }

    /// Under what conditions can this procedure ever be reached: backward
    /// worklist over incoming edges with a visited-edge set to bound cycles,
    /// collecting every non-empty branch-condition annotation on the way.
    pub fn obtain_conditions(&self, sig: &str) -> Vec<String> {
        let mut collected = Vec::new();
        let Some(&start) = self.nodes.get(sig) else {
            return collected;
        };
        let mut worklist = VecDeque::from([start]);
        let mut visited_edges: FxHashSet<EdgeIndex> = FxHashSet::default();
        while let Some(node) = worklist.pop_front() {
            for edge in self.graph.edges_directed(node, Direction::Incoming) {
                if !visited_edges.insert(edge.id()) {
                    continue;
                }
                for condition in edge.weight() {
                    if !condition.is_empty() {
                        collected.push(condition.clone());
                    }
                }
                worklist.push_back(edge.source());
            }
        }
        collected
    }

    /// Indented text trace of the call chains reaching a procedure.
    /// Uses a visited-procedure set, so a procedure reachable via multiple
    /// chains is rendered only once. An explicit stack keeps arbitrarily
    /// deep caller chains off the call stack.
    pub fn obtain_call_stack(&self, sig: &str) -> String {
        let mut out = String::new();
        let Some(&start) = self.nodes.get(sig) else {
            return out;
        };
        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];
        while let Some((node, depth)) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            for _ in 0..depth {
                out.push_str("  ");
            }
            out.push_str(&self.graph[node]);
            out.push('\n');
            let callers: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .collect();
            for caller in callers.into_iter().rev() {
                stack.push((caller, depth + 1));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> CallGraphStore {
        CallGraphStore::new(ApiLevel(19))
    }

    #[test]
    fn test_get_edge_is_canonical() {
        let mut cg = store();
        let a = cg.get_edge("com.app.A#run", "com.app.B#step").unwrap();
        let b = cg.get_edge("com.app.A#run", "com.app.B#step").unwrap();
        assert_eq!(a, b);
        assert_eq!(cg.edge_count(), 1);
    }

    #[test]
    fn test_self_and_empty_edges_rejected() {
        let mut cg = store();
        assert!(cg.add_edge("com.app.A#run", "com.app.A#run", &[]).is_none());
        assert!(cg.add_edge("", "com.app.A#run", &[]).is_none());
        assert!(cg.add_edge("com.app.A#run", "", &[]).is_none());
        assert_eq!(cg.edge_count(), 0);
    }

    #[test]
    fn test_membership_skips_constructors() {
        let mut cg = store();
        cg.add_edge("com.app.A#run", "com.app.B#<init>", &[]);
        cg.add_edge("com.app.A#run", "com.app.B#step", &[]);
        assert!(cg.is_member("com.app.B", "com.app.B#step"));
        assert!(!cg.is_member("com.app.B", "com.app.B#<init>"));
        assert!(cg.is_member("com.app.A", "com.app.A#run"));
    }

    #[test]
    fn test_expand_constructors_links_all_members() {
        let mut cg = store();
        cg.add_edge("com.app.Main#run", "com.app.B#<init>", &[]);
        cg.add_edge("com.app.Main#run", "com.app.B#step", &[]);
        cg.add_edge("com.app.Other#go", "com.app.B#poll", &[]);
        cg.expand_constructors();

        let ctor_edges: Vec<EdgeIndex> = (0..cg.edge_count())
            .map(EdgeIndex::new)
            .filter(|e| {
                cg.endpoints(*e)
                    .map_or(false, |(s, _)| s == "com.app.B#<init>")
            })
            .collect();
        let targets: BTreeSet<&str> = ctor_edges
            .iter()
            .map(|e| cg.endpoints(*e).unwrap().1)
            .collect();
        assert_eq!(
            targets,
            BTreeSet::from(["com.app.B#poll", "com.app.B#step"])
        );
    }

    #[test]
    fn test_call_stack_renders_deep_caller_chains() {
        let mut cg = store();
        let sig = |i: usize| format!("com.app.C{}#step", i);
        for i in 0..2_048 {
            cg.add_edge(&sig(i), &sig(i + 1), &[]);
        }
        let stack = cg.obtain_call_stack(&sig(2_048));
        assert_eq!(stack.lines().count(), 2_049);
        assert!(stack.starts_with("com.app.C2048#step\n"));
    }

    #[test]
    fn test_call_stack_renders_shared_caller_once() {
        let mut cg = store();
        cg.add_edge("com.app.Main#run", "com.app.A#a", &[]);
        cg.add_edge("com.app.Main#run", "com.app.B#b", &[]);
        cg.add_edge("com.app.A#a", "com.app.Leaf#work", &[]);
        cg.add_edge("com.app.B#b", "com.app.Leaf#work", &[]);
        let stack = cg.obtain_call_stack("com.app.Leaf#work");
        assert_eq!(stack.matches("com.app.Main#run").count(), 1);
        assert_eq!(stack.matches("com.app.A#a").count(), 1);
        assert_eq!(stack.matches("com.app.B#b").count(), 1);
    }

    #[test]
    fn test_obtain_conditions_terminates_on_cycles() {
        let mut cg = store();
        let guard = "t.seconds() > 30".to_string();
        cg.add_edge("com.app.A#run", "com.app.B#step", &[guard.clone()]);
        cg.add_edge("com.app.B#step", "com.app.A#run", &["x == 1".to_string()]);
        let conditions = cg.obtain_conditions("com.app.B#step");
        assert!(conditions.contains(&guard));
        assert!(conditions.contains(&"x == 1".to_string()));
    }

    #[test]
    fn test_call_stack_is_indented() {
        let mut cg = store();
        cg.add_edge("com.app.Main#run", "com.app.Lib#helper", &[]);
        cg.add_edge("com.app.Lib#helper", "com.app.Leaf#work", &[]);
        let stack = cg.obtain_call_stack("com.app.Leaf#work");
        assert_eq!(
            stack,
            "com.app.Leaf#work\n  com.app.Lib#helper\n    com.app.Main#run\n"
        );
    }
}
