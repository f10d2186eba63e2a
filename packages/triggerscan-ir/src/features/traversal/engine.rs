//! Direction-parameterized ICFG traversal
//!
//! A generic graph walker over the interprocedural control-flow graph.
//! Direction (forward over successors from entry points, backward over
//! predecessors from exit points) is supplied by two thin unit types; all
//! other logic is shared. A FIFO procedure worklist grows whenever a call
//! statement resolves to a not-yet-visited analyzable target; unresolved or
//! library targets simply contribute nothing.
//!
//! Visitor hook failures are isolated per procedure: the offending
//! procedure's walk is abandoned with a warning and the pass continues.

use std::collections::VecDeque;
use std::marker::PhantomData;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use super::color::NodeColor;
use crate::config::AnalysisConfig;
use crate::errors::Result;
use crate::shared::models::{ProcId, StatementKind, StmtId};
use crate::shared::ports::ProgramProvider;

/// Traversal direction: where roots come from and how to step
pub trait TraversalDirection {
    const NAME: &'static str;

    /// Traversal roots within one procedure
    fn extremities(provider: &dyn ProgramProvider, proc: ProcId) -> Vec<StmtId>;

    /// Next statements from one statement
    fn neighbors(provider: &dyn ProgramProvider, stmt: StmtId) -> Vec<StmtId>;
}

/// Entry points, successors
pub struct Forward;

impl TraversalDirection for Forward {
    const NAME: &'static str = "forward";

    fn extremities(provider: &dyn ProgramProvider, proc: ProcId) -> Vec<StmtId> {
        provider.entry_points(proc)
    }

    fn neighbors(provider: &dyn ProgramProvider, stmt: StmtId) -> Vec<StmtId> {
        provider.successors(stmt)
    }
}

/// Exit points, predecessors
pub struct Backward;

impl TraversalDirection for Backward {
    const NAME: &'static str = "backward";

    fn extremities(provider: &dyn ProgramProvider, proc: ProcId) -> Vec<StmtId> {
        provider.exit_points(proc)
    }

    fn neighbors(provider: &dyn ProgramProvider, stmt: StmtId) -> Vec<StmtId> {
        provider.predecessors(stmt)
    }
}

/// Statement hooks invoked by the walker
///
/// `path` is the live stack of statements from the current traversal root
/// down to (and including, for the `before`/`neighbor` hooks) the statement
/// at hand.
pub trait TraversalVisitor {
    fn process_node_before_neighbors(&mut self, _path: &[StmtId], _stmt: StmtId) -> Result<()> {
        Ok(())
    }

    fn process_neighbor(
        &mut self,
        _path: &[StmtId],
        _stmt: StmtId,
        _neighbor: StmtId,
    ) -> Result<()> {
        Ok(())
    }

    fn process_node_after_neighbors(&mut self, _path: &[StmtId], _stmt: StmtId) -> Result<()> {
        Ok(())
    }
}

/// Visitor that does nothing; useful for pure reachability walks
#[derive(Debug, Default)]
pub struct NullVisitor;

impl TraversalVisitor for NullVisitor {}

/// The ICFG walker
pub struct IcfgTraversal<'a, D: TraversalDirection, V: TraversalVisitor> {
    provider: &'a dyn ProgramProvider,
    config: &'a AnalysisConfig,
    visitor: V,
    worklist: VecDeque<ProcId>,
    visited: FxHashSet<ProcId>,
    colors: FxHashMap<StmtId, NodeColor>,
    path: Vec<StmtId>,
    steps: usize,
    budget_exhausted: bool,
    _direction: PhantomData<D>,
}

impl<'a, D: TraversalDirection, V: TraversalVisitor> IcfgTraversal<'a, D, V> {
    pub fn new(provider: &'a dyn ProgramProvider, config: &'a AnalysisConfig, visitor: V) -> Self {
        Self {
            provider,
            config,
            visitor,
            worklist: VecDeque::new(),
            visited: FxHashSet::default(),
            colors: FxHashMap::default(),
            path: Vec::new(),
            steps: 0,
            budget_exhausted: false,
            _direction: PhantomData,
        }
    }

    /// Walk the ICFG starting from `roots`, expanding the procedure
    /// worklist at call statements until it drains.
    pub fn traverse(&mut self, roots: impl IntoIterator<Item = ProcId>) {
        self.worklist.extend(roots);
        while let Some(proc) = self.worklist.pop_front() {
            if !self.visited.insert(proc) {
                continue;
            }
            debug!(
                procedure = self.provider.signature(proc),
                direction = D::NAME,
                "traversing procedure"
            );
            for root in D::extremities(self.provider, proc) {
                if let Err(err) = self.traverse_node(root) {
                    warn!(
                        procedure = self.provider.signature(proc),
                        %err,
                        "procedure traversal failed; continuing with next"
                    );
                    self.path.clear();
                }
            }
        }
    }

    /// Depth-first walk from one root, driven by an explicit action stack
    /// so walk depth is bounded by memory rather than the call stack.
    fn traverse_node(&mut self, root: StmtId) -> Result<()> {
        enum Action {
            Enter(StmtId),
            Neighbor(StmtId, StmtId),
            Exit(StmtId),
        }
        let mut actions = vec![Action::Enter(root)];
        while let Some(action) = actions.pop() {
            match action {
                Action::Enter(stmt) => {
                    if self.out_of_budget() {
                        continue;
                    }
                    // Grey = already on the current path (cycle back-edge),
                    // Black = fully processed. Either way: no-op. This gate
                    // is the termination guarantee for cyclic and recursive
                    // flow.
                    if self.color_of(stmt) != NodeColor::White {
                        continue;
                    }
                    self.colors.insert(stmt, NodeColor::Grey);
                    self.steps += 1;
                    self.path.push(stmt);
                    self.expand_calls(stmt);
                    self.visitor.process_node_before_neighbors(&self.path, stmt)?;
                    actions.push(Action::Exit(stmt));
                    let neighbors = D::neighbors(self.provider, stmt);
                    for neighbor in neighbors.into_iter().rev() {
                        actions.push(Action::Neighbor(stmt, neighbor));
                        actions.push(Action::Enter(neighbor));
                    }
                }
                Action::Neighbor(stmt, neighbor) => {
                    self.visitor.process_neighbor(&self.path, stmt, neighbor)?;
                }
                Action::Exit(stmt) => {
                    self.path.pop();
                    self.colors.insert(stmt, NodeColor::Black);
                    self.visitor.process_node_after_neighbors(&self.path, stmt)?;
                }
            }
        }
        Ok(())
    }

    /// Resolve possible callees of a call statement and enqueue any
    /// not-yet-visited analyzable target. Library namespaces and targets the
    /// oracle cannot resolve are graph leaves, not errors.
    fn expand_calls(&mut self, stmt: StmtId) {
        if !matches!(
            self.provider.statement(stmt).kind,
            StatementKind::Invoke { .. }
        ) {
            return;
        }
        for callee in self.provider.callees(stmt) {
            if self.config.is_library(&callee) {
                continue;
            }
            let Some(target) = self.provider.lookup(&callee) else {
                continue;
            };
            if !self.visited.contains(&target) && !self.worklist.contains(&target) {
                debug!(callee = callee.as_str(), "expanding procedure worklist");
                self.worklist.push_back(target);
            }
        }
    }

    fn out_of_budget(&mut self) -> bool {
        if self.budget_exhausted {
            return true;
        }
        if let Some(max) = self.config.max_steps {
            if self.steps >= max {
                self.budget_exhausted = true;
                warn!(steps = self.steps, "traversal step budget exhausted");
                return true;
            }
        }
        false
    }

    /// Color of one statement (White when never entered)
    pub fn color_of(&self, stmt: StmtId) -> NodeColor {
        self.colors.get(&stmt).copied().unwrap_or_default()
    }

    /// All recorded colors
    pub fn colors(&self) -> &FxHashMap<StmtId, NodeColor> {
        &self.colors
    }

    /// Number of statements entered
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of procedures visited
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Whether the optional step budget ran out
    pub fn budget_exhausted(&self) -> bool {
        self.budget_exhausted
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn into_visitor(self) -> V {
        self.visitor
    }
}
