//! Program representation and source lookup ports
//!
//! The analysis core never builds IR, call graphs or points-to results on
//! its own; it consumes them through `ProgramProvider`. Source text for
//! human-readable reports comes from `SourceLocator`, out of band and
//! allowed to fail.
//!
//! `SimpleProgram` is a HashMap-backed implementation with a small builder,
//! for testing and simple use cases.

use rustc_hash::FxHashMap;

use crate::shared::models::{
    ApiLevel, BranchTargets, ProcId, Statement, StatementKind, StmtId,
};

/// Upstream port: one platform snapshot's procedures, statements and
/// points-to oracle
///
/// Handles (`ProcId`, `StmtId`) are opaque and only meaningful to the
/// provider that issued them.
pub trait ProgramProvider {
    /// Analyzable procedures of one platform snapshot
    fn procedures(&self, api_level: ApiLevel) -> Vec<ProcId>;

    /// Canonical signature (`declaring.Type#method`) of a procedure
    fn signature(&self, proc: ProcId) -> &str;

    /// Resolve a signature back to an analyzable procedure.
    /// `None` for library or otherwise out-of-scope targets.
    fn lookup(&self, signature: &str) -> Option<ProcId>;

    /// Entry statements of a procedure (forward traversal roots)
    fn entry_points(&self, proc: ProcId) -> Vec<StmtId>;

    /// Exit statements of a procedure (backward traversal roots)
    fn exit_points(&self, proc: ProcId) -> Vec<StmtId>;

    /// Control-flow successors of a statement
    fn successors(&self, stmt: StmtId) -> Vec<StmtId>;

    /// Control-flow predecessors of a statement
    fn predecessors(&self, stmt: StmtId) -> Vec<StmtId>;

    /// Structured facts for one statement
    fn statement(&self, stmt: StmtId) -> &Statement;

    /// Procedure containing a statement
    fn owner(&self, stmt: StmtId) -> ProcId;

    /// Points-to oracle: possible callee signatures of a call statement.
    /// Empty for non-call statements and unresolvable targets.
    fn callees(&self, stmt: StmtId) -> Vec<String>;

    /// True/false successors of a branch statement, when known
    fn branch_targets(&self, _stmt: StmtId) -> Option<BranchTargets> {
        None
    }
}

/// Downstream port: original source text for reports
///
/// Failure returns `None` and never aborts analysis.
pub trait SourceLocator {
    fn source_text(&self, api_level: ApiLevel, procedure: &str, line: u32) -> Option<String>;
}

/// Locator that never finds anything; the default for engine-only runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSourceLocator;

impl SourceLocator for NullSourceLocator {
    fn source_text(&self, _api_level: ApiLevel, _procedure: &str, _line: u32) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
struct ProcedureBody {
    signature: String,
    statements: Vec<StmtId>,
    entries: Vec<StmtId>,
    exits: Vec<StmtId>,
}

/// In-memory program representation with a builder API
///
/// Statements are linked explicitly with `add_edge` / `add_branch` /
/// `link_sequence`. Entry points default to the first statement added to a
/// procedure; exit points default to statements without successors.
#[derive(Debug, Clone, Default)]
pub struct SimpleProgram {
    procedures: Vec<ProcedureBody>,
    statements: Vec<Statement>,
    owners: Vec<ProcId>,
    successors: FxHashMap<StmtId, Vec<StmtId>>,
    predecessors: FxHashMap<StmtId, Vec<StmtId>>,
    branches: FxHashMap<StmtId, BranchTargets>,
    oracle: FxHashMap<StmtId, Vec<String>>,
    index: FxHashMap<String, ProcId>,
}

impl SimpleProgram {
    /// Create a new empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an analyzable procedure
    pub fn add_procedure(&mut self, signature: impl Into<String>) -> ProcId {
        let signature = signature.into();
        let id = ProcId(self.procedures.len() as u32);
        self.index.insert(signature.clone(), id);
        self.procedures.push(ProcedureBody {
            signature,
            statements: Vec::new(),
            entries: Vec::new(),
            exits: Vec::new(),
        });
        id
    }

    /// Add a statement to a procedure
    pub fn add_statement(&mut self, proc: ProcId, statement: Statement) -> StmtId {
        let id = StmtId(self.statements.len() as u32);
        self.statements.push(statement);
        self.owners.push(proc);
        self.procedures[proc.0 as usize].statements.push(id);
        id
    }

    /// Add a control-flow edge between two statements
    pub fn add_edge(&mut self, from: StmtId, to: StmtId) {
        self.successors.entry(from).or_default().push(to);
        self.predecessors.entry(to).or_default().push(from);
    }

    /// Link a run of statements in order
    pub fn link_sequence(&mut self, stmts: &[StmtId]) {
        for pair in stmts.windows(2) {
            self.add_edge(pair[0], pair[1]);
        }
    }

    /// Wire a branch statement to its true/false successors
    pub fn add_branch(&mut self, branch: StmtId, on_true: StmtId, on_false: StmtId) {
        self.add_edge(branch, on_true);
        self.add_edge(branch, on_false);
        self.branches.insert(branch, BranchTargets { on_true, on_false });
    }

    /// Add an oracle entry widening the callee set of a call statement
    pub fn add_callee(&mut self, stmt: StmtId, signature: impl Into<String>) {
        self.oracle.entry(stmt).or_default().push(signature.into());
    }

    /// Override the default entry point of a procedure
    pub fn set_entry(&mut self, proc: ProcId, stmt: StmtId) {
        self.procedures[proc.0 as usize].entries.push(stmt);
    }

    /// Override the default exit points of a procedure
    pub fn set_exit(&mut self, proc: ProcId, stmt: StmtId) {
        self.procedures[proc.0 as usize].exits.push(stmt);
    }
}

impl ProgramProvider for SimpleProgram {
    fn procedures(&self, _api_level: ApiLevel) -> Vec<ProcId> {
        (0..self.procedures.len() as u32).map(ProcId).collect()
    }

    fn signature(&self, proc: ProcId) -> &str {
        &self.procedures[proc.0 as usize].signature
    }

    fn lookup(&self, signature: &str) -> Option<ProcId> {
        self.index.get(signature).copied()
    }

    fn entry_points(&self, proc: ProcId) -> Vec<StmtId> {
        let body = &self.procedures[proc.0 as usize];
        if !body.entries.is_empty() {
            return body.entries.clone();
        }
        body.statements.first().copied().into_iter().collect()
    }

    fn exit_points(&self, proc: ProcId) -> Vec<StmtId> {
        let body = &self.procedures[proc.0 as usize];
        if !body.exits.is_empty() {
            return body.exits.clone();
        }
        body.statements
            .iter()
            .copied()
            .filter(|s| self.successors.get(s).map_or(true, |v| v.is_empty()))
            .collect()
    }

    fn successors(&self, stmt: StmtId) -> Vec<StmtId> {
        self.successors.get(&stmt).cloned().unwrap_or_default()
    }

    fn predecessors(&self, stmt: StmtId) -> Vec<StmtId> {
        self.predecessors.get(&stmt).cloned().unwrap_or_default()
    }

    fn statement(&self, stmt: StmtId) -> &Statement {
        &self.statements[stmt.0 as usize]
    }

    fn owner(&self, stmt: StmtId) -> ProcId {
        self.owners[stmt.0 as usize]
    }

    fn callees(&self, stmt: StmtId) -> Vec<String> {
        if let Some(widened) = self.oracle.get(&stmt) {
            return widened.clone();
        }
        match &self.statements[stmt.0 as usize].kind {
            StatementKind::Invoke { call, .. } => vec![call.signature.clone()],
            _ => Vec::new(),
        }
    }

    fn branch_targets(&self, stmt: StmtId) -> Option<BranchTargets> {
        self.branches.get(&stmt).copied()
    }
}
