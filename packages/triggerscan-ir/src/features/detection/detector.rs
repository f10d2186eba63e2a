//! Trigger detection visitor
//!
//! Phase two of a pass: a forward ICFG walk that feeds every statement to
//! the recognizer chains against the symbolic value model. Two ways a call
//! gets flagged:
//!
//! - a sink rule raises the terminal classification itself (comparison
//!   sinks, cross-argument sinks), or
//! - the call sits under a guard whose condition operand carries sensitive
//!   provenance: conditional logic gated on tagged data is the trigger
//!   shape this analysis exists to find.
//!
//! Each flagged call is turned into a pending finding with the precondition
//! extracted from the live path stack; the session later enriches it with
//! call-graph queries and source text.

use std::collections::BTreeSet;

use tracing::debug;

use crate::errors::Result;
use crate::features::preconditions::{self, Precondition};
use crate::features::recognizers::{RecognizerChain, RecognizerCtx};
use crate::features::symbolic::{CallShape, ContextualValues, SymbolicStore};
use crate::features::traversal::TraversalVisitor;
use crate::shared::models::{Operand, StatementKind, StmtId, Tag};
use crate::shared::ports::ProgramProvider;

/// A flagged call before call-graph and source enrichment
#[derive(Debug, Clone)]
pub struct PendingFinding {
    pub stmt: StmtId,
    pub procedure: String,
    pub line: u32,
    pub callee: String,
    pub tags: BTreeSet<Tag>,
    pub precondition: Precondition,
}

/// Runs the recognizer chains over every traversed statement
pub struct TriggerDetector<'a> {
    provider: &'a dyn ProgramProvider,
    chains: Vec<RecognizerChain>,
    symbolic: SymbolicStore,
    contextual: ContextualValues,
    pending: Vec<PendingFinding>,
}

impl<'a> TriggerDetector<'a> {
    pub fn new(provider: &'a dyn ProgramProvider, chains: Vec<RecognizerChain>) -> Self {
        Self {
            provider,
            chains,
            symbolic: SymbolicStore::new(),
            contextual: ContextualValues::new(),
            pending: Vec::new(),
        }
    }

    pub fn symbolic(&self) -> &SymbolicStore {
        &self.symbolic
    }

    pub fn pending(&self) -> &[PendingFinding] {
        &self.pending
    }

    pub fn into_pending(self) -> Vec<PendingFinding> {
        self.pending
    }

    /// Value keys behind an operand: the most recent coherent reaching
    /// definitions for variables, nothing for literals
    fn resolve(&self, operand: &Operand) -> Vec<StmtId> {
        match operand {
            Operand::Var(var) => self.contextual.latest_coherent(*var).to_vec(),
            Operand::Const(_) => Vec::new(),
        }
    }

    /// Whether any guard on the path tests a value with sensitive
    /// provenance. Provenance is read through call shapes, so a guard on
    /// the result of an unrecognized call over tagged data still counts.
    fn sensitive_guard_on_path(&self, path: &[StmtId]) -> bool {
        path.iter().any(|stmt| {
            self.provider
                .statement(*stmt)
                .branch_condition()
                .and_then(|c| c.operand.as_var())
                .map_or(false, |var| {
                    self.contextual
                        .latest_coherent(var)
                        .iter()
                        .any(|key| !self.symbolic.tags_through_call(*key).is_empty())
                })
        })
    }

    fn process_invoke(&mut self, path: &[StmtId], stmt: StmtId) -> Result<()> {
        let statement = self.provider.statement(stmt).clone();
        let StatementKind::Invoke { call, target } = statement.kind else {
            return Ok(());
        };
        let receiver_keys: Vec<StmtId> = call
            .receiver
            .as_ref()
            .map(|op| self.resolve(op))
            .unwrap_or_default();
        let arg_keys: Vec<Vec<StmtId>> = call.args.iter().map(|op| self.resolve(op)).collect();

        self.symbolic.value_mut(stmt).set_call(CallShape {
            signature: call.signature.clone(),
            receiver: receiver_keys.clone(),
            args: arg_keys.clone(),
        });

        let callees = self.provider.callees(stmt);
        let mut handled = false;
        let mut raised = false;
        let mut flagged_callee = call.signature.clone();
        for callee in &callees {
            let mut ctx = RecognizerCtx::new(
                callee,
                &call,
                stmt,
                &receiver_keys,
                &arg_keys,
                &mut self.symbolic,
            );
            for chain in &self.chains {
                if chain.run(&mut ctx)? {
                    handled = true;
                    break;
                }
            }
            if ctx.raised_suspicion() {
                raised = true;
                flagged_callee = callee.clone();
            }
        }

        // A call no rule knows, sitting under a guard that tests tagged
        // data, is gated behavior: flag it.
        if !raised && !handled && self.sensitive_guard_on_path(path) {
            self.symbolic.mark_suspicious(stmt);
            raised = true;
        }

        if raised {
            let mut tags = self.symbolic.tags_of(&receiver_keys);
            for keys in &arg_keys {
                tags.extend(self.symbolic.tags_of(keys));
            }
            if let Some(value) = self.symbolic.value(stmt) {
                tags.extend(value.tags().iter().cloned());
            }
            let precondition = preconditions::extract(self.provider, path, stmt, &flagged_callee);
            let procedure = self
                .provider
                .signature(self.provider.owner(stmt))
                .to_string();
            debug!(
                procedure = procedure.as_str(),
                callee = flagged_callee.as_str(),
                line = statement.line,
                "suspicious call flagged"
            );
            self.pending.push(PendingFinding {
                stmt,
                procedure,
                line: statement.line,
                callee: flagged_callee,
                tags,
                precondition,
            });
        }

        if let Some(target) = target {
            self.contextual.record(target, vec![stmt]);
        }
        Ok(())
    }
}

impl TraversalVisitor for TriggerDetector<'_> {
    fn process_node_before_neighbors(&mut self, path: &[StmtId], stmt: StmtId) -> Result<()> {
        let statement = self.provider.statement(stmt);
        match &statement.kind {
            StatementKind::Assign { target, source } => {
                let target = *target;
                let source = source.clone();
                let source_keys = self.resolve(&source);
                // copy propagation keeps provenance flowing through plain
                // assignments
                for tag in self.symbolic.tags_of(&source_keys) {
                    self.symbolic.add_tag(stmt, tag);
                }
                let mut group = vec![stmt];
                group.extend(source_keys);
                self.contextual.record(target, group);
                Ok(())
            }
            StatementKind::Invoke { .. } => self.process_invoke(path, stmt),
            StatementKind::Branch { .. } | StatementKind::Return | StatementKind::Other => Ok(()),
        }
    }
}
