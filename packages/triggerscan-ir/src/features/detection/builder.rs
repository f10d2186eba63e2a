//! Call-graph construction visitor
//!
//! Phase one of a pass: a forward ICFG walk whose visitor records one edge
//! per (caller, possible callee) at every call statement. The branch
//! conditions currently on the path stack become the edge's
//! branch-condition annotations, answering later "under what conditions is
//! this procedure reached".

use crate::errors::Result;
use crate::features::call_graph::CallGraphStore;
use crate::features::traversal::TraversalVisitor;
use crate::shared::models::{ApiLevel, StmtId};
use crate::shared::ports::ProgramProvider;

/// Populates a `CallGraphStore` during a forward traversal
pub struct CallGraphBuilder<'a> {
    provider: &'a dyn ProgramProvider,
    store: CallGraphStore,
}

impl<'a> CallGraphBuilder<'a> {
    pub fn new(provider: &'a dyn ProgramProvider, api_level: ApiLevel) -> Self {
        Self {
            provider,
            store: CallGraphStore::new(api_level),
        }
    }

    /// Hand the populated store over for constructor expansion and reading
    pub fn into_store(self) -> CallGraphStore {
        self.store
    }
}

impl TraversalVisitor for CallGraphBuilder<'_> {
    fn process_node_before_neighbors(&mut self, path: &[StmtId], stmt: StmtId) -> Result<()> {
        if self.provider.statement(stmt).call().is_none() {
            return Ok(());
        }
        let conditions: Vec<String> = path
            .iter()
            .filter_map(|s| self.provider.statement(*s).branch_condition())
            .map(|c| c.text.clone())
            .filter(|text| !text.is_empty())
            .collect();
        let caller = self
            .provider
            .signature(self.provider.owner(stmt))
            .to_string();
        for callee in self.provider.callees(stmt) {
            self.store.add_edge(&caller, &callee, &conditions);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::features::traversal::{Forward, IcfgTraversal};
    use crate::shared::models::{
        BranchCondition, CallExpr, Literal, Operand, Statement, VarId,
    };
    use crate::shared::ports::SimpleProgram;

    #[test]
    fn test_edges_carry_path_conditions() {
        let mut prog = SimpleProgram::new();
        let p = prog.add_procedure("com.app.Main#run");
        let branch = prog.add_statement(
            p,
            Statement::branch(
                2,
                BranchCondition {
                    operand: Operand::Var(VarId(0)),
                    attribute: "mode".to_string(),
                    operator: "==".to_string(),
                    compared: Operand::Const(Literal::Int(1)),
                    text: "mode == 1".to_string(),
                },
            ),
        );
        let call = prog.add_statement(
            p,
            Statement::invoke(3, CallExpr::new("com.app.Lib#helper"), None),
        );
        let done = prog.add_statement(p, Statement::ret(4));
        prog.add_branch(branch, call, done);
        prog.add_edge(call, done);

        let config = AnalysisConfig::default();
        let builder = CallGraphBuilder::new(&prog, ApiLevel(19));
        let mut walk: IcfgTraversal<'_, Forward, _> =
            IcfgTraversal::new(&prog, &config, builder);
        walk.traverse([p]);
        let store = walk.into_visitor().into_store();

        assert_eq!(
            store.obtain_conditions("com.app.Lib#helper"),
            vec!["mode == 1".to_string()]
        );
    }
}
