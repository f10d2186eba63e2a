//! Analysis session orchestration
//!
//! One session runs one independent pass per configured API level. A pass
//! is two traversals over the same snapshot: a forward walk that populates
//! the call-graph store, then a forward walk that runs the recognizer
//! chains and collects pending findings. Pending findings are enriched with
//! reach conditions, the caller-chain trace and source text, then pushed
//! through the session-wide dedup set.

use tracing::info;

use super::builder::CallGraphBuilder;
use super::detector::TriggerDetector;
use super::finding::{Finding, FindingSet};
use crate::config::AnalysisConfig;
use crate::errors::Result;
use crate::features::recognizers::default_chains;
use crate::features::traversal::{Forward, IcfgTraversal};
use crate::shared::models::ApiLevel;
use crate::shared::ports::{ProgramProvider, SourceLocator};

/// Drives the per-snapshot passes and owns the accumulated findings
pub struct AnalysisSession<'a> {
    provider: &'a dyn ProgramProvider,
    locator: &'a dyn SourceLocator,
    config: AnalysisConfig,
    findings: FindingSet,
}

impl<'a> AnalysisSession<'a> {
    pub fn new(
        provider: &'a dyn ProgramProvider,
        locator: &'a dyn SourceLocator,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            provider,
            locator,
            config,
            findings: FindingSet::new(),
        }
    }

    /// Run every configured pass and return the deduplicated findings
    pub fn run(&mut self) -> Result<&[Finding]> {
        self.config.validate()?;
        for api_level in self.config.api_levels.clone() {
            self.run_pass(api_level)?;
        }
        Ok(self.findings.findings())
    }

    pub fn findings(&self) -> &[Finding] {
        self.findings.findings()
    }

    pub fn into_findings(self) -> FindingSet {
        self.findings
    }

    fn run_pass(&mut self, api_level: ApiLevel) -> Result<()> {
        let roots = self.provider.procedures(api_level);
        info!(%api_level, procedures = roots.len(), "starting pass");

        let builder = CallGraphBuilder::new(self.provider, api_level);
        let mut graph_walk: IcfgTraversal<'_, Forward, _> =
            IcfgTraversal::new(self.provider, &self.config, builder);
        graph_walk.traverse(roots.iter().copied());
        let mut store = graph_walk.into_visitor().into_store();
        store.expand_constructors();

        let detector = TriggerDetector::new(self.provider, default_chains());
        let mut detect_walk: IcfgTraversal<'_, Forward, _> =
            IcfgTraversal::new(self.provider, &self.config, detector);
        detect_walk.traverse(roots);
        let pending = detect_walk.into_visitor().into_pending();

        let mut fresh = 0usize;
        for item in pending {
            let finding = Finding {
                api_level,
                reach_conditions: store.obtain_conditions(&item.procedure),
                call_stack: store.obtain_call_stack(&item.procedure),
                source_text: self
                    .locator
                    .source_text(api_level, &item.procedure, item.line),
                procedure: item.procedure,
                line: item.line,
                callee: item.callee,
                tags: item.tags,
                precondition: item.precondition,
            };
            if self.findings.insert(finding) {
                fresh += 1;
            }
        }
        info!(%api_level, findings = fresh, "pass complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::tag::TAG_NOW;
    use crate::shared::models::{
        BranchCondition, CallExpr, Literal, Operand, Statement, Tag, VarId,
    };
    use crate::shared::ports::{NullSourceLocator, SimpleProgram};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comparison_sink_produces_enriched_finding() {
        let mut prog = SimpleProgram::new();
        let p = prog.add_procedure("com.app.Main#check");
        let ctor = prog.add_statement(
            p,
            Statement::invoke(1, CallExpr::new("java.util.Date#<init>"), Some(VarId(0))),
        );
        let branch = prog.add_statement(
            p,
            Statement::branch(
                2,
                BranchCondition {
                    operand: Operand::Var(VarId(9)),
                    attribute: "mode".to_string(),
                    operator: "==".to_string(),
                    compared: Operand::Const(Literal::Int(1)),
                    text: "mode == 1".to_string(),
                },
            ),
        );
        let sink = prog.add_statement(
            p,
            Statement::invoke(
                3,
                CallExpr::new("java.util.Date#before")
                    .with_receiver(Operand::Var(VarId(0)))
                    .with_args(vec![Operand::Const(Literal::Int(0))]),
                None,
            ),
        );
        let done = prog.add_statement(p, Statement::ret(4));
        prog.add_edge(ctor, branch);
        prog.add_branch(branch, sink, done);
        prog.add_edge(sink, done);

        let mut session = AnalysisSession::new(
            &prog,
            &NullSourceLocator,
            AnalysisConfig::for_api_level(ApiLevel(19)),
        );
        let findings = session.run().unwrap();

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.callee, "java.util.Date#before");
        assert_eq!(finding.procedure, "com.app.Main#check");
        assert_eq!(finding.line, 3);
        assert!(finding.tags.contains(&Tag::new(TAG_NOW)));
        assert_eq!(finding.precondition.items.len(), 1);
        assert_eq!(finding.precondition.items[0].attribute, "mode");
        assert!(finding.precondition.items[0].branch_taken);
        assert!(finding.reach_conditions.is_empty());
        assert_eq!(finding.call_stack, "com.app.Main#check\n");
        assert!(finding.source_text.is_none());
    }

    #[test]
    fn test_second_pass_does_not_duplicate() {
        let mut prog = SimpleProgram::new();
        let p = prog.add_procedure("com.app.Main#check");
        let ctor = prog.add_statement(
            p,
            Statement::invoke(1, CallExpr::new("java.util.Date#<init>"), Some(VarId(0))),
        );
        let sink = prog.add_statement(
            p,
            Statement::invoke(
                2,
                CallExpr::new("java.util.Date#after")
                    .with_receiver(Operand::Var(VarId(0)))
                    .with_args(vec![Operand::Const(Literal::Int(0))]),
                None,
            ),
        );
        prog.add_edge(ctor, sink);

        let config = AnalysisConfig {
            api_levels: vec![ApiLevel(19), ApiLevel(21)],
            ..AnalysisConfig::default()
        };
        let mut session = AnalysisSession::new(&prog, &NullSourceLocator, config);
        let findings = session.run().unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].api_level, ApiLevel(19));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let prog = SimpleProgram::new();
        let config = AnalysisConfig {
            api_levels: Vec::new(),
            ..AnalysisConfig::default()
        };
        let mut session = AnalysisSession::new(&prog, &NullSourceLocator, config);
        assert!(session.run().is_err());
    }
}
