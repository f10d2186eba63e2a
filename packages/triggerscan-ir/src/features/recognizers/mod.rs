//! Recognizer chains per value domain
//!
//! Five domains: boolean-result calls, numeric-result calls, date/time
//! calls, location calls and SMS calls. Rule order within a chain affects
//! only performance, never outcome: independent rules are confluent, and
//! re-running a chain over already-tagged values adds nothing.

pub mod boolean;
pub mod chain;
pub mod datetime;
pub mod location;
pub mod numeric;
pub mod rules;
pub mod sms;

pub use chain::{Recognizer, RecognizerChain, RecognizerCtx};
pub use rules::{ComparisonSinkRule, ComponentRule, CrossArgumentSinkRule, SourceRule};

/// The full default rule set, one chain per domain
pub fn default_chains() -> Vec<RecognizerChain> {
    vec![
        datetime::chain(),
        location::chain(),
        sms::chain(),
        boolean::chain(),
        numeric::chain(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::symbolic::SymbolicStore;
    use crate::shared::models::tag::TAG_NOW;
    use crate::shared::models::{CallExpr, Operand, StmtId, Tag, VarId};
    use pretty_assertions::assert_eq;

    const SECONDS_CALL: &str = "java.util.Date#getSeconds";

    fn seconds_call() -> CallExpr {
        CallExpr::new(SECONDS_CALL).with_receiver(Operand::Var(VarId(1)))
    }

    fn run_chains(order: &[RecognizerChain]) -> SymbolicStore {
        let mut store = SymbolicStore::new();
        store.add_tag(StmtId(0), Tag::new(TAG_NOW));
        let call = seconds_call();
        let receiver = [StmtId(0)];
        let args: Vec<Vec<StmtId>> = Vec::new();
        let mut ctx =
            RecognizerCtx::new(SECONDS_CALL, &call, StmtId(1), &receiver, &args, &mut store);
        for chain in order {
            if chain.run(&mut ctx).unwrap() {
                break;
            }
        }
        store
    }

    #[test]
    fn test_unmatched_call_reports_unhandled() {
        let mut store = SymbolicStore::new();
        let call = CallExpr::new("com.app.Main#helper");
        let mut ctx = RecognizerCtx::new(
            "com.app.Main#helper",
            &call,
            StmtId(1),
            &[],
            &[],
            &mut store,
        );
        for chain in default_chains() {
            assert!(!chain.run(&mut ctx).unwrap());
        }
    }

    #[test]
    fn test_chain_is_idempotent() {
        let mut store = SymbolicStore::new();
        store.add_tag(StmtId(0), Tag::new(TAG_NOW));
        let call = seconds_call();
        let receiver = [StmtId(0)];
        let args: Vec<Vec<StmtId>> = Vec::new();
        let chain = datetime::chain();

        let mut ctx =
            RecognizerCtx::new(SECONDS_CALL, &call, StmtId(1), &receiver, &args, &mut store);
        assert!(chain.run(&mut ctx).unwrap());
        let after_once = store.tags_of(&[StmtId(0), StmtId(1)]);

        let mut ctx =
            RecognizerCtx::new(SECONDS_CALL, &call, StmtId(1), &receiver, &args, &mut store);
        assert!(chain.run(&mut ctx).unwrap());
        let after_twice = store.tags_of(&[StmtId(0), StmtId(1)]);

        assert_eq!(after_once, after_twice);
    }

    #[test]
    fn test_chain_order_is_confluent() {
        let forward = run_chains(&default_chains());
        let mut reversed_chains = default_chains();
        reversed_chains.reverse();
        let reversed = run_chains(&reversed_chains);

        let keys = [StmtId(0), StmtId(1)];
        assert_eq!(forward.tags_of(&keys), reversed.tags_of(&keys));
    }

    #[test]
    fn test_component_rule_pushes_tag_back_to_receiver() {
        let store = run_chains(&default_chains());
        assert!(store
            .tags_of(&[StmtId(0)])
            .contains(&Tag::new("#now/#seconds")));
        assert!(store
            .tags_of(&[StmtId(1)])
            .contains(&Tag::new("#now/#seconds")));
    }
}
