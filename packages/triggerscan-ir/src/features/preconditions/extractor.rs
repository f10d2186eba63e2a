//! Precondition extraction from the live traversal path
//!
//! When a sink raises the terminal classification, the current path stack is
//! converted into one `Precondition`: every conditional statement on the
//! path becomes one item, with the branch outcome read off the statement
//! that follows it on the path. Attribute, operator and compared value come
//! from the structured branch condition; when the provider left them empty
//! they are re-parsed from the raw condition text.

use once_cell::sync::Lazy;
use regex::Regex;

use super::precondition::{Precondition, PreconditionItem};
use crate::shared::models::signature;
use crate::shared::models::{BranchCondition, Operand, StmtId};
use crate::shared::ports::ProgramProvider;

/// Matches `attr > 30`, `t.seconds() > 30`, `lat == 52.52`, ...
/// Captures the last identifier before the operator, the operator and the
/// compared text.
static CONDITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*(?:\(\s*\))?\s*(==|!=|<=|>=|<|>)\s*(\S.*)$")
        .expect("condition pattern is valid")
});

/// Parse `(attribute, operator, value)` out of a raw condition text
pub fn parse_condition_text(text: &str) -> Option<(String, String, String)> {
    let captures = CONDITION_RE.captures(text)?;
    Some((
        captures[1].to_string(),
        captures[2].to_string(),
        captures[3].trim().to_string(),
    ))
}

fn item_fields(condition: &BranchCondition) -> (String, String, String) {
    let parsed = parse_condition_text(&condition.text);
    let attribute = if condition.attribute.is_empty() {
        parsed
            .as_ref()
            .map(|(a, _, _)| a.clone())
            .unwrap_or_else(|| condition.text.clone())
    } else {
        condition.attribute.clone()
    };
    let operator = if condition.operator.is_empty() {
        parsed
            .as_ref()
            .map(|(_, o, _)| o.clone())
            .unwrap_or_default()
    } else {
        condition.operator.clone()
    };
    let value = match &condition.compared {
        Operand::Const(lit) => lit.to_string(),
        Operand::Var(_) => parsed.map(|(_, _, v)| v).unwrap_or_default(),
    };
    (attribute, operator, value)
}

/// Convert the live path stack into a structured precondition for a flagged
/// call. `path` runs from the traversal root down to the flagged statement.
pub fn extract(
    provider: &dyn ProgramProvider,
    path: &[StmtId],
    flagged: StmtId,
    callee_signature: &str,
) -> Precondition {
    let mut items = Vec::new();
    for (index, stmt) in path.iter().enumerate() {
        let statement = provider.statement(*stmt);
        let Some(condition) = statement.branch_condition() else {
            continue;
        };
        let branch_taken = match (provider.branch_targets(*stmt), path.get(index + 1)) {
            (Some(targets), Some(next)) if *next == targets.on_false => false,
            _ => true,
        };
        let (attribute, operator, value) = item_fields(condition);
        items.push(PreconditionItem {
            procedure: provider.signature(provider.owner(*stmt)).to_string(),
            line: statement.line,
            attribute,
            operator,
            value,
            branch_taken,
        });
    }

    let attribute = items
        .first()
        .map(|item| item.attribute.clone())
        .unwrap_or_default();
    let declaring_class =
        signature::declaring_type(provider.signature(provider.owner(flagged))).to_string();
    Precondition {
        attribute,
        declaring_type: signature::declaring_type(callee_signature).to_string(),
        declaring_class,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{CallExpr, Literal, Statement, VarId};
    use crate::shared::ports::SimpleProgram;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_condition_text() {
        assert_eq!(
            parse_condition_text("t.seconds() > 30"),
            Some(("seconds".to_string(), ">".to_string(), "30".to_string()))
        );
        assert_eq!(
            parse_condition_text("lat == 52.52"),
            Some(("lat".to_string(), "==".to_string(), "52.52".to_string()))
        );
        assert_eq!(parse_condition_text("opaque"), None);
    }

    #[test]
    fn test_extract_reads_taken_branch_from_path() {
        let mut prog = SimpleProgram::new();
        let p = prog.add_procedure("com.app.Main#check");
        let branch = prog.add_statement(
            p,
            Statement::branch(
                4,
                BranchCondition {
                    operand: Operand::Var(VarId(2)),
                    attribute: "seconds".to_string(),
                    operator: ">".to_string(),
                    compared: Operand::Const(Literal::Int(30)),
                    text: "t.seconds() > 30".to_string(),
                },
            ),
        );
        let then_stmt = prog.add_statement(
            p,
            Statement::invoke(5, CallExpr::new("com.app.Main#sink"), None),
        );
        let else_stmt = prog.add_statement(p, Statement::ret(6));
        prog.add_branch(branch, then_stmt, else_stmt);

        let taken = extract(&prog, &[branch, then_stmt], then_stmt, "com.app.Main#sink");
        assert_eq!(taken.items.len(), 1);
        assert_eq!(taken.items[0].operator, ">");
        assert_eq!(taken.items[0].value, "30");
        assert!(taken.items[0].branch_taken);
        assert_eq!(taken.attribute, "seconds");
        assert_eq!(taken.declaring_type, "com.app.Main");

        let not_taken = extract(&prog, &[branch, else_stmt], else_stmt, "com.app.Main#sink");
        assert!(!not_taken.items[0].branch_taken);
    }
}
