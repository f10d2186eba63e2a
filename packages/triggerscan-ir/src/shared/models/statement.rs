//! Structured statement facts
//!
//! The IR itself is owned by the external program representation provider;
//! these types are the minimal structured view of one statement the analysis
//! needs: definitions, calls with receiver/arguments, and branch conditions.
//! Procedure/statement/variable handles are opaque newtype ids issued by the
//! provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle for one analyzable procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcId(pub u32);

/// Opaque handle for one IR statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StmtId(pub u32);

/// Opaque handle for one IR variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub u32);

/// One versioned view of the analyzed platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApiLevel(pub u32);

impl fmt::Display for ApiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api-{}", self.0)
    }
}

/// Literal constant appearing in the IR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::Str(v) => write!(f, "{}", v),
            Literal::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// Operand of a statement: a variable or a literal constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Var(VarId),
    Const(Literal),
}

impl Operand {
    /// Variable id, if this operand is a variable
    pub fn as_var(&self) -> Option<VarId> {
        match self {
            Operand::Var(v) => Some(*v),
            Operand::Const(_) => None,
        }
    }

    /// Literal, if this operand is a constant
    pub fn as_const(&self) -> Option<&Literal> {
        match self {
            Operand::Var(_) => None,
            Operand::Const(lit) => Some(lit),
        }
    }
}

/// One call expression: callee signature plus receiver and ordered arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    /// Statically named callee (`declaring.Type#method`); the points-to
    /// oracle may widen this to several targets
    pub signature: String,
    /// Receiver value for instance calls
    pub receiver: Option<Operand>,
    /// Ordered argument list
    pub args: Vec<Operand>,
}

impl CallExpr {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            receiver: None,
            args: Vec::new(),
        }
    }

    pub fn with_receiver(mut self, receiver: Operand) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_args(mut self, args: Vec<Operand>) -> Self {
        self.args = args;
        self
    }
}

/// Guard condition carried by a branch statement
///
/// `text` is the raw condition string as rendered by the provider; it is
/// what gets attached to call-graph edges. The structured fields feed the
/// precondition extractor, with a text re-parse as fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchCondition {
    /// Value under test
    pub operand: Operand,
    /// Compared attribute name (may be empty; parsed from `text` then)
    pub attribute: String,
    /// Comparison operator (`==`, `!=`, `<`, `>`, `<=`, `>=`)
    pub operator: String,
    /// Compared literal or value
    pub compared: Operand,
    /// Raw condition text, e.g. `t.seconds() > 30`
    pub text: String,
}

/// Where control continues after a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchTargets {
    pub on_true: StmtId,
    pub on_false: StmtId,
}

/// Statement classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// `target = source`
    Assign { target: VarId, source: Operand },
    /// Call, optionally defining a result variable
    Invoke {
        call: CallExpr,
        target: Option<VarId>,
    },
    /// Conditional branch
    Branch { condition: BranchCondition },
    /// Procedure return
    Return,
    /// Anything the analysis does not inspect
    Other,
}

/// One IR statement as exposed by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    /// Source line for reporting
    pub line: u32,
}

impl Statement {
    pub fn assign(line: u32, target: VarId, source: Operand) -> Self {
        Self {
            kind: StatementKind::Assign { target, source },
            line,
        }
    }

    pub fn invoke(line: u32, call: CallExpr, target: Option<VarId>) -> Self {
        Self {
            kind: StatementKind::Invoke { call, target },
            line,
        }
    }

    pub fn branch(line: u32, condition: BranchCondition) -> Self {
        Self {
            kind: StatementKind::Branch { condition },
            line,
        }
    }

    pub fn ret(line: u32) -> Self {
        Self {
            kind: StatementKind::Return,
            line,
        }
    }

    /// The call expression, if this statement is or contains a call
    pub fn call(&self) -> Option<&CallExpr> {
        match &self.kind {
            StatementKind::Invoke { call, .. } => Some(call),
            _ => None,
        }
    }

    /// The branch condition, if this statement is a conditional
    pub fn branch_condition(&self) -> Option<&BranchCondition> {
        match &self.kind {
            StatementKind::Branch { condition } => Some(condition),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_accessors() {
        let var = Operand::Var(VarId(3));
        let lit = Operand::Const(Literal::Int(30));
        assert_eq!(var.as_var(), Some(VarId(3)));
        assert!(var.as_const().is_none());
        assert_eq!(lit.as_const(), Some(&Literal::Int(30)));
        assert!(lit.as_var().is_none());
    }

    #[test]
    fn test_statement_call_accessor() {
        let stmt = Statement::invoke(7, CallExpr::new("com.app.Main#sink"), None);
        assert_eq!(stmt.call().map(|c| c.signature.as_str()), Some("com.app.Main#sink"));
        assert!(stmt.branch_condition().is_none());
    }
}
