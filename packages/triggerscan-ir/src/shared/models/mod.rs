//! Shared model types used across features

pub mod signature;
pub mod statement;
pub mod tag;

pub use statement::{
    ApiLevel, BranchCondition, BranchTargets, CallExpr, Literal, Operand, ProcId, Statement,
    StatementKind, StmtId, VarId,
};
pub use tag::{Tag, TAG_HERE, TAG_NOW, TAG_SMS};
