//! One module per rule family. Checkers are free functions over the walk
//! context; each reports at most once per call and the driver sequences
//! them behind the per-node short-circuit flag.

pub(crate) mod annotation;
pub(crate) mod class;
pub(crate) mod expr;
pub(crate) mod generics;
pub(crate) mod literal;
pub(crate) mod method;
pub(crate) mod receiver;
pub(crate) mod record;
pub(crate) mod stmt;
