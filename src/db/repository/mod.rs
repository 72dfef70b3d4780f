//! Repository layer — entity-scoped database operations.
//!
//! Every function takes a borrowed `Connection`; callers own the
//! connection for the duration of one operation.

mod patient;

pub use patient::*;
