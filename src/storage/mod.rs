mod repository;

pub use repository::*;

/// Schema for users, expenses and budgets. Every statement is
/// create-if-absent, so applying it again is a no-op.
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");
