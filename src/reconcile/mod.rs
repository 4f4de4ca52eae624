//! Reconciliation of a mirror playlist against its target list
//!
//! Three stages, all pure until the last:
//! 1. [`diff`] finds tracks to remove and tracks to add (with target indices)
//! 2. [`plan_batches`] groups additions into contiguous positioned inserts
//! 3. [`ReconcilePlan::apply`] issues the removal call, then every insert
//!    batch in ascending position order

mod diff;
mod planner;
mod reconciler;

pub use diff::{diff, Diff, PendingInsert};
pub use planner::{plan_batches, InsertBatch};
pub use reconciler::{reconcile, ReconcilePlan, ReconciliationReport};

/// Largest number of tracks one positioned-insert call may carry
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;
