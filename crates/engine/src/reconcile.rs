//! The fixed reconciliation pipeline: merge → filter → coalesce → drop
//! collisions → sort → project.
//!
//! The order and the collision-naming convention are load-bearing; this is
//! an ordered sequence of pure table transforms, not an extensible graph.

use fleetrecon_table::{ops, Table};

use crate::config::ColumnsConfig;
use crate::error::PipelineError;

/// Suffix tagging the right-hand copy of a collision column inside the
/// pipeline. Resolved columns never carry it.
pub const COLLISION_SUFFIX: &str = "_drop";

/// Column roles and projection for one reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    /// Natural identifier matching rows across both sources.
    pub join_key: String,
    /// Rows with a null value here are incomplete and excluded.
    pub mandatory_column: String,
    /// Final sort order.
    pub group_column: String,
    /// Caller-requested output columns.
    pub projection: Vec<String>,
}

impl ReconcilePlan {
    pub fn new(columns: &ColumnsConfig, projection: Vec<String>) -> Self {
        Self {
            join_key: columns.join_key.clone(),
            mandatory_column: columns.inspection_date.clone(),
            group_column: columns.group.clone(),
            projection,
        }
    }

    /// The caller's projection widened so the identifier and group columns
    /// always survive, even when omitted.
    pub fn widened_projection(&self) -> Vec<String> {
        let mut keep = self.projection.clone();
        for required in [&self.join_key, &self.group_column] {
            if !keep.iter().any(|c| c == required) {
                keep.push(required.clone());
            }
        }
        keep
    }
}

/// Reconcile the local and remote vehicle tables into one report table.
///
/// Outer-joins so no record from either source is silently dropped before
/// the completeness filter, then resolves collision columns by
/// null-coalescing the local value with the remote one. Pure in-memory
/// transform: any failure is a contract violation and propagates
/// immediately, with no partial result.
pub fn reconcile(
    local: Table,
    remote: Table,
    plan: &ReconcilePlan,
) -> Result<Table, PipelineError> {
    let mut common = ops::common_columns(&remote, &local);
    common.retain(|name| name != &plan.join_key);

    let merged = ops::merge(local, remote, &plan.join_key, COLLISION_SUFFIX)?;
    let filtered = ops::filter_non_null(merged, &plan.mandatory_column)?;

    let pairs = ops::collision_pairs(&common, COLLISION_SUFFIX);
    let coalesced = ops::coalesce(filtered, &pairs)?;
    let clean = ops::drop_collision_columns(coalesced, &pairs)?;

    let sorted = ops::sort_by(clean, &plan.group_column, true)?;
    Ok(ops::project(sorted, &plan.widened_projection()))
}
