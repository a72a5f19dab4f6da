//! Supplier-chain depth rules.
//!
//! A supplier chain may contain at most three nodes: the node itself plus two
//! ancestors. The walk is iterative and carries a visited set, so a cyclic
//! supplier graph fails fast instead of looping.

use std::collections::{HashMap, HashSet};

use crate::domain::error::ServiceError;

/// Maximum number of supplier hops from a node up to the root factory.
pub const MAX_HIERARCHY_LEVEL: u32 = 2;

/// Snapshot of the supplier graph: node id -> supplier id (if any).
pub type SupplierEdges = HashMap<i64, Option<i64>>;

/// Number of supplier hops from `node_id` up to the root.
///
/// A node with no supplier has level 0. Fails if the chain is deeper than
/// [`MAX_HIERARCHY_LEVEL`] or contains a cycle; callers report that failure to
/// the requester rather than silently truncating the walk.
pub fn hierarchy_level(edges: &SupplierEdges, node_id: i64) -> Result<u32, ServiceError> {
    let mut level = 0u32;
    let mut visited = HashSet::new();
    let mut current = node_id;
    visited.insert(current);

    while let Some(supplier) = edges.get(&current).copied().flatten() {
        if !visited.insert(supplier) {
            return Err(ServiceError::validation("supplier chain contains a cycle"));
        }
        level += 1;
        if level > MAX_HIERARCHY_LEVEL {
            return Err(ServiceError::validation(
                "supplier chain may not exceed 3 nodes",
            ));
        }
        current = supplier;
    }

    Ok(level)
}

/// Checks a candidate supplier assignment for `node_id` (None when the node is
/// not yet persisted) and returns the hierarchy level the node would have.
///
/// Rejects self-supply and any assignment that would make the node its own
/// ancestor, then applies the depth cap.
pub fn validate_assignment(
    edges: &SupplierEdges,
    node_id: Option<i64>,
    supplier_id: Option<i64>,
) -> Result<u32, ServiceError> {
    let Some(supplier) = supplier_id else {
        return Ok(0);
    };

    if node_id == Some(supplier) {
        return Err(ServiceError::validation("a node cannot supply itself"));
    }

    // Walk up from the candidate supplier. Reaching the node being written
    // means the supplier is one of its descendants.
    let mut level = 1u32;
    let mut visited = HashSet::new();
    let mut current = supplier;
    visited.insert(current);

    loop {
        if node_id == Some(current) {
            return Err(ServiceError::validation(
                "supplier assignment would create a cycle",
            ));
        }
        if level > MAX_HIERARCHY_LEVEL {
            return Err(ServiceError::validation(
                "supplier chain may not exceed 3 nodes",
            ));
        }
        match edges.get(&current).copied().flatten() {
            Some(next) => {
                if !visited.insert(next) {
                    return Err(ServiceError::validation("supplier chain contains a cycle"));
                }
                level += 1;
                current = next;
            }
            None => break,
        }
    }

    Ok(level)
}
