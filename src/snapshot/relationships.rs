//! Relationship projection onto snapshot tables.

use super::mapping::IdentityMapper;
use crate::model::{Relationship, RelationshipTerm, SnapshotRelationship, SnapshotTerm};

/// Rewrite dataset relationships onto snapshot tables and columns.
///
/// A relationship is kept only when both of its tables and both of its
/// columns were mapped; otherwise it is dropped whole. Output keeps input
/// order.
pub fn project_relationships(
    relationships: &[Relationship],
    mapper: &IdentityMapper,
) -> Vec<SnapshotRelationship> {
    let projected: Vec<_> = relationships
        .iter()
        .filter_map(|relationship| {
            Some(SnapshotRelationship {
                name: relationship.name.clone(),
                from: project_term(&relationship.from, mapper)?,
                to: project_term(&relationship.to, mapper)?,
            })
        })
        .collect();

    tracing::debug!(
        kept = projected.len(),
        dropped = relationships.len() - projected.len(),
        "projected relationships"
    );
    projected
}

fn project_term(term: &RelationshipTerm, mapper: &IdentityMapper) -> Option<SnapshotTerm> {
    Some(SnapshotTerm {
        table: mapper.table(term.table)?,
        column: mapper.column(term.column)?,
    })
}
