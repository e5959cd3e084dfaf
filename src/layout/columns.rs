use serde::Serialize;

use crate::layout::overlap::OverlapGroup;
use crate::layout::window::ClippedInterval;

/// Horizontal slot of one event: its column and how many columns its group splits into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnSlot {
    pub column: usize,
    pub total_columns: usize,
}

impl ColumnSlot {
    pub const SINGLE: ColumnSlot = ColumnSlot {
        column: 0,
        total_columns: 1,
    };
}

/// Column of `target_id` within an ordered overlap group. Every member of a group
/// gets the group's full width count, even when it only overlaps part of the group.
pub fn pack(target_id: &str, group: &[ClippedInterval<'_>]) -> Option<ColumnSlot> {
    let column = group.iter().position(|member| member.event_id() == target_id)?;

    Some(ColumnSlot {
        column,
        total_columns: group.len(),
    })
}

impl OverlapGroup<'_> {
    pub fn column_slot(&self) -> ColumnSlot {
        ColumnSlot {
            column: self.target_index(),
            total_columns: self.len(),
        }
    }
}
