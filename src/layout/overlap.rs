use std::cmp::Ordering;

use crate::calendar::Event;
use crate::layout::window::{ClippedInterval, DayWindow, clip};

/// Column order: clipped start, then event id.
pub fn column_order(a: &ClippedInterval<'_>, b: &ClippedInterval<'_>) -> Ordering {
    a.display_start
        .cmp(&b.display_start)
        .then_with(|| a.event_id().cmp(b.event_id()))
}

/// Every visible event whose clipped interval intersects one target event,
/// the target included, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapGroup<'a> {
    members: Vec<ClippedInterval<'a>>,
    target: usize,
}

impl<'a> OverlapGroup<'a> {
    pub(crate) fn from_candidates<'c, I>(target: ClippedInterval<'a>, candidates: I) -> Self
    where
        I: IntoIterator<Item = &'c ClippedInterval<'a>>,
        'a: 'c,
    {
        let mut members: Vec<ClippedInterval<'a>> = candidates
            .into_iter()
            .filter(|candidate| candidate.event_id() != target.event_id())
            .filter(|candidate| candidate.overlaps(&target))
            .copied()
            .collect();
        members.push(target);
        members.sort_by(column_order);

        let target = members
            .iter()
            .position(|member| member.event_id() == target.event_id())
            .unwrap_or_default();

        Self { members, target }
    }

    pub fn members(&self) -> &[ClippedInterval<'a>] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClippedInterval<'a>> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Never true; a group always holds its target.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn target(&self) -> &ClippedInterval<'a> {
        &self.members[self.target]
    }

    pub fn target_index(&self) -> usize {
        self.target
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.members.iter().any(|member| member.event_id() == event_id)
    }

    pub fn event_ids(&self) -> Vec<&'a str> {
        self.members.iter().map(ClippedInterval::event_id).collect()
    }
}

impl<'g, 'a> IntoIterator for &'g OverlapGroup<'a> {
    type Item = &'g ClippedInterval<'a>;
    type IntoIter = std::slice::Iter<'g, ClippedInterval<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Overlap group of `target` among `day_events` for the given day. Candidates that
/// do not touch the day are ignored; `None` when the target itself is not visible.
pub fn overlap_group<'a, I>(target: &'a Event, day_events: I, window: &DayWindow) -> Option<OverlapGroup<'a>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let target = clip(target, window)?;
    let candidates: Vec<ClippedInterval<'a>> = day_events
        .into_iter()
        .filter_map(|event| clip(event, window))
        .collect();

    Some(OverlapGroup::from_candidates(target, &candidates))
}
