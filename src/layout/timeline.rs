use crate::calendar::Event;
use crate::layout::columns::ColumnSlot;
use crate::layout::geometry::{GridMetrics, HorizontalSpan, VerticalSpan};
use crate::layout::overlap::{OverlapGroup, column_order};
use crate::layout::window::{ClippedInterval, DayWindow, clip};

/// One render pass over a day: events are clipped once and every per-event
/// query runs against that cached set.
#[derive(Debug, Clone)]
pub struct DayTimeline<'a> {
    window: DayWindow,
    visible: Vec<ClippedInterval<'a>>,
}

/// Final grid placement of one visible event.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEvent<'a> {
    pub interval: ClippedInterval<'a>,
    pub slot: ColumnSlot,
    pub vertical: VerticalSpan,
    pub horizontal: HorizontalSpan,
}

impl<'a> DayTimeline<'a> {
    pub fn new<I>(window: DayWindow, events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut visible: Vec<ClippedInterval<'a>> = events
            .into_iter()
            .filter_map(|event| clip(event, &window))
            .collect();
        visible.sort_by(column_order);

        Self { window, visible }
    }

    pub fn window(&self) -> &DayWindow {
        &self.window
    }

    /// Visible events in column order.
    pub fn visible(&self) -> &[ClippedInterval<'a>] {
        &self.visible
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn get(&self, event_id: &str) -> Option<&ClippedInterval<'a>> {
        self.visible.iter().find(|interval| interval.event_id() == event_id)
    }

    pub fn overlap_group(&self, event_id: &str) -> Option<OverlapGroup<'a>> {
        let target = *self.get(event_id)?;
        Some(OverlapGroup::from_candidates(target, &self.visible))
    }

    pub fn column_slot(&self, event_id: &str) -> Option<ColumnSlot> {
        self.overlap_group(event_id).map(|group| group.column_slot())
    }

    /// Visible events whose raw interval touches the given hour of the day.
    pub fn events_for_hour(&self, hour: u32) -> Vec<&'a Event> {
        let Some((from, to)) = self.window.hour_bounds(hour) else {
            return Vec::new();
        };

        self.visible
            .iter()
            .map(|interval| interval.event)
            .filter(|event| event.touches(from, to))
            .collect()
    }

    pub fn place(&self, metrics: &GridMetrics) -> Vec<PlacedEvent<'a>> {
        let placed: Vec<PlacedEvent<'a>> = self
            .visible
            .iter()
            .map(|interval| {
                let slot = OverlapGroup::from_candidates(*interval, &self.visible).column_slot();
                PlacedEvent {
                    interval: *interval,
                    slot,
                    vertical: metrics.map_vertical(interval),
                    horizontal: metrics.map_horizontal(slot),
                }
            })
            .collect();

        tracing::debug!(
            date = %self.window.date(),
            events = placed.len(),
            "Placed events on day grid"
        );

        placed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::columns::pack;
    use crate::layout::overlap::overlap_group;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        date().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn scenario() -> Vec<Event> {
        vec![
            Event::new("A", "Breakfast run", at(9, 0), Some(at(10, 0))),
            Event::new("B", "Dentist", at(9, 30), Some(at(10, 30))),
            Event::new("C", "Piano lesson", at(11, 0), Some(at(11, 30))),
        ]
    }

    #[test]
    fn scenario_layout_matches_expected_geometry() {
        let events = scenario();
        let timeline = DayTimeline::new(DayWindow::for_date(date()), &events);

        let placed = timeline.place(&GridMetrics::default());
        let summary: Vec<(&str, usize, usize, f64, f64)> = placed
            .iter()
            .map(|p| {
                (
                    p.interval.event_id(),
                    p.slot.column,
                    p.slot.total_columns,
                    p.vertical.top,
                    p.vertical.height,
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("A", 0, 2, 555.0, 60.0),
                ("B", 1, 2, 585.0, 60.0),
                ("C", 0, 1, 675.0, 30.0),
            ]
        );
    }

    #[test]
    fn point_event_is_one_hour_tall() {
        let events = vec![Event::new("D", "Call the plumber", at(14, 0), None)];
        let timeline = DayTimeline::new(DayWindow::for_date(date()), &events);

        let placed = timeline.place(&GridMetrics::default());

        assert_eq!(placed[0].interval.display_end, at(15, 0));
        assert_eq!(placed[0].vertical.height, 60.0);
    }

    #[test]
    fn events_from_other_days_are_not_visible() {
        let mut events = scenario();
        events.push(Event::new(
            "Y",
            "Yesterday",
            at(9, 0) - Duration::days(1),
            Some(at(10, 0) - Duration::days(1)),
        ));

        let timeline = DayTimeline::new(DayWindow::for_date(date()), &events);

        assert_eq!(timeline.len(), 3);
        assert!(timeline.get("Y").is_none());
        assert!(timeline.column_slot("Y").is_none());
    }

    #[test]
    fn events_for_hour_uses_raw_intervals() {
        let mut events = scenario();
        events.push(Event::new("D", "Call", at(14, 0), None));
        let timeline = DayTimeline::new(DayWindow::for_date(date()), &events);

        let ids = |hour| -> Vec<String> {
            timeline.events_for_hour(hour).iter().map(|e| e.id.clone()).collect()
        };

        assert_eq!(ids(9), vec!["A", "B"]);
        assert_eq!(ids(10), vec!["A", "B"]);
        assert_eq!(ids(14), vec!["D"]);
        assert!(ids(15).is_empty());
        assert!(ids(24).is_empty());
    }

    #[test]
    fn placing_twice_is_identical() {
        let events = scenario();
        let timeline = DayTimeline::new(DayWindow::for_date(date()), &events);
        let metrics = GridMetrics::default();

        assert_eq!(timeline.place(&metrics), timeline.place(&metrics));
    }

    fn arbitrary_events() -> impl Strategy<Value = Vec<Event>> {
        prop::collection::vec((0i64..36 * 60, prop::option::of(0i64..300)), 1..12).prop_map(|specs| {
            let base = at(0, 0) - Duration::hours(6);
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (offset, length))| {
                    let start = base + Duration::minutes(offset);
                    Event::new(
                        format!("e{:02}", (i * 7) % 13),
                        "Generated",
                        start,
                        length.map(|minutes| start + Duration::minutes(minutes)),
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn every_visible_event_is_in_its_own_group(events in arbitrary_events()) {
            let timeline = DayTimeline::new(DayWindow::for_date(date()), &events);

            for interval in timeline.visible() {
                let group = timeline.overlap_group(interval.event_id()).unwrap();
                prop_assert!(group.contains(interval.event_id()));
            }
        }

        #[test]
        fn group_columns_are_a_permutation(events in arbitrary_events()) {
            let timeline = DayTimeline::new(DayWindow::for_date(date()), &events);

            for interval in timeline.visible() {
                let group = timeline.overlap_group(interval.event_id()).unwrap();
                let mut columns: Vec<usize> = group
                    .iter()
                    .filter_map(|member| pack(member.event_id(), group.members()))
                    .map(|slot| slot.column)
                    .collect();
                columns.sort_unstable();
                columns.dedup();
                prop_assert_eq!(columns, (0..group.len()).collect::<Vec<_>>());
            }
        }

        #[test]
        fn cached_groups_match_per_call_groups(events in arbitrary_events()) {
            let window = DayWindow::for_date(date());
            let timeline = DayTimeline::new(window, &events);

            for event in events.iter().filter(|e| timeline.get(&e.id).is_some()) {
                let cached = timeline.overlap_group(&event.id).unwrap();
                let direct = overlap_group(event, &events, &window).unwrap();
                prop_assert_eq!(cached.event_ids(), direct.event_ids());
            }
        }

        #[test]
        fn clipped_intervals_never_invert(events in arbitrary_events()) {
            let timeline = DayTimeline::new(DayWindow::for_date(date()), &events);

            for interval in timeline.visible() {
                prop_assert!(interval.display_start <= interval.display_end);
                prop_assert!(interval.display_start >= timeline.window().start());
                prop_assert!(interval.display_end <= timeline.window().end());
            }
        }
    }
}
