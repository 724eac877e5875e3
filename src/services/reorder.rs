//! Drag-and-drop reordering of activities across days.
//!
//! `ReorderSession` tracks one pointer gesture: the activity being dragged and
//! the slot currently hovered. The list mutation itself is `move_activity`, a
//! plain function over the owned days so it can be driven without a session.
//!
//! Indices are expected to point at rendered items; an out-of-range source or
//! target is a caller bug and panics like any slice index would.

use serde::{Deserialize, Serialize};

use crate::models::day::DayPlan;
use crate::services::schedule::recompute_times;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    Center,
    After,
}

impl DropPosition {
    /// How far past the hovered activity the dragged one lands.
    /// Center drops behave like after.
    pub fn index_offset(&self) -> usize {
        match self {
            DropPosition::Before => 0,
            DropPosition::Center | DropPosition::After => 1,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ActivityRef {
    pub day_index: usize,
    pub activity_index: usize,
}

impl ActivityRef {
    pub fn new(day_index: usize, activity_index: usize) -> Self {
        Self {
            day_index,
            activity_index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub source_day_index: usize,
    pub source_activity_index: usize,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub day_index: usize,
    pub activity_index: usize,
    pub position: DropPosition,
}

/// Moves one activity and recomputes the times of every list it touched.
/// Returns false when the drop lands on the activity's own slot.
pub fn move_activity(
    days: &mut [DayPlan],
    source: ActivityRef,
    target: ActivityRef,
    position: DropPosition,
) -> bool {
    let same_day = source.day_index == target.day_index;
    let mut insert_at = target.activity_index + position.index_offset();

    if same_day && source.activity_index == insert_at {
        return false;
    }
    // removing the source shifts everything after it one slot left
    if same_day && source.activity_index < insert_at {
        insert_at -= 1;
    }

    let moved = days[source.day_index]
        .activities
        .remove(source.activity_index);
    days[target.day_index].activities.insert(insert_at, moved);

    recompute_times(&mut days[target.day_index].activities);
    if !same_day {
        recompute_times(&mut days[source.day_index].activities);
    }

    log::debug!(
        "Moved activity {}:{} to {}:{}",
        source.day_index,
        source.activity_index,
        target.day_index,
        insert_at
    );
    true
}

/// Sets a time by hand. The neighbours are not checked and the value stays
/// until the next move recomputes the day.
pub fn set_activity_time(
    days: &mut [DayPlan],
    activity: ActivityRef,
    time: impl Into<String>,
) {
    days[activity.day_index].activities[activity.activity_index].time = time.into();
}

/// State of one drag gesture. Idle when `drag` is `None`.
#[derive(Debug, Default, Clone)]
pub struct ReorderSession {
    drag: Option<DragState>,
    drop_target: Option<DropTarget>,
}

impl ReorderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_state(&self) -> Option<DragState> {
        self.drag
    }

    pub fn drop_target(&self) -> Option<DropTarget> {
        self.drop_target
    }

    pub fn drag_start(&mut self, day_index: usize, activity_index: usize) {
        self.drag = Some(DragState {
            source_day_index: day_index,
            source_activity_index: activity_index,
        });
        self.drop_target = None;
    }

    /// The most recently entered slot becomes the target.
    pub fn drag_enter(&mut self, day_index: usize, activity_index: usize, position: DropPosition) {
        if self.drag.is_none() {
            return;
        }
        self.drop_target = Some(DropTarget {
            day_index,
            activity_index,
            position,
        });
    }

    /// Pointer left every slot; the drag itself continues.
    pub fn drag_leave(&mut self) {
        self.drop_target = None;
    }

    /// Gesture cancelled or ended outside any slot.
    pub fn drag_end(&mut self) {
        self.drag = None;
        self.drop_target = None;
    }

    /// Completes the gesture on the given slot. A drop with no active drag is
    /// ignored. Returns whether any activity moved.
    pub fn drop(
        &mut self,
        days: &mut [DayPlan],
        day_index: usize,
        activity_index: usize,
        position: DropPosition,
    ) -> bool {
        let drag = match self.drag.take() {
            Some(drag) => drag,
            None => {
                self.drop_target = None;
                return false;
            }
        };
        self.drop_target = None;

        move_activity(
            days,
            ActivityRef::new(drag.source_day_index, drag.source_activity_index),
            ActivityRef::new(day_index, activity_index),
            position,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::{Activity, ActivityCategory};

    fn day(title: &str, names: &[&str]) -> DayPlan {
        let mut plan = DayPlan::new(title, "");
        plan.activities = names
            .iter()
            .map(|name| Activity::new("", *name, "", ActivityCategory::Activity))
            .collect();
        recompute_times(&mut plan.activities);
        plan
    }

    fn names(day: &DayPlan) -> Vec<&str> {
        day.activities.iter().map(|a| a.location.as_str()).collect()
    }

    fn times(day: &DayPlan) -> Vec<&str> {
        day.activities.iter().map(|a| a.time.as_str()).collect()
    }

    #[test]
    fn test_move_to_empty_day() {
        let mut days = vec![day("A", &["X", "Y", "Z"]), day("B", &[])];
        let moved = move_activity(
            &mut days,
            ActivityRef::new(0, 0),
            ActivityRef::new(1, 0),
            DropPosition::Before,
        );
        assert!(moved);
        assert_eq!(names(&days[0]), vec!["Y", "Z"]);
        assert_eq!(times(&days[0]), vec!["9:00 AM", "11:00 AM"]);
        assert_eq!(names(&days[1]), vec!["X"]);
        assert_eq!(times(&days[1]), vec!["9:00 AM"]);
    }

    #[test]
    fn test_move_onto_own_slot_is_noop() {
        let mut days = vec![day("A", &["X", "Y", "Z"])];
        set_activity_time(&mut days, ActivityRef::new(0, 2), "6:30 PM");
        let before = days.clone();

        assert!(!move_activity(
            &mut days,
            ActivityRef::new(0, 1),
            ActivityRef::new(0, 1),
            DropPosition::Before
        ));
        assert!(!move_activity(
            &mut days,
            ActivityRef::new(0, 1),
            ActivityRef::new(0, 0),
            DropPosition::After
        ));
        assert_eq!(days, before);
    }

    #[test]
    fn test_move_down_within_day() {
        let mut days = vec![day("A", &["X", "Y", "Z"])];
        assert!(move_activity(
            &mut days,
            ActivityRef::new(0, 0),
            ActivityRef::new(0, 2),
            DropPosition::After
        ));
        assert_eq!(names(&days[0]), vec!["Y", "Z", "X"]);
        assert_eq!(times(&days[0]), vec!["9:00 AM", "11:00 AM", "1:00 PM"]);
    }

    #[test]
    fn test_move_down_before_target() {
        // target index is corrected for the removal of X
        let mut days = vec![day("A", &["X", "Y", "Z"])];
        assert!(move_activity(
            &mut days,
            ActivityRef::new(0, 0),
            ActivityRef::new(0, 2),
            DropPosition::Before
        ));
        assert_eq!(names(&days[0]), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_move_up_within_day() {
        let mut days = vec![day("A", &["X", "Y", "Z"])];
        assert!(move_activity(
            &mut days,
            ActivityRef::new(0, 2),
            ActivityRef::new(0, 0),
            DropPosition::Before
        ));
        assert_eq!(names(&days[0]), vec!["Z", "X", "Y"]);
    }

    #[test]
    fn test_center_behaves_like_after() {
        let mut center = vec![day("A", &["X", "Y"]), day("B", &["P", "Q"])];
        let mut after = center.clone();
        move_activity(
            &mut center,
            ActivityRef::new(0, 1),
            ActivityRef::new(1, 0),
            DropPosition::Center,
        );
        move_activity(
            &mut after,
            ActivityRef::new(0, 1),
            ActivityRef::new(1, 0),
            DropPosition::After,
        );
        assert_eq!(center, after);
        assert_eq!(names(&center[1]), vec!["P", "Y", "Q"]);
    }

    #[test]
    fn test_move_across_days_conserves_activities() {
        let mut days = vec![day("A", &["X", "Y"]), day("B", &["P", "Q", "R"])];
        move_activity(
            &mut days,
            ActivityRef::new(1, 2),
            ActivityRef::new(0, 0),
            DropPosition::After,
        );
        assert_eq!(names(&days[0]), vec!["X", "R", "Y"]);
        assert_eq!(names(&days[1]), vec!["P", "Q"]);
        assert_eq!(days[0].activities.len() + days[1].activities.len(), 5);
        assert_eq!(times(&days[0]), vec!["9:00 AM", "11:00 AM", "1:00 PM"]);
        assert_eq!(times(&days[1]), vec!["9:00 AM", "11:00 AM"]);
    }

    #[test]
    fn test_move_discards_manual_times() {
        let mut days = vec![day("A", &["X", "Y", "Z"]), day("B", &["P"])];
        set_activity_time(&mut days, ActivityRef::new(0, 1), "4:15 PM");
        set_activity_time(&mut days, ActivityRef::new(0, 0), "7:00 AM");
        assert_eq!(times(&days[0]), vec!["7:00 AM", "4:15 PM", "1:00 PM"]);

        move_activity(
            &mut days,
            ActivityRef::new(1, 0),
            ActivityRef::new(0, 2),
            DropPosition::After,
        );
        assert_eq!(
            times(&days[0]),
            vec!["9:00 AM", "11:00 AM", "1:00 PM", "3:00 PM"]
        );
        assert!(days[1].activities.is_empty());
    }

    #[test]
    fn test_session_drag_and_drop() {
        let mut days = vec![day("A", &["X", "Y", "Z"]), day("B", &[])];
        let mut session = ReorderSession::new();
        assert!(!session.is_dragging());

        session.drag_start(0, 0);
        session.drag_enter(0, 1, DropPosition::Before);
        session.drag_enter(1, 0, DropPosition::After);
        assert_eq!(
            session.drop_target(),
            Some(DropTarget {
                day_index: 1,
                activity_index: 0,
                position: DropPosition::After
            })
        );

        session.drag_leave();
        assert!(session.drop_target().is_none());
        assert!(session.is_dragging());

        assert!(session.drop(&mut days, 1, 0, DropPosition::Before));
        assert!(!session.is_dragging());
        assert!(session.drop_target().is_none());
        assert_eq!(names(&days[0]), vec!["Y", "Z"]);
        assert_eq!(names(&days[1]), vec!["X"]);
    }

    #[test]
    fn test_drop_without_drag_is_ignored() {
        let mut days = vec![day("A", &["X", "Y"])];
        let before = days.clone();
        let mut session = ReorderSession::new();

        session.drag_enter(0, 1, DropPosition::After);
        assert!(session.drop_target().is_none());
        assert!(!session.drop(&mut days, 0, 1, DropPosition::After));
        assert_eq!(days, before);
    }

    #[test]
    fn test_cancel_clears_state() {
        let mut session = ReorderSession::new();
        session.drag_start(2, 3);
        assert_eq!(
            session.drag_state(),
            Some(DragState {
                source_day_index: 2,
                source_activity_index: 3
            })
        );
        session.drag_enter(2, 0, DropPosition::Center);
        session.drag_end();
        assert!(session.drag_state().is_none());
        assert!(session.drop_target().is_none());
    }
}
