//! Hover / pin state for row serials and year ticks, plus the selected
//! milestone. Presentation only: nothing here feeds back into layout.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where one highlight channel currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Hovered,
    Pinned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightEvent {
    SerialHover(BTreeSet<usize>),
    SerialLeave,
    SerialClick(BTreeSet<usize>),
    YearHover(i32),
    YearLeave,
    YearClick(i32),
    MilestoneClick(Uuid),
    CloseMilestone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightState {
    pub hovered_serials: BTreeSet<usize>,
    pub pinned_serials: Option<BTreeSet<usize>>,
    pub hovered_year: Option<i32>,
    pub pinned_year: Option<i32>,
    pub selected_milestone: Option<Uuid>,
}

impl HighlightState {
    pub fn apply(mut self, event: HighlightEvent) -> Self {
        match event {
            HighlightEvent::SerialHover(serials) => self.hovered_serials = serials,
            HighlightEvent::SerialLeave => self.hovered_serials.clear(),
            HighlightEvent::SerialClick(serials) => {
                self.hovered_serials.clear();
                self.pinned_serials = match self.pinned_serials {
                    Some(pinned) if pinned == serials => None,
                    _ => Some(serials),
                };
            }
            HighlightEvent::YearHover(year) => self.hovered_year = Some(year),
            HighlightEvent::YearLeave => self.hovered_year = None,
            HighlightEvent::YearClick(year) => {
                self.hovered_year = None;
                self.pinned_year = match self.pinned_year {
                    Some(pinned) if pinned == year => None,
                    _ => Some(year),
                };
            }
            HighlightEvent::MilestoneClick(id) => {
                self.selected_milestone = match self.selected_milestone {
                    Some(selected) if selected == id => None,
                    _ => Some(id),
                };
            }
            HighlightEvent::CloseMilestone => self.selected_milestone = None,
        }
        self
    }

    /// In-place variant for the shell.
    pub fn handle(&mut self, event: HighlightEvent) {
        *self = std::mem::take(self).apply(event);
    }

    pub fn serial_phase(&self) -> Phase {
        if self.pinned_serials.is_some() {
            Phase::Pinned
        } else if !self.hovered_serials.is_empty() {
            Phase::Hovered
        } else {
            Phase::Idle
        }
    }

    pub fn year_phase(&self) -> Phase {
        if self.pinned_year.is_some() {
            Phase::Pinned
        } else if self.hovered_year.is_some() {
            Phase::Hovered
        } else {
            Phase::Idle
        }
    }

    /// Serials to emphasise: the pinned set, else the hovered one.
    pub fn highlighted_serials(&self) -> &BTreeSet<usize> {
        self.pinned_serials.as_ref().unwrap_or(&self.hovered_serials)
    }

    pub fn is_serial_highlighted(&self, serial: usize) -> bool {
        self.highlighted_serials().contains(&serial)
    }

    pub fn highlighted_year(&self) -> Option<i32> {
        self.pinned_year.or(self.hovered_year)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(serials: &[usize]) -> BTreeSet<usize> {
        serials.iter().copied().collect()
    }

    #[test]
    fn hover_then_leave_returns_to_idle() {
        let state = HighlightState::default().apply(HighlightEvent::SerialHover(set(&[2, 5])));
        assert_eq!(state.serial_phase(), Phase::Hovered);
        assert!(state.is_serial_highlighted(5));
        let state = state.apply(HighlightEvent::SerialLeave);
        assert_eq!(state.serial_phase(), Phase::Idle);
    }

    #[test]
    fn clicking_the_pinned_set_twice_toggles_off() {
        let start = HighlightState::default();
        let once = start.clone().apply(HighlightEvent::SerialClick(set(&[3])));
        assert_eq!(once.serial_phase(), Phase::Pinned);
        let twice = once.apply(HighlightEvent::SerialClick(set(&[3])));
        assert_eq!(twice, start);
    }

    #[test]
    fn clicking_another_set_replaces_the_pin() {
        let state = HighlightState::default()
            .apply(HighlightEvent::SerialClick(set(&[1])))
            .apply(HighlightEvent::SerialClick(set(&[4, 6])));
        assert_eq!(state.pinned_serials, Some(set(&[4, 6])));
    }

    #[test]
    fn pinned_set_wins_over_hover() {
        let state = HighlightState::default()
            .apply(HighlightEvent::SerialClick(set(&[1])))
            .apply(HighlightEvent::SerialHover(set(&[9])));
        assert_eq!(state.highlighted_serials(), &set(&[1]));
        assert_eq!(state.serial_phase(), Phase::Pinned);
    }

    #[test]
    fn year_channel_is_independent_of_serials() {
        let state = HighlightState::default()
            .apply(HighlightEvent::SerialClick(set(&[2])))
            .apply(HighlightEvent::YearHover(2024));
        assert_eq!(state.year_phase(), Phase::Hovered);
        let state = state.apply(HighlightEvent::YearClick(2024));
        assert_eq!(state.pinned_year, Some(2024));
        assert_eq!(state.hovered_year, None);
        assert_eq!(state.serial_phase(), Phase::Pinned);

        let state = state.apply(HighlightEvent::YearClick(2024));
        assert_eq!(state.year_phase(), Phase::Idle);
        assert_eq!(state.highlighted_year(), None);
    }

    #[test]
    fn milestone_selection_toggles_and_closes() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut state = HighlightState::default();
        state.handle(HighlightEvent::MilestoneClick(a));
        assert_eq!(state.selected_milestone, Some(a));
        state.handle(HighlightEvent::MilestoneClick(b));
        assert_eq!(state.selected_milestone, Some(b));
        state.handle(HighlightEvent::MilestoneClick(b));
        assert_eq!(state.selected_milestone, None);
        state.handle(HighlightEvent::MilestoneClick(a));
        state.handle(HighlightEvent::CloseMilestone);
        assert_eq!(state.selected_milestone, None);
    }
}
