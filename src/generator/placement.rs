//! Randomized bounded-retry placement for a single class.

use std::ops::Range;

use rand::Rng;

use super::items::{PlacementItem, SessionWindows};
use super::report::{Shortfall, ShortfallReason};
use crate::config::{GeneratorConfig, ScheduleConfig};
use crate::model::{
    ActivityPlacement, Cell, ClassInfo, ClassTimetable, ItemRef, Occupant, PairRole, Session,
    TeacherAvailability, Term,
};

/// Places the items of one class, sharing teacher availability with the rest
/// of the batch.
pub struct ClassPlacer<'a, R> {
    schedule: &'a ScheduleConfig,
    budgets: &'a GeneratorConfig,
    availability: &'a mut TeacherAvailability,
    rng: &'a mut R,
}

impl<'a, R: Rng> ClassPlacer<'a, R> {
    /// Create a placer for one run.
    pub fn new(
        schedule: &'a ScheduleConfig,
        budgets: &'a GeneratorConfig,
        availability: &'a mut TeacherAvailability,
        rng: &'a mut R,
    ) -> Self {
        Self {
            schedule,
            budgets,
            availability,
            rng,
        }
    }

    /// Build the timetable of `class` from scratch.
    ///
    /// Returns the grid and the items that stayed short after both passes.
    pub fn place(
        &mut self,
        class: &ClassInfo,
        term: Term,
        items: &[PlacementItem],
    ) -> (ClassTimetable, Vec<Shortfall>) {
        let mut grid = ClassTimetable::empty(class.id.clone(), class.grade, term, self.schedule.shape());
        self.seed_locked(&mut grid);

        let windows = SessionWindows::for_grade(self.schedule, class.grade);
        let mut placed = vec![0_usize; items.len()];

        for session in [Session::Main, Session::Extra] {
            for (i, item) in items.iter().enumerate() {
                if item.session == session {
                    let budget = self.budgets.main_attempts;
                    let got = self.place_item(&mut grid, item, windows.get(session), placed[i], budget);
                    placed[i] += got;
                }
            }
        }

        for (i, item) in items.iter().enumerate() {
            if placed[i] < item.required {
                tracing::debug!(
                    "second pass for {} in class {} ({}/{})",
                    item.name,
                    class.id,
                    placed[i],
                    item.required
                );
                let budget = self.budgets.second_pass_attempts;
                let got =
                    self.place_item(&mut grid, item, windows.get(item.session), placed[i], budget);
                placed[i] += got;
            }
        }

        let shortfalls = items
            .iter()
            .zip(&placed)
            .filter(|(item, placed)| **placed < item.required)
            .map(|(item, placed)| Shortfall {
                class: class.id.clone(),
                item: item.item.clone(),
                name: item.name.clone(),
                placed: *placed,
                required: item.required,
                reason: if windows.has_periods(item.session) {
                    ShortfallReason::AttemptsExhausted
                } else {
                    ShortfallReason::NoWindow
                },
            })
            .collect();

        (grid, shortfalls)
    }

    /// Put every fixed activity of the grade in its slot, locked.
    fn seed_locked(&self, grid: &mut ClassTimetable) {
        for activity in self
            .schedule
            .activities
            .iter()
            .filter(|a| a.applies_to(grid.grade))
        {
            let ActivityPlacement::Fixed { day, period } = activity.placement else {
                continue;
            };
            let Some(day_idx) = grid.days.iter().position(|d| d.day == day) else {
                continue;
            };
            let Some(cell) = usize::from(period)
                .checked_sub(1)
                .and_then(|idx| grid.days[day_idx].cells.get_mut(idx))
            else {
                continue;
            };
            *cell = Cell {
                occupant: Some(Occupant {
                    item: ItemRef::Activity(activity.id.clone()),
                    name: activity.name.clone(),
                    teacher: None,
                }),
                locked: true,
                double: None,
            };
        }
    }

    /// Try random slots until `item` reaches its requirement or `budget`
    /// attempts are spent. Returns periods placed by this call.
    fn place_item(
        &mut self,
        grid: &mut ClassTimetable,
        item: &PlacementItem,
        windows: &[Range<usize>],
        already: usize,
        budget: u32,
    ) -> usize {
        if windows.iter().all(Range::is_empty) {
            return 0;
        }
        let mut placed = 0;
        let mut attempts = 0;
        while already + placed < item.required && attempts < budget {
            attempts += 1;
            let day = self.rng.random_range(0..windows.len());
            let window = &windows[day];
            if window.is_empty() {
                continue;
            }
            let idx = self.rng.random_range(window.clone());
            if !self.can_place(grid, item, day, idx, window) {
                continue;
            }
            self.put(grid, item, day, idx, None);
            placed += 1;

            let remaining = item.required - already - placed;
            if item.allow_double
                && remaining > 0
                && self.rng.random_bool(self.budgets.double_period_probability)
                && self.can_follow(grid, item, day, idx, window)
            {
                grid.days[day].cells[idx].double = Some(PairRole::Lead);
                self.put(grid, item, day, idx + 1, Some(PairRole::Follow));
                placed += 1;
            }
        }
        if already + placed < item.required {
            tracing::warn!(
                "{} short in class {}: {}/{} after {} attempts",
                item.name,
                grid.class,
                already + placed,
                item.required,
                attempts
            );
        }
        placed
    }

    fn can_place(
        &self,
        grid: &ClassTimetable,
        item: &PlacementItem,
        day: usize,
        idx: usize,
        window: &Range<usize>,
    ) -> bool {
        let cells = &grid.days[day].cells;
        if !cells[idx].is_free() {
            return false;
        }
        let repeats = |neighbour: Option<&Cell>| {
            neighbour.is_some_and(|c| !c.locked && c.holds(&item.item))
        };
        if repeats(idx.checked_sub(1).and_then(|i| cells.get(i))) || repeats(cells.get(idx + 1)) {
            return false;
        }
        if count_in(cells, window, &item.item) >= item.max_per_day {
            return false;
        }
        item.teacher
            .as_ref()
            .is_none_or(|t| self.availability.is_free(t, day, idx))
    }

    /// Whether the period after a freshly placed lead can complete a double.
    fn can_follow(
        &self,
        grid: &ClassTimetable,
        item: &PlacementItem,
        day: usize,
        lead: usize,
        window: &Range<usize>,
    ) -> bool {
        let next = lead + 1;
        let cells = &grid.days[day].cells;
        if next >= window.end || !cells.get(next).is_some_and(Cell::is_free) {
            return false;
        }
        if cells
            .get(next + 1)
            .is_some_and(|c| !c.locked && c.holds(&item.item))
        {
            return false;
        }
        if cells
            .iter()
            .any(|c| c.double.is_some() && c.holds(&item.item))
        {
            return false;
        }
        if count_in(cells, window, &item.item) >= item.max_per_day {
            return false;
        }
        item.teacher
            .as_ref()
            .is_none_or(|t| self.availability.is_free(t, day, next))
    }

    fn put(
        &mut self,
        grid: &mut ClassTimetable,
        item: &PlacementItem,
        day: usize,
        idx: usize,
        double: Option<PairRole>,
    ) {
        grid.days[day].cells[idx] = Cell {
            occupant: Some(item.occupant()),
            locked: false,
            double,
        };
        if let Some(teacher) = &item.teacher {
            self.availability.occupy(teacher, day, idx);
        }
    }
}

fn count_in(cells: &[Cell], window: &Range<usize>, item: &ItemRef) -> usize {
    cells
        .get(window.clone())
        .map_or(0, |slice| slice.iter().filter(|c| c.holds(item)).count())
}
