//! Batch timetable generation with conflict-driven regeneration.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::conflicts::find_clashes;
use super::items::{items_for_class, PlacementItem};
use super::placement::ClassPlacer;
use super::report::{GenerationReport, Shortfall, TeacherClash};
use crate::config::{GeneratorConfig, ScheduleConfig};
use crate::core::error::EngineError;
use crate::model::{
    AssignmentIndex, AvailabilitySeed, ClassId, ClassInfo, ClassTimetable, TeacherAvailability,
    TeachingAssignment, Term,
};

/// Inputs of one generation run.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Grid shape, subjects and activities.
    pub schedule: &'a ScheduleConfig,
    /// Classes to generate, in priority order.
    pub classes: &'a [ClassInfo],
    /// Teacher assignments; only those of `term` are used.
    pub assignments: &'a [TeachingAssignment],
    /// Target term.
    pub term: Term,
    /// Busy slots the run must respect.
    pub seed: &'a AvailabilitySeed,
}

/// Randomized generator holding its budgets and random source.
#[derive(Debug)]
pub struct TimetableGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

/// Placement result of one class.
#[derive(Debug, Clone)]
struct ClassRun {
    timetable: ClassTimetable,
    shortfalls: Vec<Shortfall>,
}

impl TimetableGenerator {
    /// Create a generator. A configured seed makes runs reproducible.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self { config, rng }
    }

    /// Budgets in use.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate timetables for every class of the request.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidConfig`] when the schedule or the budgets are
    /// unusable. Shortfalls and leftover clashes are reported, not returned
    /// as errors.
    pub fn generate(
        &mut self,
        request: &GenerationRequest<'_>,
    ) -> Result<GenerationReport, EngineError> {
        let schedule = request.schedule;
        schedule.validate().map_err(EngineError::InvalidConfig)?;
        let p = self.config.double_period_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(EngineError::InvalidConfig(format!(
                "double_period_probability must be within 0..=1, got {p}"
            )));
        }

        let capacity_violations = schedule.capacity_report();
        for violation in &capacity_violations {
            tracing::warn!("{}", violation);
        }

        tracing::info!(
            "generating timetables for {} classes in {}",
            request.classes.len(),
            request.term
        );

        let index = AssignmentIndex::for_term(request.assignments, request.term);
        let mut unstaffed = Vec::new();
        let items: Vec<Vec<PlacementItem>> = request
            .classes
            .iter()
            .map(|class| {
                let (items, missing) = items_for_class(schedule, class, &index);
                unstaffed.extend(missing);
                items
            })
            .collect();

        let mut availability = self.fresh_availability(request, &[]);
        let runs: Vec<ClassRun> = request
            .classes
            .iter()
            .zip(&items)
            .map(|(class, items)| self.place_class(request, &mut availability, class, items))
            .collect();

        let (runs, clashes, regenerations) = self.resolve_clashes(request, &items, runs);

        let mut shortfalls = unstaffed;
        shortfalls.extend(runs.iter().flat_map(|r| r.shortfalls.iter().cloned()));
        let report = GenerationReport {
            term: request.term,
            timetables: runs.into_iter().map(|r| r.timetable).collect(),
            shortfalls,
            capacity_violations,
            clashes,
            regenerations,
        };
        tracing::info!(
            "generated {} timetables: {} shortfalls, {} clashes",
            report.timetables.len(),
            report.shortfalls.len(),
            report.clashes.len()
        );
        Ok(report)
    }

    /// Rebuild clashing classes until the batch is clash-free or the budget
    /// runs out; in the latter case the batch with the fewest clashes wins.
    ///
    /// The first class of every clash keeps its grid; the others are placed
    /// again around it.
    fn resolve_clashes(
        &mut self,
        request: &GenerationRequest<'_>,
        items: &[Vec<PlacementItem>],
        mut runs: Vec<ClassRun>,
    ) -> (Vec<ClassRun>, Vec<TeacherClash>, u32) {
        let mut regenerations = 0;
        let mut best: Option<(Vec<ClassRun>, Vec<TeacherClash>)> = None;
        let clashes = loop {
            let clashes = find_clashes(&timetables_of(&runs));
            if clashes.is_empty() {
                break clashes;
            }
            if best.as_ref().is_none_or(|(_, c)| clashes.len() < c.len()) {
                best = Some((runs.clone(), clashes.clone()));
            }
            if regenerations >= self.config.max_regenerations {
                tracing::warn!(
                    "{} teacher clashes left after {} regenerations, keeping best batch",
                    clashes.len(),
                    regenerations
                );
                let (best_runs, best_clashes) = best.take().unwrap_or((runs, clashes));
                runs = best_runs;
                break best_clashes;
            }

            regenerations += 1;
            let victims: HashSet<ClassId> = clashes
                .iter()
                .flat_map(|c| c.classes.iter().skip(1).cloned())
                .collect();
            tracing::debug!(
                "regeneration {}: rebuilding {} classes",
                regenerations,
                victims.len()
            );

            let kept: Vec<&ClassTimetable> = runs
                .iter()
                .map(|r| &r.timetable)
                .filter(|t| !victims.contains(&t.class))
                .collect();
            let mut availability = self.fresh_availability(request, &kept);
            for (i, class) in request.classes.iter().enumerate() {
                if victims.contains(&class.id) {
                    runs[i] = self.place_class(request, &mut availability, class, &items[i]);
                }
            }
        };
        (runs, clashes, regenerations)
    }

    fn fresh_availability(
        &self,
        request: &GenerationRequest<'_>,
        kept: &[&ClassTimetable],
    ) -> TeacherAvailability {
        let mut availability = TeacherAvailability::from_seed(
            request.schedule.weekdays(),
            request.schedule.width(),
            request.seed,
        );
        for timetable in kept {
            availability.occupy_timetable(timetable);
        }
        availability
    }

    fn place_class(
        &mut self,
        request: &GenerationRequest<'_>,
        availability: &mut TeacherAvailability,
        class: &ClassInfo,
        items: &[PlacementItem],
    ) -> ClassRun {
        let (timetable, shortfalls) =
            ClassPlacer::new(request.schedule, &self.config, availability, &mut self.rng)
                .place(class, request.term, items);
        ClassRun {
            timetable,
            shortfalls,
        }
    }
}

fn timetables_of(runs: &[ClassRun]) -> Vec<ClassTimetable> {
    runs.iter().map(|r| r.timetable.clone()).collect()
}
