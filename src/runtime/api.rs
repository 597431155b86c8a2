//! Engine facade exposing the four trigger points: assignment planning,
//! timetable generation, slot commits and teacher conflict checks.

use parking_lot::Mutex;

use crate::config::{EngineConfig, ScheduleConfig};
use crate::core::{EngineError, Spawn};
use crate::generator::{GenerationReport, GenerationRequest, TimetableGenerator};
use crate::infra::SlotAssignment;
use crate::model::{
    AvailabilitySeed, ClassId, ClassInfo, TeacherId, TeachingAssignment, Term, Weekday,
};
use crate::planner::{AssignmentPlanner, PlanContext, PlanOutcome, PlanRequest};
use crate::service::{SlotCoordinator, TaskHandle};
use crate::util::serde::Priority;

/// Entry point of the engine. Build one with [`crate::builders::build_engine`].
pub struct TimetableEngine<S> {
    config: EngineConfig,
    generator: Mutex<TimetableGenerator>,
    slots: SlotCoordinator<S>,
}

impl<S: Spawn> TimetableEngine<S> {
    /// Assemble an engine from its parts.
    pub fn new(config: EngineConfig, slots: SlotCoordinator<S>) -> Self {
        let generator = TimetableGenerator::new(config.generator.clone());
        Self {
            config,
            generator: Mutex::new(generator),
            slots,
        }
    }

    /// Configuration the engine was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Slot coordinator behind the commit operations.
    #[must_use]
    pub const fn slots(&self) -> &SlotCoordinator<S> {
        &self.slots
    }

    /// Plan teacher assignments for the requested grades and term.
    #[must_use]
    pub fn plan_assignments(&self, ctx: PlanContext<'_>, request: &PlanRequest) -> PlanOutcome {
        AssignmentPlanner::new(ctx).plan(request)
    }

    /// Generate timetables for `classes`, respecting every slot already
    /// committed for other classes in `term`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an unusable schedule, `Store` when committed
    /// slots cannot be read.
    pub fn generate_timetables(
        &self,
        schedule: &ScheduleConfig,
        classes: &[ClassInfo],
        assignments: &[TeachingAssignment],
        term: Term,
    ) -> Result<GenerationReport, EngineError> {
        let regenerating: Vec<ClassId> = classes.iter().map(|c| c.id.clone()).collect();
        let seed = {
            let store = self.slots.store().lock();
            AvailabilitySeed::from_store(&*store, term, &regenerating)?
        };
        let request = GenerationRequest {
            schedule,
            classes,
            assignments,
            term,
            seed: &seed,
        };
        self.generator.lock().generate(&request)
    }

    /// Queue the commit of a generation report, replacing whatever was
    /// committed for its classes.
    ///
    /// # Errors
    ///
    /// `QueueFull` when the queue rejects the task.
    pub fn commit_report(
        &self,
        report: &GenerationReport,
        priority: Priority,
    ) -> Result<TaskHandle<usize>, EngineError> {
        let classes = report.timetables.iter().map(|t| t.class.clone()).collect();
        let slots = report
            .timetables
            .iter()
            .flat_map(SlotAssignment::from_timetable)
            .collect();
        self.slots
            .enqueue_replacement(report.term, classes, slots, priority)
    }

    /// Queue a single-slot change.
    ///
    /// # Errors
    ///
    /// `QueueFull` when the queue rejects the task.
    pub fn enqueue_slot_change(
        &self,
        slot: SlotAssignment,
        priority: Priority,
    ) -> Result<TaskHandle<usize>, EngineError> {
        self.slots.enqueue_slot_change(slot, priority)
    }

    /// Queue an all-or-nothing batch of slot changes.
    ///
    /// # Errors
    ///
    /// `QueueFull` when the queue rejects the task.
    pub fn enqueue_batch(
        &self,
        slots: Vec<SlotAssignment>,
        priority: Priority,
    ) -> Result<TaskHandle<usize>, EngineError> {
        self.slots.enqueue_batch(slots, priority)
    }

    /// Check whether `teacher` is already busy at the slot.
    ///
    /// # Errors
    ///
    /// `TeacherConflict` on a clash, `Store` when the store cannot be read.
    pub fn check_teacher_conflict(
        &self,
        teacher: &TeacherId,
        day: Weekday,
        period: u8,
        term: Term,
    ) -> Result<(), EngineError> {
        self.slots.check_teacher_conflict(teacher, day, period, term)
    }
}
