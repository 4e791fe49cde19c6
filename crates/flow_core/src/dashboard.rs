use crate::analytics::{self, Summary};
use crate::error::AppError;
use crate::forms::{GoalForm, NoteForm, TaskForm};
use crate::model::{Goal, Note, Tab, Task};
use crate::timer::{TickOutcome, TimerState};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

/// In-memory state behind every dashboard view.
///
/// Collections are never edited in place: each mutation builds the next
/// sequence and swaps it in, keeping insertion order.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    tasks: Vec<Task>,
    notes: Vec<Note>,
    goals: Vec<Goal>,
    timer: TimerState,
    active_tab: Tab,
    #[serde(skip)]
    task_form: TaskForm,
    #[serde(skip)]
    note_form: NoteForm,
    #[serde(skip)]
    goal_form: GoalForm,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab(tab: Tab) -> Self {
        Self {
            active_tab: tab,
            ..Self::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id.trim())
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id.trim())
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id.trim())
    }

    pub fn task_form(&self) -> &TaskForm {
        &self.task_form
    }

    pub fn task_form_mut(&mut self) -> &mut TaskForm {
        &mut self.task_form
    }

    pub fn note_form(&self) -> &NoteForm {
        &self.note_form
    }

    pub fn note_form_mut(&mut self) -> &mut NoteForm {
        &mut self.note_form
    }

    pub fn goal_form(&self) -> &GoalForm {
        &self.goal_form
    }

    pub fn goal_form_mut(&mut self) -> &mut GoalForm {
        &mut self.goal_form
    }

    pub fn select_tab(&mut self, tab: Tab) {
        debug!(from = %self.active_tab, to = %tab, "tab selected");
        self.active_tab = tab;
    }

    /// Commits the task form. On rejection neither the list nor the form changes.
    pub fn submit_task(&mut self) -> Result<Task, AppError> {
        let valid = self.task_form.validate()?;
        let (created_at, nanos) = creation_stamp()?;

        let task = Task {
            id: unique_id("task", nanos, |candidate| self.task(candidate).is_some()),
            title: valid.title,
            priority: valid.priority,
            due_date: valid.due_date,
            subject: valid.subject,
            completed: false,
            created_at,
        };

        self.tasks = appended(&self.tasks, task.clone());
        self.task_form = TaskForm::default();
        debug!(id = %task.id, total = self.tasks.len(), "task added");
        Ok(task)
    }

    pub fn submit_note(&mut self) -> Result<Note, AppError> {
        let valid = self.note_form.validate()?;
        let (created_at, nanos) = creation_stamp()?;

        let note = Note {
            id: unique_id("note", nanos, |candidate| self.note(candidate).is_some()),
            title: valid.title,
            content: valid.content,
            subject: valid.subject,
            created_at,
        };

        self.notes = appended(&self.notes, note.clone());
        self.note_form = NoteForm::default();
        debug!(id = %note.id, total = self.notes.len(), "note added");
        Ok(note)
    }

    pub fn submit_goal(&mut self) -> Result<Goal, AppError> {
        let valid = self.goal_form.validate()?;
        let (created_at, nanos) = creation_stamp()?;

        let goal = Goal {
            id: unique_id("goal", nanos, |candidate| self.goal(candidate).is_some()),
            title: valid.title,
            target: valid.target,
            current: valid.current,
            category: valid.category,
            created_at,
        };

        self.goals = appended(&self.goals, goal.clone());
        self.goal_form = GoalForm::default();
        debug!(id = %goal.id, total = self.goals.len(), "goal added");
        Ok(goal)
    }

    pub fn clear_task_form(&mut self) {
        self.task_form = TaskForm::default();
    }

    pub fn clear_note_form(&mut self) {
        self.note_form = NoteForm::default();
    }

    pub fn clear_goal_form(&mut self) {
        self.goal_form = GoalForm::default();
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<Task, AppError> {
        let trimmed_id = required_id(id)?;
        if self.task(trimmed_id).is_none() {
            return Err(AppError::not_found(format!("task {trimmed_id} not found")));
        }

        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == trimmed_id {
                    Task {
                        completed: !task.completed,
                        ..task.clone()
                    }
                } else {
                    task.clone()
                }
            })
            .collect();

        let updated = self
            .task(trimmed_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("task {trimmed_id} not found")))?;
        debug!(id = %updated.id, completed = updated.completed, "task toggled");
        Ok(updated)
    }

    /// Moves a goal's progress by `delta`, clamped into `0..=target`.
    pub fn adjust_goal_progress(&mut self, id: &str, delta: i64) -> Result<Goal, AppError> {
        let trimmed_id = required_id(id)?;
        if self.goal(trimmed_id).is_none() {
            return Err(AppError::not_found(format!("goal {trimmed_id} not found")));
        }

        self.goals = self
            .goals
            .iter()
            .map(|goal| {
                if goal.id == trimmed_id {
                    goal.adjusted(delta)
                } else {
                    goal.clone()
                }
            })
            .collect();

        let updated = self
            .goal(trimmed_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("goal {trimmed_id} not found")))?;
        debug!(
            id = %updated.id,
            delta,
            current = updated.current,
            target = updated.target,
            "goal progress adjusted"
        );
        Ok(updated)
    }

    pub fn start_timer(&mut self) -> TimerState {
        self.timer = self.timer.start();
        debug!(remaining = self.timer.remaining_seconds, "timer started");
        self.timer
    }

    pub fn pause_timer(&mut self) -> TimerState {
        self.timer = self.timer.pause();
        debug!(remaining = self.timer.remaining_seconds, "timer paused");
        self.timer
    }

    pub fn reset_timer(&mut self) -> TimerState {
        self.timer = self.timer.reset();
        debug!("timer reset");
        self.timer
    }

    pub fn tick_timer(&mut self) -> TickOutcome {
        let (next, outcome) = self.timer.tick();
        self.timer = next;
        match outcome {
            TickOutcome::FocusCompleted => info!(
                sessions = next.completed_sessions,
                "focus session completed, break loaded"
            ),
            TickOutcome::BreakCompleted => info!("break completed, focus loaded"),
            TickOutcome::Ticked | TickOutcome::Idle => {}
        }
        outcome
    }

    pub fn summary(&self) -> Summary {
        analytics::summarize(&self.tasks, &self.notes, &self.goals, &self.timer)
    }
}

fn appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    next
}

fn required_id(id: &str) -> Result<&str, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    Ok(trimmed)
}

fn creation_stamp() -> Result<(String, i128), AppError> {
    let now = OffsetDateTime::now_utc();
    let created_at = now
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    Ok((created_at, now.unix_timestamp_nanos()))
}

// Creation-time ids can collide when two entities land on the same clock
// reading; bump until free.
fn unique_id(prefix: &str, seed: i128, taken: impl Fn(&str) -> bool) -> String {
    let mut value = seed;
    loop {
        let candidate = format!("{prefix}-{value}");
        if !taken(&candidate) {
            return candidate;
        }
        value += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{Dashboard, unique_id};
    use crate::forms::{GoalForm, NoteForm, TaskForm};
    use crate::model::{Priority, Tab};
    use crate::timer::{BREAK_SECONDS, FOCUS_SECONDS, TickOutcome, TimerState};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    fn dashboard_with_task(title: &str) -> (Dashboard, String) {
        let mut dashboard = Dashboard::new();
        dashboard.task_form_mut().title = title.to_string();
        let task = dashboard.submit_task().unwrap();
        (dashboard, task.id)
    }

    fn dashboard_with_goal(target: &str) -> (Dashboard, String) {
        let mut dashboard = Dashboard::new();
        *dashboard.goal_form_mut() = GoalForm {
            title: "Read pages".into(),
            target: target.into(),
            ..GoalForm::default()
        };
        let goal = dashboard.submit_goal().unwrap();
        (dashboard, goal.id)
    }

    #[test]
    fn new_dashboard_is_empty_on_tasks_tab() {
        let dashboard = Dashboard::new();
        assert!(dashboard.tasks().is_empty());
        assert!(dashboard.notes().is_empty());
        assert!(dashboard.goals().is_empty());
        assert_eq!(*dashboard.timer(), TimerState::default());
        assert_eq!(dashboard.active_tab(), Tab::Tasks);
    }

    #[test]
    fn submit_task_appends_and_clears_form() {
        let mut dashboard = Dashboard::new();
        *dashboard.task_form_mut() = TaskForm {
            title: "Write report".into(),
            priority: Priority::High,
            due_date: "".into(),
            subject: "Work".into(),
        };

        let task = dashboard.submit_task().unwrap();

        assert_eq!(dashboard.tasks().len(), 1);
        assert_eq!(dashboard.tasks()[0], task);
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.subject.as_deref(), Some("Work"));
        assert_eq!(task.due_date, None);
        assert!(task.id.starts_with("task-"));
        OffsetDateTime::parse(&task.created_at, &Rfc3339).unwrap();
        assert_eq!(*dashboard.task_form(), TaskForm::default());
    }

    #[test]
    fn submit_task_with_blank_title_changes_nothing() {
        let mut dashboard = Dashboard::new();
        let form = TaskForm {
            title: "  ".into(),
            priority: Priority::Low,
            due_date: "2025-12-21".into(),
            subject: "Work".into(),
        };
        *dashboard.task_form_mut() = form.clone();

        let err = dashboard.submit_task().unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert!(dashboard.tasks().is_empty());
        assert_eq!(*dashboard.task_form(), form);
    }

    #[test]
    fn submitted_ids_are_unique_and_ordered() {
        let mut dashboard = Dashboard::new();
        for index in 0..25 {
            dashboard.task_form_mut().title = format!("task {index}");
            dashboard.submit_task().unwrap();
        }

        let mut ids: Vec<&str> = dashboard.tasks().iter().map(|t| t.id.as_str()).collect();
        let titles: Vec<String> = dashboard.tasks().iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles[0], "task 0");
        assert_eq!(titles[24], "task 24");
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 25);
    }

    #[test]
    fn unique_id_skips_taken_values() {
        let id = unique_id("task", 10, |candidate| candidate == "task-10" || candidate == "task-11");
        assert_eq!(id, "task-12");
    }

    #[test]
    fn toggle_task_flips_only_matching_task() {
        let (mut dashboard, first) = dashboard_with_task("first");
        dashboard.task_form_mut().title = "second".into();
        let second = dashboard.submit_task().unwrap().id;

        let toggled = dashboard.toggle_task(&first).unwrap();
        assert!(toggled.completed);
        assert!(!dashboard.task(&second).unwrap().completed);
        assert_eq!(dashboard.summary().completion_rate, 50);

        let toggled_back = dashboard.toggle_task(&first).unwrap();
        assert!(!toggled_back.completed);
    }

    #[test]
    fn toggle_task_example_reaches_full_completion() {
        let mut dashboard = Dashboard::new();
        let form = dashboard.task_form_mut();
        form.set_field("title", "Write report").unwrap();
        form.set_field("priority", "high").unwrap();
        form.set_field("due", "").unwrap();
        form.set_field("subject", "Work").unwrap();
        let task = dashboard.submit_task().unwrap();

        assert_eq!(dashboard.tasks().len(), 1);
        assert!(!dashboard.tasks()[0].completed);

        dashboard.toggle_task(&task.id).unwrap();
        assert!(dashboard.tasks()[0].completed);
        assert_eq!(dashboard.summary().completion_rate, 100);
    }

    #[test]
    fn toggle_task_rejects_unknown_id() {
        let (mut dashboard, _) = dashboard_with_task("demo");
        let before = dashboard.clone();

        let err = dashboard.toggle_task("task-missing").unwrap_err();
        assert_eq!(err.code(), "not_found");
        assert_eq!(dashboard, before);

        let err = dashboard.toggle_task("  ").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn submit_note_requires_content() {
        let mut dashboard = Dashboard::new();
        dashboard.note_form_mut().title = "Lecture 3".into();
        assert!(dashboard.submit_note().is_err());
        assert!(dashboard.notes().is_empty());
        assert_eq!(dashboard.note_form().title, "Lecture 3");

        dashboard.note_form_mut().content = "Closures capture by reference".into();
        dashboard.note_form_mut().subject = "Rust".into();
        let note = dashboard.submit_note().unwrap();
        assert_eq!(dashboard.notes().len(), 1);
        assert_eq!(note.subject.as_deref(), Some("Rust"));
        assert_eq!(*dashboard.note_form(), NoteForm::default());
    }

    #[test]
    fn submit_goal_rejects_bad_target_and_keeps_form() {
        let mut dashboard = Dashboard::new();
        *dashboard.goal_form_mut() = GoalForm {
            title: "Read pages".into(),
            target: "0".into(),
            ..GoalForm::default()
        };

        assert!(dashboard.submit_goal().is_err());
        assert!(dashboard.goals().is_empty());
        assert_eq!(dashboard.goal_form().target, "0");
    }

    #[test]
    fn adjust_goal_progress_clamps_example() {
        let (mut dashboard, id) = dashboard_with_goal("100");
        assert_eq!(dashboard.goal(&id).unwrap().current, 0);

        let goal = dashboard.adjust_goal_progress(&id, 150).unwrap();
        assert_eq!(goal.current, 100);
        assert!(goal.is_complete());
        assert_eq!(dashboard.summary().completed_goals, 1);
    }

    #[test]
    fn adjust_goal_progress_stays_in_bounds_over_sequence() {
        let (mut dashboard, id) = dashboard_with_goal("7");
        let deltas = [3, -1, 9, -20, 1, 1, 6, -2, i64::MAX, i64::MIN, 4];
        for delta in deltas {
            let goal = dashboard.adjust_goal_progress(&id, delta).unwrap();
            assert!(goal.current <= goal.target, "delta {delta} escaped bounds");
        }
    }

    #[test]
    fn adjust_goal_progress_rejects_unknown_id() {
        let (mut dashboard, _) = dashboard_with_goal("5");
        let err = dashboard.adjust_goal_progress("goal-missing", 1).unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn timer_round_trip_through_dashboard() {
        let mut dashboard = Dashboard::new();
        dashboard.start_timer();
        let mut last = TickOutcome::Idle;
        for _ in 0..FOCUS_SECONDS {
            last = dashboard.tick_timer();
        }
        assert_eq!(last, TickOutcome::FocusCompleted);
        assert_eq!(dashboard.timer().remaining_seconds, BREAK_SECONDS);
        assert!(dashboard.timer().is_break);
        assert!(!dashboard.timer().is_running);
        assert_eq!(dashboard.summary().completed_sessions, 1);

        dashboard.start_timer();
        for _ in 0..BREAK_SECONDS {
            dashboard.tick_timer();
        }
        assert_eq!(dashboard.timer().remaining_seconds, FOCUS_SECONDS);
        assert!(!dashboard.timer().is_break);
        assert!(!dashboard.timer().is_running);
        assert_eq!(dashboard.summary().completed_sessions, 1);
    }

    #[test]
    fn reset_timer_returns_to_paused_focus() {
        let mut dashboard = Dashboard::new();
        dashboard.start_timer();
        dashboard.tick_timer();
        let state = dashboard.reset_timer();
        assert_eq!(state.remaining_seconds, FOCUS_SECONDS);
        assert!(!state.is_running);
        assert!(!state.is_break);
    }

    #[test]
    fn select_tab_switches_view() {
        let mut dashboard = Dashboard::with_tab(Tab::Goals);
        assert_eq!(dashboard.active_tab(), Tab::Goals);
        dashboard.select_tab(Tab::Analytics);
        assert_eq!(dashboard.active_tab(), Tab::Analytics);
    }
}
