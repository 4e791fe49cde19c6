use crate::model::{Goal, Note, Priority, Task};
use crate::timer::{FOCUS_SECONDS, TimerState};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectCount {
    pub subject: String,
    pub count: usize,
}

/// Figures shown in the header and on the analytics tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: u32,
    pub completed_sessions: u32,
    pub focus_hours: f64,
    pub total_goals: usize,
    pub completed_goals: usize,
    pub total_notes: usize,
    pub by_priority: Vec<PriorityCount>,
    pub notes_by_subject: Vec<SubjectCount>,
    pub tasks_by_subject: Vec<SubjectCount>,
}

pub fn completed_task_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| task.completed).count()
}

/// Percentage of completed tasks, rounded half away from zero. Zero when empty.
pub fn completion_rate(tasks: &[Task]) -> u32 {
    if tasks.is_empty() {
        return 0;
    }
    let completed = completed_task_count(tasks) as f64;
    (completed * 100.0 / tasks.len() as f64).round() as u32
}

/// Hours of completed focus time, rounded to one decimal.
pub fn focus_hours(completed_sessions: u32) -> f64 {
    let minutes_per_session = f64::from(FOCUS_SECONDS / 60);
    let hours = f64::from(completed_sessions) * minutes_per_session / 60.0;
    (hours * 10.0).round() / 10.0
}

pub fn completed_goal_count(goals: &[Goal]) -> usize {
    goals.iter().filter(|goal| goal.is_complete()).count()
}

pub fn goal_progress_percent(goal: &Goal) -> u32 {
    if goal.target == 0 {
        return 0;
    }
    (f64::from(goal.current) * 100.0 / f64::from(goal.target)).round() as u32
}

/// Totals per priority, highest first.
pub fn priority_breakdown(tasks: &[Task]) -> Vec<PriorityCount> {
    Priority::DESCENDING
        .iter()
        .map(|&priority| {
            let matching = tasks.iter().filter(|task| task.priority == priority);
            PriorityCount {
                priority,
                total: matching.clone().count(),
                completed: matching.filter(|task| task.completed).count(),
            }
        })
        .collect()
}

pub fn notes_by_subject(notes: &[Note]) -> Vec<SubjectCount> {
    count_subjects(notes.iter().map(|note| note.subject.as_deref()))
}

pub fn tasks_by_subject(tasks: &[Task]) -> Vec<SubjectCount> {
    count_subjects(tasks.iter().map(|task| task.subject.as_deref()))
}

// Groups in order of first appearance; missing or blank subjects are skipped.
fn count_subjects<'a>(subjects: impl Iterator<Item = Option<&'a str>>) -> Vec<SubjectCount> {
    let mut counts: Vec<SubjectCount> = Vec::new();
    for subject in subjects.flatten().filter(|s| !s.trim().is_empty()) {
        match counts.iter_mut().find(|entry| entry.subject == subject) {
            Some(entry) => entry.count += 1,
            None => counts.push(SubjectCount {
                subject: subject.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

/// Zero-padded `mm:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn summarize(tasks: &[Task], notes: &[Note], goals: &[Goal], timer: &TimerState) -> Summary {
    Summary {
        total_tasks: tasks.len(),
        completed_tasks: completed_task_count(tasks),
        completion_rate: completion_rate(tasks),
        completed_sessions: timer.completed_sessions,
        focus_hours: focus_hours(timer.completed_sessions),
        total_goals: goals.len(),
        completed_goals: completed_goal_count(goals),
        total_notes: notes.len(),
        by_priority: priority_breakdown(tasks),
        notes_by_subject: notes_by_subject(notes),
        tasks_by_subject: tasks_by_subject(tasks),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        completion_rate, focus_hours, format_clock, goal_progress_percent, notes_by_subject,
        priority_breakdown, tasks_by_subject,
    };
    use crate::model::{Goal, Note, Priority, Task};

    fn task(id: &str, priority: Priority, completed: bool, subject: Option<&str>) -> Task {
        Task {
            id: id.to_string(),
            title: "demo".to_string(),
            priority,
            due_date: None,
            subject: subject.map(str::to_string),
            completed,
            created_at: "2025-12-20T00:00:00Z".to_string(),
        }
    }

    fn note(subject: Option<&str>) -> Note {
        Note {
            id: "note-1".to_string(),
            title: "demo".to_string(),
            content: "body".to_string(),
            subject: subject.map(str::to_string),
            created_at: "2025-12-20T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn completion_rate_is_zero_without_tasks() {
        assert_eq!(completion_rate(&[]), 0);
    }

    #[test]
    fn completion_rate_rounds_to_nearest_percent() {
        let tasks = vec![
            task("task-1", Priority::Low, true, None),
            task("task-2", Priority::Low, false, None),
            task("task-3", Priority::Low, false, None),
        ];
        assert_eq!(completion_rate(&tasks), 33);

        let tasks = vec![
            task("task-1", Priority::Low, true, None),
            task("task-2", Priority::Low, true, None),
            task("task-3", Priority::Low, false, None),
        ];
        assert_eq!(completion_rate(&tasks), 67);
    }

    #[test]
    fn completion_rate_stays_within_bounds() {
        let mut tasks = Vec::new();
        for index in 0..20 {
            tasks.push(task(&format!("task-{index}"), Priority::Medium, index % 3 == 0, None));
            let rate = completion_rate(&tasks);
            assert!(rate <= 100);
        }
        let all_done: Vec<Task> = tasks
            .into_iter()
            .map(|t| Task {
                completed: true,
                ..t
            })
            .collect();
        assert_eq!(completion_rate(&all_done), 100);
    }

    #[test]
    fn focus_hours_rounds_to_one_decimal() {
        assert_eq!(focus_hours(0), 0.0);
        assert_eq!(focus_hours(1), 0.4);
        assert_eq!(focus_hours(3), 1.3);
        assert_eq!(focus_hours(12), 5.0);
    }

    #[test]
    fn priority_breakdown_lists_high_first() {
        let tasks = vec![
            task("task-1", Priority::High, true, None),
            task("task-2", Priority::High, false, None),
            task("task-3", Priority::Low, true, None),
        ];
        let breakdown = priority_breakdown(&tasks);

        let order: Vec<Priority> = breakdown.iter().map(|entry| entry.priority).collect();
        assert_eq!(order, vec![Priority::High, Priority::Medium, Priority::Low]);
        assert_eq!((breakdown[0].total, breakdown[0].completed), (2, 1));
        assert_eq!((breakdown[1].total, breakdown[1].completed), (0, 0));
        assert_eq!((breakdown[2].total, breakdown[2].completed), (1, 1));
    }

    #[test]
    fn notes_by_subject_skips_missing_subjects() {
        let notes = vec![
            note(Some("Math")),
            note(None),
            note(Some("History")),
            note(Some("Math")),
            note(Some("  ")),
        ];
        let grouped = notes_by_subject(&notes);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].subject, "Math");
        assert_eq!(grouped[0].count, 2);
        assert_eq!(grouped[1].subject, "History");
        assert_eq!(grouped[1].count, 1);
    }

    #[test]
    fn tasks_by_subject_is_case_sensitive() {
        let tasks = vec![
            task("task-1", Priority::Low, false, Some("Work")),
            task("task-2", Priority::Low, false, Some("work")),
        ];
        assert_eq!(tasks_by_subject(&tasks).len(), 2);
    }

    #[test]
    fn goal_progress_percent_rounds() {
        let goal = Goal {
            id: "goal-1".to_string(),
            title: "demo".to_string(),
            target: 3,
            current: 2,
            category: None,
            created_at: "2025-12-20T00:00:00Z".to_string(),
        };
        assert_eq!(goal_progress_percent(&goal), 67);
    }

    #[test]
    fn format_clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(299), "04:59");
        assert_eq!(format_clock(5), "00:05");
        assert_eq!(format_clock(0), "00:00");
    }
}
