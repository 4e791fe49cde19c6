//! Text views for each dashboard tab.

use flow_core::analytics::{self, Summary, format_clock};
use flow_core::config::Palette;
use flow_core::dashboard::Dashboard;
use flow_core::forms::{GoalForm, NoteForm, TaskForm};
use flow_core::model::{Goal, Note, Tab, Task};
use flow_core::timer::TimerState;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::Date;
use time::macros::format_description;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Subject")]
    subject: String,
}

#[derive(Tabled)]
struct NoteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Content")]
    content: String,
}

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "%")]
    percent: String,
    #[tabled(rename = "Category")]
    category: String,
}

#[derive(Tabled)]
struct PriorityRow {
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Completed")]
    completed: String,
}

#[derive(Tabled)]
struct SubjectRow {
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Notes")]
    count: usize,
}

const CONTENT_PREVIEW_CHARS: usize = 40;

pub fn render_tab(dashboard: &Dashboard, palette: &Palette) -> String {
    let tab = dashboard.active_tab();
    let body = match tab {
        Tab::Tasks => render_tasks(dashboard.tasks()),
        Tab::Notes => render_notes(dashboard.notes()),
        Tab::Focus => render_timer(dashboard.timer(), palette),
        Tab::Goals => render_goals(dashboard.goals()),
        Tab::Analytics => render_analytics(&dashboard.summary(), palette),
    };
    format!(
        "{}\n{}\n\n{}",
        render_header(&dashboard.summary(), palette),
        render_nav(tab, palette),
        body
    )
}

pub fn render_header(summary: &Summary, palette: &Palette) -> String {
    format!(
        "{}  {} completed | {} focus sessions",
        palette.accentize("FutureFlow"),
        summary.completed_tasks,
        summary.completed_sessions
    )
}

fn render_nav(active: Tab, palette: &Palette) -> String {
    Tab::ALL
        .iter()
        .map(|&tab| {
            if tab == active {
                palette.accentize(&format!("[{}]", tab.label()))
            } else {
                palette.mutedize(&format!(" {} ", tab.label()))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks yet.".to_string();
    }

    let rows = tasks.iter().map(|task| TaskRow {
        done: if task.completed { "[x]" } else { "[ ]" },
        id: task.id.clone(),
        title: task.title.clone(),
        priority: task.priority.to_string(),
        due: task.due_date.as_deref().map(display_date).unwrap_or_default(),
        subject: task.subject.clone().unwrap_or_default(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_notes(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes yet.".to_string();
    }

    let rows = notes.iter().map(|note| NoteRow {
        id: note.id.clone(),
        title: note.title.clone(),
        subject: note.subject.clone().unwrap_or_default(),
        created: note
            .created_at
            .get(..10)
            .unwrap_or(note.created_at.as_str())
            .to_string(),
        content: preview(&note.content),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_goals(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return "No goals yet.".to_string();
    }

    let rows = goals.iter().map(|goal| GoalRow {
        id: goal.id.clone(),
        title: goal.title.clone(),
        progress: format!("{}/{}", goal.current, goal.target),
        percent: format!("{}%", analytics::goal_progress_percent(goal)),
        category: goal.category.clone().unwrap_or_default(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_timer(timer: &TimerState, palette: &Palette) -> String {
    let phase = timer.phase();
    let status = if timer.is_running { "running" } else { "paused" };
    let hint = if timer.is_break {
        "Take a break"
    } else {
        "Stay focused"
    };
    format!(
        "{}\n{}  ({status})\n{}\nSessions completed: {}",
        phase.label(),
        palette.accentize(&format_clock(timer.remaining_seconds)),
        palette.mutedize(hint),
        timer.completed_sessions
    )
}

pub fn render_analytics(summary: &Summary, palette: &Palette) -> String {
    let mut lines = vec![
        format!(
            "Completion rate: {}% ({} of {} tasks completed)",
            palette.accentize(&summary.completion_rate.to_string()),
            summary.completed_tasks,
            summary.total_tasks
        ),
        format!(
            "Focus sessions: {} ({:.1} hours focused)",
            summary.completed_sessions, summary.focus_hours
        ),
        format!(
            "Goals: {} ({} completed)",
            summary.total_goals, summary.completed_goals
        ),
        String::new(),
        "Tasks by priority".to_string(),
    ];

    let priority_rows = summary.by_priority.iter().map(|entry| PriorityRow {
        priority: entry.priority.to_string(),
        completed: format!("{}/{}", entry.completed, entry.total),
    });
    lines.push(Table::new(priority_rows).with(Style::rounded()).to_string());

    lines.push(String::new());
    lines.push("Notes by subject".to_string());
    if summary.notes_by_subject.is_empty() {
        lines.push(palette.mutedize("No subjects yet."));
    } else {
        let subject_rows = summary.notes_by_subject.iter().map(|entry| SubjectRow {
            subject: entry.subject.clone(),
            count: entry.count,
        });
        lines.push(Table::new(subject_rows).with(Style::rounded()).to_string());
    }

    lines.join("\n")
}

pub fn render_task_form(form: &TaskForm) -> String {
    format!(
        "task form: title={:?} priority={} due={:?} subject={:?}",
        form.title, form.priority, form.due_date, form.subject
    )
}

pub fn render_note_form(form: &NoteForm) -> String {
    format!(
        "note form: title={:?} content={:?} subject={:?}",
        form.title, form.content, form.subject
    )
}

pub fn render_goal_form(form: &GoalForm) -> String {
    format!(
        "goal form: title={:?} target={:?} current={} category={:?}",
        form.title, form.target, form.current, form.category
    )
}

/// `2025-12-21` as `Dec 21, 2025`; anything unparsable is shown verbatim.
fn display_date(raw: &str) -> String {
    let input = format_description!("[year]-[month]-[day]");
    let output = format_description!("[month repr:short] [day padding:none], [year]");
    Date::parse(raw, input)
        .ok()
        .and_then(|date| date.format(output).ok())
        .unwrap_or_else(|| raw.to_string())
}

fn preview(content: &str) -> String {
    let single_line = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= CONTENT_PREVIEW_CHARS {
        return single_line;
    }
    let cut: String = single_line.chars().take(CONTENT_PREVIEW_CHARS - 3).collect();
    format!("{cut}...")
}
