use clap::{CommandFactory, Parser};
use flow_cli::cli::{
    AddCommand, Cli, Command, FormKind, ListCommand, TimerCommand, collect_overrides,
};
use flow_cli::render;
use flow_cli::shell::{
    Event, normalize_parse_error, resolve_reference, spawn_input_reader, split_command_line,
};
use flow_core::analytics::format_clock;
use flow_core::config::{
    Config, ConfigLoad, Palette, load_config_with_fallback, merge_overrides, palette_for_theme,
};
use flow_core::dashboard::Dashboard;
use flow_core::driver::{ThreadScheduler, TimerDriver};
use flow_core::error::AppError;
use flow_core::model::Tab;
use flow_core::timer::{TickOutcome, TimerState};
use serde::Serialize;
use std::io::IsTerminal;
use std::sync::mpsc;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

struct Session {
    dashboard: Dashboard,
    config: Config,
    palette: Palette,
}

impl Session {
    fn new(config: Config) -> Self {
        let palette = palette_for_theme(config.theme.as_deref());
        let dashboard = Dashboard::with_tab(config.start_tab());
        Self {
            dashboard,
            config,
            palette,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered =
        serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{rendered}");
    Ok(())
}

fn print_timer(session: &Session, timer: &TimerState, json: bool) -> Result<(), AppError> {
    if json {
        return print_json(timer);
    }
    println!("{}", render::render_timer(timer, &session.palette));
    Ok(())
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn print_tick_outcome(outcome: TickOutcome, timer: &TimerState) {
    match outcome {
        TickOutcome::FocusCompleted => println!(
            "Focus session complete ({} total). Break loaded: {}",
            timer.completed_sessions,
            format_clock(timer.remaining_seconds)
        ),
        TickOutcome::BreakCompleted => println!(
            "Break over. Focus loaded: {}",
            format_clock(timer.remaining_seconds)
        ),
        TickOutcome::Ticked | TickOutcome::Idle => {}
    }
}

fn fill_if_some(
    target: &mut dyn FnMut(&str, &str) -> Result<(), AppError>,
    field: &str,
    value: Option<&str>,
) -> Result<(), AppError> {
    match value {
        Some(value) => target(field, value),
        None => Ok(()),
    }
}

fn run_add(session: &mut Session, entity: AddCommand, json: bool) -> Result<(), AppError> {
    let dashboard = &mut session.dashboard;
    match entity {
        AddCommand::Task {
            title,
            priority,
            due,
            subject,
        } => {
            let form = dashboard.task_form_mut();
            let mut set = |field: &str, value: &str| form.set_field(field, value);
            fill_if_some(&mut set, "title", title.as_deref())?;
            fill_if_some(&mut set, "priority", priority.as_deref())?;
            fill_if_some(&mut set, "due_date", due.as_deref())?;
            fill_if_some(&mut set, "subject", subject.as_deref())?;

            let task = dashboard.submit_task()?;
            if json {
                print_json(&task)?;
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        AddCommand::Note {
            title,
            content,
            subject,
        } => {
            let form = dashboard.note_form_mut();
            let mut set = |field: &str, value: &str| form.set_field(field, value);
            fill_if_some(&mut set, "title", title.as_deref())?;
            fill_if_some(&mut set, "content", content.as_deref())?;
            fill_if_some(&mut set, "subject", subject.as_deref())?;

            let note = dashboard.submit_note()?;
            if json {
                print_json(&note)?;
            } else {
                println!("Added note: {} ({})", note.title, note.id);
            }
        }
        AddCommand::Goal {
            title,
            target,
            current,
            category,
        } => {
            let form = dashboard.goal_form_mut();
            if let Some(current) = current {
                form.current = current;
            }
            let mut set = |field: &str, value: &str| form.set_field(field, value);
            fill_if_some(&mut set, "title", title.as_deref())?;
            fill_if_some(&mut set, "target", target.as_deref())?;
            fill_if_some(&mut set, "category", category.as_deref())?;

            let goal = dashboard.submit_goal()?;
            if json {
                print_json(&goal)?;
            } else {
                println!(
                    "Added goal: {} ({}) {}/{}",
                    goal.title, goal.id, goal.current, goal.target
                );
            }
        }
    }
    Ok(())
}

fn print_form(session: &Session, form: FormKind, json: bool) -> Result<(), AppError> {
    let dashboard = &session.dashboard;
    match (form, json) {
        (FormKind::Task, true) => print_json(dashboard.task_form()),
        (FormKind::Note, true) => print_json(dashboard.note_form()),
        (FormKind::Goal, true) => print_json(dashboard.goal_form()),
        (FormKind::Task, false) => {
            println!("{}", render::render_task_form(dashboard.task_form()));
            Ok(())
        }
        (FormKind::Note, false) => {
            println!("{}", render::render_note_form(dashboard.note_form()));
            Ok(())
        }
        (FormKind::Goal, false) => {
            println!("{}", render::render_goal_form(dashboard.goal_form()));
            Ok(())
        }
    }
}

fn adjust_goal(session: &mut Session, id: &str, delta: i64, json: bool) -> Result<(), AppError> {
    let ids = session.dashboard.goals().iter().map(|goal| goal.id.as_str());
    let id = resolve_reference(id, ids);
    let goal = session.dashboard.adjust_goal_progress(&id, delta)?;
    if json {
        print_json(&goal)
    } else {
        println!(
            "Goal progress: {} ({}) {}/{}",
            goal.title, goal.id, goal.current, goal.target
        );
        Ok(())
    }
}

fn run_command(session: &mut Session, command: Command, json: bool) -> Result<(), AppError> {
    match command {
        Command::Add { entity } => run_add(session, entity, json)?,
        Command::Set { form, field, value } => {
            let dashboard = &mut session.dashboard;
            match form {
                FormKind::Task => dashboard.task_form_mut().set_field(&field, &value)?,
                FormKind::Note => dashboard.note_form_mut().set_field(&field, &value)?,
                FormKind::Goal => dashboard.goal_form_mut().set_field(&field, &value)?,
            }
            print_form(session, form, json)?;
        }
        Command::Form { form } => match form {
            Some(form) => print_form(session, form, json)?,
            None => {
                for form in [FormKind::Task, FormKind::Note, FormKind::Goal] {
                    print_form(session, form, json)?;
                }
            }
        },
        Command::Clear { form } => {
            match form {
                FormKind::Task => session.dashboard.clear_task_form(),
                FormKind::Note => session.dashboard.clear_note_form(),
                FormKind::Goal => session.dashboard.clear_goal_form(),
            }
            print_form(session, form, json)?;
        }
        Command::Toggle { id } => {
            let ids = session.dashboard.tasks().iter().map(|task| task.id.as_str());
            let id = resolve_reference(&id, ids);
            let task = session.dashboard.toggle_task(&id)?;
            if json {
                print_json(&task)?;
            } else {
                let state = if task.completed { "completed" } else { "pending" };
                println!("Task {state}: {} ({})", task.title, task.id);
            }
        }
        Command::Progress { id, delta } => adjust_goal(session, &id, delta, json)?,
        Command::Inc { id } => adjust_goal(session, &id, 1, json)?,
        Command::Dec { id } => adjust_goal(session, &id, -1, json)?,
        Command::Timer { action } => {
            let timer = match action {
                TimerCommand::Start => session.dashboard.start_timer(),
                TimerCommand::Pause => session.dashboard.pause_timer(),
                TimerCommand::Reset => session.dashboard.reset_timer(),
                TimerCommand::Status => *session.dashboard.timer(),
            };
            print_timer(session, &timer, json)?;
        }
        Command::Tick { seconds } => {
            for _ in 0..seconds {
                let outcome = session.dashboard.tick_timer();
                if outcome == TickOutcome::Idle {
                    break;
                }
                if !json {
                    print_tick_outcome(outcome, session.dashboard.timer());
                }
            }
            let timer = *session.dashboard.timer();
            print_timer(session, &timer, json)?;
        }
        Command::Tab { name } => {
            let tab: Tab = name.parse()?;
            session.dashboard.select_tab(tab);
            if json {
                print_json(&tab)?;
            } else {
                println!("{}", render::render_tab(&session.dashboard, &session.palette));
            }
        }
        Command::Show => {
            if json {
                print_json(&session.dashboard)?;
            } else {
                println!("{}", render::render_tab(&session.dashboard, &session.palette));
            }
        }
        Command::List { list } => {
            let dashboard = &session.dashboard;
            match (list, json) {
                (ListCommand::Tasks, true) => print_json(&dashboard.tasks())?,
                (ListCommand::Notes, true) => print_json(&dashboard.notes())?,
                (ListCommand::Goals, true) => print_json(&dashboard.goals())?,
                (ListCommand::Tasks, false) => println!("{}", render::render_tasks(dashboard.tasks())),
                (ListCommand::Notes, false) => println!("{}", render::render_notes(dashboard.notes())),
                (ListCommand::Goals, false) => println!("{}", render::render_goals(dashboard.goals())),
            }
        }
        Command::Analytics => {
            let summary = session.dashboard.summary();
            if json {
                print_json(&summary)?;
            } else {
                println!("{}", render::render_analytics(&summary, &session.palette));
            }
        }
    }

    Ok(())
}

fn run_line(session: &mut Session, line: &str) -> Result<(), AppError> {
    let expanded = session.config.expand_alias(line);
    let args = split_command_line(&expanded)?;
    if args.is_empty() {
        return Ok(());
    }

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push("flow".to_string());
    argv.extend(args);

    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            println!("{err}");
            return Ok(());
        }
        Err(err) => return Err(normalize_parse_error(err)),
    };
    if !cli.config_override.is_empty() {
        warn!("config overrides only apply at startup");
    }
    match cli.command {
        Some(command) => run_command(session, command, cli.json),
        None => {
            print_help();
            Ok(())
        }
    }
}

fn run_interactive(session: &mut Session) -> Result<(), AppError> {
    let (sender, events) = mpsc::channel();
    let tick_sender = sender.clone();
    let mut driver = TimerDriver::new(ThreadScheduler::spawn(move |ticket| {
        tick_sender.send(Event::Tick(ticket)).is_ok()
    }));
    let _reader = spawn_input_reader(sender);

    while let Ok(event) = events.recv() {
        match event {
            Event::Input(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
                    break;
                }
                if line == "help" || line == "?" {
                    print_help();
                    continue;
                }
                if let Err(err) = run_line(session, line) {
                    eprintln!("ERROR: {}", err);
                }
            }
            Event::Tick(ticket) => {
                if let Some(outcome) = driver.on_tick(ticket, &mut session.dashboard) {
                    print_tick_outcome(outcome, session.dashboard.timer());
                }
            }
            Event::InputError(message) => return Err(AppError::io(message)),
            Event::InputClosed => break,
        }
        driver.sync(session.dashboard.timer());
    }

    driver.shutdown();
    Ok(())
}

fn init_tracing(config: &Config, verbose: u8, quiet: u8) {
    let flag_level = if quiet >= 1 {
        Some("error")
    } else {
        match verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    };
    let default_level = flag_level
        .or(config.log_level.as_deref())
        .unwrap_or("warn");

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
}

fn load_session_config(raw_overrides: &[String]) -> Result<ConfigLoad, AppError> {
    let overrides = collect_overrides(raw_overrides).map_err(AppError::invalid_input)?;
    let loaded = load_config_with_fallback();
    Ok(ConfigLoad {
        config: merge_overrides(&loaded.config, &overrides),
        error: loaded.error,
    })
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let loaded = match load_session_config(&cli.config_override) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };
    init_tracing(&loaded.config, cli.verbose, cli.quiet);
    if let Some(err) = loaded.error {
        warn!(error = %err, "using default configuration");
    }
    let mut session = Session::new(loaded.config);

    let result = match cli.command {
        Some(command) => run_command(&mut session, command, cli.json),
        None => run_interactive(&mut session),
    };

    if let Err(err) = result {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
