//! Plumbing for the interactive session: line splitting and the event
//! channel that serializes user input and timer ticks onto one thread.

use flow_core::driver::Ticket;
use flow_core::error::AppError;
use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(String),
    Tick(Ticket),
    InputError(String),
    InputClosed,
}

/// Reads stdin line by line on a background thread and forwards each line.
pub fn spawn_input_reader(events: Sender<Event>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = io::stdin();
        let mut stdin_lock = stdin.lock();
        let mut input = String::new();

        loop {
            input.clear();
            let event = match stdin_lock.read_line(&mut input) {
                Ok(0) => Event::InputClosed,
                Ok(_) => Event::Input(input.clone()),
                Err(err) => Event::InputError(err.to_string()),
            };
            let last = !matches!(event, Event::Input(_));
            if events.send(event).is_err() || last {
                break;
            }
        }
    })
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

/// Resolves `#N` to the id at 1-based position `N`; anything else is returned trimmed.
pub fn resolve_reference<'a, I>(raw: &str, ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let trimmed = raw.trim();
    let position = trimmed
        .strip_prefix('#')
        .and_then(|digits| digits.parse::<usize>().ok())
        .filter(|position| *position > 0);

    match position.and_then(|position| ids.into_iter().nth(position - 1)) {
        Some(id) => id.to_string(),
        None => trimmed.to_string(),
    }
}

/// Splits a command line on whitespace, honouring double quotes and `\"` escapes.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}
