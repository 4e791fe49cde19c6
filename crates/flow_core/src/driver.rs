//! Repeating one-second tick source for the focus timer.
//!
//! The driver owns at most one pending callback. It arms a new one only
//! when the timer is running and none is pending, cancels it as soon as
//! the timer stops, and ignores any delivery whose ticket is no longer the
//! pending one.

use crate::dashboard::Dashboard;
use crate::timer::{TickOutcome, TimerState};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Handle for one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> Ticket;
    fn cancel(&mut self, ticket: Ticket);
}

pub struct TimerDriver<S: Scheduler> {
    scheduler: S,
    pending: Option<Ticket>,
}

impl<S: Scheduler> TimerDriver<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Aligns the pending callback with the timer: one while running, none otherwise.
    pub fn sync(&mut self, timer: &TimerState) {
        match (timer.is_running, self.pending) {
            (true, None) => {
                let ticket = self.scheduler.schedule(TICK_INTERVAL);
                trace!(ticket = ticket.id(), "tick armed");
                self.pending = Some(ticket);
            }
            (false, Some(ticket)) => {
                self.scheduler.cancel(ticket);
                trace!(ticket = ticket.id(), "tick cancelled");
                self.pending = None;
            }
            _ => {}
        }
    }

    /// Applies a delivered tick. Returns `None` for stale or cancelled tickets.
    pub fn on_tick(&mut self, ticket: Ticket, dashboard: &mut Dashboard) -> Option<TickOutcome> {
        if self.pending != Some(ticket) {
            debug!(ticket = ticket.id(), "ignoring stale tick");
            return None;
        }

        self.pending = None;
        let outcome = dashboard.tick_timer();
        self.sync(dashboard.timer());
        Some(outcome)
    }

    pub fn shutdown(&mut self) {
        if let Some(ticket) = self.pending.take() {
            self.scheduler.cancel(ticket);
        }
    }
}

impl<S: Scheduler> Drop for TimerDriver<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Scheduler that never fires on its own; callers deliver tickets explicitly.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    scheduled: Vec<(Ticket, Duration)>,
    cancelled: Vec<Ticket>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled(&self) -> &[(Ticket, Duration)] {
        &self.scheduled
    }

    pub fn cancelled(&self) -> &[Ticket] {
        &self.cancelled
    }

    /// Removes and returns the oldest scheduled ticket, as if its delay elapsed.
    pub fn fire_next(&mut self) -> Option<Ticket> {
        if self.scheduled.is_empty() {
            return None;
        }
        Some(self.scheduled.remove(0).0)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> Ticket {
        self.next_id += 1;
        let ticket = Ticket(self.next_id);
        self.scheduled.push((ticket, delay));
        ticket
    }

    fn cancel(&mut self, ticket: Ticket) {
        self.scheduled.retain(|(scheduled, _)| *scheduled != ticket);
        self.cancelled.push(ticket);
    }
}

enum Request {
    Arm(Ticket, Instant),
    Cancel(Ticket),
}

/// Wall-clock scheduler backed by one worker thread.
///
/// The worker holds a single armed slot, so arming replaces rather than
/// stacks. Expired tickets are handed to the sink; the worker exits when
/// the sink reports the receiving side is gone or the scheduler is dropped.
pub struct ThreadScheduler {
    next_id: u64,
    requests: Option<Sender<Request>>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadScheduler {
    pub fn spawn<F>(sink: F) -> Self
    where
        F: Fn(Ticket) -> bool + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let worker = std::thread::spawn(move || run_worker(receiver, sink));
        Self {
            next_id: 0,
            requests: Some(sender),
            worker: Some(worker),
        }
    }

    fn send(&self, request: Request) {
        if let Some(requests) = self.requests.as_ref()
            && requests.send(request).is_err()
        {
            debug!("tick worker has stopped");
        }
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&mut self, delay: Duration) -> Ticket {
        self.next_id += 1;
        let ticket = Ticket(self.next_id);
        self.send(Request::Arm(ticket, Instant::now() + delay));
        ticket
    }

    fn cancel(&mut self, ticket: Ticket) {
        self.send(Request::Cancel(ticket));
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            debug!("tick worker panicked");
        }
    }
}

fn run_worker<F>(requests: Receiver<Request>, sink: F)
where
    F: Fn(Ticket) -> bool,
{
    let mut armed: Option<(Ticket, Instant)> = None;

    loop {
        let request = match armed {
            Some((ticket, deadline)) => {
                let now = Instant::now();
                if deadline <= now {
                    armed = None;
                    if !sink(ticket) {
                        break;
                    }
                    continue;
                }
                match requests.recv_timeout(deadline - now) {
                    Ok(request) => request,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match requests.recv() {
                Ok(request) => request,
                Err(_) => break,
            },
        };

        match request {
            Request::Arm(ticket, deadline) => armed = Some((ticket, deadline)),
            Request::Cancel(ticket) => {
                if armed.is_some_and(|(current, _)| current == ticket) {
                    armed = None;
                }
            }
        }
    }
}
