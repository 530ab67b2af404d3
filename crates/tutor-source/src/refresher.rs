//! Background refresh of the question bank.
//!
//! The refresher fetches once on start and then every interval on its
//! own thread, so the interactive loop never waits on the network. The
//! owner polls [`Refresher::try_next`] and applies results on its side.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender, after, select, unbounded};
use tracing::debug;
use tutor_model::QuestionBank;

use crate::client::BankSource;
use crate::error::Result;

#[derive(Debug)]
pub struct RefreshEvent {
    pub result: Result<QuestionBank>,
    pub finished_at: DateTime<Utc>,
}

enum Command {
    RefreshNow,
    Stop,
}

pub struct Refresher {
    events: Receiver<RefreshEvent>,
    commands: Sender<Command>,
    interval: Duration,
}

impl Refresher {
    pub fn spawn<S: BankSource>(source: S, interval: Duration) -> Self {
        let (event_tx, event_rx) = unbounded();
        let (command_tx, command_rx) = unbounded();
        thread::spawn(move || run(&source, interval, &event_tx, &command_rx));
        Self {
            events: event_rx,
            commands: command_tx,
            interval,
        }
    }

    /// Time between scheduled fetches.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Next finished refresh, without blocking.
    #[must_use]
    pub fn try_next(&self) -> Option<RefreshEvent> {
        self.events.try_recv().ok()
    }

    /// Next finished refresh, waiting up to `timeout`.
    #[must_use]
    pub fn next_timeout(&self, timeout: Duration) -> Option<RefreshEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Starts a fetch now instead of waiting out the interval.
    pub fn refresh_now(&self) {
        let _ = self.commands.send(Command::RefreshNow);
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        // an in-flight fetch finishes on its own; the thread exits after it
        let _ = self.commands.send(Command::Stop);
    }
}

fn run<S: BankSource>(
    source: &S,
    interval: Duration,
    events: &Sender<RefreshEvent>,
    commands: &Receiver<Command>,
) {
    loop {
        let result = source.fetch();
        let event = RefreshEvent {
            result,
            finished_at: Utc::now(),
        };
        if events.send(event).is_err() {
            break;
        }
        select! {
            recv(commands) -> command => match command {
                Ok(Command::RefreshNow) => debug!("manual refresh requested"),
                Ok(Command::Stop) | Err(_) => break,
            },
            recv(after(interval)) -> _ => debug!("scheduled refresh"),
        }
    }
    debug!("refresher stopped");
}
