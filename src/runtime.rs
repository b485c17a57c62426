use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// A wake-up requested with [`Runner::wake_at`] came due
    Wake,
    /// The event source hung up; nothing more will arrive
    Closed,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;

    /// Block until an event arrives.
    fn recv(&self) -> Result<AppEvent, RecvError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // Windows reports releases too; only presses edit text
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::error!(%err, "terminal event reader failed");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Ticks are only produced between `start_ticking` and `stop_ticking`; the
/// schedule lives in the runner, so dropping it cancels the timer.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Option<Instant>,
    wake_at: Option<Instant>,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            next_tick: None,
            wake_at: None,
        }
    }

    pub fn start_ticking(&mut self) {
        if self.next_tick.is_none() {
            let interval_ms = self.ticker.interval().as_millis() as u64;
            tracing::debug!(interval_ms, "ticking started");
            self.next_tick = Some(Instant::now() + self.ticker.interval());
        }
    }

    pub fn stop_ticking(&mut self) {
        if self.next_tick.take().is_some() {
            tracing::debug!("ticking stopped");
        }
    }

    pub fn set_ticking(&mut self, on: bool) {
        if on {
            self.start_ticking();
        } else {
            self.stop_ticking();
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Return [`AppEvent::Wake`] once `at` passes, independent of ticking.
    /// `None` cancels a pending wake-up.
    pub fn wake_at(&mut self, at: Option<Instant>) {
        self.wake_at = at;
    }

    /// Blocks until the next event, the next tick deadline while ticking, or
    /// the requested wake-up.
    ///
    /// Deadlines are fixed in advance, so a steady stream of key events does
    /// not postpone ticks.
    pub fn step(&mut self) -> AppEvent {
        let Some(deadline) = self.next_tick.into_iter().chain(self.wake_at).min() else {
            return self.event_source.recv().unwrap_or(AppEvent::Closed);
        };

        let now = Instant::now();
        if now < deadline {
            match self.event_source.recv_timeout(deadline - now) {
                Ok(ev) => return ev,
                Err(RecvTimeoutError::Disconnected) => return AppEvent::Closed,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
        self.fire(Instant::now())
    }

    /// A deadline passed; ticks take precedence over wake-ups
    fn fire(&mut self, now: Instant) -> AppEvent {
        match self.next_tick {
            Some(tick) if now >= tick => {
                self.schedule_after(tick, now);
                AppEvent::Tick
            }
            _ => {
                self.wake_at = None;
                AppEvent::Wake
            }
        }
    }

    fn schedule_after(&mut self, deadline: Instant, now: Instant) {
        let interval = self.ticker.interval();
        let next = deadline + interval;
        // fell far behind (suspended terminal, slow draw): don't burst
        self.next_tick = Some(if next <= now { now + interval } else { next });
    }
}
