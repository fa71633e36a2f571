use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Identifies one start..stop span of the tick loop
pub type RunId = u64;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick(RunId),
}

/// Source of terminal and timer events
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm.
///
/// Keyboard input is read on a dedicated thread. Tick loops post into the
/// same channel through [`CrosstermEventSource::sender`].
pub struct CrosstermEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let key_tx = tx.clone();

        thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::error!(%err, "terminal event reader stopped");
                    break;
                }
            };

            if key_tx.send(evt).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
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
}

/// Runner that hands the application one event at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    poll: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, poll: T) -> Self {
        Self { event_source, poll }
    }

    /// Blocks up to the poll interval; None when nothing arrived
    pub fn step(&self) -> Option<AppEvent> {
        match self.event_source.recv_timeout(self.poll.interval()) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

struct ActiveRun {
    id: RunId,
    running: Arc<AtomicBool>,
}

/// Background countdown context. At most one loop is alive at a time; each
/// one posts `AppEvent::Tick(id)` once per interval until cancelled.
pub struct TickLoop {
    sender: Sender<AppEvent>,
    interval: Duration,
    active: Option<ActiveRun>,
    next_id: RunId,
}

impl TickLoop {
    pub fn new<T: Ticker>(ticker: &T, sender: Sender<AppEvent>) -> Self {
        Self {
            sender,
            interval: ticker.interval(),
            active: None,
            next_id: 1,
        }
    }

    /// Spawn the loop. Returns None if one is already running.
    pub fn spawn(&mut self) -> Option<RunId> {
        if self.active.is_some() {
            tracing::debug!("tick loop already active");
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let tx = self.sender.clone();
        let interval = self.interval;

        thread::spawn(move || loop {
            thread::sleep(interval);
            if !flag.load(Ordering::Acquire) {
                break;
            }
            if tx.send(AppEvent::Tick(id)).is_err() {
                break;
            }
        });

        tracing::debug!(run = id, ?interval, "tick loop spawned");
        self.active = Some(ActiveRun { id, running });
        Some(id)
    }

    /// Ask the running loop to exit; it stops within one interval
    pub fn cancel(&mut self) {
        if let Some(run) = self.active.take() {
            run.running.store(false, Ordering::Release);
            tracing::debug!(run = run.id, "tick loop cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Whether a tick belongs to the live run rather than a cancelled one
    pub fn is_current(&self, run: RunId) -> bool {
        self.active.as_ref().is_some_and(|a| a.id == run)
    }
}

impl Drop for TickLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
