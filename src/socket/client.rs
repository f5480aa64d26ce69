//! Socket Client Module
//!
//! The reconnecting wrapper around an injected transport. One spawned driver
//! task exclusively owns the transport and the connection state machine;
//! the [`SocketClient`] handle talks to it over a command channel and
//! observes it through a watch channel. None of the public operations can
//! fail or block: transport trouble is logged and handled by the retry path.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::socket::registry::{self, lock_registry, HandlerRegistry, Subscription};
use crate::socket::{ConnectionState, Connector, Frame, SocketStatus, Transport, TransportEvent};

// == Socket Config ==
/// Tunables for the reconnect policy.
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// Endpoint the connector is pointed at
    pub url: String,
    /// Failed attempts tolerated before the session gives up
    pub max_reconnect_attempts: u32,
    /// Base retry delay; attempt `n` waits `n * reconnect_delay` (linear backoff)
    pub reconnect_delay: Duration,
}

impl SocketConfig {
    /// Config for `url` with the default policy: 5 attempts, 1s base delay.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_reconnect_attempts: 5,
            reconnect_delay: Duration::from_millis(1000),
        }
    }
}

// == Commands ==
/// Handle-to-driver messages.
enum Command {
    Connect,
    Disconnect,
    Emit(Frame),
}

// == Socket Client ==
/// Handle to the reconnecting socket session.
///
/// Cheap operations that never error: `connect` and `disconnect` are requests
/// to the driver task, `emit` is fire-and-forget (dropped when not
/// connected), and inbound events fan out to handlers registered with
/// [`SocketClient::on`].
pub struct SocketClient {
    cmd_tx: mpsc::UnboundedSender<Command>,
    status_rx: watch::Receiver<SocketStatus>,
    registry: Arc<Mutex<HandlerRegistry>>,
    driver: JoinHandle<()>,
}

impl SocketClient {
    // == Constructor ==
    /// Spawns the driver task. The client starts disconnected; nothing
    /// happens until [`connect`](Self::connect) is called.
    pub fn new(config: SocketConfig, connector: Arc<dyn Connector>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SocketStatus::idle());
        let registry = Arc::new(Mutex::new(HandlerRegistry::new()));

        let driver = Driver {
            config,
            connector,
            cmd_rx,
            status_tx,
            registry: Arc::clone(&registry),
            status: SocketStatus::idle(),
        };

        Self {
            cmd_tx,
            status_rx,
            registry,
            driver: tokio::spawn(driver.run()),
        }
    }

    // == Connect ==
    /// Starts (or restarts) the session. Idempotent: a no-op while already
    /// connected. After a terminal failure this resets the attempt counter
    /// and starts over.
    pub fn connect(&self) {
        let _ = self.cmd_tx.send(Command::Connect);
    }

    // == Disconnect ==
    /// Tears the session down: cancels any pending retry timer, closes the
    /// transport if open, and does not trigger a reconnect.
    pub fn disconnect(&self) {
        let _ = self.cmd_tx.send(Command::Disconnect);
    }

    // == Emit ==
    /// Sends an event frame if connected. When not connected the frame is
    /// dropped silently; there is no buffering and no delivery guarantee.
    pub fn emit(&self, event: impl Into<String>, payload: Value) {
        let _ = self.cmd_tx.send(Command::Emit(Frame::new(event, payload)));
    }

    // == Subscribe ==
    /// Registers `handler` for inbound `event` frames. Handlers for the same
    /// event fire in registration order; the returned [`Subscription`] is
    /// the disposer.
    pub fn on(
        &self,
        event: &str,
        handler: impl Fn(&Value) + Send + Sync + 'static,
    ) -> Subscription {
        let id = lock_registry(&self.registry).register(event, Arc::new(handler));
        Subscription::new(event.to_string(), id, &self.registry)
    }

    // == Observation ==
    /// Snapshot of the current status.
    pub fn status(&self) -> SocketStatus {
        self.status_rx.borrow().clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.status_rx.borrow().state
    }

    /// True once the retry budget is exhausted. Cleared by `connect()`.
    pub fn gave_up(&self) -> bool {
        self.status_rx.borrow().gave_up
    }

    /// A watch receiver for status transitions, for callers that want to
    /// await changes rather than poll.
    pub fn watch_status(&self) -> watch::Receiver<SocketStatus> {
        self.status_rx.clone()
    }
}

impl Drop for SocketClient {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

// == Driver ==
/// How a session (one `connect()`...`disconnect()` span) ended.
enum SessionEnd {
    /// Explicit disconnect; back to idle
    Requested,
    /// Retry budget exhausted; back to idle until the next connect
    GaveUp,
    /// Client handle dropped; stop the driver
    Shutdown,
}

/// Result of one transport open attempt.
enum Attempt {
    Opened(Box<dyn Transport>),
    Failed,
    Cancelled(SessionEnd),
}

/// Why the connected pump loop stopped.
enum PumpEnd {
    /// Unexpected loss (peer close, transport error, failed send)
    Dropped,
    Requested,
    Shutdown,
}

/// What to do after waiting out a backoff delay.
enum BackoffOutcome {
    Retry,
    Stop(SessionEnd),
}

/// The task that owns the transport and runs the state machine.
struct Driver {
    config: SocketConfig,
    connector: Arc<dyn Connector>,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    status_tx: watch::Sender<SocketStatus>,
    registry: Arc<Mutex<HandlerRegistry>>,
    status: SocketStatus,
}

impl Driver {
    async fn run(mut self) {
        loop {
            // Idle: disconnected, nothing scheduled. Only Connect matters.
            match self.cmd_rx.recv().await {
                None => return,
                Some(Command::Connect) => {}
                Some(Command::Disconnect) => continue,
                Some(Command::Emit(frame)) => {
                    debug!(event = %frame.event, "emit dropped: not connected");
                    continue;
                }
            }

            self.status.reconnect_attempts = 0;
            self.status.gave_up = false;

            if matches!(self.run_session().await, SessionEnd::Shutdown) {
                return;
            }
        }
    }

    /// Runs one session: connect, pump, retry on loss, until the session
    /// ends by request, give-up or shutdown.
    async fn run_session(&mut self) -> SessionEnd {
        loop {
            self.set_state(ConnectionState::Connecting);

            match self.try_open().await {
                Attempt::Cancelled(end) => {
                    self.set_state(ConnectionState::Disconnected);
                    return end;
                }
                Attempt::Failed => match self.backoff().await {
                    BackoffOutcome::Retry => continue,
                    BackoffOutcome::Stop(end) => return end,
                },
                Attempt::Opened(mut transport) => {
                    self.status.reconnect_attempts = 0;
                    self.status.gave_up = false;
                    self.status.connected_at = Some(Utc::now());
                    self.set_state(ConnectionState::Connected);
                    info!(url = %self.config.url, "socket connected");

                    match self.pump(transport.as_mut()).await {
                        PumpEnd::Dropped => match self.backoff().await {
                            BackoffOutcome::Retry => continue,
                            BackoffOutcome::Stop(end) => return end,
                        },
                        PumpEnd::Requested => {
                            transport.close().await;
                            self.set_state(ConnectionState::Disconnected);
                            return SessionEnd::Requested;
                        }
                        PumpEnd::Shutdown => {
                            transport.close().await;
                            return SessionEnd::Shutdown;
                        }
                    }
                }
            }
        }
    }

    /// Races the transport open against the command channel so a disconnect
    /// issued mid-open aborts the attempt.
    async fn try_open(&mut self) -> Attempt {
        let connect = self.connector.connect(&self.config.url);
        tokio::pin!(connect);

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    None => return Attempt::Cancelled(SessionEnd::Shutdown),
                    Some(Command::Disconnect) => {
                        return Attempt::Cancelled(SessionEnd::Requested);
                    }
                    Some(Command::Connect) => {} // already connecting
                    Some(Command::Emit(frame)) => {
                        debug!(event = %frame.event, "emit dropped: not connected");
                    }
                },
                result = &mut connect => match result {
                    Ok(transport) => return Attempt::Opened(transport),
                    Err(err) => {
                        warn!(url = %self.config.url, error = %err, "transport open failed");
                        return Attempt::Failed;
                    }
                },
            }
        }
    }

    /// Connected steady state: forward emits, dispatch inbound frames.
    async fn pump(&mut self, transport: &mut dyn Transport) -> PumpEnd {
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    None => return PumpEnd::Shutdown,
                    Some(Command::Disconnect) => {
                        info!("socket disconnect requested");
                        return PumpEnd::Requested;
                    }
                    Some(Command::Connect) => {} // idempotent while connected
                    Some(Command::Emit(frame)) => {
                        if let Err(err) = transport.send(frame).await {
                            warn!(error = %err, "send failed; treating connection as lost");
                            return PumpEnd::Dropped;
                        }
                    }
                },
                event = transport.recv() => match event {
                    TransportEvent::Frame(frame) => {
                        // Snapshot dispatch: handlers run outside the registry
                        // lock, so one may subscribe or cancel mid-dispatch.
                        registry::dispatch(&self.registry, &frame.event, &frame.payload);
                    }
                    TransportEvent::Errored(reason) => {
                        warn!(%reason, "transport error");
                        return PumpEnd::Dropped;
                    }
                    TransportEvent::Closed => {
                        info!("transport closed by peer");
                        return PumpEnd::Dropped;
                    }
                },
            }
        }
    }

    /// The retry path: give up when the budget is spent, otherwise wait out
    /// `attempt * reconnect_delay` with the timer raced against commands.
    async fn backoff(&mut self) -> BackoffOutcome {
        if self.status.reconnect_attempts >= self.config.max_reconnect_attempts {
            warn!(
                attempts = self.status.reconnect_attempts,
                "reconnect attempts exhausted; giving up until next connect()"
            );
            self.status.gave_up = true;
            self.set_state(ConnectionState::Disconnected);
            return BackoffOutcome::Stop(SessionEnd::GaveUp);
        }

        self.status.reconnect_attempts += 1;
        let delay = backoff_delay(self.config.reconnect_delay, self.status.reconnect_attempts);
        self.set_state(ConnectionState::Disconnected);
        debug!(
            attempt = self.status.reconnect_attempts,
            delay_ms = delay.as_millis() as u64,
            "scheduling reconnect"
        );

        let timer = tokio::time::sleep(delay);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                // Leaving this select drops the timer, so a disconnect here
                // guarantees the stale retry can never fire later.
                () = &mut timer => return BackoffOutcome::Retry,
                cmd = self.cmd_rx.recv() => match cmd {
                    None => return BackoffOutcome::Stop(SessionEnd::Shutdown),
                    Some(Command::Disconnect) => {
                        info!("pending reconnect cancelled by disconnect");
                        return BackoffOutcome::Stop(SessionEnd::Requested);
                    }
                    Some(Command::Connect) => {
                        // Fresh connect: clean counter, retry immediately.
                        self.status.reconnect_attempts = 0;
                        self.status.gave_up = false;
                        return BackoffOutcome::Retry;
                    }
                    Some(Command::Emit(frame)) => {
                        debug!(event = %frame.event, "emit dropped: not connected");
                    }
                },
            }
        }
    }

    /// Updates the state and publishes the new status snapshot.
    fn set_state(&mut self, state: ConnectionState) {
        self.status.state = state;
        if state != ConnectionState::Connected {
            self.status.connected_at = None;
        }
        let _ = self.status_tx.send(self.status.clone());
    }
}

/// Linear backoff delay for the given attempt, saturating instead of
/// panicking when the configured base delay is absurdly large.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.checked_mul(attempt).unwrap_or(Duration::MAX)
}
