use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{decode, ConnectionState, Connection, Connector, Frame, WsConnector};
use crate::state::Dispatcher;
use crate::StreamError;

/// Owner of the push connection.
///
/// Create one in the composition root and share it by reference or clone;
/// clones control the same session.
#[derive(Clone)]
pub struct StreamClient {
    inner: Arc<Inner>,
}

struct Inner {
    connector: Box<dyn Connector>,
    reconnect_delay: Duration,
    target: Mutex<Option<Dispatcher>>,
    session: Mutex<Option<JoinHandle<()>>>,
    state: watch::Sender<ConnectionState>,
    attempts: AtomicU64,
}

impl StreamClient {
    pub fn new(connector: impl Connector + 'static, reconnect_delay: Duration) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(Inner {
                connector: Box::new(connector),
                reconnect_delay,
                target: Mutex::new(None),
                session: Mutex::new(None),
                state,
                attempts: AtomicU64::new(0),
            }),
        }
    }

    /// Client for `ws://.../websocket` style URLs.
    pub fn websocket(url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self::new(WsConnector::new(url), reconnect_delay)
    }

    /// Bind the dispatch target and start the session if none is running.
    ///
    /// Calling this again while a session is active only swaps the target;
    /// the live connection is left alone. Returns whether a session was
    /// started. Must be called from within a tokio runtime.
    pub fn init(&self, dispatcher: Dispatcher) -> bool {
        *lock(&self.inner.target) = Some(dispatcher);

        let mut session = lock(&self.inner.session);
        if session.as_ref().is_some_and(|handle| !handle.is_finished()) {
            debug!("Push session already running, rebound dispatch target");
            return false;
        }

        let inner = Arc::clone(&self.inner);
        *session = Some(tokio::spawn(async move { inner.run().await }));
        true
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// Connection attempts made so far, successful or not.
    pub fn connect_attempts(&self) -> u64 {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    pub fn reconnect_delay(&self) -> Duration {
        self.inner.reconnect_delay
    }

    /// Stop the session at process exit. Not used by application logic.
    pub fn shutdown(&self) {
        if let Some(handle) = lock(&self.inner.session).take() {
            handle.abort();
            self.inner.state.send_replace(ConnectionState::Disconnected);
            info!("Push channel shut down");
        }
    }
}

impl Inner {
    async fn run(&self) {
        loop {
            self.state.send_replace(ConnectionState::Connecting);
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            info!(url = self.connector.target(), attempt, "Connecting to push channel");

            match self.connector.connect().await {
                Ok(mut connection) => {
                    self.state.send_replace(ConnectionState::Connected);
                    info!("Push channel connected");

                    let reason = self.read_frames(connection.as_mut()).await;
                    connection.close().await;
                    match reason {
                        StreamError::Closed => info!("Push channel closed by server"),
                        err => warn!(error = %err, "Push channel dropped"),
                    }
                }
                Err(err) => warn!(error = %err, "Push channel connect failed"),
            }

            self.state.send_replace(ConnectionState::Disconnected);
            debug!(delay = ?self.reconnect_delay, "Reconnecting after delay");
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// Read until the connection ends; returns why it ended.
    async fn read_frames(&self, connection: &mut dyn Connection) -> StreamError {
        loop {
            match connection.recv().await {
                Some(Ok(Frame::Text(text))) => self.handle_text(&text),
                Some(Ok(Frame::Binary(bytes))) => {
                    debug!(len = bytes.len(), "Ignoring binary frame");
                }
                Some(Ok(Frame::Control)) => {}
                Some(Ok(Frame::Close)) | None => return StreamError::Closed,
                Some(Err(err)) => return err,
            }
        }
    }

    fn handle_text(&self, text: &str) {
        let actions = match decode(text) {
            Ok(actions) => actions,
            Err(err) => {
                warn!(error = %err, "Ignoring malformed push frame");
                return;
            }
        };

        let target = lock(&self.target).clone();
        match target {
            Some(dispatcher) => actions.into_iter().for_each(|a| dispatcher.dispatch(a)),
            None => debug!("No dispatch target bound, dropping push frame"),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
