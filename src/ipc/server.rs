//! Unix domain socket server for IPC
//!
//! Pose sources submit frames here; UI clients query status or subscribe
//! to counter events. Frames and resets are forwarded to the single state
//! machine task over an mpsc channel, so mutation stays serialized.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::{debug, error, info, warn};

use crate::counter::Command;
use crate::events::RepEvent;

use super::protocol::{CounterStatus, Request, Response};

/// Largest message body accepted from a client
const MAX_MESSAGE_LEN: usize = 1024 * 1024;

/// IPC Server handling client connections
pub struct Server {
    socket_path: PathBuf,
    listener: Option<UnixListener>,
    shared: Shared,
    shutdown_tx: broadcast::Sender<()>,
}

/// Handles every client task needs
#[derive(Clone)]
struct Shared {
    state: Arc<RwLock<ServerState>>,
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<RepEvent>,
}

/// Shared server state
struct ServerState {
    status: CounterStatus,
    start_time: std::time::Instant,
}

impl Server {
    /// Create a new IPC server bound to `socket_path`
    ///
    /// `command_tx` feeds the state machine; `event_tx` is the machine's
    /// event channel, used to serve subscribers.
    pub fn new(
        socket_path: &Path,
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<RepEvent>,
    ) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create socket directory")?;
        }

        // Remove stale socket if it exists
        if socket_path.exists() {
            std::fs::remove_file(socket_path).context("failed to remove stale socket")?;
        }

        let listener = UnixListener::bind(socket_path).context("failed to bind Unix socket")?;

        // Set socket permissions to owner-only (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))
                .context("failed to restrict socket permissions")?;
        }

        let (shutdown_tx, _) = broadcast::channel(1);

        let state = Arc::new(RwLock::new(ServerState {
            status: CounterStatus::default(),
            start_time: std::time::Instant::now(),
        }));

        info!(?socket_path, "IPC server listening");

        Ok(Self {
            socket_path: socket_path.to_owned(),
            listener: Some(listener),
            shared: Shared {
                state,
                command_tx,
                event_tx,
            },
            shutdown_tx,
        })
    }

    /// Fold a state machine event into the status snapshot
    pub async fn apply_event(&self, event: &RepEvent) {
        let mut state = self.shared.state.write().await;
        match event {
            RepEvent::RepCounted { count } => state.status.count = *count,
            RepEvent::PostureChanged { to, .. } => state.status.posture = *to,
            RepEvent::CounterReset => {
                state.status.count = 0;
                state.status.posture = Default::default();
            }
        }
    }

    /// Keep the status snapshot in step with the state machine
    ///
    /// Returns when the event channel closes.
    pub async fn sync_events(&self, mut event_rx: broadcast::Receiver<RepEvent>) {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    debug!(%event, "state event received");
                    self.apply_event(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Events carry absolute values, so the next one catches up
                    warn!(skipped = n, "state event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Current status snapshot
    pub async fn status(&self) -> CounterStatus {
        let mut state = self.shared.state.write().await;
        state.status.uptime_secs = state.start_time.elapsed().as_secs();
        state.status.clone()
    }

    /// Run the server, accepting connections
    pub async fn run(&self) -> Result<()> {
        let listener = self.listener.as_ref().context("server not initialized")?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    debug!("client connected");
                    let shared = self.shared.clone();
                    let mut shutdown_rx = self.shutdown_tx.subscribe();

                    tokio::spawn(async move {
                        tokio::select! {
                            result = Self::handle_client(stream, shared) => {
                                if let Err(e) = result {
                                    warn!(?e, "client handler error");
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                debug!("client handler shutting down");
                            }
                        }
                    });
                }
                Err(e) => {
                    error!(?e, "accept error");
                }
            }
        }
    }

    /// Handle a single client connection
    async fn handle_client(mut stream: UnixStream, shared: Shared) -> Result<()> {
        let mut len_buf = [0u8; 4];

        loop {
            // Read message length (4-byte little-endian)
            match stream.read_exact(&mut len_buf).await {
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    debug!("client disconnected");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }

            let len = u32::from_le_bytes(len_buf) as usize;
            if len > MAX_MESSAGE_LEN {
                warn!(len, "message too large, disconnecting");
                return Ok(());
            }

            // Read message body
            let mut msg_buf = vec![0u8; len];
            stream.read_exact(&mut msg_buf).await?;

            let request: Request = match serde_json::from_slice(&msg_buf) {
                Ok(request) => request,
                Err(e) => {
                    debug!(?e, "unparseable request");
                    let response = Response::error("bad_request", e.to_string());
                    Self::send_message(&mut stream, &response).await?;
                    continue;
                }
            };

            debug!(?request, "received request");

            if matches!(request, Request::Subscribe) {
                // Subscribe before confirming so no event slips between
                let event_rx = shared.event_tx.subscribe();
                Self::send_message(&mut stream, &Response::Subscribed).await?;
                debug!("client subscribed to notifications");
                return Self::push_events(stream, event_rx).await;
            }

            let response = Self::process_request(request, &shared).await;
            Self::send_message(&mut stream, &response).await?;
        }
    }

    /// Forward every event to a subscribed client until either side goes away
    async fn push_events(
        mut stream: UnixStream,
        mut event_rx: broadcast::Receiver<RepEvent>,
    ) -> Result<()> {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "subscriber lagged, events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return Ok(()),
            };

            let notification = Response::Notification { event };
            if let Err(e) = Self::send_message(&mut stream, &notification).await {
                debug!(?e, "subscriber went away");
                return Ok(());
            }
        }
    }

    /// Send a length-prefixed JSON message
    async fn send_message<T: serde::Serialize>(stream: &mut UnixStream, msg: &T) -> Result<()> {
        let msg_bytes = serde_json::to_vec(msg).context("failed to encode message")?;
        let msg_len = (msg_bytes.len() as u32).to_le_bytes();

        stream.write_all(&msg_len).await?;
        stream.write_all(&msg_bytes).await?;

        Ok(())
    }

    /// Process a request and return a response
    async fn process_request(request: Request, shared: &Shared) -> Response {
        match request {
            Request::Ping => Response::Pong,

            Request::GetStatus => {
                let mut state = shared.state.write().await;
                state.status.uptime_secs = state.start_time.elapsed().as_secs();
                Response::Status(state.status.clone())
            }

            Request::SubmitFrame { frame } => {
                let recording = {
                    let mut state = shared.state.write().await;
                    state.status.frames_received += 1;
                    if !state.status.recording {
                        state.status.frames_dropped += 1;
                    }
                    state.status.recording
                };

                if !recording {
                    return Response::FrameDropped;
                }
                Self::forward(shared, Command::Frame(frame), Response::FrameAccepted).await
            }

            Request::Reset => {
                Self::forward(shared, Command::Reset, Response::ResetRequested).await
            }

            Request::StartSession => {
                shared.state.write().await.status.recording = true;
                info!("recording session started");
                Self::forward(shared, Command::Reset, Response::Session { recording: true }).await
            }

            Request::StopSession => {
                shared.state.write().await.status.recording = false;
                info!("recording session stopped");
                Response::Session { recording: false }
            }

            // Handled by the connection loop
            Request::Subscribe => Response::Subscribed,
        }
    }

    /// Hand a command to the state machine task
    async fn forward(shared: &Shared, command: Command, ok: Response) -> Response {
        match shared.command_tx.send(command).await {
            Ok(()) => ok,
            Err(_) => {
                error!("state machine is gone, command dropped");
                Response::error("unavailable", "state machine is not running")
            }
        }
    }

    /// Gracefully shutdown the server
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        // Remove socket file
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!(?e, "failed to remove socket file");
            }
        }

        info!("IPC server shutdown complete");
    }
}
