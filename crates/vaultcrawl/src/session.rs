//! # Session
//!
//! Async façade over [`Engine`]. A single worker task owns the engine and
//! drains an unbounded FIFO channel, so commands run strictly in submission
//! order and the only suspension points are host round trips.
//!
//! ```text
//! SessionHandle ──msg──> [ mpsc ] ──> worker: Engine ──> Host
//!       │                                  │
//!       └──── snapshot() <── RwLock<SessionView> <── publish
//! ```
//!
//! After every command the worker persists state through the host before
//! resolving the command's ticket.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use vaultcrawl_core::DocumentGraph;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::SessionError;
use crate::host::Host;
use crate::view::SessionView;

/// Viewport gestures forwarded to the worker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportAction {
    /// Fit the whole grid.
    Fit,
    /// Center on the current room.
    Center,
    /// Zoom by a factor; `> 1` zooms in.
    Zoom(f64),
    /// Pan by a drag delta.
    Pan(f64, f64),
}

/// Input-box gestures that recall command history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recall {
    /// Up arrow.
    Older,
    /// Down arrow.
    Newer,
}

enum Message {
    Command(String, oneshot::Sender<()>),
    Refresh(oneshot::Sender<()>),
    Input(String, oneshot::Sender<()>),
    Viewport(ViewportAction, oneshot::Sender<()>),
    Recall(Recall, oneshot::Sender<Option<String>>),
    PendingAi(bool),
}

/// Resolves when the worker has finished a request. The request is queued
/// whether or not the ticket is awaited.
///
/// Fails with [`SessionError::Closed`] if the worker stopped first.
#[derive(Debug)]
pub struct Ticket<T> {
    rx: Option<oneshot::Receiver<T>>,
}

/// Ticket for a submitted command.
pub type CommandTicket = Ticket<()>;

impl<T> Ticket<T> {
    fn closed() -> Self {
        Self { rx: None }
    }
}

impl<T> Future for Ticket<T> {
    type Output = Result<T, SessionError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.rx.as_mut() {
            Some(rx) => Pin::new(rx).poll(cx).map(|r| r.map_err(|_| SessionError::Closed)),
            None => Poll::Ready(Err(SessionError::Closed)),
        }
    }
}

/// Entry point for async hosts.
pub struct Session;

impl Session {
    /// Loads saved state and the graph from `host`, then starts the worker.
    ///
    /// Host failures here are logged and degrade to an empty start; they
    /// never fail the spawn. Must be called within a Tokio runtime.
    pub async fn spawn<H: Host>(host: Arc<H>, config: EngineConfig) -> SessionHandle {
        let saved = match host.load_state().await {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Could not load saved state: {}", e);
                None
            }
        };
        let mut engine = Engine::new(config);
        let graph = match host.document_graph().await {
            Ok(graph) => graph,
            Err(e) => {
                tracing::warn!("Could not read the document graph: {}", e);
                engine.log.system(format!("The vault could not be read: {e}"));
                DocumentGraph::new()
            }
        };
        let open = host.currently_open_document().await;
        engine.load(graph, open.as_deref(), saved.as_deref());
        tracing::info!("Session started");

        let view = Arc::new(RwLock::new(engine.snapshot()));
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(host, engine, rx, Arc::clone(&view)));
        SessionHandle { tx, view }
    }
}

/// Cloneable handle to a running session. The worker stops once every
/// handle is dropped.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Message>,
    view: Arc<RwLock<SessionView>>,
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command(line, _) => f.debug_tuple("Command").field(line).finish(),
            Self::Refresh(_) => f.write_str("Refresh"),
            Self::Input(buffer, _) => f.debug_tuple("Input").field(buffer).finish(),
            Self::Viewport(action, _) => f.debug_tuple("Viewport").field(action).finish(),
            Self::Recall(recall, _) => f.debug_tuple("Recall").field(recall).finish(),
            Self::PendingAi(busy) => f.debug_tuple("PendingAi").field(busy).finish(),
        }
    }
}

impl SessionHandle {
    /// Enqueues a command line. The line's place in the queue is fixed at
    /// call time; the ticket resolves once it ran and state was persisted.
    pub fn submit_command(&self, line: impl Into<String>) -> CommandTicket {
        let line = line.into();
        self.send(|done| Message::Command(line, done))
    }

    /// Re-reads the host graph and rebuilds or reuses the layout.
    pub fn refresh_graph(&self) -> Ticket<()> {
        self.send(Message::Refresh)
    }

    /// Updates the live input buffer (drives link autocomplete).
    pub fn set_input(&self, buffer: impl Into<String>) -> Ticket<()> {
        let buffer = buffer.into();
        self.send(|done| Message::Input(buffer, done))
    }

    /// Applies a viewport gesture.
    pub fn viewport(&self, action: ViewportAction) -> Ticket<()> {
        self.send(|done| Message::Viewport(action, done))
    }

    /// Recalls a line from the command history.
    pub fn recall(&self, direction: Recall) -> Ticket<Option<String>> {
        self.send(|done| Message::Recall(direction, done))
    }

    /// Sets the external companion's busy flag.
    ///
    /// # Errors
    ///
    /// Fails if the worker has stopped.
    pub fn set_pending_ai(&self, pending: bool) -> Result<(), SessionError> {
        self.tx
            .send(Message::PendingAi(pending))
            .map_err(|_| SessionError::Closed)
    }

    /// Latest published view.
    #[must_use]
    pub fn snapshot(&self) -> SessionView {
        self.view.read().clone()
    }

    /// Returns true once the worker has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send<T>(&self, message: impl FnOnce(oneshot::Sender<T>) -> Message) -> Ticket<T> {
        let (done, rx) = oneshot::channel();
        match self.tx.send(message(done)) {
            Ok(()) => Ticket { rx: Some(rx) },
            Err(_) => Ticket::closed(),
        }
    }
}

async fn run_worker<H: Host>(
    host: Arc<H>,
    mut engine: Engine,
    mut rx: mpsc::UnboundedReceiver<Message>,
    view: Arc<RwLock<SessionView>>,
) {
    while let Some(message) = rx.recv().await {
        tracing::trace!("Session message: {:?}", message);
        match message {
            Message::Command(line, done) => {
                let mut request = engine.submit(&line);
                while let Some(pending) = request {
                    publish(&engine, &view);
                    let outcome = pending.perform(host.as_ref()).await;
                    request = engine.complete(outcome);
                }
                persist(host.as_ref(), &mut engine).await;
                publish(&engine, &view);
                let _ = done.send(());
            }
            Message::Refresh(done) => {
                match host.document_graph().await {
                    Ok(graph) => engine.replace_graph(graph),
                    Err(e) => {
                        tracing::warn!("Could not refresh the document graph: {}", e);
                        engine.log.system(format!("The vault could not be read: {e}"));
                    }
                }
                persist(host.as_ref(), &mut engine).await;
                publish(&engine, &view);
                let _ = done.send(());
            }
            Message::Input(buffer, done) => {
                engine.set_input(&buffer);
                publish(&engine, &view);
                let _ = done.send(());
            }
            Message::Viewport(action, done) => {
                match action {
                    ViewportAction::Fit => engine.fit_viewport(),
                    ViewportAction::Center => engine.center_viewport(),
                    ViewportAction::Zoom(factor) => engine.zoom_viewport(factor),
                    ViewportAction::Pan(dx, dy) => engine.pan_viewport(dx, dy),
                };
                publish(&engine, &view);
                let _ = done.send(());
            }
            Message::Recall(direction, done) => {
                let line = match direction {
                    Recall::Older => engine.history_previous(),
                    Recall::Newer => engine.history_next(),
                };
                let _ = done.send(line);
            }
            Message::PendingAi(pending) => {
                engine.set_pending_ai(pending);
                publish(&engine, &view);
            }
        }
    }
    tracing::info!("Session worker stopped");
}

async fn persist<H: Host>(host: &H, engine: &mut Engine) {
    let blob = match engine.save() {
        Ok(blob) => blob,
        Err(e) => {
            tracing::warn!("Could not encode state: {}", e);
            return;
        }
    };
    if let Err(e) = host.persist_state(blob).await {
        tracing::warn!("Could not persist state: {}", e);
        engine.log.system("Progress could not be saved.");
    }
}

fn publish(engine: &Engine, view: &RwLock<SessionView>) {
    *view.write() = engine.snapshot();
}
