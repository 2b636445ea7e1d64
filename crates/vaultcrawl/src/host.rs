//! # Host Collaborators
//!
//! Everything outside the maze core: the document graph, file contents,
//! link authoring and the durable store. The engine never calls a host
//! directly; it emits a [`HostRequest`] and resumes with a [`HostOutcome`],
//! so the only suspension points are these round trips.

use std::collections::BTreeMap;
use std::future::Future;

use parking_lot::Mutex;
use vaultcrawl_core::{DocumentGraph, GraphError, RoomId};

use crate::error::HostError;

/// The application hosting the maze.
///
/// Futures must be `Send` so a session worker can run on any runtime thread.
pub trait Host: Send + Sync + 'static {
    /// Current document graph.
    fn document_graph(&self) -> impl Future<Output = Result<DocumentGraph, HostError>> + Send;

    /// Document the user has open in the host, if any.
    fn currently_open_document(&self) -> impl Future<Output = Option<RoomId>> + Send;

    /// Text of a document. `Ok(None)` if it no longer exists.
    fn resolve_document_content(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<String>, HostError>> + Send;

    /// Writes a hyperlink `from -> to` into the source document.
    fn create_link(&self, from: &str, to: &str) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Stores the state blob.
    fn persist_state(&self, blob: String) -> impl Future<Output = Result<(), HostError>> + Send;

    /// Loads the state blob, `Ok(None)` if nothing was saved.
    fn load_state(&self) -> impl Future<Output = Result<Option<String>, HostError>> + Send;
}

/// A round trip the engine needs before it can finish a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostRequest {
    /// Read a document to unseal it.
    ReadDocument {
        /// Room being opened.
        room: RoomId,
    },
    /// Author a hyperlink.
    CreateLink {
        /// Source document.
        from: RoomId,
        /// Target document.
        to: RoomId,
    },
}

/// The host's answer to a [`HostRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostOutcome {
    /// Answer to [`HostRequest::ReadDocument`].
    Content(Result<Option<String>, HostError>),
    /// Answer to [`HostRequest::CreateLink`].
    Linked(Result<(), HostError>),
}

impl HostRequest {
    /// Performs the request against `host`.
    pub async fn perform<H: Host>(&self, host: &H) -> HostOutcome {
        match self {
            Self::ReadDocument { room } => HostOutcome::Content(host.resolve_document_content(room).await),
            Self::CreateLink { from, to } => HostOutcome::Linked(host.create_link(from, to).await),
        }
    }
}

/// A host with no documents and no storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHost;

impl Host for NullHost {
    async fn document_graph(&self) -> Result<DocumentGraph, HostError> {
        Ok(DocumentGraph::new())
    }

    async fn currently_open_document(&self) -> Option<RoomId> {
        None
    }

    async fn resolve_document_content(&self, _id: &str) -> Result<Option<String>, HostError> {
        Ok(None)
    }

    async fn create_link(&self, _from: &str, _to: &str) -> Result<(), HostError> {
        Err(HostError::Unsupported("create_link"))
    }

    async fn persist_state(&self, _blob: String) -> Result<(), HostError> {
        Ok(())
    }

    async fn load_state(&self) -> Result<Option<String>, HostError> {
        Ok(None)
    }
}

#[derive(Debug, Default)]
struct MemoryStore {
    graph: DocumentGraph,
    open_document: Option<RoomId>,
    contents: BTreeMap<RoomId, String>,
    blob: Option<String>,
    persist_count: usize,
    fail_io: bool,
}

/// An in-memory host for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryHost {
    store: Mutex<MemoryStore>,
}

impl MemoryHost {
    /// Creates a host serving `graph`.
    #[must_use]
    pub fn new(graph: DocumentGraph) -> Self {
        Self {
            store: Mutex::new(MemoryStore {
                graph,
                ..MemoryStore::default()
            }),
        }
    }

    /// Sets the document reported as open.
    #[must_use]
    pub fn with_open_document(self, id: impl Into<RoomId>) -> Self {
        self.store.lock().open_document = Some(id.into());
        self
    }

    /// Sets a document's text.
    #[must_use]
    pub fn with_content(self, id: impl Into<RoomId>, text: impl Into<String>) -> Self {
        self.store.lock().contents.insert(id.into(), text.into());
        self
    }

    /// Seeds the saved-state blob.
    #[must_use]
    pub fn with_saved_state(self, blob: impl Into<String>) -> Self {
        self.store.lock().blob = Some(blob.into());
        self
    }

    /// Replaces the served graph.
    pub fn set_graph(&self, graph: DocumentGraph) {
        self.store.lock().graph = graph;
    }

    /// Copy of the served graph.
    #[must_use]
    pub fn graph(&self) -> DocumentGraph {
        self.store.lock().graph.clone()
    }

    /// Makes every content read and state write fail.
    pub fn set_fail_io(&self, fail: bool) {
        self.store.lock().fail_io = fail;
    }

    /// Last persisted blob.
    #[must_use]
    pub fn saved_state(&self) -> Option<String> {
        self.store.lock().blob.clone()
    }

    /// Number of successful `persist_state` calls.
    #[must_use]
    pub fn persist_count(&self) -> usize {
        self.store.lock().persist_count
    }
}

impl Host for MemoryHost {
    async fn document_graph(&self) -> Result<DocumentGraph, HostError> {
        Ok(self.graph())
    }

    async fn currently_open_document(&self) -> Option<RoomId> {
        self.store.lock().open_document.clone()
    }

    async fn resolve_document_content(&self, id: &str) -> Result<Option<String>, HostError> {
        let store = self.store.lock();
        if store.fail_io {
            return Err(HostError::Io(format!("cannot read {id}")));
        }
        if !store.graph.contains(id) {
            return Ok(None);
        }
        Ok(Some(store.contents.get(id).cloned().unwrap_or_default()))
    }

    async fn create_link(&self, from: &str, to: &str) -> Result<(), HostError> {
        let mut store = self.store.lock();
        if store.fail_io {
            return Err(HostError::Io(format!("cannot write {from}")));
        }
        store.graph.add_link(from, to).map(|_| ()).map_err(|e| match e {
            GraphError::UnknownDocument(id) => HostError::NotFound(id),
            other => HostError::Io(other.to_string()),
        })
    }

    async fn persist_state(&self, blob: String) -> Result<(), HostError> {
        let mut store = self.store.lock();
        if store.fail_io {
            return Err(HostError::Io("store is read-only".into()));
        }
        store.blob = Some(blob);
        store.persist_count += 1;
        Ok(())
    }

    async fn load_state(&self) -> Result<Option<String>, HostError> {
        Ok(self.store.lock().blob.clone())
    }
}
