//! # Document Graph
//!
//! The corpus as the host sees it: documents keyed by id, directed links, and
//! an undirected adjacency derived from those links.
//!
//! ## Invariant
//!
//! `adjacency[a] ∋ b ⟺ adjacency[b] ∋ a`. Outbound and inbound sets are
//! directed and need not be symmetric.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::room::VOID_PREFIX;

/// A single document in the corpus. Read-only for the maze core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    /// Unique id (typically a vault-relative path).
    pub id: String,
    /// Display name (typically the title).
    pub name: String,
    /// Full path.
    pub path: String,
    /// Containing directory, empty for the root.
    pub directory: String,
    /// Short excerpt of the body.
    pub excerpt: Option<String>,
    /// Section headings.
    pub headings: Vec<String>,
    /// Word count of the body.
    pub word_count: u32,
    /// Lower-cased file stem.
    pub basename: String,
}

impl DocumentNode {
    /// Creates a node whose path is its id.
    ///
    /// Directory and basename are derived from the id.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let (directory, file) = match id.rfind('/') {
            Some(pos) => (id[..pos].to_string(), &id[pos + 1..]),
            None => (String::new(), id.as_str()),
        };
        let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
        let basename = stem.to_lowercase();
        Self {
            path: id.clone(),
            id,
            name: name.into(),
            directory,
            excerpt: None,
            headings: Vec::new(),
            word_count: 0,
            basename,
        }
    }

    /// Sets the path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the directory.
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Sets the excerpt.
    #[must_use]
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Sets the headings.
    #[must_use]
    pub fn with_headings<I, S>(mut self, headings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headings = headings.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the word count.
    #[must_use]
    pub fn with_word_count(mut self, word_count: u32) -> Self {
        self.word_count = word_count;
        self
    }
}

/// Documents and their links.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentGraph {
    nodes: BTreeMap<String, DocumentNode>,
    outbound: BTreeMap<String, BTreeSet<String>>,
    inbound: BTreeMap<String, BTreeSet<String>>,
    adjacency: BTreeMap<String, BTreeSet<String>>,
    edge_count: usize,
}

/// Shared empty set for lookups of unknown ids.
static EMPTY: BTreeSet<String> = BTreeSet::new();

impl DocumentGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document.
    ///
    /// # Errors
    ///
    /// Rejects empty ids, ids using the void prefix, and duplicates.
    pub fn insert_node(&mut self, node: DocumentNode) -> GraphResult<()> {
        if node.id.is_empty() {
            return Err(GraphError::EmptyId);
        }
        if node.id.starts_with(VOID_PREFIX) {
            return Err(GraphError::ReservedId(node.id));
        }
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateId(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Removes a document and every link touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<DocumentNode> {
        let node = self.nodes.remove(id)?;

        if let Some(targets) = self.outbound.remove(id) {
            for target in &targets {
                if let Some(sources) = self.inbound.get_mut(target) {
                    sources.remove(id);
                }
            }
            self.edge_count -= targets.len();
        }
        if let Some(sources) = self.inbound.remove(id) {
            for source in &sources {
                if let Some(targets) = self.outbound.get_mut(source) {
                    if targets.remove(id) {
                        self.edge_count -= 1;
                    }
                }
            }
        }
        if let Some(neighbors) = self.adjacency.remove(id) {
            for neighbor in &neighbors {
                if let Some(set) = self.adjacency.get_mut(neighbor) {
                    set.remove(id);
                }
            }
        }
        Some(node)
    }

    /// Records a directed link `from -> to`.
    ///
    /// Returns `Ok(false)` for self-links and links already present.
    ///
    /// # Errors
    ///
    /// Both endpoints must be documents in the graph.
    pub fn add_link(&mut self, from: &str, to: &str) -> GraphResult<bool> {
        if !self.nodes.contains_key(from) {
            return Err(GraphError::UnknownDocument(from.to_string()));
        }
        if !self.nodes.contains_key(to) {
            return Err(GraphError::UnknownDocument(to.to_string()));
        }
        if from == to {
            return Ok(false);
        }
        let inserted = self
            .outbound
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        if !inserted {
            return Ok(false);
        }
        self.inbound
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
        self.adjacency
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.adjacency
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
        self.edge_count += 1;
        Ok(true)
    }

    /// Looks up a document.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&DocumentNode> {
        self.nodes.get(id)
    }

    /// Returns true if `id` is a document in the graph.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterates documents in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &DocumentNode> {
        self.nodes.values()
    }

    /// Document ids in lexicographic order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if there are no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct directed links.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Targets linked from `id`.
    #[must_use]
    pub fn outbound(&self, id: &str) -> &BTreeSet<String> {
        self.outbound.get(id).unwrap_or(&EMPTY)
    }

    /// Sources linking to `id`.
    #[must_use]
    pub fn inbound(&self, id: &str) -> &BTreeSet<String> {
        self.inbound.get(id).unwrap_or(&EMPTY)
    }

    /// Undirected neighbors of `id`.
    #[must_use]
    pub fn neighbors(&self, id: &str) -> &BTreeSet<String> {
        self.adjacency.get(id).unwrap_or(&EMPTY)
    }

    /// Returns true if `a` and `b` are linked in either direction.
    #[must_use]
    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.neighbors(a).contains(b)
    }
}
