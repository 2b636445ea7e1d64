//! # Room Resolver / Search
//!
//! Matches free text against rooms. Used by `search`, `teleport` and link
//! autocomplete.
//!
//! ## Affinity tiers
//!
//! | Match                      | Score |
//! |----------------------------|-------|
//! | exact id or name           | 100   |
//! | query prefixes the name    | 75    |
//! | id contains the query      | 70    |
//! | name contains the query    | 55    |
//!
//! Ids are usually short basenames, so an id hit outranks a loose name hit.
//! Ties keep candidate order.

use std::collections::{BTreeMap, BTreeSet};

use vaultcrawl_core::{DocumentGraph, DocumentNode, RoomId};

/// Score for an exact id or name match.
pub const EXACT_SCORE: u32 = 100;
/// Score when the query prefixes the name.
pub const PREFIX_SCORE: u32 = 75;
/// Score when the id contains the query.
pub const ID_CONTAINS_SCORE: u32 = 70;
/// Score when the name contains the query.
pub const NAME_CONTAINS_SCORE: u32 = 55;
/// Bonus per shared token in [`search_rooms`].
pub const TOKEN_OVERLAP_SCORE: u32 = 10;

/// Words too common to say anything about a room.
const STOP_WORDS: &[&str] = &[
    "the", "and", "but", "for", "nor", "not", "with", "are", "was", "were", "this", "that",
    "these", "those", "from", "into", "onto", "its", "has", "have", "had", "you", "your", "our",
    "etc", "can", "will", "all", "any", "who", "what", "which", "when", "where", "how",
];

/// Something a query can be matched against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// Room id.
    pub id: &'a str,
    /// Display name.
    pub name: &'a str,
}

impl<'a> Candidate<'a> {
    /// Creates a candidate.
    #[must_use]
    pub const fn new(id: &'a str, name: &'a str) -> Self {
        Self { id, name }
    }

    /// A candidate named after its id.
    #[must_use]
    pub const fn from_id(id: &'a str) -> Self {
        Self { id, name: id }
    }
}

impl<'a> From<&'a DocumentNode> for Candidate<'a> {
    fn from(node: &'a DocumentNode) -> Self {
        Self::new(&node.id, &node.name)
    }
}

/// A ranked search hit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// Position of the candidate in the input.
    pub index: usize,
    /// Room id.
    pub id: RoomId,
    /// Affinity score, higher is better.
    pub score: u32,
}

/// Options for [`find_matches`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum results.
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

/// Scores how well `query` names `candidate`. Zero means no match.
#[must_use]
pub fn compute_query_affinity(query: &str, candidate: Candidate<'_>) -> u32 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }
    let id = candidate.id.to_lowercase();
    let name = candidate.name.to_lowercase();

    if id == query || name == query {
        EXACT_SCORE
    } else if name.starts_with(&query) {
        PREFIX_SCORE
    } else if id.contains(&query) {
        ID_CONTAINS_SCORE
    } else if name.contains(&query) {
        NAME_CONTAINS_SCORE
    } else {
        0
    }
}

/// Ranks `candidates` against `query`, dropping non-matches.
///
/// An empty query yields nothing.
#[must_use]
pub fn find_matches(query: &str, candidates: &[Candidate<'_>], options: SearchOptions) -> Vec<Match> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let mut matches: Vec<Match> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            let score = compute_query_affinity(query, *candidate);
            (score > 0).then(|| Match {
                index,
                id: candidate.id.to_string(),
                score,
            })
        })
        .collect();
    // Stable: ties keep candidate order.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(options.limit);
    matches
}

/// Ranks every candidate, keeping zero-score ones at the tail.
///
/// Autocomplete lists use this so the full choice stays visible while the
/// best matches float up.
#[must_use]
pub fn rank_all(query: &str, candidates: &[Candidate<'_>], limit: usize) -> Vec<Match> {
    let mut ranked: Vec<Match> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| Match {
            index,
            id: candidate.id.to_string(),
            score: compute_query_affinity(query, *candidate),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

/// Splits text into lower-case similarity tokens.
///
/// Splits on non-word characters and drops tokens shorter than three
/// characters and stop words.
#[must_use]
pub fn tokenize_for_similarity(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 3 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Bag of tokens per room, built from name, id, directory, excerpt and
/// headings.
#[derive(Clone, Debug, Default)]
pub struct TokenIndex {
    tokens: BTreeMap<RoomId, BTreeSet<String>>,
}

impl TokenIndex {
    /// Indexes every document in `graph`.
    #[must_use]
    pub fn build(graph: &DocumentGraph) -> Self {
        let tokens = graph
            .nodes()
            .map(|node| (node.id.clone(), Self::node_tokens(node)))
            .collect();
        Self { tokens }
    }

    fn node_tokens(node: &DocumentNode) -> BTreeSet<String> {
        let mut bag = BTreeSet::new();
        let sources = [node.name.as_str(), node.id.as_str(), node.directory.as_str()];
        for text in sources
            .into_iter()
            .chain(node.excerpt.as_deref())
            .chain(node.headings.iter().map(String::as_str))
        {
            bag.extend(tokenize_for_similarity(text));
        }
        bag
    }

    /// Tokens of `room`, if indexed.
    #[must_use]
    pub fn tokens(&self, room: &str) -> Option<&BTreeSet<String>> {
        self.tokens.get(room)
    }

    /// Number of `query_tokens` present in `room`'s bag.
    #[must_use]
    pub fn overlap(&self, room: &str, query_tokens: &[String]) -> usize {
        self.tokens
            .get(room)
            .map_or(0, |bag| query_tokens.iter().filter(|t| bag.contains(*t)).count())
    }
}

/// Full-text room search: substring affinity plus token overlap.
#[must_use]
pub fn search_rooms(graph: &DocumentGraph, index: &TokenIndex, query: &str, limit: usize) -> Vec<Match> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let mut query_tokens = tokenize_for_similarity(query);
    query_tokens.sort();
    query_tokens.dedup();

    let mut matches: Vec<Match> = graph
        .nodes()
        .enumerate()
        .filter_map(|(position, node)| {
            let affinity = compute_query_affinity(query, Candidate::from(node));
            let overlap = u32::try_from(index.overlap(&node.id, &query_tokens)).unwrap_or(u32::MAX);
            let score = affinity.saturating_add(overlap.saturating_mul(TOKEN_OVERLAP_SCORE));
            (score > 0).then(|| Match {
                index: position,
                id: node.id.clone(),
                score,
            })
        })
        .collect();
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(limit);
    matches
}

/// Resolves a teleport target: an exact id wins, otherwise the best search
/// hit.
#[must_use]
pub fn resolve_room(graph: &DocumentGraph, index: &TokenIndex, query: &str, limit: usize) -> Option<RoomId> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    if graph.contains(query) {
        return Some(query.to_string());
    }
    search_rooms(graph, index, query, limit)
        .into_iter()
        .next()
        .map(|m| m.id)
}
