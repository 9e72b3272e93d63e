//! Similarity grouping of reviewer notes
//!
//! Requests whose latest reviewer note is a near-duplicate (normalized edit
//! distance) of an existing group's representative text are merged into
//! that group. Groups carry a stable synthetic ID; the representative text
//! is a mutable attribute that evolves as notes merge in, never a lookup
//! key.

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use service_sdk::commerce::{CommerceClient, RequestQuery, RqlFilter};
use service_sdk::error::Result;

use crate::fields::path_str;

/// Two notes merge when their similarity reaches this threshold
pub const SIMILARITY_THRESHOLD: f64 = 0.9;

/// Normalized edit-distance similarity between two notes, in [0, 1].
///
/// `1 - levenshtein(a, b) / max(chars(a), chars(b))`, computed over
/// characters. Two empty strings score 0.0 by convention, so empty notes
/// never merge and each opens its own group.
pub fn similarity(a: &str, b: &str) -> f64 {
    let len_max = a.chars().count().max(b.chars().count());
    if len_max == 0 {
        return 0.0;
    }

    let distance = strsim::levenshtein(a, b);
    (1.0 - distance as f64 / len_max as f64).clamp(0.0, 1.0)
}

/// One request's latest reviewer note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub request_id: String,
    pub note: String,
}

/// A cluster of requests sharing near-identical note text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteGroup {
    /// Stable synthetic identifier
    pub id: String,

    /// The evolving shared text of the group
    pub representative: String,

    /// Member request IDs, in discovery order
    pub member_ids: Vec<String>,
}

impl NoteGroup {
    fn seed(entry: &NoteEntry) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            representative: entry.note.clone(),
            member_ids: vec![entry.request_id.clone()],
        }
    }
}

/// Cluster note entries by similarity, in discovery order.
///
/// The first existing group (in insertion order) whose representative
/// scores at or above the threshold wins; there is no best-match search.
/// On a merge the representative becomes the first `overlap` characters of
/// the incoming note, where `overlap = floor(min(len) * similarity)`.
pub fn group_notes(entries: &[NoteEntry]) -> Vec<NoteGroup> {
    let mut groups: Vec<NoteGroup> = Vec::new();

    for entry in entries {
        let mut merged = false;

        for group in groups.iter_mut() {
            let score = similarity(&entry.note, &group.representative);
            if score < SIMILARITY_THRESHOLD {
                continue;
            }

            let note_len = entry.note.chars().count();
            let rep_len = group.representative.chars().count();
            let overlap = (note_len.min(rep_len) as f64 * score).floor() as usize;

            group.representative = entry.note.chars().take(overlap).collect();
            group.member_ids.push(entry.request_id.clone());
            merged = true;
            break;
        }

        if !merged {
            groups.push(NoteGroup::seed(entry));
        }
    }

    debug!("Grouped {} notes into {} groups", entries.len(), groups.len());
    groups
}

/// Collect the latest reviewer note of every pending request.
///
/// Lists pending requests platform-wide (status filter only), walks each
/// conversation newest-first and keeps the first message authored by the
/// designated reviewer. Requests without such a note are skipped.
pub async fn collect_reviewer_notes(
    commerce: &CommerceClient,
    reviewer: &str,
) -> Result<Vec<NoteEntry>> {
    let query = RequestQuery::new().filter(RqlFilter::eq("status", "pending"));
    let requests = commerce.list_requests(&query).await?;

    let mut entries = Vec::new();

    for request in &requests {
        let request_id = path_str(request, &["id"]);
        if request_id.is_empty() {
            warn!("Skipping pending request without an id");
            continue;
        }

        let mut messages = commerce.conversation_messages(&request_id).await?;
        messages.sort_by(|a, b| path_str(b, &["created"]).cmp(&path_str(a, &["created"])));

        for message in &messages {
            // A null text never counts as a note; an empty string does
            let Some(text) = message.get("text").and_then(Value::as_str) else {
                continue;
            };

            let author = path_str(message, &["events", "created", "by", "name"]);
            if author == reviewer {
                entries.push(NoteEntry {
                    request_id: request_id.clone(),
                    note: text.to_string(),
                });
                break;
            }
        }
    }

    Ok(entries)
}
