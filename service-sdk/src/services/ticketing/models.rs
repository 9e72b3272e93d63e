//! Ticketing system data models
//!
//! This module contains type definitions for the ticketing system's
//! search and issue-creation endpoints.

use serde::{Deserialize, Serialize};

/// Sentinel used when a request has no ticket in the ticketing system
pub const NO_TICKET: &str = "No ticket";

/// Sentinel used when a request has no ticket status
pub const NO_STATUS: &str = "N/A";

/// Free-text search request (JQL-style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query string, e.g. `text ~ "PR-1234-5678-9012-001"`
    pub jql: String,
}

impl SearchRequest {
    /// Build a query matching issues whose text contains `needle`
    pub fn text_contains(needle: &str) -> Self {
        Self {
            jql: format!("text ~ \"{}\"", needle),
        }
    }
}

/// Search response envelope
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

/// A single issue as returned by search
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,

    #[serde(default)]
    pub fields: IssueFields,
}

/// Issue fields we care about
#[derive(Debug, Clone, Deserialize, Default)]
pub struct IssueFields {
    #[serde(default)]
    pub status: Option<IssueStatus>,
}

/// Issue workflow status
#[derive(Debug, Clone, Deserialize)]
pub struct IssueStatus {
    pub name: String,
}

/// Issue creation request envelope
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest {
    pub fields: IssueSeed,
}

/// Fields for a new issue
#[derive(Debug, Clone, Serialize)]
pub struct IssueSeed {
    pub summary: String,

    pub issuetype: IssueTypeName,

    pub duedate: String,

    pub project: ProjectKey,

    pub description: String,
}

/// Issue type reference by name
#[derive(Debug, Clone, Serialize)]
pub struct IssueTypeName {
    pub name: String,
}

/// Project reference by key
#[derive(Debug, Clone, Serialize)]
pub struct ProjectKey {
    pub key: String,
}

/// Response to a successful issue creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedIssue {
    pub key: String,

    #[serde(default)]
    pub id: Option<String>,
}

/// Pairs a ticket key with its workflow status
///
/// `TicketRef::absent()` represents the "no ticket" case; callers that
/// need per-request ticket columns degrade to the sentinel strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRef {
    pub key: String,
    pub status: String,
}

impl TicketRef {
    /// Reference to a real ticket
    pub fn new(key: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: status.into(),
        }
    }

    /// The absence marker ("No ticket" / "N/A")
    pub fn absent() -> Self {
        Self {
            key: NO_TICKET.to_string(),
            status: NO_STATUS.to_string(),
        }
    }

    /// Whether this reference is the absence marker
    pub fn is_absent(&self) -> bool {
        self.key == NO_TICKET
    }
}

impl From<Issue> for TicketRef {
    fn from(issue: Issue) -> Self {
        let status = issue
            .fields
            .status
            .map(|s| s.name)
            .unwrap_or_default();
        Self {
            key: issue.key,
            status,
        }
    }
}
