//! Conversation notifications for reconciled groups
//!
//! Every member of a group with a real ticket gets one conversation
//! message citing the ticket, unless its conversation already mentions one
//! of the group's keys. Idempotence across report runs relies entirely on
//! that text scan.

use serde_json::Value;
use tracing::{debug, info};

use service_sdk::commerce::CommerceClient;
use service_sdk::error::Result;

use crate::reconcile::GroupReport;

/// Announcement posted into conversations that lack a ticket mention
fn announcement(ticket_key: &str) -> String {
    format!("We have created a ticket {}", ticket_key)
}

/// Ensure every member of the group has a conversation message citing a
/// ticket. Groups without a real ticket are skipped.
pub async fn notify_group(commerce: &CommerceClient, report: &GroupReport) -> Result<()> {
    let keys = report.resolved_keys();
    let Some(first_key) = keys.first().copied() else {
        debug!(
            "Group {} has no resolved ticket, skipping notifications",
            report.group_id
        );
        return Ok(());
    };

    for request_id in &report.member_ids {
        let messages = commerce.conversation_messages(request_id).await?;

        let already_mentioned = messages.iter().any(|message| {
            message
                .get("text")
                .and_then(Value::as_str)
                .map_or(false, |text| keys.iter().any(|key| text.contains(key)))
        });

        if !already_mentioned {
            commerce
                .post_message(request_id, &announcement(first_key))
                .await?;
            info!("Posted ticket notification {} to {}", first_key, request_id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_text() {
        assert_eq!(
            announcement("TRITS-100"),
            "We have created a ticket TRITS-100"
        );
    }
}
