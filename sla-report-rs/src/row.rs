//! Report row assembly
//!
//! One row per request: SLA timing, extracted record fields and the
//! note/ticket columns looked up from the memoized grouping result.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use service_sdk::ticketing::{NO_STATUS, NO_TICKET};

use crate::fields::{format_created, parse_created, path_str};
use crate::params::SlaThresholds;
use crate::reconcile::GroupReport;

/// Coarse urgency bucket derived from elapsed waiting days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlaLevel {
    Green,
    Yellow,
    Red,
}

impl fmt::Display for SlaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SlaLevel::Green => "GREEN",
            SlaLevel::Yellow => "YELLOW",
            SlaLevel::Red => "RED",
        };
        f.write_str(label)
    }
}

/// Whole days a request has been waiting; 0 when the creation timestamp is
/// absent or unparsable
pub fn awaiting_days(now: DateTime<Utc>, created: Option<DateTime<Utc>>) -> i64 {
    created.map(|ts| (now - ts).num_days()).unwrap_or(0)
}

/// Bucket waiting days against the configured thresholds
pub fn sla_level(awaiting_days: i64, thresholds: &SlaThresholds) -> SlaLevel {
    if awaiting_days >= thresholds.red {
        SlaLevel::Red
    } else if awaiting_days >= thresholds.yellow {
        SlaLevel::Yellow
    } else {
        SlaLevel::Green
    }
}

/// Representative note of the group containing `request_id`, empty when the
/// request is in no group
pub fn notes_for_id(groups: &[GroupReport], request_id: &str) -> String {
    groups
        .iter()
        .find(|group| group.member_ids.iter().any(|member| member == request_id))
        .map(|group| group.notes.clone())
        .unwrap_or_default()
}

fn column_for_id(groups: &[GroupReport], request_id: &str, sentinel: &str, pick: fn(&GroupReport) -> &Vec<String>) -> String {
    let mut found = Vec::new();

    for group in groups {
        let Some(position) = group
            .member_ids
            .iter()
            .position(|member| member == request_id)
        else {
            continue;
        };

        let column = pick(group);
        if column.len() == group.member_ids.len() {
            if let Some(value) = column.get(position) {
                found.push(value.clone());
            }
        } else {
            // Degraded group: one sentinel covers every member
            found.push(sentinel.to_string());
        }
    }

    found.join(", ")
}

/// Ticket key(s) covering `request_id`, comma-joined; empty when the
/// request is in no group
pub fn tickets_for_id(groups: &[GroupReport], request_id: &str) -> String {
    column_for_id(groups, request_id, NO_TICKET, |group| &group.tickets)
}

/// Ticket status(es) for `request_id`, comma-joined; empty when the
/// request is in no group
pub fn statuses_for_id(groups: &[GroupReport], request_id: &str) -> String {
    column_for_id(groups, request_id, NO_STATUS, |group| &group.statuses)
}

/// One fixed-order report row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub request_id: String,
    pub product_id: String,
    pub product_name: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub provider_id: String,
    pub provider_name: String,
    pub request_type: String,
    pub awaiting_days: i64,
    pub created: String,
    pub status: String,
    pub connection_type: String,
    pub sla_level: SlaLevel,
    pub notes: String,
    pub tickets: String,
    pub ticket_statuses: String,
}

impl ReportRow {
    /// Project the row to its 16 scalar cells, in renderer order
    pub fn cells(&self) -> [String; 16] {
        [
            self.request_id.clone(),
            self.product_id.clone(),
            self.product_name.clone(),
            self.vendor_id.clone(),
            self.vendor_name.clone(),
            self.provider_id.clone(),
            self.provider_name.clone(),
            self.request_type.clone(),
            self.awaiting_days.to_string(),
            self.created.clone(),
            self.status.clone(),
            self.connection_type.clone(),
            self.sla_level.to_string(),
            self.notes.clone(),
            self.tickets.clone(),
            self.ticket_statuses.clone(),
        ]
    }
}

/// Assemble the row for one request record
pub fn build_row(
    request: &Value,
    thresholds: &SlaThresholds,
    groups: &[GroupReport],
    now: DateTime<Utc>,
) -> ReportRow {
    let request_id = path_str(request, &["id"]);
    let created = parse_created(&path_str(request, &["created"]));
    let waiting = awaiting_days(now, created);

    ReportRow {
        product_id: path_str(request, &["asset", "product", "id"]),
        product_name: path_str(request, &["asset", "product", "name"]),
        vendor_id: path_str(request, &["asset", "connection", "vendor", "id"]),
        vendor_name: path_str(request, &["asset", "connection", "vendor", "name"]),
        provider_id: path_str(request, &["asset", "connection", "provider", "id"]),
        provider_name: path_str(request, &["asset", "connection", "provider", "name"]),
        request_type: path_str(request, &["type"]),
        awaiting_days: waiting,
        created: format_created(created),
        status: path_str(request, &["status"]),
        connection_type: path_str(request, &["asset", "connection", "type"]),
        sla_level: sla_level(waiting, thresholds),
        notes: notes_for_id(groups, &request_id),
        tickets: tickets_for_id(groups, &request_id),
        ticket_statuses: statuses_for_id(groups, &request_id),
        request_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn thresholds() -> SlaThresholds {
        SlaThresholds { red: 10, yellow: 5 }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_awaiting_days_whole_day_difference() {
        let created = Utc.with_ymd_and_hms(2026, 7, 30, 13, 0, 0).unwrap();
        assert_eq!(awaiting_days(fixed_now(), Some(created)), 6);
        assert_eq!(awaiting_days(fixed_now(), None), 0);
    }

    #[test]
    fn test_awaiting_days_monotonic_as_now_advances() {
        let created = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        let mut previous = i64::MIN;
        for offset in 0..48 {
            let now = created + chrono::Duration::hours(offset * 7);
            let days = awaiting_days(now, Some(created));
            assert!(days >= previous);
            previous = days;
        }
    }

    #[test]
    fn test_sla_level_boundaries() {
        let t = thresholds();
        assert_eq!(sla_level(0, &t), SlaLevel::Green);
        assert_eq!(sla_level(4, &t), SlaLevel::Green);
        assert_eq!(sla_level(5, &t), SlaLevel::Yellow);
        assert_eq!(sla_level(9, &t), SlaLevel::Yellow);
        assert_eq!(sla_level(10, &t), SlaLevel::Red);
        assert_eq!(sla_level(100, &t), SlaLevel::Red);
    }

    fn sample_groups() -> Vec<GroupReport> {
        vec![
            GroupReport {
                group_id: "g1".to_string(),
                notes: "Waiting for customer reply".to_string(),
                member_ids: vec![
                    "PR-1111-2222-3333-001".to_string(),
                    "PR-1111-2222-3333-002".to_string(),
                ],
                tickets: vec!["TRITS-1".to_string(), "TRITS-2".to_string()],
                statuses: vec!["Open".to_string(), "In Progress".to_string()],
            },
            GroupReport {
                group_id: "g2".to_string(),
                notes: "Vendor portal is down".to_string(),
                member_ids: vec!["PR-1111-2222-3333-003".to_string()],
                tickets: vec![NO_TICKET.to_string()],
                statuses: vec![NO_STATUS.to_string()],
            },
        ]
    }

    #[test]
    fn test_lookups_use_exact_member_match() {
        let groups = sample_groups();

        assert_eq!(
            notes_for_id(&groups, "PR-1111-2222-3333-002"),
            "Waiting for customer reply"
        );
        assert_eq!(tickets_for_id(&groups, "PR-1111-2222-3333-002"), "TRITS-2");
        assert_eq!(
            statuses_for_id(&groups, "PR-1111-2222-3333-002"),
            "In Progress"
        );

        // A prefix of a member ID must not match
        assert_eq!(notes_for_id(&groups, "PR-1111-2222-3333"), "");
        assert_eq!(tickets_for_id(&groups, "PR-1111-2222-3333"), "");
    }

    #[test]
    fn test_lookups_degraded_group_sentinels() {
        let groups = sample_groups();

        assert_eq!(tickets_for_id(&groups, "PR-1111-2222-3333-003"), NO_TICKET);
        assert_eq!(statuses_for_id(&groups, "PR-1111-2222-3333-003"), NO_STATUS);
    }

    #[test]
    fn test_build_row_field_order_and_sentinels() {
        let request = json!({
            "id": "PR-1111-2222-3333-001",
            "type": "purchase",
            "status": "pending",
            "created": "2026-07-25T12:00:00+00:00",
            "asset": {
                "product": {"id": "PRD-1", "name": "Widget Suite"},
                "connection": {
                    "type": "production",
                    "vendor": {"id": "VA-1", "name": "Vendor Inc"},
                    "provider": {"id": "PA-1", "name": "Provider LLC"}
                }
            }
        });

        let row = build_row(&request, &thresholds(), &sample_groups(), fixed_now());

        assert_eq!(row.request_id, "PR-1111-2222-3333-001");
        assert_eq!(row.awaiting_days, 12);
        assert_eq!(row.sla_level, SlaLevel::Red);
        assert_eq!(row.tickets, "TRITS-1");
        assert_eq!(row.notes, "Waiting for customer reply");

        let cells = row.cells();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0], "PR-1111-2222-3333-001");
        assert_eq!(cells[1], "PRD-1");
        assert_eq!(cells[2], "Widget Suite");
        assert_eq!(cells[3], "VA-1");
        assert_eq!(cells[4], "Vendor Inc");
        assert_eq!(cells[5], "PA-1");
        assert_eq!(cells[6], "Provider LLC");
        assert_eq!(cells[7], "purchase");
        assert_eq!(cells[8], "12");
        assert_eq!(cells[9], "2026-07-25 12:00:00");
        assert_eq!(cells[10], "pending");
        assert_eq!(cells[11], "production");
        assert_eq!(cells[12], "RED");
        assert_eq!(cells[13], "Waiting for customer reply");
        assert_eq!(cells[14], "TRITS-1");
        assert_eq!(cells[15], "Open");
    }

    #[test]
    fn test_build_row_missing_fields_are_blank() {
        let request = json!({"id": "PR-9999-9999-9999-999", "status": "pending"});
        let row = build_row(&request, &thresholds(), &[], fixed_now());

        assert_eq!(row.product_id, "");
        assert_eq!(row.vendor_name, "");
        assert_eq!(row.created, "-");
        assert_eq!(row.awaiting_days, 0);
        assert_eq!(row.sla_level, SlaLevel::Green);
        assert_eq!(row.notes, "");
        assert_eq!(row.tickets, "");
        assert_eq!(row.ticket_statuses, "");
    }
}
