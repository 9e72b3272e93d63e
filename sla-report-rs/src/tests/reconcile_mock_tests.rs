//! Mock tests for ticket reconciliation

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use service_sdk::ticketing::{TicketingClient, NO_STATUS, NO_TICKET};

    use crate::grouping::NoteGroup;
    use crate::reconcile::reconcile_group;

    fn ticketing_client(mock_server: &MockServer) -> TicketingClient {
        TicketingClient::builder()
            .api_token("mock_token")
            .base_url(mock_server.uri())
            .timeout(5)
            .build()
            .expect("Failed to build ticketing client")
    }

    fn group(member_ids: &[&str]) -> NoteGroup {
        NoteGroup {
            id: "group-under-test".to_string(),
            representative: "Waiting for customer reply".to_string(),
            member_ids: member_ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_all_members_already_covered() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/search"))
            .and(body_partial_json(json!({"jql": "text ~ \"PR-1111-2222-3333-001\""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [{"key": "TRITS-1", "fields": {"status": {"name": "Open"}}}]
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/search"))
            .and(body_partial_json(json!({"jql": "text ~ \"PR-1111-2222-3333-002\""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [{"key": "TRITS-2", "fields": {"status": {"name": "In Progress"}}}]
            })))
            .mount(&mock_server)
            .await;

        // No creation may happen when every member is covered
        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"key": "TRITS-99"})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = ticketing_client(&mock_server);
        let report = reconcile_group(
            &client,
            &group(&["PR-1111-2222-3333-001", "PR-1111-2222-3333-002"]),
        )
        .await;

        assert!(report.is_fully_resolved());
        assert_eq!(report.tickets, vec!["TRITS-1", "TRITS-2"]);
        assert_eq!(report.statuses, vec!["Open", "In Progress"]);
        assert_eq!(report.tickets.len(), report.member_ids.len());
    }

    #[tokio::test]
    async fn test_uncovered_members_get_one_created_ticket() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/search"))
            .and(body_partial_json(json!({"jql": "text ~ \"PR-1111-2222-3333-001\""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [{"key": "TRITS-1", "fields": {"status": {"name": "Open"}}}]
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"issues": []})))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"key": "TRITS-50"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ticketing_client(&mock_server);
        let report = reconcile_group(
            &client,
            &group(&[
                "PR-1111-2222-3333-001",
                "PR-1111-2222-3333-002",
                "PR-1111-2222-3333-003",
            ]),
        )
        .await;

        // Newly-created ticket covers both uncovered members with status Open
        assert!(report.is_fully_resolved());
        assert_eq!(report.tickets, vec!["TRITS-1", "TRITS-50", "TRITS-50"]);
        assert_eq!(report.statuses, vec!["Open", "Open", "Open"]);

        // The creation request embeds the reason and both uncovered IDs
        let requests = mock_server.received_requests().await.unwrap();
        let creation = requests
            .iter()
            .find(|r| r.url.path() == "/rest/api/2/issue")
            .expect("a creation request");
        let body: serde_json::Value = serde_json::from_slice(&creation.body).unwrap();
        let description = body["fields"]["description"].as_str().unwrap();
        assert!(description.contains("Waiting for customer reply"));
        assert!(description.contains("PR-1111-2222-3333-002, PR-1111-2222-3333-003"));
        assert!(!description.contains("PR-1111-2222-3333-001,"));
    }

    #[tokio::test]
    async fn test_malformed_id_skipped_and_group_degrades() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [{"key": "TRITS-1", "fields": {"status": {"name": "Open"}}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ticketing_client(&mock_server);
        let report =
            reconcile_group(&client, &group(&["not-a-request-id", "PR-1111-2222-3333-001"]))
                .await;

        // The malformed member never resolves, so per-ID granularity is lost
        assert!(!report.is_fully_resolved());
        assert_eq!(report.tickets, vec![NO_TICKET]);
        assert_eq!(report.statuses, vec![NO_STATUS]);
        assert_eq!(report.member_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_search_failure_degrades_to_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"key": "TRITS-60"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ticketing_client(&mock_server);
        let report = reconcile_group(&client, &group(&["PR-1111-2222-3333-001"])).await;

        // The failed search counts as "no ticket found"; creation covers it
        assert_eq!(report.tickets, vec!["TRITS-60"]);
        assert_eq!(report.statuses, vec!["Open"]);
    }

    #[tokio::test]
    async fn test_creation_failure_leaves_sentinel() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"issues": []})))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"errorMessages": ["project is archived"]})),
            )
            .mount(&mock_server)
            .await;

        let client = ticketing_client(&mock_server);
        let report = reconcile_group(&client, &group(&["PR-1111-2222-3333-001"])).await;

        assert_eq!(report.tickets, vec![NO_TICKET]);
        assert_eq!(report.statuses, vec![NO_STATUS]);
        assert!(report.resolved_keys().is_empty());
    }
}
