mod common;

use axum::http::{header, StatusCode};
use common::{delete, get, json_request, raw_json_request, read_bytes, read_json, seeded_app};
use serde_json::json;
use tower::ServiceExt;

fn order_ids(payload: &serde_json::Value) -> Vec<i64> {
    payload
        .as_array()
        .expect("array")
        .iter()
        .map(|order| order["orderID"].as_i64().expect("orderID"))
        .collect()
}

#[tokio::test]
async fn list_orders_returns_every_seeded_order() {
    let (app, _) = seeded_app().await;

    let response = app.oneshot(get("/api/ticketorders")).await.expect("list");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json(response).await;
    assert_eq!(order_ids(&payload), vec![1, 2]);
    assert_eq!(payload[1]["eventName"], "Theater");
    assert_eq!(payload[1]["customerName"], "Jane Smith");
    assert_eq!(payload[1]["ticketCount"], 3);
}

#[tokio::test]
async fn get_order_returns_joined_view() {
    let (app, _) = seeded_app().await;

    let response = app.oneshot(get("/api/ticketorders/1")).await.expect("get");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json(response).await;
    assert_eq!(payload["orderID"], 1);
    assert_eq!(payload["eventID"], 1);
    assert_eq!(payload["customerID"], 1);
    assert_eq!(payload["eventName"], "Concert");
    assert_eq!(payload["customerName"], "John Doe");
    assert_eq!(payload["ticketCount"], 2);
    assert_eq!(payload["orderDate"], "2024-05-01T00:00:00Z");
}

#[tokio::test]
async fn get_missing_order_is_404_with_empty_body() {
    let (app, _) = seeded_app().await;

    let response = app.oneshot(get("/api/ticketorders/999")).await.expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(read_bytes(response).await.is_empty());
}

#[tokio::test]
async fn non_numeric_order_id_is_rejected() {
    let (app, _) = seeded_app().await;

    let response = app.oneshot(get("/api/ticketorders/abc")).await.expect("get");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_matches_event_name_substring() {
    let (app, _) = seeded_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/ticketorders/search?eventName=Concert"))
        .await
        .expect("search");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(order_ids(&read_json(response).await), vec![1]);

    let response = app
        .clone()
        .oneshot(get("/api/ticketorders/search?eventName=eat"))
        .await
        .expect("search");
    assert_eq!(order_ids(&read_json(response).await), vec![2]);

    let response = app
        .oneshot(get("/api/ticketorders/search?eventName=NonExistentEvent"))
        .await
        .expect("search");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([]));
}

#[tokio::test]
async fn search_without_event_name_is_400() {
    let (app, _) = seeded_app().await;

    for uri in [
        "/api/ticketorders/search",
        "/api/ticketorders/search?eventName=",
    ] {
        let response = app.clone().oneshot(get(uri)).await.expect("search");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let payload = read_json(response).await;
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(payload["error"]["message"], "Event name is required.");
    }
}

#[tokio::test]
async fn create_order_returns_201_and_is_retrievable() {
    let (app, _) = seeded_app().await;

    let create = json_request(
        "POST",
        "/api/ticketorders",
        json!({ "orderID": 3, "eventID": 1, "customerID": 2, "ticketCount": 1 }),
    );
    let response = app.clone().oneshot(create).await.expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/api/ticketorders/3"
    );

    let created = read_json(response).await;
    assert_eq!(created["orderID"], 3);
    assert_eq!(created["eventID"], 1);
    assert_eq!(created["customerID"], 2);
    assert!(created["orderDate"].is_string());

    let response = app
        .oneshot(get("/api/ticketorders/3"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    let view = read_json(response).await;
    assert_eq!(view["eventName"], "Concert");
    assert_eq!(view["customerName"], "Jane Smith");
}

#[tokio::test]
async fn create_order_without_id_gets_next_id() {
    let (app, _) = seeded_app().await;

    let create = json_request(
        "POST",
        "/api/ticketorders",
        json!({
            "orderID": 0,
            "eventID": 2,
            "customerID": 1,
            "orderDate": "2024-09-01",
            "ticketCount": 4
        }),
    );
    let response = app.oneshot(create).await.expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = read_json(response).await;
    assert_eq!(created["orderID"], 3);
    assert_eq!(created["orderDate"], "2024-09-01T00:00:00Z");
}

#[tokio::test]
async fn create_order_after_highest_possible_id_is_500_not_a_crash() {
    let (app, store) = seeded_app().await;

    let highest = json_request(
        "POST",
        "/api/ticketorders",
        json!({ "orderID": i32::MAX, "eventID": 1, "customerID": 1, "ticketCount": 1 }),
    );
    let response = app.clone().oneshot(highest).await.expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);

    let next = json_request(
        "POST",
        "/api/ticketorders",
        json!({ "eventID": 1, "customerID": 1, "ticketCount": 1 }),
    );
    let response = app.oneshot(next).await.expect("create");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let payload = read_json(response).await;
    assert_eq!(payload["error"]["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(payload["error"]["message"], "No order ids are left to assign.");

    use city_events_server::store::TicketStore;
    assert_eq!(store.list_orders().await.expect("list").len(), 3);
}

#[tokio::test]
async fn create_order_with_null_or_malformed_body_is_400() {
    let (app, store) = seeded_app().await;

    for body in ["null", "{\"eventID\": \"one\"}", "not json"] {
        let response = app
            .clone()
            .oneshot(raw_json_request("POST", "/api/ticketorders", body))
            .await
            .expect("create");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let payload = read_json(response).await;
        assert_eq!(payload["error"]["message"], "Invalid data.");
    }

    use city_events_server::store::TicketStore;
    assert_eq!(store.list_orders().await.expect("list").len(), 2);
}

#[tokio::test]
async fn create_order_referencing_unknown_event_is_400() {
    let (app, _) = seeded_app().await;

    let create = json_request(
        "POST",
        "/api/ticketorders",
        json!({ "eventID": 42, "customerID": 1, "ticketCount": 1 }),
    );
    let response = app.oneshot(create).await.expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let payload = read_json(response).await;
    assert_eq!(
        payload["error"]["message"],
        "Referenced event or customer does not exist."
    );
}

#[tokio::test]
async fn create_order_with_taken_id_is_409() {
    let (app, _) = seeded_app().await;

    let create = json_request(
        "POST",
        "/api/ticketorders",
        json!({ "orderID": 1, "eventID": 1, "customerID": 1, "ticketCount": 1 }),
    );
    let response = app.oneshot(create).await.expect("create");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let payload = read_json(response).await;
    assert_eq!(payload["error"]["code"], "CONFLICT");
    assert_eq!(payload["error"]["message"], "Order 1 already exists.");
}

#[tokio::test]
async fn replace_order_with_mismatched_id_is_400() {
    let (app, _) = seeded_app().await;

    let replace = json_request(
        "PUT",
        "/api/ticketorders/2",
        json!({
            "orderID": 1,
            "eventID": 1,
            "customerID": 1,
            "orderDate": "2024-07-15",
            "ticketCount": 5
        }),
    );
    let response = app.oneshot(replace).await.expect("replace");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let payload = read_json(response).await;
    assert_eq!(payload["error"]["message"], "Mismatched order ID.");
}

#[tokio::test]
async fn replace_missing_order_is_404() {
    let (app, _) = seeded_app().await;

    let replace = json_request(
        "PUT",
        "/api/ticketorders/999",
        json!({
            "orderID": 999,
            "eventID": 1,
            "customerID": 1,
            "orderDate": "2024-07-15",
            "ticketCount": 5
        }),
    );
    let response = app.oneshot(replace).await.expect("replace");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn replace_order_overwrites_every_field_idempotently() {
    let (app, _) = seeded_app().await;

    let body = json!({
        "orderID": 1,
        "eventID": 2,
        "customerID": 2,
        "orderDate": "2024-07-15",
        "ticketCount": 5
    });

    let mut views = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/ticketorders/1", body.clone()))
            .await
            .expect("replace");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(read_bytes(response).await.is_empty());

        let response = app
            .clone()
            .oneshot(get("/api/ticketorders/1"))
            .await
            .expect("get");
        views.push(read_json(response).await);
    }

    assert_eq!(views[0], views[1]);
    assert_eq!(views[0]["eventName"], "Theater");
    assert_eq!(views[0]["customerName"], "Jane Smith");
    assert_eq!(views[0]["orderDate"], "2024-07-15T00:00:00Z");
    assert_eq!(views[0]["ticketCount"], 5);
}

#[tokio::test]
async fn replace_order_without_date_is_400() {
    let (app, _) = seeded_app().await;

    let replace = json_request(
        "PUT",
        "/api/ticketorders/1",
        json!({ "orderID": 1, "eventID": 1, "customerID": 1, "ticketCount": 5 }),
    );
    let response = app.oneshot(replace).await.expect("replace");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"]["message"], "Invalid data.");
}

#[tokio::test]
async fn delete_order_returns_snapshot_then_404() {
    let (app, _) = seeded_app().await;

    let response = app
        .clone()
        .oneshot(delete("/api/ticketorders/1"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);

    let deleted = read_json(response).await;
    assert_eq!(deleted["orderID"], 1);
    assert_eq!(deleted["eventID"], 1);
    assert_eq!(deleted["customerID"], 1);
    assert_eq!(deleted["ticketCount"], 2);

    let response = app
        .clone()
        .oneshot(delete("/api/ticketorders/1"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get("/api/ticketorders/1"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_customers_returns_lookup_entries() {
    let (app, _) = seeded_app().await;

    let response = app
        .oneshot(get("/api/ticketorders/customers"))
        .await
        .expect("customers");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!([
            { "customerID": 1, "fullName": "John Doe" },
            { "customerID": 2, "fullName": "Jane Smith" }
        ])
    );
}

#[tokio::test]
async fn events_window_repeats_events_when_windows_overlap() {
    let (app, _) = seeded_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/ticketorders/events"))
        .await
        .expect("events");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        read_json(response).await,
        json!([
            { "eventID": 1, "eventName": "Concert" },
            { "eventID": 2, "eventName": "Theater" },
            { "eventID": 2, "eventName": "Theater" },
            { "eventID": 1, "eventName": "Concert" }
        ])
    );

    let response = app
        .clone()
        .oneshot(get("/api/ticketorders/events?firstLimit=1&lastLimit=1"))
        .await
        .expect("events");
    let ids: Vec<i64> = read_json(response)
        .await
        .as_array()
        .expect("array")
        .iter()
        .map(|event| event["eventID"].as_i64().expect("eventID"))
        .collect();
    assert_eq!(ids, vec![1, 2]);

    let response = app
        .oneshot(get("/api/ticketorders/events?firstLimit=1&lastLimit=0"))
        .await
        .expect("events");
    assert_eq!(read_json(response).await.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn health_reports_storage_backend() {
    let (app, _) = seeded_app().await;

    let response = app.oneshot(get("/health")).await.expect("health");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json(response).await;
    assert_eq!(payload["success"], true);
    assert_eq!(payload["data"]["status"], "ok");
    assert_eq!(payload["data"]["storage"], "memory");
}

#[tokio::test]
async fn front_end_is_served_with_security_headers() {
    let (app, _) = seeded_app().await;

    let response = app.oneshot(get("/")).await.expect("index");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let body = String::from_utf8(read_bytes(response).await).expect("utf8");
    assert!(body.contains("ticketOrdersTableBody"));
}

#[tokio::test]
async fn openapi_document_describes_ticket_order_routes() {
    let (app, _) = seeded_app().await;

    let response = app
        .oneshot(get("/api-docs/openapi.json"))
        .await
        .expect("openapi");
    assert_eq!(response.status(), StatusCode::OK);

    let doc = read_json(response).await;
    assert_eq!(doc["info"]["title"], "WebCityEventsAPI");

    let by_id = &doc["paths"]["/api/ticketorders/{id}"];
    assert!(by_id.get("get").is_some());
    assert!(by_id.get("put").is_some());
    assert!(by_id.get("delete").is_some());
    assert!(doc["paths"]["/api/ticketorders/search"].get("get").is_some());
}

#[tokio::test]
async fn swagger_ui_is_mounted() {
    let (app, _) = seeded_app().await;

    let response = app.oneshot(get("/swagger/")).await.expect("swagger");
    assert_eq!(response.status(), StatusCode::OK);

    let body = String::from_utf8(read_bytes(response).await).expect("utf8");
    assert!(body.contains("swagger-ui"));
}
