mod common;

use axum::body::{Body, to_bytes};
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{FakePrinter, sample_order_json, test_state};
use kiosk_server::api::build_app;

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_status_reflects_last_attempt() {
    let printer = FakePrinter::offline();
    let state = test_state(printer.clone());

    let (status, body) = send(build_app(state.clone()), get("/printer-status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "❌ Printer is NOT connected", "printerConnected": false})
    );

    printer.plug_in();
    assert!(state.printer.connect().await);

    let (_, body) = send(build_app(state.clone()), get("/printer-status")).await;
    assert_eq!(body["printerConnected"], true);
    assert_eq!(body["message"], "✅ Printer is connected");

    printer.unplug();
    assert!(!state.printer.connect().await);

    let (_, body) = send(build_app(state), get("/printer-status")).await;
    assert_eq!(body["printerConnected"], false);
}

#[tokio::test]
async fn test_online_when_printer_present() {
    let printer = FakePrinter::online();
    let state = test_state(printer.clone());

    let (status, body) = send(build_app(state.clone()), get("/printer-online")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Printer is online"}));
    assert!(state.printer.is_connected());
    assert!(!state.printer.is_retrying());
}

#[tokio::test]
async fn test_offline_schedules_reconnect() {
    let printer = FakePrinter::offline();
    let state = test_state(printer.clone());

    let (status, body) = send(build_app(state.clone()), get("/printer-online")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": "Printer offline"}));
    assert!(state.printer.is_retrying());

    // A second probe does not start another chain
    assert!(!state.printer.schedule_reconnect());

    printer.plug_in();
    tokio::time::timeout(std::time::Duration::from_secs(5), async {
        while !state.printer.is_connected() {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("retry chain should reconnect");

    state.shutdown.cancel();
}

#[tokio::test]
async fn test_online_after_unplug_reports_offline() {
    let printer = FakePrinter::online();
    let state = test_state(printer.clone());

    let (_, body) = send(build_app(state.clone()), get("/printer-online")).await;
    assert_eq!(body["success"], true);

    printer.unplug();
    let (status, body) = send(build_app(state.clone()), get("/printer-online")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": "Printer offline"}));

    let (_, body) = send(build_app(state.clone()), get("/printer-status")).await;
    assert_eq!(body["printerConnected"], false);

    state.shutdown.cancel();
}

#[tokio::test]
async fn test_print_empty_cart_rejected_without_touching_device() {
    let printer = FakePrinter::online();
    let state = test_state(printer.clone());

    for body in [json!({"cart": []}), json!({"totalBill": 10}), json!({"cart": null})] {
        let (status, response) = send(build_app(state.clone()), post_json("/print", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"success": false, "message": "Cart is empty"}));
    }

    assert_eq!(printer.open_count(), 0);
    assert!(printer.writes().is_empty());
}

#[tokio::test]
async fn test_print_malformed_json_is_bad_request() {
    let printer = FakePrinter::online();
    let state = test_state(printer.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/print")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"cart\": [oops"))
        .unwrap();

    let (status, body) = send(build_app(state), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(printer.open_count(), 0);
}

#[tokio::test]
async fn test_print_when_offline_is_connection_error() {
    let printer = FakePrinter::offline();
    let state = test_state(printer.clone());

    let (status, body) = send(build_app(state.clone()), post_json("/print", &sample_order_json())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "message": "Printer connection error"}));
    assert!(!state.printer.is_connected());
    // Print failures do not start background retries
    assert!(!state.printer.is_retrying());
}

#[tokio::test]
async fn test_print_write_failure_is_printing_error() {
    let printer = FakePrinter::online();
    printer.fail_writes();
    let state = test_state(printer.clone());

    let (status, body) = send(build_app(state), post_json("/print", &sample_order_json())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "message": "Printing error"}));
    assert!(!printer.is_open(), "device is closed even after a failed write");
}

#[tokio::test]
async fn test_print_success() {
    let printer = FakePrinter::online();
    let state = test_state(printer.clone());

    let (status, body) = send(build_app(state.clone()), post_json("/print", &sample_order_json())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Receipt printed successfully!"}));

    let writes = printer.writes();
    assert_eq!(writes.len(), 1);
    let text = String::from_utf8_lossy(&writes[0]);
    assert!(text.contains("RETAIL SALE BILL"));
    assert!(text.contains("NET AMOUNT"));
    assert!(text.contains("Rs 405.00"));
    assert!(text.contains("Rs 95.00"));

    assert!(state.printer.is_connected());
    assert!(!printer.is_open());
    assert_eq!(printer.close_count(), 1);
}

#[tokio::test]
async fn test_health_and_request_id() {
    let state = test_state(FakePrinter::offline());

    let response = build_app(state).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["printerConnected"], false);
    assert_eq!(body["device"], "1fc9:2016");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let state = test_state(FakePrinter::online());
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/print")
        .header(header::ORIGIN, "http://till.local")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = build_app(state).oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
