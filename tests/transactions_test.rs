mod common;

use axum::http::StatusCode;
use common::{TestClient, AS_OF};
use serde_json::json;

#[tokio::test]
async fn test_create_and_fetch_transaction() {
    let client = TestClient::new();

    let (status, body) = client
        .post_json(
            "/api/transactions",
            &json!({
                "date": "2024-03-10",
                "description": "  Aluguel  ",
                "amount": 1500.75,
                "type": "expense",
                "category": "Moradia",
                "isEssential": true,
                "paymentMethod": "PIX",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let created = &body["data"];
    assert_eq!(created["description"], "Aluguel");
    assert_eq!(created["amount_cents"], 150075);
    assert_eq!(created["type"], "expense");
    assert_eq!(created["is_essential"], true);
    assert_eq!(created["payment_method"], "PIX");
    assert_eq!(created["date"], "2024-03-10");

    let id = created["id"].as_i64().unwrap();
    let (status, body) = client.get_json(&format!("/api/transactions/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["category"], "Moradia");
}

#[tokio::test]
async fn test_income_never_carries_essential_flag() {
    let client = TestClient::new();
    let id = client
        .create_transaction("2024-03-01", 3000.0, "income", "Salário", Some(true))
        .await;

    let (_, body) = client.get_json(&format!("/api/transactions/{}", id)).await;
    assert!(body["data"].get("is_essential").is_none());
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let client = TestClient::new();
    client.create_income("2024-01-05", 100.0).await;
    client.create_income("2024-03-05", 100.0).await;
    client.create_income("2024-02-05", 100.0).await;

    let (status, body) = client.get_json("/api/transactions").await;
    assert_eq!(status, StatusCode::OK);

    let dates: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-03-05", "2024-02-05", "2024-01-05"]);
}

#[tokio::test]
async fn test_list_filters_by_period() {
    let client = TestClient::new();
    client.create_income("2024-03-15", 100.0).await;
    client.create_income("2024-03-14", 100.0).await;
    client.create_income("2024-02-28", 100.0).await;
    client.create_income("2023-12-31", 100.0).await;

    let count = |body: serde_json::Value| body["data"].as_array().unwrap().len();

    let (_, body) = client
        .get_json(&format!("/api/transactions?period=day&as_of={}", AS_OF))
        .await;
    assert_eq!(count(body), 1);

    let (_, body) = client
        .get_json(&format!("/api/transactions?period=month&as_of={}", AS_OF))
        .await;
    assert_eq!(count(body), 2);

    let (_, body) = client
        .get_json(&format!("/api/transactions?period=year&as_of={}", AS_OF))
        .await;
    assert_eq!(count(body), 3);

    let (_, body) = client.get_json("/api/transactions").await;
    assert_eq!(count(body), 4);
}

#[tokio::test]
async fn test_update_merges_fields() {
    let client = TestClient::new();
    let id = client
        .create_expense("2024-03-02", 80.0, "Lazer", Some(false))
        .await;

    let (status, body) = client
        .put_json(
            &format!("/api/transactions/{}", id),
            &json!({ "amount": 95.5, "category": "Alimentação" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let updated = &body["data"];
    assert_eq!(updated["amount_cents"], 9550);
    assert_eq!(updated["category"], "Alimentação");
    assert_eq!(updated["date"], "2024-03-02");
    assert_eq!(updated["is_essential"], false);
}

#[tokio::test]
async fn test_update_clears_essential_flag_with_null() {
    let client = TestClient::new();
    let id = client
        .create_expense("2024-03-02", 80.0, "Saúde", Some(true))
        .await;

    let (status, body) = client
        .put_json(
            &format!("/api/transactions/{}", id),
            &json!({ "isEssential": null }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("is_essential").is_none());
}

#[tokio::test]
async fn test_update_to_income_drops_essential_flag() {
    let client = TestClient::new();
    let id = client
        .create_expense("2024-03-02", 80.0, "Outros", Some(true))
        .await;

    let (_, body) = client
        .put_json(
            &format!("/api/transactions/{}", id),
            &json!({ "type": "income" }),
        )
        .await;

    assert_eq!(body["data"]["type"], "income");
    assert!(body["data"].get("is_essential").is_none());
}

#[tokio::test]
async fn test_delete_returns_removed_record() {
    let client = TestClient::new();
    let id = client.create_income("2024-03-01", 10.0).await;

    let (status, body) = client.delete(&format!("/api/transactions/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);

    let (status, body) = client.get_json(&format!("/api/transactions/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_missing_transaction_is_not_found() {
    let client = TestClient::new();

    let (status, _) = client.get_json("/api/transactions/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = client
        .put_json("/api/transactions/999", &json!({ "amount": 1.0 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = client.delete("/api/transactions/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejects_invalid_payloads() {
    let client = TestClient::new();
    let base = json!({
        "date": "2024-03-01",
        "description": "Mercado",
        "amount": 10.0,
        "type": "expense",
        "category": "Alimentação",
    });

    let cases = [
        ("amount", json!(-5.0)),
        ("type", json!("transfer")),
        ("date", json!("01/03/2024")),
        ("description", json!("   ")),
    ];

    for (field, value) in cases {
        let mut payload = base.clone();
        payload[field] = value;
        let (status, body) = client.post_json("/api/transactions", &payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "field {}", field);
        assert!(body["error"].is_string(), "field {}", field);
    }

    let (_, body) = client.get_json("/api/transactions").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejects_oversized_amounts() {
    let client = TestClient::new();

    let (status, body) = client
        .post_json(
            "/api/transactions",
            &json!({
                "date": "2024-03-05",
                "description": "Bilhete premiado",
                "amount": 1e17,
                "type": "income",
                "category": "Outros",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("must not exceed"));

    let id = client.create_income("2024-03-05", 10.0).await;
    let (status, _) = client
        .put_json(
            &format!("/api/transactions/{}", id),
            &json!({ "amount": 1e17 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = client.get_json(&format!("/api/transactions/{}", id)).await;
    assert_eq!(body["data"]["amount_cents"], 1000);
}
