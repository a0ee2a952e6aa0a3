//! Basket endpoint against a seeded server.

use reqwest::StatusCode;
use serde_json::Value;

use juice_shop_integration_tests::{BENDER, JIM, base_url, client, is_solved, login};

#[tokio::test]
#[ignore = "Requires running server with the demo fixture"]
async fn test_anonymous_basket_request_is_unauthorized() {
    let resp = client()
        .get(format!("{}/rest/basket/1", base_url()))
        .send()
        .await
        .expect("Failed to request basket");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("401 body is not JSON");
    assert_eq!(body["error"], "You must be logged in to access this resource.");
}

#[tokio::test]
#[ignore = "Requires running server with the demo fixture"]
async fn test_own_basket_lists_products() {
    let client = client();
    let bid = login(&client, JIM).await;

    let resp = client
        .get(format!("{}/rest/basket/{bid}", base_url()))
        .send()
        .await
        .expect("Failed to request basket");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid basket JSON");
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["id"], bid);
    assert_eq!(body["data"]["Products"][0]["name"], "Banana Juice (1000ml)");
}

#[tokio::test]
#[ignore = "Requires running server with the demo fixture"]
async fn test_basket_keeps_deleted_products() {
    let client = client();
    let bid = login(&client, BENDER).await;

    let body: Value = client
        .get(format!("{}/rest/basket/{bid}", base_url()))
        .send()
        .await
        .expect("Failed to request basket")
        .json()
        .await
        .expect("Invalid basket JSON");

    let product = &body["data"]["Products"][0];
    assert_eq!(product["name"], "Christmas Super-Surprise-Box (2014 Edition)");
    assert!(product["deletedAt"].is_string());
}

#[tokio::test]
#[ignore = "Requires running server with the demo fixture"]
async fn test_product_names_follow_language_cookie() {
    let client = client();
    let bid = login(&client, JIM).await;

    let body: Value = client
        .get(format!("{}/rest/basket/{bid}", base_url()))
        .header("cookie", "language=de_DE")
        .send()
        .await
        .expect("Failed to request basket")
        .json()
        .await
        .expect("Invalid basket JSON");

    assert_eq!(body["data"]["Products"][0]["name"], "Bananensaft (1000ml)");
}

#[tokio::test]
#[ignore = "Requires running server with the demo fixture"]
async fn test_foreign_basket_is_denied_and_solves_challenge() {
    let client = client();
    let bid = login(&client, JIM).await;

    let resp = client
        .get(format!("{}/rest/basket/{}", base_url(), bid + 1))
        .send()
        .await
        .expect("Failed to request basket");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.text().await.expect("Failed to read body"),
        "Basket not found or access denied."
    );
    assert!(is_solved(&client, "basketAccessChallenge").await);
}

#[tokio::test]
#[ignore = "Requires running server with the demo fixture"]
async fn test_non_numeric_basket_id_is_not_found() {
    let client = client();
    login(&client, JIM).await;

    let resp = client
        .get(format!("{}/rest/basket/1%20OR%201=1", base_url()))
        .send()
        .await
        .expect("Failed to request basket");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
