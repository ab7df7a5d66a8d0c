// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

mod common;

use raffle_app::RaffleFrontendService;
use serde_json::{json, Value};

use self::common::{FakeWallet, Harness, RAFFLE};

async fn query(service: &RaffleFrontendService, request: &str) -> Value {
    let response = service.handle_query(request).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    serde_json::to_value(&response.data).unwrap()
}

#[tokio::test]
async fn page_is_served_over_graphql() {
    let harness = Harness::new(FakeWallet::on_chain(1));
    harness.page.mount().await;
    let service = RaffleFrontendService::new(harness.page.clone());

    let before = query(&service, "{ metadata { title } session { active } raffle { available entranceFeeFormatted } }").await;
    assert_eq!(
        before,
        json!({
            "metadata": { "title": "Lottery App" },
            "session": { "active": false },
            "raffle": { "available": false, "entranceFeeFormatted": "0" },
        })
    );

    let connected = query(&service, "mutation { connect }").await;
    assert_eq!(connected, json!({ "connect": "Connected" }));

    let after = query(
        &service,
        "{ session { active truncatedAccount chainId } raffle { address entranceFee entranceFeeFormatted numPlayers recentWinner } }",
    )
    .await;
    assert_eq!(
        after,
        json!({
            "session": { "active": true, "truncatedAccount": "0x5aAe...eAed", "chainId": 1 },
            "raffle": {
                "address": harness.page.entrance_widget().raffle_address().map(|a| a.to_string()),
                "entranceFee": "100000000000000000",
                "entranceFeeFormatted": "0.1",
                "numPlayers": "0",
                "recentWinner": null,
            },
        })
    );
    assert_eq!(
        after["raffle"]["address"].as_str().map(str::to_lowercase),
        Some(RAFFLE.to_lowercase())
    );
}

#[tokio::test]
async fn entering_over_graphql_raises_a_dismissible_notification() {
    let harness = Harness::new(FakeWallet::on_chain(1));
    harness.page.mount().await;
    let service = RaffleFrontendService::new(harness.page.clone());
    query(&service, "mutation { connect }").await;

    let entered = query(&service, "mutation { enterRaffle }").await;
    assert!(entered["enterRaffle"].as_str().unwrap().starts_with("0x"));

    let notifications = query(&service, "{ notifications { id kind title } raffle { numPlayers } }").await;
    assert_eq!(notifications["raffle"]["numPlayers"], "1");
    assert_eq!(notifications["notifications"][0]["kind"], "SUCCESS");
    assert_eq!(notifications["notifications"][0]["title"], "Transaction complete");

    let id = notifications["notifications"][0]["id"].as_u64().unwrap();
    let dismissed = query(&service, &format!("mutation {{ dismissNotification(id: {id}) }}")).await;
    assert_eq!(dismissed, json!({ "dismissNotification": true }));
    let remaining = query(&service, "{ notifications { id } }").await;
    assert_eq!(remaining, json!({ "notifications": [] }));
}

#[tokio::test]
async fn entering_without_a_raffle_is_a_graphql_error() {
    let harness = Harness::new(FakeWallet::on_chain(5));
    harness.page.mount().await;
    let service = RaffleFrontendService::new(harness.page.clone());
    query(&service, "mutation { connect }").await;

    let response = service.handle_query("mutation { enterRaffle }").await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "no raffle address detected");
    assert!(harness.raffle.calls().is_empty());
}
