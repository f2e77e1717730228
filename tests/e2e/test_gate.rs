use crate::e2e::helpers;

use chrono::Duration;
use helpers::fakes::RefreshOutcome;
use helpers::{tokens_issued, TestContext, TestSetup};
use hubspot_oauth_gateway::domain::contacts::ContactView;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_redirect_to_login_when_no_tokens_are_stored(ctx: &TestContext) {
    let response = ctx.client.get("/").await.unwrap();

    response.assert_redirect_to("/login");
    assert!(ctx.crm.seen_tokens().is_empty());
    assert_eq!(ctx.provider.refresh_calls(), 0);
}

#[tokio::test]
async fn it_should_pass_a_valid_token_through_without_refreshing() {
    let ctx = TestContext::start(
        TestSetup::default().with_tokens(tokens_issued("live-access", Duration::minutes(5))),
    )
    .await;

    let response = ctx.client.get("/").await.unwrap();

    response.assert_status(StatusCode::OK);
    let contacts: Vec<ContactView> = response.json().unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].name, "Ada Lovelace");
    assert_eq!(contacts[0].company_name, "Analytical Engines");

    assert_eq!(ctx.crm.seen_tokens(), vec!["live-access".to_string()]);
    assert_eq!(ctx.provider.refresh_calls(), 0);
}

#[tokio::test]
async fn it_should_refresh_an_expired_token_once_and_persist_it() {
    let ctx = TestContext::start(
        TestSetup::default().with_tokens(tokens_issued("stale-access", Duration::hours(7))),
    )
    .await;

    let response = ctx.client.get("/").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.provider.refresh_calls(), 1);
    assert_eq!(ctx.crm.seen_tokens(), vec!["refreshed-access".to_string()]);

    let stored = ctx.stored_tokens().await.expect("tokens persisted");
    assert_eq!(stored.access_token, "refreshed-access");
    // Refresh token is kept when the provider does not rotate it
    assert_eq!(stored.refresh_token, "stored-refresh");
    assert_eq!(stored.updated_at, helpers::test_now());
}

#[tokio::test]
async fn it_should_refresh_once_for_concurrent_requests_with_an_expired_token() {
    let ctx = TestContext::start(
        TestSetup::default()
            .with_tokens(tokens_issued("stale-access", Duration::hours(7)))
            .with_refresh_delay(std::time::Duration::from_millis(200)),
    )
    .await;

    let (first, second) = tokio::join!(ctx.client.get("/"), ctx.client.get("/"));

    first.unwrap().assert_status(StatusCode::OK);
    second.unwrap().assert_status(StatusCode::OK);
    assert_eq!(ctx.provider.refresh_calls(), 1);
    assert_eq!(
        ctx.crm.seen_tokens(),
        vec!["refreshed-access".to_string(), "refreshed-access".to_string()]
    );
}

#[tokio::test]
async fn it_should_refresh_after_the_clock_passes_expiry() {
    let ctx = TestContext::start(
        TestSetup::default().with_tokens(tokens_issued("live-access", Duration::zero())),
    )
    .await;

    ctx.client.get("/").await.unwrap().assert_status(StatusCode::OK);
    assert_eq!(ctx.provider.refresh_calls(), 0);

    ctx.clock.advance(Duration::hours(6) + Duration::seconds(1));

    ctx.client.get("/").await.unwrap().assert_status(StatusCode::OK);
    assert_eq!(ctx.provider.refresh_calls(), 1);
    assert_eq!(
        ctx.crm.seen_tokens(),
        vec!["live-access".to_string(), "refreshed-access".to_string()]
    );
}

#[tokio::test]
async fn it_should_clear_tokens_and_redirect_to_login_when_refresh_is_rejected() {
    let ctx = TestContext::start(
        TestSetup::default()
            .with_tokens(tokens_issued("stale-access", Duration::hours(7)))
            .with_refresh_outcome(RefreshOutcome::Reject),
    )
    .await;

    let response = ctx.client.get("/").await.unwrap();

    response.assert_redirect_to("/login");
    assert_eq!(ctx.provider.refresh_calls(), 1);
    assert!(ctx.stored_tokens().await.is_none());
    assert!(!ctx.token_service.is_authenticated().await);
    assert!(ctx.crm.seen_tokens().is_empty());
}

#[tokio::test]
async fn it_should_keep_tokens_when_the_provider_is_unavailable() {
    let ctx = TestContext::start(
        TestSetup::default()
            .with_tokens(tokens_issued("stale-access", Duration::hours(7)))
            .with_refresh_outcome(RefreshOutcome::Unavailable),
    )
    .await;

    let response = ctx.client.get("/").await.unwrap();

    response.assert_redirect_to("/login");
    // One attempt plus one retry
    assert_eq!(ctx.provider.refresh_calls(), 2);
    let stored = ctx.stored_tokens().await.expect("tokens kept");
    assert_eq!(stored.access_token, "stale-access");
    assert!(ctx.token_service.is_authenticated().await);

    // Once the provider recovers the same stored refresh token works
    ctx.provider.set_refresh_outcome(RefreshOutcome::Issue {
        access_token: "recovered-access".to_string(),
    });
    ctx.client.get("/").await.unwrap().assert_status(StatusCode::OK);
    assert_eq!(ctx.crm.seen_tokens(), vec!["recovered-access".to_string()]);
}

#[tokio::test]
async fn it_should_report_token_status_behind_the_gate() {
    let ctx = TestContext::start(
        TestSetup::default().with_tokens(tokens_issued("live-access", Duration::hours(1))),
    )
    .await;

    let response = ctx.client.get("/tokens").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["expired"], false);
    assert_eq!(body["seconds_remaining"], 5 * 3600);
    assert!(body.get("access_token").is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_gate_token_status_without_tokens(ctx: &TestContext) {
    let response = ctx.client.get("/tokens").await.unwrap();

    response.assert_redirect_to("/login");
}
