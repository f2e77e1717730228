use crate::e2e::helpers;

use chrono::Duration;
use helpers::{tokens_issued, TestContext, TestSetup};
use hubspot_oauth_gateway::domain::companies::CompanyView;
use hubspot_oauth_gateway::domain::contacts::{ContactDetail, ContactPropertyInput, ContactView};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use test_context::test_context;

async fn connected() -> TestContext {
    TestContext::start(
        TestSetup::default().with_tokens(tokens_issued("live-access", Duration::minutes(5))),
    )
    .await
}

#[tokio::test]
async fn it_should_search_contacts_by_email_name_or_company() {
    let ctx = connected().await;

    let by_email = ctx
        .client
        .get("/contacts?search=grace%40example")
        .await
        .unwrap();
    by_email.assert_status(StatusCode::OK);
    let contacts: Vec<ContactView> = by_email.json().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].vid, 102);

    let by_company = ctx.client.get("/contacts?search=analytical").await.unwrap();
    let contacts: Vec<ContactView> = by_company.json().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Ada Lovelace");

    assert_eq!(ctx.crm.seen_tokens(), vec!["live-access".to_string(); 2]);
}

#[tokio::test]
async fn it_should_list_contacts_when_the_search_is_blank() {
    let ctx = connected().await;

    let response = ctx.client.get("/contacts?search=%20%20").await.unwrap();

    response.assert_status(StatusCode::OK);
    let contacts: Vec<ContactView> = response.json().unwrap();
    assert_eq!(contacts.len(), 2);
}

#[tokio::test]
async fn it_should_show_one_contact_with_all_its_properties() {
    let ctx = connected().await;

    let response = ctx.client.get("/contacts/101").await.unwrap();

    response.assert_status(StatusCode::OK);
    let detail: ContactDetail = response.json().unwrap();
    assert_eq!(detail.vid, 101);
    assert_eq!(detail.properties["email"], "ada@example.com");
    assert_eq!(detail.properties["lastname"], "Lovelace");
}

#[tokio::test]
async fn it_should_send_an_unknown_contact_to_the_error_page() {
    let ctx = connected().await;

    let response = ctx.client.get("/contacts/999").await.unwrap();

    let location = response.location().expect("redirect location");
    assert!(location.starts_with("/error?msg="), "got {}", location);
}

#[tokio::test]
async fn it_should_create_a_contact_and_return_to_the_list() {
    let ctx = connected().await;

    let response = ctx
        .client
        .post_form(
            "/contacts",
            "email=linus%40example.com&firstname=Linus&lastname=Torvalds",
        )
        .await
        .unwrap();

    response.assert_redirect_to("/contacts");
    let upserts = ctx.crm.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].0, "linus@example.com");
    assert_eq!(
        upserts[0].1,
        vec![
            ContactPropertyInput {
                property: "email".to_string(),
                value: "linus@example.com".to_string(),
            },
            ContactPropertyInput {
                property: "firstname".to_string(),
                value: "Linus".to_string(),
            },
            ContactPropertyInput {
                property: "lastname".to_string(),
                value: "Torvalds".to_string(),
            },
        ]
    );

    let contacts: Vec<ContactView> = ctx
        .client
        .get("/contacts?search=torvalds")
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].vid, 103);
}

#[tokio::test]
async fn it_should_update_an_existing_contact_by_email() {
    let ctx = connected().await;

    let response = ctx
        .client
        .post_form("/contacts/101", "email=ada%40example.com&company=Babbage%20%26%20Co")
        .await
        .unwrap();

    response.assert_redirect_to("/contacts");
    let detail: ContactDetail = ctx
        .client
        .get("/contacts/101")
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(detail.properties["company"], "Babbage & Co");
    assert_eq!(detail.properties["firstname"], "Ada");
}

#[tokio::test]
async fn it_should_refuse_a_contact_without_email() {
    let ctx = connected().await;

    let response = ctx
        .client
        .post_form("/contacts", "firstname=Nobody&email=%20")
        .await
        .unwrap();

    let location = response.location().expect("redirect location");
    assert!(location.starts_with("/error?msg="), "got {}", location);
    assert!(location.contains("email%20is%20required"), "got {}", location);
    assert!(ctx.crm.upserts().is_empty());
}

#[tokio::test]
async fn it_should_list_companies_with_name_and_domain() {
    let ctx = connected().await;

    let response = ctx.client.get("/companies").await.unwrap();

    response.assert_status(StatusCode::OK);
    let companies: Vec<CompanyView> = response.json().unwrap();
    assert_eq!(
        companies,
        vec![
            CompanyView {
                company_id: 201,
                name: "Analytical Engines".to_string(),
                domain: "engines.example.com".to_string(),
            },
            CompanyView {
                company_id: 202,
                name: "Navy".to_string(),
                domain: "navy.example.com".to_string(),
            },
        ]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_gate_every_crm_route(ctx: &TestContext) {
    for path in ["/contacts", "/contacts/101", "/companies"] {
        ctx.client.get(path).await.unwrap().assert_redirect_to("/login");
    }
    ctx.client
        .post_form("/contacts", "email=ada%40example.com")
        .await
        .unwrap()
        .assert_redirect_to("/login");

    assert!(ctx.crm.seen_tokens().is_empty());
    assert!(ctx.crm.upserts().is_empty());
}
