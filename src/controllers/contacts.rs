use axum::{
    extract::{Path, Query},
    response::Redirect,
    Extension, Form, Json,
};
use std::collections::HashMap;

use crate::{
    domain::contacts::{
        ContactDetail, ContactPropertyInput, ContactSearchParams, ContactUpsert, ContactView,
        CONTACTS_COUNT,
    },
    error::{AppError, AppResult},
    infrastructure::crm::CrmSession,
};

/// GET / - First contacts of the connected portal
pub async fn list_contacts(
    Extension(session): Extension<CrmSession>,
) -> AppResult<Json<Vec<ContactView>>> {
    let contacts = session.list_contacts(CONTACTS_COUNT).await?;
    tracing::debug!(count = contacts.len(), "Contacts fetched");

    Ok(Json(contacts.iter().map(ContactView::from).collect()))
}

/// GET /contacts?search= - Search by email, name or company; lists when empty
pub async fn search_contacts(
    Extension(session): Extension<CrmSession>,
    Query(params): Query<ContactSearchParams>,
) -> AppResult<Json<Vec<ContactView>>> {
    let query = params.search.unwrap_or_default();
    let query = query.trim();

    let contacts = if query.is_empty() {
        session.list_contacts(CONTACTS_COUNT).await?
    } else {
        session.search_contacts(query).await?
    };

    Ok(Json(contacts.iter().map(ContactView::from).collect()))
}

/// GET /contacts/{vid} - One contact with all its properties
pub async fn get_contact(
    Extension(session): Extension<CrmSession>,
    Path(vid): Path<i64>,
) -> AppResult<Json<ContactDetail>> {
    let contact = session.get_contact(vid).await?;
    Ok(Json(ContactDetail::from(&contact)))
}

/// POST /contacts - Create or update the contact owning the submitted email
pub async fn create_or_update_contact(
    Extension(session): Extension<CrmSession>,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Redirect> {
    upsert(&session, form).await?;
    Ok(Redirect::to("/contacts"))
}

/// POST /contacts/{vid} - Edit form of an existing contact; keyed by email upstream
pub async fn update_contact(
    Extension(session): Extension<CrmSession>,
    Path(vid): Path<i64>,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Redirect> {
    let upsert = upsert(&session, form).await?;
    if upsert.vid != vid {
        tracing::warn!(vid, updated_vid = upsert.vid, "Email belongs to another contact");
    }
    Ok(Redirect::to("/contacts"))
}

async fn upsert(
    session: &CrmSession,
    form: HashMap<String, String>,
) -> AppResult<ContactUpsert> {
    let email = form
        .get("email")
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("Contact email is required".to_string()))?;

    let mut properties: Vec<ContactPropertyInput> = form
        .into_iter()
        .map(|(property, value)| ContactPropertyInput { property, value })
        .collect();
    properties.sort_by(|a, b| a.property.cmp(&b.property));

    let upsert = session.create_or_update_contact(&email, &properties).await?;
    tracing::info!(vid = upsert.vid, is_new = upsert.is_new, "Contact saved");

    Ok(upsert)
}
