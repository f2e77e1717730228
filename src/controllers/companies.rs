use axum::{Extension, Json};

use crate::{
    domain::companies::{CompanyView, COMPANY_PROPERTIES},
    error::AppResult,
    infrastructure::crm::CrmSession,
};

/// GET /companies - Companies of the connected portal with name and domain
pub async fn list_companies(
    Extension(session): Extension<CrmSession>,
) -> AppResult<Json<Vec<CompanyView>>> {
    let companies = session.list_companies(COMPANY_PROPERTIES).await?;
    tracing::debug!(count = companies.len(), "Companies fetched");

    Ok(Json(companies.iter().map(CompanyView::from).collect()))
}
