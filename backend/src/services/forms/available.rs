//! # Available Forms
//!
//! `GET /available-forms` lists what the caller can fill in. The template tree
//! and the assignment table are read on every call, in one trip to the
//! blocking pool, then flattened by `catalog::resolve_forms` and filtered to
//! the caller's department unless the caller is admin-level.

use crate::auth::policy::scope_department;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::services::forms::{catalog, machines};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::form::AvailableForm;
use common::model::user::Identity;

pub(crate) async fn process(
    state: web::Data<AppState>,
    caller: Authenticated,
) -> Result<HttpResponse, ApiError> {
    let forms = list_available_forms(&state, &caller).await?;
    Ok(HttpResponse::Ok().json(forms))
}

pub async fn list_available_forms(
    state: &AppState,
    identity: &Identity,
) -> Result<Vec<AvailableForm>, ApiError> {
    let scope = scope_department(identity, None);
    let forms_catalog = state.catalog.clone();
    let forms = state
        .db
        .run(move |conn| {
            let templates = forms_catalog.templates()?;
            let assignments = machines::list(conn)?;
            catalog::resolve_forms(&templates, &assignments)
        })
        .await?;
    Ok(catalog::filter_by_department(forms, scope.as_deref()))
}
