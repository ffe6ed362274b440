//! Values for the cascading search dropdowns.

use crate::auth::policy::scope_department;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::services::checksheets::repository;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::{non_empty, OptionsQuery};

/// `GET /options`: distinct departments, models, machines and groups.
///
/// The department list is narrowed only for staff-level callers, who see
/// their own department whatever `department` they pass. For admin-level
/// callers a chosen department narrows the models, machines and groups but
/// leaves every department selectable.
///
/// # Arguments
///
/// * `caller` - The signed-in identity; decides the department scope.
/// * `query` - Optional `department` and `model`; blank values count as omitted.
///
/// # Returns
///
/// The `ChecksheetOptions` as JSON, or an `ApiError` when storage fails.
pub(crate) async fn process(
    state: web::Data<AppState>,
    caller: Authenticated,
    query: web::Query<OptionsQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let department = scope_department(&caller, non_empty(&query.department));
    let visible = if caller.role.is_admin_level() {
        None
    } else {
        department.clone()
    };
    let model = non_empty(&query.model).map(str::to_string);

    let options = state
        .db
        .run(move |conn| {
            repository::list_options(
                conn,
                visible.as_deref(),
                department.as_deref(),
                model.as_deref(),
            )
        })
        .await?;
    Ok(HttpResponse::Ok().json(options))
}
