//! Role-based authorization and department scoping.

use crate::error::ApiError;
use common::model::user::Identity;

pub fn require_admin_level(identity: &Identity) -> Result<(), ApiError> {
    if identity.role.is_admin_level() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Access denied. Admin level only."))
    }
}

/// Department filter that actually applies to a query.
///
/// Admin-level callers get whatever they asked for, `None` meaning every
/// department. Staff-level callers always get their own department, whatever
/// they asked for, and without an error. A staff account with no department
/// gets an empty filter, which matches nothing.
pub fn scope_department(identity: &Identity, requested: Option<&str>) -> Option<String> {
    if identity.role.is_admin_level() {
        requested
            .filter(|dept| !dept.trim().is_empty())
            .map(str::to_string)
    } else {
        Some(identity.department.clone().unwrap_or_default())
    }
}
