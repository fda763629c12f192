//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement. Every route declares its requirement through
//! one of these, so an endpoint without authorization cannot exist by
//! accident.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gather_core::error::CoreError;
use gather_core::roles::{ROLE_ADMIN, ROLE_ORGANIZER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `organizer` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn organizer_or_admin(RequireOrganizer(user): RequireOrganizer) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireOrganizer(pub AuthUser);

impl FromRequestParts<AppState> for RequireOrganizer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_ORGANIZER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Organizer or Admin role required".into(),
            )));
        }
        Ok(RequireOrganizer(user))
    }
}
