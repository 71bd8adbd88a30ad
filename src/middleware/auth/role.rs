//! Role gate: continue only when the request's Principal has the required role.
//!
//! Must sit behind `access::apply`. Without a Principal the gate answers 401,
//! whatever role it was configured with.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::{Principal, Role};
use crate::error::AppError;

/// Pure authorization check, shared by the middleware and handlers.
pub fn authorize(principal: Option<&Principal>, required: &Role) -> Result<(), AppError> {
    let principal = principal.ok_or(AppError::AuthenticationRequired)?;

    if &principal.role != required {
        return Err(AppError::Forbidden {
            required: required.clone(),
            found: principal.role.clone(),
        });
    }

    Ok(())
}

/// Gate every route of `router` on `required`.
///
/// 例：
/// ```ignore
/// let recruiter = Router::new().route("/recruiter/me", get(me));
/// let recruiter = middleware::auth::role::apply(recruiter, Role::Recruiter);
/// ```
pub fn apply<S>(router: Router<S>, required: Role) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(required, require_role))
}

/// Middleware body; the required role arrives as the layer state.
pub async fn require_role(
    State(required): State<Role>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(err) = authorize(req.extensions().get::<Principal>(), &required) {
        if let AppError::Forbidden { found, .. } = &err {
            tracing::warn!(%required, %found, uri = %req.uri(), "role gate denied request");
        }
        return Err(err);
    }

    Ok(next.run(req).await)
}
