#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, Router};

#[cfg(test)]
fn create_user(account_id: &str, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: account_id.to_string(),
        sub: format!("{}-sub", account_id),
        session_uid: Some("test-session-uid".to_string()),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        name: Some(format!("{} name", account_id)),
        email: Some(format!("{}@example.com", account_id)),
        phone_number: Some("+8801711000000".to_string()),
    }
}

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    create_user("test-admin", &["admin"])
}

#[cfg(test)]
pub fn create_donor_user() -> AuthenticatedUser {
    create_user("test-donor", &["donor"])
}

#[cfg(test)]
#[allow(dead_code)]
pub fn create_volunteer_user() -> AuthenticatedUser {
    create_user("test-volunteer", &["volunteer"])
}

/// Make every request in `router` arrive as `user`, bypassing token checks
#[cfg(test)]
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}
