//! REST API: router, handlers, bearer auth and error mapping

pub mod accounts;
pub mod auth;
pub mod error;
pub mod listing;
pub mod login;
pub mod state;
pub mod users;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

pub use auth::TokenIssuer;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Build the API router; everything except `/login` requires a bearer token
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route(
            "/accounts/{id}",
            get(accounts::get_balance)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route(
            "/accounts/{id}/change-password",
            post(accounts::change_password),
        )
        .route("/accounts/{id}/deposit", put(accounts::deposit))
        .route("/accounts/{id}/payment", post(accounts::payment))
        .route("/accounts/{id}/{target_id}/transfer", post(accounts::transfer))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{id}/change-password", post(users::change_password))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/login", post(login::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
