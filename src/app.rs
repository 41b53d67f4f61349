use crate::auth::require_session;
use crate::handlers;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/links",
            get(handlers::list_links)
                .post(handlers::add_link)
                .delete(handlers::reset_links),
        )
        .route("/api/links/:id", delete(handlers::delete_link))
        .route("/api/links/:id/pin", post(handlers::toggle_pin))
        .route(
            "/api/expenses",
            get(handlers::list_expenses)
                .post(handlers::add_expense)
                .delete(handlers::reset_expenses),
        )
        .route("/api/expenses/export", get(handlers::export_expenses))
        .route(
            "/api/expenses/:id",
            put(handlers::edit_expense).delete(handlers::delete_expense),
        )
        .route(
            "/api/incomes",
            get(handlers::list_incomes)
                .post(handlers::add_income)
                .delete(handlers::reset_incomes),
        )
        .route(
            "/api/incomes/:id",
            put(handlers::edit_income).delete(handlers::delete_income),
        )
        .route("/api/transactions", get(handlers::transactions))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/weather", get(handlers::weather))
        .route("/api/weather/cities", get(handlers::weather_cities))
        .route("/api/theme", get(handlers::get_theme))
        .route("/api/theme/toggle", post(handlers::toggle_theme))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/login", get(handlers::login_page))
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/me", get(handlers::me))
        .merge(protected)
        .with_state(state)
}
