use crate::errors::AppError;
use crate::export::{expenses_csv, export_file_name};
use crate::models::{
    ConfirmQuery, Expense, ExpenseInput, Income, IncomeInput, Link, LinkInput, LoginRequest,
    SessionUser, SignupRequest, StatsResponse, ThemeResponse, Transaction, WeatherQuery,
};
use crate::state::AppState;
use crate::storage;
use crate::ui::{LOGIN_HTML, render_index};
use crate::weather::{POPULAR_CITIES, WeatherReport, default_city};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Local;
use uuid::Uuid;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let user = state.users.lock().await.current_user().cloned();
    let stats = state.ledger.lock().await.stats();
    let theme = *state.theme.lock().await;
    let name = user.map(|user| user.name).unwrap_or_default();
    Html(render_index(&name, &stats, theme))
}

pub async fn login_page(State(state): State<AppState>) -> Response {
    if state.users.lock().await.current_user().is_some() {
        return Redirect::to("/").into_response();
    }
    Html(LOGIN_HTML).into_response()
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionUser>), AppError> {
    let session = state.users.lock().await.signup(payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionUser>, AppError> {
    let session = state.users.lock().await.login(payload).await?;
    Ok(Json(session))
}

pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.users.lock().await.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(State(state): State<AppState>) -> Result<Json<SessionUser>, AppError> {
    let users = state.users.lock().await;
    let user = users
        .current_user()
        .cloned()
        .ok_or_else(|| AppError::unauthorized("not logged in"))?;
    Ok(Json(user))
}

pub async fn list_links(State(state): State<AppState>) -> Json<Vec<Link>> {
    Json(state.ledger.lock().await.sorted_links())
}

pub async fn add_link(
    State(state): State<AppState>,
    Json(payload): Json<LinkInput>,
) -> Result<(StatusCode, Json<Link>), AppError> {
    let link = state.ledger.lock().await.add_link(payload).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn toggle_pin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Link>, AppError> {
    let link = state.ledger.lock().await.toggle_pin(id).await?;
    Ok(Json(link))
}

pub async fn delete_link(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<Link>, AppError> {
    require_confirmation(&query)?;
    let link = state.ledger.lock().await.delete_link(id).await?;
    Ok(Json(link))
}

pub async fn reset_links(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> Result<StatusCode, AppError> {
    require_confirmation(&query)?;
    state.ledger.lock().await.reset_links().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_expenses(State(state): State<AppState>) -> Json<Vec<Expense>> {
    Json(state.ledger.lock().await.sorted_expenses())
}

pub async fn add_expense(
    State(state): State<AppState>,
    Json(payload): Json<ExpenseInput>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let expense = state.ledger.lock().await.add_expense(payload).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn edit_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseInput>,
) -> Result<Json<Expense>, AppError> {
    let expense = state.ledger.lock().await.edit_expense(id, payload).await?;
    Ok(Json(expense))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<Expense>, AppError> {
    require_confirmation(&query)?;
    let expense = state.ledger.lock().await.delete_expense(id).await?;
    Ok(Json(expense))
}

pub async fn reset_expenses(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> Result<StatusCode, AppError> {
    require_confirmation(&query)?;
    state.ledger.lock().await.reset_expenses().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_expenses(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let csv = expenses_csv(state.ledger.lock().await.expenses())?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Local::now().date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

pub async fn list_incomes(State(state): State<AppState>) -> Json<Vec<Income>> {
    Json(state.ledger.lock().await.sorted_incomes())
}

pub async fn add_income(
    State(state): State<AppState>,
    Json(payload): Json<IncomeInput>,
) -> Result<(StatusCode, Json<Income>), AppError> {
    let income = state.ledger.lock().await.add_income(payload).await?;
    Ok((StatusCode::CREATED, Json(income)))
}

pub async fn edit_income(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncomeInput>,
) -> Result<Json<Income>, AppError> {
    let income = state.ledger.lock().await.edit_income(id, payload).await?;
    Ok(Json(income))
}

pub async fn delete_income(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmQuery>,
) -> Result<Json<Income>, AppError> {
    require_confirmation(&query)?;
    let income = state.ledger.lock().await.delete_income(id).await?;
    Ok(Json(income))
}

pub async fn reset_incomes(
    State(state): State<AppState>,
    Query(query): Query<ConfirmQuery>,
) -> Result<StatusCode, AppError> {
    require_confirmation(&query)?;
    state.ledger.lock().await.reset_incomes().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn transactions(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    Json(state.ledger.lock().await.transactions())
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.ledger.lock().await.stats())
}

pub async fn weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherReport>, AppError> {
    let city = query.city.unwrap_or_else(|| default_city().to_string());
    let report = state.weather.current(&city).await?;
    Ok(Json(report))
}

pub async fn weather_cities() -> Json<Vec<&'static str>> {
    Json(POPULAR_CITIES.to_vec())
}

pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    let theme = *state.theme.lock().await;
    Json(ThemeResponse { theme })
}

pub async fn toggle_theme(State(state): State<AppState>) -> Result<Json<ThemeResponse>, AppError> {
    let mut theme = state.theme.lock().await;
    let next = theme.toggled();
    state.store.write_value(storage::THEME, &next).await?;
    *theme = next;
    Ok(Json(ThemeResponse { theme: next }))
}

fn require_confirmation(query: &ConfirmQuery) -> Result<(), AppError> {
    if query.confirm {
        Ok(())
    } else {
        Err(AppError::bad_request("confirmation required: repeat with confirm=true"))
    }
}
