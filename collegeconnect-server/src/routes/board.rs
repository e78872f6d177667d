//! HTML listing page.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use minijinja::{context, Environment};

use crate::error::ServerError;
use crate::state::AppState;

const INDEX_TEMPLATE: &str = "index.html";

/// Build the template environment. `.html` templates are auto-escaped.
pub fn templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(INDEX_TEMPLATE, include_str!("../../templates/index.html"))?;
    Ok(env)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

/// Every update, newest first.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ServerError> {
    let document = state.store.load().await?;
    let updates = document.newest_first();
    let page = state
        .templates
        .get_template(INDEX_TEMPLATE)
        .and_then(|template| template.render(context! { updates => updates }))
        .map_err(|e| ServerError::Internal(format!("failed to render listing: {e}")))?;
    Ok(Html(page))
}
