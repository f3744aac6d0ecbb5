pub mod form;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(form::form_page))
        .route("/form", get(form::form_page))
}
