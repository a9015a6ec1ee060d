//! Server-rendered pages outside the JSON API.

use axum::response::{Html, Redirect};

/// `GET /signup`
pub(crate) async fn signup() -> Html<String> {
    Html(autoims::ui::render_signup_page())
}

/// `GET /`
pub(crate) async fn root() -> Redirect {
    Redirect::permanent("/signup")
}
