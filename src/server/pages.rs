use axum::http::header;
use axum::response::{Html, IntoResponse};

pub const SIGNUP_PAGE: &str = "/signup.html";
pub const UPLOAD_PAGE: &str = "/upload.html";
pub const SCRIPT_PATH: &str = "/app.js";
pub const API_SCRIPT_PATH: &str = "/api.js";

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const SIGNUP_HTML: &str = include_str!("../../assets/signup.html");
const UPLOAD_HTML: &str = include_str!("../../assets/upload.html");
const APP_JS: &str = include_str!("../../assets/app.js");
const API_JS: &str = include_str!("../../assets/api.js");

const JAVASCRIPT: &str = "text/javascript; charset=utf-8";

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn signup() -> Html<&'static str> {
    Html(SIGNUP_HTML)
}

pub async fn upload() -> Html<&'static str> {
    Html(UPLOAD_HTML)
}

pub async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, JAVASCRIPT)], APP_JS)
}

pub async fn api_script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, JAVASCRIPT)], API_JS)
}
