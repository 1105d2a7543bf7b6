use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Headers, Request, RequestInit, Response};

use folio_core::protocol::{bearer, login_url, work_url, works_url};
use folio_core::{parse_works, LoginRequest, LoginResponse, Work};

#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("browser window unavailable")]
    NoWindow,
    #[error("network request failed: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("session token rejected")]
    Unauthorized,
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("response superseded by a newer request")]
    Superseded,
}

impl ApiError {
    fn network(error: JsValue) -> Self {
        ApiError::Network(js_err(error))
    }
}

pub(crate) struct NewWork<'a> {
    pub(crate) title: &'a str,
    pub(crate) category_id: &'a str,
    pub(crate) image: &'a File,
}

pub(crate) async fn fetch_works(base: &str) -> Result<Vec<Work>, ApiError> {
    let request = build_request(&works_url(base), "GET", None, None)?;
    let response = send(&request).await?;
    let body = expect_ok_text(&response).await?;
    parse_works(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

pub(crate) async fn create_work(base: &str, token: &str, work: NewWork<'_>) -> Result<(), ApiError> {
    let form = FormData::new().map_err(ApiError::network)?;
    form.append_with_str("title", work.title).map_err(ApiError::network)?;
    form.append_with_str("category", work.category_id)
        .map_err(ApiError::network)?;
    form.append_with_blob_and_filename("image", work.image, &work.image.name())
        .map_err(ApiError::network)?;
    let request = build_request(&works_url(base), "POST", Some(token), Some(&form.into()))?;
    let response = send(&request).await?;
    let body = expect_ok_text(&response).await?;
    match folio_core::parse_work(&body) {
        Ok(created) => gloo::console::log!("work created", created.id, created.title),
        Err(_) => gloo::console::log!("work created"),
    }
    Ok(())
}

pub(crate) async fn delete_work(base: &str, token: &str, id: u64) -> Result<(), ApiError> {
    let request = build_request(&work_url(base, id), "DELETE", Some(token), None)?;
    let response = send(&request).await?;
    check_status(&response)
}

/// Posts credentials. Any answer that parses, whatever its status, comes
/// back as a `LoginResponse`; only the presence of a token means success.
pub(crate) async fn login(base: &str, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
    let body =
        serde_json::to_string(credentials).map_err(|err| ApiError::Decode(err.to_string()))?;
    let request = build_request(&login_url(base), "POST", None, Some(&JsValue::from_str(&body)))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(ApiError::network)?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(ApiError::network)?;
    let response = send(&request).await?;
    let text = read_text(&response).await?;
    Ok(LoginResponse::parse(&text))
}

/// Raw text of any same-origin page, used to pull modal markup.
pub(crate) async fn fetch_text(url: &str) -> Result<String, ApiError> {
    let request = build_request(url, "GET", None, None)?;
    let response = send(&request).await?;
    expect_ok_text(&response).await
}

fn build_request(
    url: &str,
    method: &str,
    token: Option<&str>,
    body: Option<&JsValue>,
) -> Result<Request, ApiError> {
    let init = RequestInit::new();
    init.set_method(method);
    if let Some(token) = token {
        let headers = Headers::new().map_err(ApiError::network)?;
        headers
            .set("Authorization", &bearer(token))
            .map_err(ApiError::network)?;
        init.set_headers(&headers);
    }
    if let Some(body) = body {
        init.set_body(body);
    }
    Request::new_with_str_and_init(url, &init).map_err(ApiError::network)
}

async fn send(request: &Request) -> Result<Response, ApiError> {
    let window = web_sys::window().ok_or(ApiError::NoWindow)?;
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(ApiError::network)?;
    value.dyn_into::<Response>().map_err(ApiError::network)
}

fn check_status(response: &Response) -> Result<(), ApiError> {
    if response.ok() {
        return Ok(());
    }
    match response.status() {
        401 => Err(ApiError::Unauthorized),
        status => Err(ApiError::Status(status)),
    }
}

async fn expect_ok_text(response: &Response) -> Result<String, ApiError> {
    check_status(response)?;
    read_text(response).await
}

async fn read_text(response: &Response) -> Result<String, ApiError> {
    let promise = response.text().map_err(ApiError::network)?;
    let value = JsFuture::from(promise).await.map_err(ApiError::network)?;
    value
        .as_string()
        .ok_or_else(|| ApiError::Decode("response body is not text".to_string()))
}

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}
