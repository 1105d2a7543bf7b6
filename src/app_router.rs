use web_sys::UrlSearchParams;

use crate::session;
use folio_core::protocol::{DEFAULT_API_BASE, EDIT_QUERY_PARAM};

pub(crate) const PORTFOLIO_PAGE: &str = "index.html";
pub(crate) const LOGIN_FORM_SELECTOR: &str = ".login-container > form";
pub(crate) const GALLERY_SELECTOR: &str = ".gallery";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PageKind {
    Portfolio,
    Login,
    Unknown,
}

#[derive(Clone, Debug)]
pub(crate) struct InitConfig {
    pub(crate) api_base: String,
    pub(crate) page: PageKind,
    pub(crate) edit_requested: bool,
}

impl InitConfig {
    /// Edit mode needs both a stored token and the `edit` query flag.
    pub(crate) fn edit_mode(&self) -> bool {
        self.edit_requested && session::token().is_some()
    }
}

pub(crate) fn load_init_config() -> InitConfig {
    InitConfig {
        api_base: default_api_base(),
        page: detect_page(),
        edit_requested: load_edit_flag(),
    }
}

pub(crate) fn default_api_base() -> String {
    if let Some(raw) = option_env!("FOLIO_API_BASE").or(option_env!("TRUNK_PUBLIC_API_BASE")) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.trim_end_matches('/').to_string();
        }
    }
    DEFAULT_API_BASE.to_string()
}

pub(crate) fn navigate(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(err) = window.location().set_href(url) {
        gloo::console::warn!("navigation failed", err);
    }
}

/// Drops back to the public page without the edit flag.
pub(crate) fn reload_read_only() {
    navigate(PORTFOLIO_PAGE);
}

pub(crate) fn edit_page_url() -> String {
    format!("{PORTFOLIO_PAGE}?{EDIT_QUERY_PARAM}=true")
}

fn detect_page() -> PageKind {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return PageKind::Unknown;
    };
    if document.query_selector(LOGIN_FORM_SELECTOR).ok().flatten().is_some() {
        return PageKind::Login;
    }
    if document.query_selector(GALLERY_SELECTOR).ok().flatten().is_some() {
        return PageKind::Portfolio;
    }
    PageKind::Unknown
}

fn load_edit_flag() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let search = window.location().search().unwrap_or_default();
    parse_edit_flag(&search)
}

pub(crate) fn parse_edit_flag(search: &str) -> bool {
    let search = search.trim();
    if search.is_empty() {
        return false;
    }
    let Ok(params) = UrlSearchParams::new_with_str(search) else {
        return false;
    };
    params
        .get(EDIT_QUERY_PARAM)
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false)
}
