use web_sys::Storage;

use folio_core::protocol::SESSION_TOKEN_KEY;

fn session_storage() -> Option<Storage> {
    web_sys::window().and_then(|window| window.session_storage().ok().flatten())
}

pub(crate) fn token() -> Option<String> {
    let storage = session_storage()?;
    let raw = storage.get_item(SESSION_TOKEN_KEY).ok()??;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

pub(crate) fn store_token(token: &str) {
    let Some(storage) = session_storage() else {
        gloo::console::warn!("session storage unavailable");
        return;
    };
    if storage.set_item(SESSION_TOKEN_KEY, token).is_err() {
        gloo::console::warn!("session token store failed");
    }
}

pub(crate) fn clear_token() {
    let Some(storage) = session_storage() else {
        return;
    };
    let _ = storage.remove_item(SESSION_TOKEN_KEY);
}
