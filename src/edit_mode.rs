use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::app_router;
use crate::modal::ModalController;
use crate::session;

pub(crate) const BANNER_CLASS: &str = "edit-mode-banner";
pub(crate) const EDIT_BUTTON_CLASS: &str = "edit-btn";
pub(crate) const EDIT_BUTTON_HREF: &str = "edit.html#modal1";
const TITLE_CONTAINER_ID: &str = "title-container";
const FILTERS_SELECTOR: &str = ".filters";
const LOGOUT_LINK_ID: &str = "logout-link";

/// Turns the public page into its editable variant and returns the
/// listeners that keep it wired.
pub(crate) fn install(document: &Document, controller: Rc<ModalController>) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    if let Err(err) = insert_banner(document) {
        gloo::console::warn!("edit banner failed", crate::api::js_err(err));
    }
    hide_filters(document);
    match insert_edit_button(document) {
        Ok(Some(button)) => listeners.push(edit_button_listener(&button, controller)),
        Ok(None) => gloo::console::warn!("no #title-container, edit button skipped"),
        Err(err) => gloo::console::warn!("edit button failed", crate::api::js_err(err)),
    }
    if let Some(link) = document.get_element_by_id(LOGOUT_LINK_ID) {
        listeners.push(logout_listener(&link));
    }
    gloo::console::log!("edit mode active");
    listeners
}

fn insert_banner(document: &Document) -> Result<(), wasm_bindgen::JsValue> {
    let Some(body) = document.body() else {
        return Ok(());
    };
    if document
        .query_selector(&format!(".{BANNER_CLASS}"))?
        .is_some()
    {
        return Ok(());
    }
    let banner = document.create_element("div")?;
    banner.set_class_name(BANNER_CLASS);
    let banner_icon = icon(document, "fa-regular fa-pen-to-square")?;
    banner.append_child(&banner_icon)?;
    let label = document.create_element("p")?;
    label.set_text_content(Some("mode édition"));
    banner.append_child(&label)?;
    body.prepend_with_node_1(&banner)?;
    Ok(())
}

fn insert_edit_button(document: &Document) -> Result<Option<Element>, wasm_bindgen::JsValue> {
    let Some(container) = document.get_element_by_id(TITLE_CONTAINER_ID) else {
        return Ok(None);
    };
    if let Some(existing) = container.query_selector(&format!("a.{EDIT_BUTTON_CLASS}"))? {
        return Ok(Some(existing));
    }
    let button = document.create_element("a")?;
    button.set_class_name(EDIT_BUTTON_CLASS);
    button.set_attribute("href", EDIT_BUTTON_HREF)?;
    let button_icon = icon(document, "fa-regular fa-pen-to-square")?;
    button.append_child(&button_icon)?;
    let label = document.create_element("span")?;
    label.set_text_content(Some("modifier"));
    button.append_child(&label)?;
    container.append_child(&button)?;
    if let Some(container) = container.dyn_ref::<HtmlElement>() {
        let style = container.style();
        style.set_property("margin-top", "80px")?;
        style.set_property("margin-bottom", "80px")?;
    }
    Ok(Some(button))
}

fn icon(document: &Document, class: &str) -> Result<Element, wasm_bindgen::JsValue> {
    let icon = document.create_element("i")?;
    icon.set_class_name(class);
    icon.set_attribute("aria-hidden", "true")?;
    Ok(icon)
}

fn hide_filters(document: &Document) {
    let filters = document
        .query_selector(FILTERS_SELECTOR)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok());
    if let Some(filters) = filters {
        let _ = filters.style().set_property("display", "none");
    }
}

fn edit_button_listener(button: &Element, controller: Rc<ModalController>) -> EventListener {
    EventListener::new_with_options(
        button,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            let anchor = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|target| target.closest("a").ok().flatten());
            if let Some(anchor) = anchor {
                controller.open(anchor);
            }
        },
    )
}

fn logout_listener(link: &Element) -> EventListener {
    EventListener::new_with_options(
        link,
        "click",
        EventListenerOptions::enable_prevent_default(),
        |event| {
            event.prevent_default();
            session::clear_token();
            gloo::console::log!("logged out");
            app_router::reload_read_only();
        },
    )
}

/// The API refused our token: forget it and fall back to the public page.
pub(crate) fn expire_session() {
    gloo::console::warn!("session expired, leaving edit mode");
    session::clear_token();
    app_router::reload_read_only();
}
