use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use crate::api::{self, ApiError};
use crate::app_core::PortfolioCore;
use crate::edit_mode;
use crate::notify::{self, NoticeKind};
use crate::session;
use folio_core::Work;

pub(crate) const DELETE_BUTTON_SELECTOR: &str = "button.delete-project-btn";

/// Rebuilds the modal thumbnails, each with its own delete control.
pub(crate) fn render(container: &Element, works: &[Work]) {
    container.set_inner_html("");
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    for work in works {
        match figure(&document, work) {
            Ok(figure) => {
                let _ = container.append_child(&figure);
            }
            Err(err) => {
                gloo::console::warn!("modal figure failed", work.id, api::js_err(err));
            }
        }
    }
}

fn figure(document: &web_sys::Document, work: &Work) -> Result<Element, wasm_bindgen::JsValue> {
    let figure = document.create_element("figure")?;
    figure.set_attribute("data-work-id", &work.id.to_string())?;

    let image = document.create_element("img")?;
    image.set_attribute("src", &work.image_url)?;
    image.set_attribute("alt", &work.title)?;
    figure.append_child(&image)?;

    let wrapper = document.create_element("div")?;
    wrapper.set_class_name("delete-project");
    let button = document.create_element("button")?;
    button.set_class_name("delete-project-btn");
    button.set_attribute("type", "button")?;
    button.set_attribute("data-work-id", &work.id.to_string())?;
    button.set_attribute("aria-label", "Supprimer le projet")?;
    let icon = document.create_element("i")?;
    icon.set_class_name("fa-solid fa-trash-can");
    icon.set_attribute("aria-hidden", "true")?;
    button.append_child(&icon)?;
    wrapper.append_child(&button)?;
    figure.append_child(&wrapper)?;
    Ok(figure)
}

/// Work id of the delete control an event landed on, if any.
pub(crate) fn delete_target(event: &Event) -> Option<u64> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let button = target.closest(DELETE_BUTTON_SELECTOR).ok().flatten()?;
    button.get_attribute("data-work-id")?.parse().ok()
}

/// Deletes one work for the signed-in user, then refreshes every gallery.
pub(crate) async fn delete_work(core: &PortfolioCore, host: &Element, id: u64) {
    let Some(token) = session::token() else {
        edit_mode::expire_session();
        return;
    };
    match api::delete_work(core.api_base(), &token, id).await {
        Ok(()) => {
            gloo::console::log!("work deleted", id);
            notify::show(Some(host), NoticeKind::Success, "Projet supprimé");
            if let Err(err) = core.refresh().await {
                gloo::console::warn!("refresh after delete failed", err.to_string());
            }
        }
        Err(ApiError::Unauthorized) => edit_mode::expire_session(),
        Err(err) => {
            gloo::console::warn!("delete failed", id, err.to_string());
            notify::show(Some(host), NoticeKind::Error, "Impossible de supprimer le projet.");
        }
    }
}
