use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, Element, File, HtmlOptionElement, HtmlSelectElement, Url};

use crate::api::{self, ApiError, NewWork};
use crate::app_core::PortfolioCore;
use crate::edit_mode;
use crate::modal::ModalNodes;
use crate::notify::{self, NoticeKind};
use crate::session;
use folio_core::{check_upload, distinct_categories, AddProjectDraft, Category, DragDepth, Work};

pub(crate) const DRAG_ACTIVE_CLASS: &str = "drag-active";
pub(crate) const PREVIEW_CLASS: &str = "photo-preview";
const HAS_PREVIEW_CLASS: &str = "has-preview";
const MSG_CREATED: &str = "Projet ajouté";
const MSG_CREATE_FAILED: &str = "Impossible d'ajouter le projet.";

/// Replaces the category options, keeping the current choice when it
/// still exists.
pub(crate) fn populate_categories(select: &HtmlSelectElement, categories: &[Category]) {
    let previous = select.value();
    select.set_inner_html("");
    let placeholder = HtmlOptionElement::new_with_text_and_value("", "");
    if let Ok(placeholder) = placeholder {
        let _ = select.append_child(&placeholder);
    }
    for category in categories {
        let value = category.id.to_string();
        match HtmlOptionElement::new_with_text_and_value(&category.name, &value) {
            Ok(option) => {
                let _ = select.append_child(&option);
            }
            Err(err) => gloo::console::warn!("category option failed", api::js_err(err)),
        }
    }
    if !previous.is_empty() && categories.iter().any(|c| c.id.to_string() == previous) {
        select.set_value(&previous);
    } else {
        select.set_value("");
    }
}

struct AddProjectShared {
    core: Rc<PortfolioCore>,
    nodes: ModalNodes,
    drag: Cell<DragDepth>,
    preview_url: RefCell<Option<String>>,
    submitting: Cell<bool>,
    relayout: Rc<dyn Fn()>,
}

/// The add-project page of the modal. Listeners live as long as the value.
pub(crate) struct AddProjectFlow {
    shared: Rc<AddProjectShared>,
    _listeners: Vec<EventListener>,
}

impl AddProjectFlow {
    pub(crate) fn attach(
        nodes: &ModalNodes,
        core: Rc<PortfolioCore>,
        works: &[Work],
        relayout: Rc<dyn Fn()>,
    ) -> Self {
        populate_categories(&nodes.category_select, &distinct_categories(works));
        let shared = Rc::new(AddProjectShared {
            core,
            nodes: nodes.clone(),
            drag: Cell::new(DragDepth::new()),
            preview_url: RefCell::new(None),
            submitting: Cell::new(false),
            relayout,
        });
        let listeners = listeners(&shared);
        shared.update_submit_state();
        Self {
            shared,
            _listeners: listeners,
        }
    }

    #[cfg(test)]
    fn submit_enabled(&self) -> bool {
        !self.shared.nodes.submit.disabled()
    }
}

fn listeners(shared: &Rc<AddProjectShared>) -> Vec<EventListener> {
    let nodes = &shared.nodes;
    let blocking = EventListenerOptions::enable_prevent_default;
    let mut listeners = Vec::new();

    listeners.push(EventListener::new_with_options(
        &nodes.drop_zone,
        "dragover",
        blocking(),
        |event| event.prevent_default(),
    ));
    listeners.push(EventListener::new_with_options(&nodes.drop_zone, "dragenter", blocking(), {
        let shared = shared.clone();
        move |event| {
            event.prevent_default();
            let mut drag = shared.drag.get();
            if drag.enter() {
                let _ = shared.nodes.drop_zone.class_list().add_1(DRAG_ACTIVE_CLASS);
            }
            shared.drag.set(drag);
        }
    }));
    listeners.push(EventListener::new(&nodes.drop_zone, "dragleave", {
        let shared = shared.clone();
        move |_| {
            let mut drag = shared.drag.get();
            if drag.leave() {
                let _ = shared.nodes.drop_zone.class_list().remove_1(DRAG_ACTIVE_CLASS);
            }
            shared.drag.set(drag);
        }
    }));
    listeners.push(EventListener::new_with_options(&nodes.drop_zone, "drop", blocking(), {
        let shared = shared.clone();
        move |event| {
            event.prevent_default();
            shared.drag.set(DragDepth::new());
            let _ = shared.nodes.drop_zone.class_list().remove_1(DRAG_ACTIVE_CLASS);
            let files = event
                .dyn_ref::<DragEvent>()
                .and_then(|event| event.data_transfer())
                .and_then(|transfer| transfer.files());
            if let Some(files) = files {
                if files.length() > 0 {
                    shared.nodes.photo_input.set_files(Some(&files));
                }
            }
            shared.handle_selected_file();
        }
    }));
    listeners.push(EventListener::new(&nodes.drop_zone, "click", {
        let shared = shared.clone();
        move |event| {
            let input: &web_sys::EventTarget = &shared.nodes.photo_input;
            let from_input = event.target().as_ref() == Some(input);
            if !from_input {
                shared.nodes.photo_input.click();
            }
        }
    }));
    if let Some(button) = nodes.photo_button.as_ref() {
        listeners.push(EventListener::new(button, "click", {
            let shared = shared.clone();
            move |event| {
                event.prevent_default();
                event.stop_propagation();
                shared.nodes.photo_input.click();
            }
        }));
    }
    listeners.push(EventListener::new(&nodes.photo_input, "change", {
        let shared = shared.clone();
        move |_| shared.handle_selected_file()
    }));
    for kind in ["input", "change"] {
        listeners.push(EventListener::new(&nodes.form, kind, {
            let shared = shared.clone();
            move |_| shared.update_submit_state()
        }));
    }
    listeners.push(EventListener::new_with_options(&nodes.form, "submit", blocking(), {
        let shared = shared.clone();
        move |event| {
            event.prevent_default();
            shared.submit();
        }
    }));
    listeners
}

impl AddProjectShared {
    fn selected_file(&self) -> Option<File> {
        self.nodes.photo_input.files().and_then(|files| files.get(0))
    }

    fn draft(&self) -> AddProjectDraft {
        AddProjectDraft {
            title: self.nodes.title_input.value(),
            category: self.nodes.category_select.value(),
            has_image: self.selected_file().is_some(),
        }
    }

    fn update_submit_state(&self) {
        let ready = self.draft().is_ready()
            && self.nodes.form.check_validity()
            && !self.submitting.get();
        let was_disabled = self.nodes.submit.disabled();
        self.nodes.submit.set_disabled(!ready);
        if was_disabled == ready {
            (self.relayout)();
        }
    }

    fn handle_selected_file(&self) {
        self.clear_preview();
        if let Some(file) = self.selected_file() {
            match check_upload(file.size() as u64, &file.type_()) {
                Ok(()) => self.show_preview(&file),
                Err(err) => {
                    gloo::console::log!("upload rejected", err.to_string());
                    notify::show(Some(&self.nodes.modal), NoticeKind::Error, &err.to_string());
                    self.nodes.photo_input.set_value("");
                }
            }
        }
        self.update_submit_state();
    }

    fn show_preview(&self, file: &File) {
        let url = match Url::create_object_url_with_blob(file) {
            Ok(url) => url,
            Err(err) => {
                gloo::console::warn!("preview url failed", api::js_err(err));
                return;
            }
        };
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let Ok(image) = document.create_element("img") else {
            let _ = Url::revoke_object_url(&url);
            return;
        };
        image.set_class_name(PREVIEW_CLASS);
        let _ = image.set_attribute("src", &url);
        let _ = image.set_attribute("alt", "Aperçu de la photo sélectionnée");
        let _ = self.nodes.drop_zone.append_child(&image);
        let _ = self.nodes.drop_zone.class_list().add_1(HAS_PREVIEW_CLASS);
        *self.preview_url.borrow_mut() = Some(url);
    }

    fn clear_preview(&self) {
        if let Ok(previews) = self
            .nodes
            .drop_zone
            .query_selector_all(&format!(".{PREVIEW_CLASS}"))
        {
            for index in 0..previews.length() {
                if let Some(element) = previews.item(index).and_then(|node| node.dyn_into::<Element>().ok()) {
                    element.remove();
                }
            }
        }
        let _ = self.nodes.drop_zone.class_list().remove_1(HAS_PREVIEW_CLASS);
        if let Some(url) = self.preview_url.borrow_mut().take() {
            let _ = Url::revoke_object_url(&url);
        }
    }

    fn submit(self: &Rc<Self>) {
        if self.submitting.get() {
            return;
        }
        let Some(token) = session::token() else {
            edit_mode::expire_session();
            return;
        };
        let draft = self.draft();
        let Some(file) = self.selected_file() else {
            self.nodes.form.report_validity();
            return;
        };
        if let Err(err) = check_upload(file.size() as u64, &file.type_()) {
            notify::show(Some(&self.nodes.modal), NoticeKind::Error, &err.to_string());
            return;
        }
        if !draft.is_ready() {
            self.nodes.form.report_validity();
            return;
        }
        self.submitting.set(true);
        self.update_submit_state();
        let shared = self.clone();
        spawn_local(async move {
            let work = NewWork {
                title: draft.title.trim(),
                category_id: &draft.category,
                image: &file,
            };
            let result = api::create_work(shared.core.api_base(), &token, work).await;
            shared.submitting.set(false);
            match result {
                Ok(()) => {
                    shared.finish_created();
                    if let Err(err) = shared.core.refresh().await {
                        gloo::console::warn!("refresh after create failed", err.to_string());
                    }
                }
                Err(ApiError::Unauthorized) => edit_mode::expire_session(),
                Err(err) => {
                    gloo::console::warn!("create failed", err.to_string());
                    shared.finish_failed();
                }
            }
        });
    }

    /// Clears the form for the next project. The draft is gone, so submit
    /// ends up disabled.
    fn finish_created(&self) {
        self.nodes.form.reset();
        self.clear_preview();
        notify::show(Some(&self.nodes.modal), NoticeKind::Success, MSG_CREATED);
        self.update_submit_state();
    }

    /// Keeps the draft as typed so the user can retry.
    fn finish_failed(&self) {
        notify::show(Some(&self.nodes.modal), NoticeKind::Error, MSG_CREATE_FAILED);
        self.update_submit_state();
    }
}

impl Drop for AddProjectFlow {
    fn drop(&mut self) {
        self.shared.drag.set(DragDepth::new());
        let _ = self
            .shared
            .nodes
            .drop_zone
            .class_list()
            .remove_1(DRAG_ACTIVE_CLASS);
    }
}
