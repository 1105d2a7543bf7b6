use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Element, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, KeyboardEvent,
};

use crate::add_project::AddProjectFlow;
use crate::api::{self, ApiError};
use crate::app_core::{PortfolioCore, PortfolioSubscription};
use crate::modal_gallery;
use crate::notify::{self, NoticeKind};
use folio_core::protocol::modal_target;
use folio_core::{next_focus_index, TabDirection, Work, FOCUSABLE_SELECTOR};

pub(crate) const HIDDEN_CLASS: &str = "modal-hidden";
const PAGE_RESET_MS: u32 = 800;
const HIDE_FALLBACK_MS: u32 = 1_000;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ModalError {
    #[error("modal link has no href")]
    MissingHref,
    #[error("modal link {0} does not name a target")]
    NoTarget(String),
    #[error("element #{0} was not found in the page")]
    MissingTarget(String),
    #[error("modal is missing required node {0}")]
    MissingNode(&'static str),
    #[error("document unavailable")]
    NoDocument,
    #[error("modal markup could not be loaded: {0}")]
    Load(#[from] ApiError),
}

impl ModalError {
    /// Broken markup means a broken page, not a runtime condition.
    fn is_fatal(&self) -> bool {
        !matches!(self, ModalError::Load(_))
    }
}

/// Every element the modal workflow touches, resolved once per open.
#[derive(Clone)]
pub(crate) struct ModalNodes {
    pub(crate) modal: Element,
    pub(crate) close_button: Element,
    pub(crate) stop: Element,
    pub(crate) gallery: Element,
    pub(crate) gallery_page: Element,
    pub(crate) add_page: Element,
    pub(crate) back: Element,
    pub(crate) to_add: Element,
    pub(crate) form: HtmlFormElement,
    pub(crate) title_input: HtmlInputElement,
    pub(crate) photo_input: HtmlInputElement,
    pub(crate) photo_button: Option<Element>,
    pub(crate) drop_zone: Element,
    pub(crate) category_select: HtmlSelectElement,
    pub(crate) submit: HtmlButtonElement,
}

impl ModalNodes {
    pub(crate) fn locate(modal: Element) -> Result<Self, ModalError> {
        Ok(Self {
            close_button: find(&modal, ".js-modal-close")?,
            stop: find(&modal, ".js-modal-stop")?,
            gallery: find(&modal, ".modal-gallery")?,
            gallery_page: find(&modal, "#modal-gallery-page")?,
            add_page: find(&modal, "#modal-add-project-page")?,
            back: find(&modal, ".back-to-gallery")?,
            to_add: find(&modal, ".add-project")?,
            form: find_as(&modal, "#add-project-form")?,
            title_input: find_as(&modal, "#add-project-form input[name=\"title\"]")?,
            photo_input: find_as(&modal, "#add-photo")?,
            photo_button: modal.query_selector(".add-photo-btn").ok().flatten(),
            drop_zone: find(&modal, "#drop-container")?,
            category_select: find_as(&modal, "#category-selection")?,
            submit: find_as(&modal, "#addBtn")?,
            modal,
        })
    }
}

fn find(root: &Element, selector: &'static str) -> Result<Element, ModalError> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .ok_or(ModalError::MissingNode(selector))
}

fn find_as<T: JsCast>(root: &Element, selector: &'static str) -> Result<T, ModalError> {
    find(root, selector)?
        .dyn_into::<T>()
        .map_err(|_| ModalError::MissingNode(selector))
}

pub(crate) fn show_gallery_page(nodes: &ModalNodes) {
    let _ = nodes.gallery_page.class_list().remove_1(HIDDEN_CLASS);
    let _ = nodes.back.class_list().add_1(HIDDEN_CLASS);
    let _ = nodes.add_page.class_list().add_1(HIDDEN_CLASS);
}

pub(crate) fn show_add_project_page(nodes: &ModalNodes) {
    let _ = nodes.gallery_page.class_list().add_1(HIDDEN_CLASS);
    let _ = nodes.back.class_list().remove_1(HIDDEN_CLASS);
    let _ = nodes.add_page.class_list().remove_1(HIDDEN_CLASS);
}

/// Visible, enabled, interactive elements of `modal` in document order.
pub(crate) fn focusable_elements(modal: &Element) -> Vec<HtmlElement> {
    let Ok(list) = modal.query_selector_all(FOCUSABLE_SELECTOR) else {
        return Vec::new();
    };
    let window = web_sys::window();
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .filter(|element| is_focus_candidate(window.as_ref(), element))
        .collect()
}

fn is_focus_candidate(window: Option<&web_sys::Window>, element: &HtmlElement) -> bool {
    if element.matches(":disabled").unwrap_or(false) {
        return false;
    }
    if element.closest(&format!(".{HIDDEN_CLASS}")).ok().flatten().is_some() {
        return false;
    }
    let Some(style) = window.and_then(|window| window.get_computed_style(element).ok().flatten())
    else {
        return true;
    };
    let display = style.get_property_value("display").unwrap_or_default();
    let visibility = style.get_property_value("visibility").unwrap_or_default();
    display != "none" && visibility != "hidden"
}

struct ModalSession {
    nodes: ModalNodes,
    focusables: Vec<HtmlElement>,
    previously_focused: Option<HtmlElement>,
    _listeners: Vec<EventListener>,
    _add_project: AddProjectFlow,
    _subscription: PortfolioSubscription,
}

struct Closing {
    modal: Element,
    _animation_end: EventListener,
    _fallback: Timeout,
}

#[derive(Default)]
struct ModalState {
    session: Option<ModalSession>,
    closing: Option<Closing>,
    page_reset: Option<Timeout>,
    opening: bool,
}

/// Owns the lifecycle of the edit modal: loading, focus trap, keyboard
/// handling and teardown. Everything registered on open lives in the
/// session and goes away with it.
pub(crate) struct ModalController {
    core: Rc<PortfolioCore>,
    state: RefCell<ModalState>,
    weak_self: Weak<ModalController>,
}

impl ModalController {
    pub(crate) fn new(core: Rc<PortfolioCore>) -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Self {
            core,
            state: RefCell::new(ModalState::default()),
            weak_self: weak_self.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn is_open(&self) -> bool {
        self.state.borrow().session.is_some()
    }

    pub(crate) fn open(&self, trigger: Element) {
        {
            let mut state = self.state.borrow_mut();
            if state.session.is_some() || state.opening {
                return;
            }
            state.opening = true;
        }
        let Some(controller) = self.weak_self.upgrade() else {
            return;
        };
        spawn_local(async move {
            let result = controller.open_from(&trigger).await;
            controller.state.borrow_mut().opening = false;
            if let Err(err) = result {
                if err.is_fatal() {
                    gloo::console::error!("modal open failed", err.to_string());
                    wasm_bindgen::throw_str(&err.to_string());
                }
                gloo::console::warn!("modal open failed", err.to_string());
                notify::show(None, NoticeKind::Error, "Impossible d'ouvrir la fenêtre d'édition.");
            }
        });
    }

    async fn open_from(&self, trigger: &Element) -> Result<(), ModalError> {
        let href = trigger.get_attribute("href").ok_or(ModalError::MissingHref)?;
        let modal = load_modal(&href).await?;
        let nodes = ModalNodes::locate(modal)?;
        let works = match self.core.works().await {
            Ok(works) => works,
            // the newer fetch re-renders the open modal through its subscription
            Err(ApiError::Superseded) => Rc::from(Vec::<Work>::new()),
            Err(err) => {
                gloo::console::warn!("modal works unavailable", err.to_string());
                notify::show(Some(&nodes.modal), NoticeKind::Error, "Impossible de charger les projets.");
                Rc::from(Vec::<Work>::new())
            }
        };
        self.present(nodes, &works);
        Ok(())
    }

    /// Shows an already located modal and wires its session.
    pub(crate) fn present(&self, nodes: ModalNodes, works: &[Work]) {
        modal_gallery::render(&nodes.gallery, works);
        let add_project = AddProjectFlow::attach(&nodes, self.core.clone(), works, self.relayout_hook());

        let previously_focused = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.active_element())
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());

        {
            let mut state = self.state.borrow_mut();
            state.closing = None;
            state.page_reset = None;
        }
        show_gallery_page(&nodes);
        let _ = nodes.modal.class_list().remove_1(HIDDEN_CLASS);
        let _ = nodes.modal.set_attribute("aria-modal", "true");
        let _ = nodes.modal.remove_attribute("aria-hidden");

        let listeners = self.session_listeners(&nodes);
        let subscription = self.gallery_subscription(&nodes);
        let focusables = focusable_elements(&nodes.modal);
        let first = focusables.first().cloned();
        self.state.borrow_mut().session = Some(ModalSession {
            nodes,
            focusables,
            previously_focused,
            _listeners: listeners,
            _add_project: add_project,
            _subscription: subscription,
        });
        if let Some(first) = first {
            let _ = first.focus();
        }
        gloo::console::log!("modal opened");
    }

    fn session_listeners(&self, nodes: &ModalNodes) -> Vec<EventListener> {
        let mut listeners = Vec::new();
        let weak = self.weak_self.clone();
        listeners.push(EventListener::new(&nodes.modal, "click", {
            let weak = weak.clone();
            move |event| {
                if let Some(controller) = weak.upgrade() {
                    controller.close(Some(event));
                }
            }
        }));
        listeners.push(EventListener::new(&nodes.close_button, "click", {
            let weak = weak.clone();
            move |event| {
                if let Some(controller) = weak.upgrade() {
                    controller.close(Some(event));
                }
            }
        }));
        listeners.push(EventListener::new(&nodes.stop, "click", |event| {
            event.stop_propagation();
        }));
        listeners.push(EventListener::new(&nodes.back, "click", {
            let weak = weak.clone();
            let nodes = nodes.clone();
            move |event| {
                event.prevent_default();
                show_gallery_page(&nodes);
                if let Some(controller) = weak.upgrade() {
                    controller.refresh_focusables();
                }
            }
        }));
        listeners.push(EventListener::new(&nodes.to_add, "click", {
            let weak = weak.clone();
            let nodes = nodes.clone();
            move |event| {
                event.prevent_default();
                show_add_project_page(&nodes);
                if let Some(controller) = weak.upgrade() {
                    controller.refresh_focusables();
                }
            }
        }));
        listeners.push(EventListener::new(&nodes.gallery, "click", {
            let core = self.core.clone();
            let host = nodes.modal.clone();
            move |event| {
                let Some(id) = modal_gallery::delete_target(event) else {
                    return;
                };
                event.prevent_default();
                let core = core.clone();
                let host = host.clone();
                spawn_local(async move {
                    modal_gallery::delete_work(&core, &host, id).await;
                });
            }
        }));
        if let Some(window) = web_sys::window() {
            listeners.push(EventListener::new_with_options(
                &window,
                "keydown",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    if let Some(controller) = weak.upgrade() {
                        controller.handle_key(event);
                    }
                },
            ));
        }
        listeners
    }

    fn gallery_subscription(&self, nodes: &ModalNodes) -> PortfolioSubscription {
        let weak = self.weak_self.clone();
        let gallery = nodes.gallery.clone();
        let select = nodes.category_select.clone();
        let core = Rc::downgrade(&self.core);
        self.core.subscribe(Rc::new(move || {
            let Some(core) = core.upgrade() else {
                return;
            };
            let snapshot = core.snapshot();
            modal_gallery::render(&gallery, &snapshot.works);
            crate::add_project::populate_categories(&select, &snapshot.categories);
            if let Some(controller) = weak.upgrade() {
                controller.refresh_focusables();
            }
        }))
    }

    fn relayout_hook(&self) -> Rc<dyn Fn()> {
        let weak = self.weak_self.clone();
        Rc::new(move || {
            if let Some(controller) = weak.upgrade() {
                controller.refresh_focusables();
            }
        })
    }

    pub(crate) fn refresh_focusables(&self) {
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        if let Some(session) = state.session.as_mut() {
            session.focusables = focusable_elements(&session.nodes.modal);
        }
    }

    fn handle_key(&self, event: &KeyboardEvent) {
        match event.key().as_str() {
            "Escape" | "Esc" => {
                let event: &Event = event;
                self.close(Some(event));
            }
            "Tab" => self.cycle_focus(event),
            _ => {}
        }
    }

    fn cycle_focus(&self, event: &KeyboardEvent) {
        let target = {
            let state = self.state.borrow();
            let Some(session) = state.session.as_ref() else {
                return;
            };
            let active = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.active_element());
            let current = active.and_then(|active| {
                session
                    .focusables
                    .iter()
                    .position(|element| element.unchecked_ref::<Element>() == &active)
            });
            let direction = TabDirection::from_shift(event.shift_key());
            next_focus_index(current, session.focusables.len(), direction)
                .and_then(|index| session.focusables.get(index).cloned())
        };
        event.prevent_default();
        if let Some(target) = target {
            let _ = target.focus();
        }
    }

    pub(crate) fn close(&self, event: Option<&Event>) {
        if let Some(event) = event {
            event.prevent_default();
        }
        let Some(session) = self.state.borrow_mut().session.take() else {
            return;
        };
        let nodes = session.nodes.clone();
        let page_reset = {
            let nodes = nodes.clone();
            Timeout::new(PAGE_RESET_MS, move || show_gallery_page(&nodes))
        };
        if let Some(previous) = session.previously_focused.as_ref() {
            let _ = previous.focus();
        }
        let modal = nodes.modal.clone();
        let _ = modal.remove_attribute("aria-modal");
        let _ = modal.set_attribute("aria-hidden", "true");
        drop(session);

        let animation_end = EventListener::once(&modal, "animationend", {
            let weak = self.weak_self.clone();
            move |_| {
                if let Some(controller) = weak.upgrade() {
                    controller.finish_close();
                }
            }
        });
        let fallback = {
            let weak = self.weak_self.clone();
            Timeout::new(HIDE_FALLBACK_MS, move || {
                if let Some(controller) = weak.upgrade() {
                    controller.finish_close();
                }
            })
        };
        let mut state = self.state.borrow_mut();
        state.page_reset = Some(page_reset);
        state.closing = Some(Closing {
            modal,
            _animation_end: animation_end,
            _fallback: fallback,
        });
        gloo::console::log!("modal closed");
    }

    fn finish_close(&self) {
        let closing = self.state.borrow_mut().closing.take();
        if let Some(closing) = closing {
            let _ = closing.modal.class_list().add_1(HIDDEN_CLASS);
        }
    }

    /// Drops any open session immediately, without transition.
    pub(crate) fn reset(&self) {
        let (session, closing) = {
            let mut state = self.state.borrow_mut();
            state.page_reset = None;
            (state.session.take(), state.closing.take())
        };
        if let Some(session) = session {
            let _ = session.nodes.modal.class_list().add_1(HIDDEN_CLASS);
            let _ = session.nodes.modal.set_attribute("aria-hidden", "true");
            let _ = session.nodes.modal.remove_attribute("aria-modal");
        }
        if let Some(closing) = closing {
            let _ = closing.modal.class_list().add_1(HIDDEN_CLASS);
        }
    }

    #[cfg(test)]
    fn focusable_count(&self) -> usize {
        self.state
            .borrow()
            .session
            .as_ref()
            .map(|session| session.focusables.len())
            .unwrap_or(0)
    }
}

/// Finds the modal named by `href`, pulling it from the linked page when it
/// is not in the document yet.
pub(crate) async fn load_modal(href: &str) -> Result<Element, ModalError> {
    let target = modal_target(href).ok_or_else(|| ModalError::NoTarget(href.to_string()))?;
    let selector = format!("#{target}");
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(ModalError::NoDocument)?;
    if let Some(existing) = document.query_selector(&selector).ok().flatten() {
        return Ok(existing);
    }
    let html = api::fetch_text(href).await?;
    let range = document.create_range().map_err(|_| ModalError::NoDocument)?;
    let fragment = range
        .create_contextual_fragment(&html)
        .map_err(|_| ModalError::MissingTarget(target.to_string()))?;
    let element = fragment
        .query_selector(&selector)
        .ok()
        .flatten()
        .ok_or_else(|| ModalError::MissingTarget(target.to_string()))?;
    let body = document.body().ok_or(ModalError::NoDocument)?;
    body.append_with_node_1(&element)
        .map_err(|_| ModalError::MissingTarget(target.to_string()))?;
    Ok(element)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ModalNodes;

    const MODAL_MARKUP: &str = r#"
        <aside id="{id}" class="modal modal-hidden" aria-hidden="true">
          <div class="modal-wrapper js-modal-stop">
            <button class="js-modal-close" type="button">x</button>
            <button class="back-to-gallery modal-hidden" type="button">&lt;</button>
            <div id="modal-gallery-page">
              <div class="modal-gallery"></div>
              <button class="add-project" type="button">Ajouter une photo</button>
            </div>
            <div id="modal-add-project-page" class="modal-hidden">
              <form id="add-project-form">
                <div id="drop-container">
                  <button class="add-photo-btn" type="button">+ Ajouter photo</button>
                  <input id="add-photo" type="file" name="image" accept="image/*" hidden>
                </div>
                <input name="title" type="text" required>
                <select id="category-selection" name="category" required></select>
                <button id="addBtn" type="submit">Valider</button>
              </form>
            </div>
          </div>
        </aside>"#;

    /// Fresh modal markup appended to `<body>` under `id`.
    pub(crate) fn modal_nodes(id: &str) -> ModalNodes {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document");
        if let Some(existing) = document.get_element_by_id(id) {
            existing.remove();
        }
        document
            .body()
            .expect("body")
            .insert_adjacent_html("beforeend", &MODAL_MARKUP.replace("{id}", id))
            .expect("insert modal");
        let modal = document.get_element_by_id(id).expect("modal present");
        ModalNodes::locate(modal).expect("modal nodes")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::modal_nodes;
    use super::*;
    use console_error_panic_hook::set_once as set_panic_hook;
    use folio_core::Category;
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;
    use web_sys::{KeyboardEventInit, Window};

    wasm_bindgen_test_configure!(run_in_browser);

    fn works() -> Vec<Work> {
        (1..=2)
            .map(|id| Work {
                id,
                title: format!("Projet {id}"),
                image_url: format!("images/{id}.png"),
                category: Category {
                    id,
                    name: format!("Catégorie {id}"),
                },
                ..Work::default()
            })
            .collect()
    }

    fn window() -> Window {
        web_sys::window().expect("window")
    }

    fn active() -> Option<Element> {
        window().document().and_then(|document| document.active_element())
    }

    /// Dispatches a cancelable keydown on the window; true when a handler
    /// called `preventDefault`.
    fn press(key: &str, shift: bool) -> bool {
        let init = KeyboardEventInit::new();
        init.set_key(key);
        init.set_shift_key(shift);
        init.set_cancelable(true);
        let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init)
            .expect("keyboard event");
        !window().dispatch_event(&event).expect("dispatch keydown")
    }

    fn controller() -> Rc<ModalController> {
        let core = PortfolioCore::new("http://127.0.0.1:9/unreachable");
        core.prime(works());
        ModalController::new(core)
    }

    fn trigger() -> HtmlElement {
        let document = window().document().expect("document");
        let button: HtmlElement = document
            .create_element("button")
            .expect("button")
            .dyn_into()
            .expect("html element");
        document
            .body()
            .expect("body")
            .append_child(&button)
            .expect("append trigger");
        button
    }

    #[wasm_bindgen_test]
    fn open_focuses_first_and_tab_wraps() {
        set_panic_hook();
        let controller = controller();
        let nodes = modal_nodes("modal-focus-test");
        controller.present(nodes.clone(), &works());

        assert!(controller.is_open());
        assert!(!nodes.modal.class_list().contains(HIDDEN_CLASS));
        assert_eq!(nodes.modal.get_attribute("aria-modal").as_deref(), Some("true"));
        assert!(nodes.modal.get_attribute("aria-hidden").is_none());
        assert_eq!(controller.focusable_count(), 4);

        let ring = focusable_elements(&nodes.modal);
        let first: &Element = &ring[0];
        let last: &Element = &ring[ring.len() - 1];
        assert_eq!(active().as_ref(), Some(first));

        let _ = ring[ring.len() - 1].focus();
        assert!(press("Tab", false));
        assert_eq!(active().as_ref(), Some(first));

        assert!(press("Tab", true));
        assert_eq!(active().as_ref(), Some(last));

        controller.reset();
    }

    #[wasm_bindgen_test]
    fn close_restores_focus_and_releases_listeners() {
        set_panic_hook();
        let controller = controller();
        let opener = trigger();
        for _ in 0..3 {
            let _ = opener.focus();
            let nodes = modal_nodes("modal-cycle-test");
            controller.present(nodes.clone(), &works());
            assert!(press("Tab", false));

            controller.close(None);
            assert!(!controller.is_open());
            let opener_element: &Element = &opener;
            assert_eq!(active().as_ref(), Some(opener_element));
            assert_eq!(nodes.modal.get_attribute("aria-hidden").as_deref(), Some("true"));
            assert!(nodes.modal.get_attribute("aria-modal").is_none());
            assert!(!press("Tab", false), "keydown handler outlived the session");
        }
        controller.reset();
    }

    #[wasm_bindgen_test(async)]
    async fn escape_hides_and_resets_to_gallery_page() {
        set_panic_hook();
        let controller = controller();
        let nodes = modal_nodes("modal-escape-test");
        controller.present(nodes.clone(), &works());

        let to_add: HtmlElement = nodes.to_add.clone().dyn_into().expect("html element");
        to_add.click();
        assert!(nodes.gallery_page.class_list().contains(HIDDEN_CLASS));
        assert_eq!(controller.focusable_count(), 5);

        assert!(press("Escape", false));
        assert!(!controller.is_open());
        TimeoutFuture::new(HIDE_FALLBACK_MS + 100).await;

        assert!(nodes.modal.class_list().contains(HIDDEN_CLASS));
        assert!(!nodes.gallery_page.class_list().contains(HIDDEN_CLASS));
        assert!(nodes.add_page.class_list().contains(HIDDEN_CLASS));
        assert!(nodes.back.class_list().contains(HIDDEN_CLASS));
    }

    #[wasm_bindgen_test]
    fn backdrop_click_closes_but_inner_click_does_not() {
        set_panic_hook();
        let controller = controller();
        let nodes = modal_nodes("modal-click-test");
        controller.present(nodes.clone(), &works());

        let inner: HtmlElement = nodes.stop.clone().dyn_into().expect("html element");
        inner.click();
        assert!(controller.is_open());

        let backdrop: HtmlElement = nodes.modal.clone().dyn_into().expect("html element");
        backdrop.click();
        assert!(!controller.is_open());
        controller.reset();
    }

    #[wasm_bindgen_test]
    fn missing_required_node_is_reported() {
        let nodes = modal_nodes("modal-broken-test");
        let broken = nodes.modal.clone();
        nodes.submit.remove();
        let err = ModalNodes::locate(broken).err().expect("locate fails");
        assert!(matches!(err, ModalError::MissingNode("#addBtn")));
        assert!(err.is_fatal());
    }
}
