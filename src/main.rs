mod add_project;
mod api;
mod app_core;
mod app_router;
mod app_runtime;
mod edit_mode;
mod gallery;
mod login;
mod modal;
mod modal_gallery;
mod notify;
mod session;

use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use api::ApiError;
use app_core::PortfolioCore;
use app_router::{InitConfig, PageKind, GALLERY_SELECTOR};
use gallery::{FilterBar, Gallery};
use login::LoginPage;
use modal::ModalController;
use notify::NoticeKind;

const FILTERS_SELECTOR: &str = ".filters";

/// Whatever the current page needs kept alive.
pub(crate) enum PortfolioApp {
    Portfolio { _page: PortfolioPage },
    Login { _page: LoginPage },
}

pub(crate) struct PortfolioPage {
    _core: Rc<PortfolioCore>,
    _modal: Rc<ModalController>,
    _gallery: yew::AppHandle<Gallery>,
    _filters: Option<yew::AppHandle<FilterBar>>,
    _listeners: Vec<EventListener>,
}

impl PortfolioPage {
    fn start(document: &Document, config: &InitConfig) -> Option<Self> {
        let gallery_root = document.query_selector(GALLERY_SELECTOR).ok().flatten()?;
        let core = PortfolioCore::new(config.api_base.clone());
        let gallery = gallery::mount_gallery(gallery_root, core.clone());
        let filters = document
            .query_selector(FILTERS_SELECTOR)
            .ok()
            .flatten()
            .map(|root| gallery::mount_filter_bar(root, core.clone()));

        {
            let core = core.clone();
            spawn_local(async move {
                match core.works().await {
                    Ok(_) | Err(ApiError::Superseded) => {}
                    Err(err) => {
                        gloo::console::warn!("initial works fetch failed", err.to_string());
                        notify::show(None, NoticeKind::Error, "Impossible de charger les projets.");
                    }
                }
            });
        }

        let modal = ModalController::new(core.clone());
        let mut listeners = Vec::new();
        if config.edit_mode() {
            listeners.extend(edit_mode::install(document, modal.clone()));
        }
        if let Some(window) = web_sys::window() {
            let modal = Rc::downgrade(&modal);
            listeners.push(EventListener::new(&window, "pagehide", move |_| {
                if let Some(modal) = modal.upgrade() {
                    modal.reset();
                }
            }));
        }

        Some(Self {
            _core: core,
            _modal: modal,
            _gallery: gallery,
            _filters: filters,
            _listeners: listeners,
        })
    }
}

fn main() {
    console_error_panic_hook::set_once();
    let config = app_router::load_init_config();
    app_runtime::set_init_config(config.clone());
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let app = match config.page {
        PageKind::Portfolio => PortfolioPage::start(&document, &config)
            .map(|page| PortfolioApp::Portfolio { _page: page }),
        PageKind::Login => match LoginPage::attach(&document) {
            Ok(page) => Some(PortfolioApp::Login { _page: page }),
            Err(err) => {
                gloo::console::error!("login page unusable", err.to_string());
                None
            }
        },
        PageKind::Unknown => {
            gloo::console::warn!("no gallery or login form on this page");
            None
        }
    };
    if let Some(app) = app {
        gloo::console::log!("page ready", format!("{:?}", config.page));
        app_runtime::install_app(app);
    }
}
