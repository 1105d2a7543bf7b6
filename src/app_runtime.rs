use std::cell::RefCell;

use crate::app_router::{self, InitConfig};
use crate::PortfolioApp;

thread_local! {
    static INIT_CONFIG: RefCell<Option<InitConfig>> = RefCell::new(None);
    static APP: RefCell<Option<PortfolioApp>> = RefCell::new(None);
}

pub(crate) fn set_init_config(config: InitConfig) {
    INIT_CONFIG.with(|slot| {
        *slot.borrow_mut() = Some(config);
    });
}

pub(crate) fn init_config() -> InitConfig {
    INIT_CONFIG.with(|slot| slot.borrow().clone())
        .unwrap_or_else(app_router::load_init_config)
}

pub(crate) fn api_base() -> String {
    init_config().api_base
}

/// Keeps the page controllers alive for the lifetime of the document.
pub(crate) fn install_app(app: PortfolioApp) {
    APP.with(|slot| {
        *slot.borrow_mut() = Some(app);
    });
}

