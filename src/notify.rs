use std::cell::{Cell, RefCell};

use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

pub(crate) const NOTIFICATION_MS: u32 = 3_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    fn class(self) -> &'static str {
        match self {
            NoticeKind::Success => "notification-success",
            NoticeKind::Error => "notification-error",
        }
    }
}

struct ActiveNotice {
    element: Element,
    generation: u64,
}

thread_local! {
    static ACTIVE: RefCell<Option<ActiveNotice>> = RefCell::new(None);
    static GENERATION: Cell<u64> = Cell::new(0);
}

/// Shows a transient message inside `host` (or `<body>`), replacing any
/// message still on screen.
pub(crate) fn show(host: Option<&Element>, kind: NoticeKind, message: &str) {
    dismiss();
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let Ok(element) = document.create_element("div") else {
        return;
    };
    element.set_class_name(&format!("notification {}", kind.class()));
    let _ = element.set_attribute("role", if kind == NoticeKind::Error { "alert" } else { "status" });
    element.set_text_content(Some(message));
    let attached = match host {
        Some(host) => host.append_child(&element).is_ok(),
        None => document
            .body()
            .map(|body| body.append_child(&element).is_ok())
            .unwrap_or(false),
    };
    if !attached {
        return;
    }
    let generation = GENERATION.with(|counter| {
        let next = counter.get().wrapping_add(1);
        counter.set(next);
        next
    });
    ACTIVE.with(|slot| {
        *slot.borrow_mut() = Some(ActiveNotice {
            element,
            generation,
        });
    });
    spawn_local(async move {
        TimeoutFuture::new(NOTIFICATION_MS).await;
        dismiss_generation(generation);
    });
}

pub(crate) fn dismiss() {
    let active = ACTIVE.with(|slot| slot.borrow_mut().take());
    if let Some(active) = active {
        active.element.remove();
    }
}

fn dismiss_generation(generation: u64) {
    let active = ACTIVE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.as_ref().map(|notice| notice.generation) == Some(generation) {
            slot.take()
        } else {
            None
        }
    });
    if let Some(active) = active {
        active.element.remove();
    }
}

#[cfg(test)]
pub(crate) fn current_text() -> Option<String> {
    ACTIVE.with(|slot| {
        slot.borrow()
            .as_ref()
            .and_then(|notice| notice.element.text_content())
    })
}
