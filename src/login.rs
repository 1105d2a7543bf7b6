use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

use crate::api::{self, ApiError};
use crate::app_router::{self, LOGIN_FORM_SELECTOR};
use crate::app_runtime;
use crate::session;
use folio_core::{LoginField, LoginForm, LoginRequest};

pub(crate) const ERROR_CLASS: &str = "error";
const SUCCESS_COLOR: &str = "green";
const FAILURE_COLOR: &str = "red";
const REDIRECT_DELAY_MS: u32 = 1_000;
const CLEAR_DELAY_MS: u32 = 1_000;

pub(crate) const MSG_SUCCESS: &str = "Connexion réussie !";
pub(crate) const MSG_BAD_CREDENTIALS: &str = "Identifiants incorrects. Veuillez réessayer.";
pub(crate) const MSG_MISSING_FIELDS: &str = "Veuillez renseigner tous les champs.";
pub(crate) const MSG_UNREACHABLE: &str = "Serveur injoignable. Réessayez plus tard.";

#[derive(Debug, thiserror::Error)]
pub(crate) enum LoginPageError {
    #[error("login markup is missing {0}")]
    MissingNode(&'static str),
}

#[derive(Clone)]
struct LoginNodes {
    form: Element,
    email: HtmlInputElement,
    password: HtmlInputElement,
    message: HtmlElement,
}

impl LoginNodes {
    fn locate(document: &Document) -> Result<Self, LoginPageError> {
        let form = document
            .query_selector(LOGIN_FORM_SELECTOR)
            .ok()
            .flatten()
            .ok_or(LoginPageError::MissingNode(LOGIN_FORM_SELECTOR))?;
        Ok(Self {
            email: by_id(document, "email")?,
            password: by_id(document, "password")?,
            message: by_id(document, "login-message")?,
            form,
        })
    }

    fn input(&self, field: LoginField) -> &HtmlInputElement {
        match field {
            LoginField::Email => &self.email,
            LoginField::Password => &self.password,
        }
    }

    fn show_message(&self, text: &str, color: &str) {
        self.message.set_text_content(Some(text));
        let style = self.message.style();
        let _ = style.set_property("color", color);
        let _ = style.set_property("display", "block");
    }
}

fn by_id<T: JsCast>(document: &Document, id: &'static str) -> Result<T, LoginPageError> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<T>().ok())
        .ok_or(LoginPageError::MissingNode(id))
}

/// The login form and everything listening on it.
pub(crate) struct LoginPage {
    _listeners: Vec<EventListener>,
}

impl LoginPage {
    pub(crate) fn attach(document: &Document) -> Result<Self, LoginPageError> {
        let nodes = Rc::new(LoginNodes::locate(document)?);
        let mut listeners = Vec::new();
        listeners.push(EventListener::new_with_options(
            &nodes.form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            {
                let nodes = nodes.clone();
                move |event| {
                    event.prevent_default();
                    submit(&nodes);
                }
            },
        ));
        for field in [LoginField::Email, LoginField::Password] {
            let input = nodes.input(field).clone();
            listeners.push(EventListener::new(nodes.input(field), "animationend", move |_| {
                let _ = input.class_list().remove_1(ERROR_CLASS);
            }));
        }
        Ok(Self {
            _listeners: listeners,
        })
    }
}

fn submit(nodes: &Rc<LoginNodes>) {
    let form = LoginForm::new(nodes.email.value(), nodes.password.value());
    let empty = form.empty_fields();
    if !empty.is_empty() {
        for field in empty {
            let _ = nodes.input(field).class_list().add_1(ERROR_CLASS);
        }
        nodes.show_message(MSG_MISSING_FIELDS, FAILURE_COLOR);
        return;
    }
    let request = LoginRequest {
        email: form.email.trim().to_string(),
        password: form.password,
    };
    let base = app_runtime::api_base();
    {
        let nodes = nodes.clone();
        spawn_local(async move {
            match api::login(&base, &request).await {
                Ok(response) => match response.token() {
                    Some(token) => {
                        gloo::console::log!("login accepted");
                        nodes.show_message(MSG_SUCCESS, SUCCESS_COLOR);
                        session::store_token(token);
                        TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                        app_router::navigate(&app_router::edit_page_url());
                    }
                    None => {
                        let reason = response.message.as_deref().unwrap_or("no token");
                        gloo::console::log!("login refused", reason);
                        nodes.show_message(MSG_BAD_CREDENTIALS, FAILURE_COLOR);
                    }
                },
                Err(err @ (ApiError::Network(_) | ApiError::NoWindow)) => {
                    gloo::console::warn!("login request failed", err.to_string());
                    nodes.show_message(MSG_UNREACHABLE, FAILURE_COLOR);
                }
                Err(err) => {
                    gloo::console::warn!("login response unusable", err.to_string());
                    nodes.show_message(MSG_BAD_CREDENTIALS, FAILURE_COLOR);
                }
            }
        });
    }
    let nodes = nodes.clone();
    spawn_local(async move {
        TimeoutFuture::new(CLEAR_DELAY_MS).await;
        nodes.email.set_value("");
        nodes.password.set_value("");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::HtmlFormElement;

    wasm_bindgen_test_configure!(run_in_browser);

    const LOGIN_MARKUP: &str = r#"
        <div class="login-container" id="login-test">
          <form>
            <input id="email" type="email">
            <input id="password" type="password">
            <p id="login-message"></p>
            <input type="submit" value="Se connecter">
          </form>
        </div>"#;

    fn login_document() -> Document {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document");
        if let Some(existing) = document.get_element_by_id("login-test") {
            existing.remove();
        }
        document
            .body()
            .expect("body")
            .insert_adjacent_html("beforeend", LOGIN_MARKUP)
            .expect("insert login markup");
        document
    }

    fn submit_form(document: &Document) {
        let form: HtmlFormElement = document
            .query_selector(LOGIN_FORM_SELECTOR)
            .expect("query")
            .expect("form")
            .dyn_into()
            .expect("form element");
        form.request_submit().expect("request submit");
    }

    #[wasm_bindgen_test]
    fn blank_fields_are_flagged_without_request() {
        let document = login_document();
        let _page = LoginPage::attach(&document).expect("attach login page");
        let email: HtmlInputElement = by_id(&document, "email").expect("email");
        email.set_value("sophie.bluel@test.tld");
        let password: HtmlInputElement = by_id(&document, "password").expect("password");
        password.set_value("   ");

        submit_form(&document);

        assert!(!email.class_list().contains(ERROR_CLASS));
        assert!(password.class_list().contains(ERROR_CLASS));
        let message: HtmlElement = by_id(&document, "login-message").expect("message");
        assert_eq!(message.text_content().as_deref(), Some(MSG_MISSING_FIELDS));
        assert_eq!(
            message.style().get_property_value("color").unwrap_or_default(),
            FAILURE_COLOR
        );
        assert_eq!(email.value(), "sophie.bluel@test.tld");
    }

    #[wasm_bindgen_test]
    fn missing_markup_is_reported() {
        let document = login_document();
        if let Some(message) = document.get_element_by_id("login-message") {
            message.remove();
        }
        let err = LoginPage::attach(&document).err().expect("attach fails");
        assert!(matches!(err, LoginPageError::MissingNode("login-message")));
    }
}
