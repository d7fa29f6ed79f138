//! `web-sys` implementation of [`UiGateway`].
//!
//! SYSTEM CONTEXT
//! ==============
//! The page ships the form hidden with an inline `display: none`. Revealing
//! removes that property, hiding sets it back. The submit closure is kept in
//! the gateway so it can be removed again; dropping it on detach also drops
//! the controller reference the handler holds.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Event, FormData, HtmlFormElement};

use crate::auth::Credentials;
use crate::config::GateConfig;
use crate::consts::{PASSWORD_FIELD, USERNAME_FIELD};
use crate::error::GateError;
use crate::ui::{SubmitHandler, UiGateway};

type Listener = Closure<dyn FnMut(Event)>;

pub struct DomGateway {
    document: Document,
    form_id: String,
    ready_event: String,
    listener: RefCell<Option<Listener>>,
}

impl DomGateway {
    #[must_use]
    pub fn new(document: Document, config: &GateConfig) -> Self {
        Self {
            document,
            form_id: config.form_id.clone(),
            ready_event: config.ready_event.clone(),
            listener: RefCell::new(None),
        }
    }

    fn form(&self) -> Result<HtmlFormElement, GateError> {
        self.document
            .get_element_by_id(&self.form_id)
            .ok_or_else(|| GateError::Dom(format!("#{} not found", self.form_id)))?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| GateError::Dom(format!("#{} is not a form", self.form_id)))
    }
}

/// Read the credential fields; absent fields become empty strings.
fn read_credentials(form: &HtmlFormElement) -> Result<Credentials, GateError> {
    let data = FormData::new_with_form(form).map_err(|e| GateError::from_js("FormData", &e))?;
    let field = |name: &str| {
        data.get(name).as_string().unwrap_or_else(|| {
            log::warn!("dom: form field {name} missing");
            String::new()
        })
    };
    Ok(Credentials::new(field(USERNAME_FIELD), field(PASSWORD_FIELD)))
}

impl UiGateway for DomGateway {
    fn show_form(&self) -> Result<(), GateError> {
        self.form()?
            .style()
            .remove_property("display")
            .map_err(|e| GateError::from_js("show form", &e))?;
        Ok(())
    }

    fn hide_form(&self) -> Result<(), GateError> {
        self.form()?
            .style()
            .set_property("display", "none")
            .map_err(|e| GateError::from_js("hide form", &e))
    }

    fn attach_submit(&self, handler: SubmitHandler) -> Result<(), GateError> {
        self.detach_submit();
        let form = self.form()?;
        let target = form.clone();
        let listener = Closure::wrap(Box::new(move |ev: Event| {
            ev.prevent_default();
            match read_credentials(&target) {
                Ok(credentials) => {
                    let submission = handler(credentials);
                    wasm_bindgen_futures::spawn_local(async move {
                        let outcome = submission.await;
                        log::debug!("dom: submission finished: {outcome:?}");
                    });
                }
                Err(e) => log::error!("dom: {e}"),
            }
        }) as Box<dyn FnMut(Event)>);
        form.add_event_listener_with_callback("submit", listener.as_ref().unchecked_ref())
            .map_err(|e| GateError::from_js("attach submit", &e))?;
        *self.listener.borrow_mut() = Some(listener);
        Ok(())
    }

    fn detach_submit(&self) {
        let Some(listener) = self.listener.borrow_mut().take() else {
            return;
        };
        match self.form() {
            Ok(form) => {
                if let Err(e) =
                    form.remove_event_listener_with_callback("submit", listener.as_ref().unchecked_ref())
                {
                    log::warn!("dom: {}", GateError::from_js("detach submit", &e));
                }
            }
            Err(e) => log::warn!("dom: {e}"),
        }
    }

    fn emit_ready(&self) -> Result<(), GateError> {
        let event = Event::new(&self.ready_event).map_err(|e| GateError::from_js("ready event", &e))?;
        self.document
            .dispatch_event(&event)
            .map_err(|e| GateError::from_js("dispatch ready", &e))?;
        Ok(())
    }
}
