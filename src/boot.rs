//! JS entry point wiring the browser capabilities to the controller.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Event};

use crate::auth::GlooAuthApi;
use crate::clock::SystemClock;
use crate::config::GateConfig;
use crate::consts::CONFIG_ELEMENT_ID;
use crate::controller::BootstrapController;
use crate::dom::DomGateway;
use crate::launcher::{Application, JsApplication, Launcher};
use crate::store::LocalStorageStore;

/// Gate the embedded application `module` behind the session check.
///
/// `module` is the application's wasm-bindgen ES module namespace; its
/// `default` export is awaited once and `main` is called once after it.
///
/// # Errors
///
/// Returns an error if there is no document or the ready listener cannot be
/// installed. Every later failure is logged and leaves the form usable.
#[wasm_bindgen]
pub fn boot(module: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let (config, config_error) = load_config(&document);
    if let Some(level) = config.level_filter().to_level() {
        if let Err(e) = console_log::init_with_level(level) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("gate: logger already set: {e}")));
        }
    }
    if let Some(e) = config_error {
        log::warn!("boot: {e}; using defaults");
    }

    let launcher = Rc::new(Launcher::new(JsApplication::new(module)));
    listen_for_ready(&document, &config.ready_event, launcher)?;

    let controller = BootstrapController::new(
        LocalStorageStore::new(&config.storage_key),
        DomGateway::new(document, &config),
        GlooAuthApi,
        SystemClock,
        config.endpoints(),
    );
    controller.on_load();
    Ok(())
}

fn load_config(document: &Document) -> (GateConfig, Option<crate::error::GateError>) {
    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    match GateConfig::from_json(raw.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (GateConfig::default(), Some(e)),
    }
}

/// Start the application whenever the ready event fires; the launcher dedupes.
fn listen_for_ready<P: Application + 'static>(
    document: &Document,
    event_name: &str,
    launcher: Rc<Launcher<P>>,
) -> Result<(), JsValue> {
    let callback = Closure::wrap(Box::new(move |_ev: Event| {
        let launcher = Rc::clone(&launcher);
        wasm_bindgen_futures::spawn_local(async move {
            match launcher.launch().await {
                Ok(true) => log::debug!("boot: application started"),
                Ok(false) => {}
                Err(e) => log::error!("boot: {e}"),
            }
        });
    }) as Box<dyn FnMut(Event)>);
    document.add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())?;
    // Lives for the page.
    callback.forget();
    Ok(())
}
