//! One-shot start of the embedded application.
//!
//! The application exposes an async one-time `init` and a sync `run`. The
//! launcher is driven by the ready signal and runs the pair at most once per
//! page, however many signals arrive.

#[cfg(test)]
#[path = "launcher_test.rs"]
mod launcher_test;

use std::cell::Cell;

use crate::error::GateError;

#[async_trait::async_trait(?Send)]
pub trait Application {
    /// One-time asynchronous setup (module instantiation).
    ///
    /// # Errors
    ///
    /// Returns [`GateError::AppInit`] if setup fails.
    async fn init(&self) -> Result<(), GateError>;

    /// Synchronous run entry point, called once after `init`.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::AppInit`] if the entry point throws.
    fn run(&self) -> Result<(), GateError>;
}

pub struct Launcher<P> {
    app: P,
    started: Cell<bool>,
}

impl<P: Application> Launcher<P> {
    #[must_use]
    pub fn new(app: P) -> Self {
        Self { app, started: Cell::new(false) }
    }

    #[must_use]
    pub fn started(&self) -> bool {
        self.started.get()
    }

    /// Initialize and run the application unless a previous call already did.
    ///
    /// Returns `Ok(false)` for repeat calls. The started flag is set before
    /// `init` is awaited, so a failed init is never retried.
    ///
    /// # Errors
    ///
    /// Propagates the application's `init` or `run` error.
    pub async fn launch(&self) -> Result<bool, GateError> {
        if self.started.replace(true) {
            log::debug!("launcher: start already requested, ignoring");
            return Ok(false);
        }
        log::info!("launcher: initializing application");
        if let Err(e) = self.app.init().await {
            log::error!("launcher: {e}");
            return Err(e);
        }
        self.app.run()?;
        log::info!("launcher: application running");
        Ok(true)
    }
}

/// A wasm-bindgen ES module namespace exporting `default()` and `main()`.
#[cfg(feature = "hydrate")]
pub struct JsApplication {
    module: wasm_bindgen::JsValue,
}

#[cfg(feature = "hydrate")]
impl JsApplication {
    #[must_use]
    pub fn new(module: wasm_bindgen::JsValue) -> Self {
        Self { module }
    }

    fn export(&self, name: &str) -> Result<js_sys::Function, GateError> {
        use wasm_bindgen::JsCast;

        let value = js_sys::Reflect::get(&self.module, &wasm_bindgen::JsValue::from_str(name))
            .map_err(|e| GateError::AppInit(format!("module export {name}: {e:?}")))?;
        value
            .dyn_into::<js_sys::Function>()
            .map_err(|_| GateError::AppInit(format!("module export {name} is not a function")))
    }
}

#[cfg(feature = "hydrate")]
#[async_trait::async_trait(?Send)]
impl Application for JsApplication {
    async fn init(&self) -> Result<(), GateError> {
        let returned = self
            .export("default")?
            .call0(&wasm_bindgen::JsValue::NULL)
            .map_err(|e| GateError::AppInit(format!("default(): {e:?}")))?;
        wasm_bindgen_futures::JsFuture::from(js_sys::Promise::resolve(&returned))
            .await
            .map_err(|e| GateError::AppInit(format!("default() rejected: {e:?}")))?;
        Ok(())
    }

    fn run(&self) -> Result<(), GateError> {
        self.export("main")?
            .call0(&wasm_bindgen::JsValue::NULL)
            .map_err(|e| GateError::AppInit(format!("main(): {e:?}")))?;
        Ok(())
    }
}
