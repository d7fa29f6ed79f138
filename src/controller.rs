//! Bootstrap state machine: start-or-reveal at load, then the login flow.
//!
//! ARCHITECTURE
//! ============
//! ```text
//!   on_load ──valid──────────────────────────────┐
//!      │                                         ▼
//!      └─invalid─> AwaitingCredential ──submit──> Authenticating ──ok──> Running
//!                        ▲                           │
//!                        └──────────failure──────────┘
//! ```
//!
//! `Running` is terminal. Both entry paths go through [`BootstrapController::request_start`],
//! which checks the phase before emitting the ready signal, so the start signal
//! fires at most once per page regardless of listener lifecycle.
//!
//! TRADE-OFFS
//! ==========
//! Auth rejection is silent by default: the form simply stays visible. The
//! failure is still handed to [`UiGateway::report_failure`] and returned as
//! [`SubmitOutcome::Rejected`] so a caller can surface it.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::Cell;
use std::rc::Rc;

use futures::FutureExt as _;

use crate::auth::{AuthApi, Credentials, Endpoints, login_or_register};
use crate::clock::Clock;
use crate::error::GateError;
use crate::session::{SessionState, session_state};
use crate::store::SessionStore;
use crate::ui::{SubmitHandler, UiGateway};

/// Observable page lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    AwaitingCredential,
    Authenticating,
    Running,
}

/// Result of a single form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Token persisted, form retired, start signal emitted.
    Started,
    /// The protocol failed; the form is still attached and visible.
    Rejected(GateError),
    /// A submission was already in flight, or the application is running.
    Ignored,
}

pub struct BootstrapController<S, U, A, C> {
    store: S,
    ui: U,
    api: A,
    clock: C,
    endpoints: Endpoints,
    phase: Cell<BootstrapPhase>,
    loaded: Cell<bool>,
}

impl<S, U, A, C> BootstrapController<S, U, A, C>
where
    S: SessionStore + 'static,
    U: UiGateway + 'static,
    A: AuthApi + 'static,
    C: Clock + 'static,
{
    #[must_use]
    pub fn new(store: S, ui: U, api: A, clock: C, endpoints: Endpoints) -> Rc<Self> {
        Rc::new(Self {
            store,
            ui,
            api,
            clock,
            endpoints,
            phase: Cell::new(BootstrapPhase::AwaitingCredential),
            loaded: Cell::new(false),
        })
    }

    #[must_use]
    pub fn phase(&self) -> BootstrapPhase {
        self.phase.get()
    }

    /// Decide, once, between starting immediately and revealing the form.
    ///
    /// Returns the session state that drove the decision. Later calls only
    /// re-report the state.
    pub fn on_load(self: &Rc<Self>) -> SessionState {
        let stored = self.store.credential().unwrap_or_else(|e| {
            log::warn!("bootstrap: {e}; treating as no credential");
            None
        });
        let state = session_state(stored.as_deref(), self.clock.now_ms());
        if self.loaded.replace(true) {
            log::debug!("bootstrap: on_load already ran (session {})", state.as_str());
            return state;
        }
        log::info!("bootstrap: session {}", state.as_str());

        if state.is_playable() {
            self.request_start();
            return state;
        }
        if let Err(e) = self.ui.show_form() {
            log::error!("bootstrap: {e}");
        }
        if let Err(e) = self.ui.attach_submit(self.submit_handler()) {
            log::error!("bootstrap: {e}");
        }
        state
    }

    /// Move to `Running` and emit the ready signal. No-op once running.
    pub fn request_start(&self) -> bool {
        if self.phase.get() == BootstrapPhase::Running {
            log::debug!("bootstrap: already running, start request ignored");
            return false;
        }
        self.phase.set(BootstrapPhase::Running);
        if let Err(e) = self.ui.emit_ready() {
            log::error!("bootstrap: {e}");
        }
        true
    }

    /// Run the login/registration protocol for one submission.
    pub async fn submit(&self, credentials: Credentials) -> SubmitOutcome {
        let phase = self.phase.get();
        if phase != BootstrapPhase::AwaitingCredential {
            log::debug!("bootstrap: submission ignored in phase {phase:?}");
            return SubmitOutcome::Ignored;
        }
        self.phase.set(BootstrapPhase::Authenticating);
        log::debug!("bootstrap: authenticating {}", credentials.username);

        match self.authenticate(&credentials).await {
            Ok(()) => {
                self.ui.detach_submit();
                if let Err(e) = self.ui.hide_form() {
                    log::warn!("bootstrap: {e}");
                }
                self.request_start();
                SubmitOutcome::Started
            }
            Err(e) => {
                log::warn!("bootstrap: authentication failed ({}): {e}", e.error_code());
                self.phase.set(BootstrapPhase::AwaitingCredential);
                self.ui.report_failure(&e);
                SubmitOutcome::Rejected(e)
            }
        }
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<(), GateError> {
        let token = login_or_register(&self.api, &self.endpoints, credentials).await?;
        self.store.set_credential(&token)
    }

    /// Handler holding the controller alive until the gateway drops it on detach.
    fn submit_handler(self: &Rc<Self>) -> SubmitHandler {
        let this = Rc::clone(self);
        Rc::new(move |credentials: Credentials| {
            let this = Rc::clone(&this);
            async move { this.submit(credentials).await }.boxed_local()
        })
    }
}
