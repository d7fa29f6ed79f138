//! Page-level UI capability consumed by the bootstrap controller.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::auth::Credentials;
use crate::controller::SubmitOutcome;
use crate::error::GateError;

/// Callback invoked with the form fields on every submission.
///
/// The gateway is expected to suppress the browser's default submission and
/// drive the returned future on the event loop.
pub type SubmitHandler = Rc<dyn Fn(Credentials) -> LocalBoxFuture<'static, SubmitOutcome>>;

pub trait UiGateway {
    /// Make the credential form visible.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Dom`] if the form cannot be found or styled.
    fn show_form(&self) -> Result<(), GateError>;

    /// Hide the credential form.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Dom`] if the form cannot be found or styled.
    fn hide_form(&self) -> Result<(), GateError>;

    /// Route form submissions to `handler`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Dom`] if the listener cannot be installed.
    fn attach_submit(&self, handler: SubmitHandler) -> Result<(), GateError>;

    /// Remove the submission listener. No-op when none is attached.
    fn detach_submit(&self);

    /// Broadcast the start signal for the embedded application.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Dom`] if the signal cannot be dispatched.
    fn emit_ready(&self) -> Result<(), GateError>;

    /// Called when a submission fails; the form stays visible either way.
    fn report_failure(&self, error: &GateError) {
        log::debug!("ui: submission failed silently ({})", error.error_code());
    }
}
