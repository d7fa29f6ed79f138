//! Shared test doubles for the capability traits.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::auth::AuthApi;
use crate::error::GateError;
use crate::launcher::Application;
use crate::store::SessionStore;
use crate::ui::{SubmitHandler, UiGateway};

pub const NOW_S: i64 = 1_700_000_000;

/// Three-segment token whose claims carry `exp`.
pub fn token_expiring_at(exp: i64) -> String {
    let claims = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"sub":"u"}}"#));
    format!("eyJhbGciOiJIUzI1NiJ9.{claims}.sig")
}

// =============================================================
// MockApi
// =============================================================

/// Returns `Pending` once so concurrent callers interleave like real fetches.
#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Replays scripted replies in order and records every request.
#[derive(Default)]
pub struct MockApi {
    replies: RefCell<VecDeque<Result<serde_json::Value, GateError>>>,
    pub calls: RefCell<Vec<(String, String)>>,
}

impl MockApi {
    pub fn new(replies: Vec<Result<serde_json::Value, GateError>>) -> Self {
        Self { replies: RefCell::new(replies.into()), calls: RefCell::default() }
    }

    pub fn endpoints_called(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(endpoint, _)| endpoint.clone()).collect()
    }
}

pub fn rejected(endpoint: &str, status: u16) -> Result<serde_json::Value, GateError> {
    Err(GateError::Transport { endpoint: endpoint.to_owned(), status })
}

#[async_trait::async_trait(?Send)]
impl AuthApi for MockApi {
    async fn post_json(&self, endpoint: &str, body: &str) -> Result<serde_json::Value, GateError> {
        self.calls.borrow_mut().push((endpoint.to_owned(), body.to_owned()));
        YieldOnce::default().await;
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(GateError::Network("no scripted reply".to_owned())))
    }
}

#[async_trait::async_trait(?Send)]
impl AuthApi for Rc<MockApi> {
    async fn post_json(&self, endpoint: &str, body: &str) -> Result<serde_json::Value, GateError> {
        self.as_ref().post_json(endpoint, body).await
    }
}

// =============================================================
// RecordingUi
// =============================================================

/// Tracks form visibility, the attached handler, and ready signals.
#[derive(Default)]
pub struct RecordingUi {
    pub form_visible: Cell<bool>,
    pub form_ever_shown: Cell<bool>,
    pub handler: RefCell<Option<SubmitHandler>>,
    pub attach_count: Cell<usize>,
    pub detached_while_visible: Cell<bool>,
    pub ready_count: Cell<usize>,
    pub failures: RefCell<Vec<&'static str>>,
}

impl RecordingUi {
    pub fn handler(&self) -> Option<SubmitHandler> {
        self.handler.borrow().clone()
    }
}

impl UiGateway for Rc<RecordingUi> {
    fn show_form(&self) -> Result<(), GateError> {
        self.form_visible.set(true);
        self.form_ever_shown.set(true);
        Ok(())
    }

    fn hide_form(&self) -> Result<(), GateError> {
        self.form_visible.set(false);
        Ok(())
    }

    fn attach_submit(&self, handler: SubmitHandler) -> Result<(), GateError> {
        self.attach_count.set(self.attach_count.get() + 1);
        *self.handler.borrow_mut() = Some(handler);
        Ok(())
    }

    fn detach_submit(&self) {
        if self.form_visible.get() {
            self.detached_while_visible.set(true);
        }
        self.handler.borrow_mut().take();
    }

    fn emit_ready(&self) -> Result<(), GateError> {
        self.ready_count.set(self.ready_count.get() + 1);
        Ok(())
    }

    fn report_failure(&self, error: &GateError) {
        self.failures.borrow_mut().push(error.error_code());
    }
}

// =============================================================
// Stores
// =============================================================

/// Store whose reads and writes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub slot: RefCell<Option<String>>,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
    pub writes: Cell<usize>,
}

impl SessionStore for Rc<FlakyStore> {
    fn credential(&self) -> Result<Option<String>, GateError> {
        if self.fail_reads.get() {
            return Err(GateError::Storage("read denied".to_owned()));
        }
        Ok(self.slot.borrow().clone())
    }

    fn set_credential(&self, token: &str) -> Result<(), GateError> {
        if self.fail_writes.get() {
            return Err(GateError::Storage("quota exceeded".to_owned()));
        }
        self.writes.set(self.writes.get() + 1);
        *self.slot.borrow_mut() = Some(token.to_owned());
        Ok(())
    }
}

// =============================================================
// CountingApp
// =============================================================

#[derive(Default)]
pub struct CountingApp {
    pub inits: Cell<usize>,
    pub runs: Cell<usize>,
    pub fail_init: Cell<bool>,
}

#[async_trait::async_trait(?Send)]
impl Application for Rc<CountingApp> {
    async fn init(&self) -> Result<(), GateError> {
        self.inits.set(self.inits.get() + 1);
        if self.fail_init.get() {
            return Err(GateError::AppInit("wasm fetch failed".to_owned()));
        }
        Ok(())
    }

    fn run(&self) -> Result<(), GateError> {
        self.runs.set(self.runs.get() + 1);
        Ok(())
    }
}
