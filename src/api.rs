//! HTTP API for the GreenBot front-end

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::SessionHandle;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionHandle>,
}

impl AppState {
    pub fn new(session: Arc<SessionHandle>) -> Self {
        Self { session }
    }
}
