//! Pawhaven data layer
//!
//! Client-side data layer for an animal rescue operations application.
//! Visitors submit rescue reports, adoption requests, donations and FAQ
//! questions; staff authenticate and manage the records. Persistence,
//! authentication and image storage are delegated to a managed backend
//! reached over HTTP; the UI shell sits on top of this crate.

pub mod config;
pub mod error;
pub mod images;
pub mod location;
pub mod records;
pub mod session;
pub mod store;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for an embedding application.
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pawhaven=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
