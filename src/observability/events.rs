//! Observable events
//!
//! Events are explicit and typed; the logger only ever sees their names.

use std::fmt;

/// Observable events in the inventory service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// HTTP server bound and serving
    ServerStart,
    /// HTTP server stopped
    ServerStop,
    /// Configuration loaded
    ConfigLoaded,
    /// Database opened and schema ensured
    DatabaseOpened,

    // Product writes
    ProductCreated,
    ProductUpdated,
    ProductDeleted,

    // Rejections and failures
    /// Create or update collided with an extant SKU
    SkuConflict,
    /// Request body failed validation
    ValidationRejected,
    /// Unexpected storage error, fails the current request
    StorageFailure,
    /// A request finished (method, path, status)
    RequestComplete,
}

impl Event {
    /// Returns the event name as logged
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DatabaseOpened => "DATABASE_OPENED",
            Event::ProductCreated => "PRODUCT_CREATED",
            Event::ProductUpdated => "PRODUCT_UPDATED",
            Event::ProductDeleted => "PRODUCT_DELETED",
            Event::SkuConflict => "SKU_CONFLICT",
            Event::ValidationRejected => "VALIDATION_REJECTED",
            Event::StorageFailure => "STORAGE_FAILURE",
            Event::RequestComplete => "REQUEST_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
