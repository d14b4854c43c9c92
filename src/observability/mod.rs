//! Observability for the inventory service
//!
//! Structured JSON logging of typed lifecycle and write events.
//!
//! ```ignore
//! use retail_inventory::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ProductCreated, &[("id", "1"), ("sku", "W-1")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Default severity for an event
fn severity_of(event: Event) -> Severity {
    match event {
        Event::SkuConflict | Event::ValidationRejected => Severity::Warn,
        Event::StorageFailure => Severity::Error,
        Event::RequestComplete => Severity::Trace,
        _ => Severity::Info,
    }
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_of(event), event.as_str(), fields);
}
