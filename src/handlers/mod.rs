//! Event handlers for transaction lifecycle events

pub mod console;
pub mod composite;
pub mod recording;

// Re-export for convenience
pub use console::ConsoleEventHandler;
pub use composite::CompositeEventHandler;
pub use recording::RecordingEventHandler;
