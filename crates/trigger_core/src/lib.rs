//! Client side of the scraper trigger: the button controller, the transport
//! it posts through, and the view layer that renders its state.

pub mod config;
mod controller;
pub mod error;
pub mod transport;
pub mod view;

pub use config::{load_settings, TriggerSettings};
pub use controller::{ClickOutcome, TriggerController, TriggerEvent};
pub use error::TransportError;
pub use transport::{HttpScraperTransport, ScraperTransport, TriggerResponse};
pub use view::{spawn_view, ButtonView};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
