//! Event delivery to external observers.

mod bus;

pub use bus::EventBus;
