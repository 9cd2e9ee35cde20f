//! Runtime infrastructure - blocking access to the async client

mod blocking;

pub use blocking::BlockingClient;
