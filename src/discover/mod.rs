pub mod observer;

pub use observer::{ChromiumObserver, DynamicObserver, Observation};
