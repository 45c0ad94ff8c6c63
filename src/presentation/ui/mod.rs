//! Demo application.

mod app;

pub use app::DemoApp;
