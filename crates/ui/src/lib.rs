pub mod app;
pub mod context;
pub mod speech;
pub mod vm;
pub mod views;

pub use app::{App, AppShell};
pub use context::{AppContext, UiApp, build_app_context};
pub use speech::WebSpeechSink;
