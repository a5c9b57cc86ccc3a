mod app;
mod config;
mod effects;
mod input;
mod locale;
mod logging;
mod render;

pub use app::run_app;
