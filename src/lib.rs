pub mod classify;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod input;
pub mod model;
pub mod routes;
pub mod snapshot;
pub mod ui;
pub mod window;
