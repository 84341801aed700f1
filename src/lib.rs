pub mod catalog;
pub mod common;
pub mod server;
pub mod transport;
pub mod ui;
