pub mod config;
pub mod input;
pub mod layout;
pub mod transport;
pub mod ui;
