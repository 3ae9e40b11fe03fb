pub mod actions;
pub mod app;
pub mod scanner;
pub mod session;
pub mod ui_model;
