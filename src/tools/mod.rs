pub mod args;
pub mod catalog;
pub mod dispatch;
pub mod resources;
