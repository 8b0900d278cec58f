pub mod handlers;
pub mod status;
pub mod tracker;
