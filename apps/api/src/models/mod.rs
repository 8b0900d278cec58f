pub mod annotation;
pub mod hierarchy;
pub mod user;
