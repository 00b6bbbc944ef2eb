//! Route handlers for the directory API.

pub mod auth_handlers;
pub mod blog_handlers;
pub mod report_handlers;
pub mod resource_handlers;
