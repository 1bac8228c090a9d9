pub mod admin_handler;
pub mod catalog_handler;
pub mod contact_handler;
