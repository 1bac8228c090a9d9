pub mod api_client;
pub mod auth_service;
pub mod catalog_service;
pub mod course_form;
pub mod course_service;
pub mod storage_service;
pub mod upload_service;
