pub mod contact_model;
pub mod course_model;
pub mod filter_model;
pub mod paging;
pub mod upload_model;
pub mod user_model;
