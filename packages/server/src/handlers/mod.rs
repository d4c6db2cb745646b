pub mod assets;
pub mod auth;
pub mod catalog;
pub mod course_admin;
pub mod enrollment;
pub mod progress;
pub mod review;
pub mod upload;
