pub mod auth;
pub mod catalog;
pub mod course;
pub mod enrollment;
pub mod progress;
pub mod review;
pub mod shared;
pub mod upload;
