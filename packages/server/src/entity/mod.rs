pub mod course;
pub mod course_tag;
pub mod enrollment;
pub mod lesson;
pub mod progress;
pub mod review;
pub mod section;
pub mod tag;
pub mod user;
