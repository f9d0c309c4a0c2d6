pub mod course_detail;
pub mod dashboard;
