pub mod home;
pub mod lesson_planner;
