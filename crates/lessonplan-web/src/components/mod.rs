pub mod lesson_plan_form;
pub mod lesson_plan_table;
