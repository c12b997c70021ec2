pub mod generate;

/// Generator handle provided to server functions through Leptos context.
#[cfg(feature = "ssr")]
pub type SharedGenerator = std::sync::Arc<lessonplan_llm::LessonPlanGenerator>;
