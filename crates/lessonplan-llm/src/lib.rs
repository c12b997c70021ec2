//! Lesson plan generation client.
//!
//! Provides the `ProviderAdapter` trait, `DynProvider` wrapper, the Gemini
//! adapter, the response schema descriptor, middleware, and
//! `LessonPlanGenerator`, which turns a `LessonPlanRequest` into a
//! `LessonPlanTable`.

mod client;
mod config;
mod gemini;
mod provider;
mod schema;
mod types;

pub use client::*;
pub use config::GeneratorConfig;
pub use gemini::GeminiAdapter;
pub use provider::*;
pub use schema::*;
pub use types::*;

pub use lessonplan_types::{
    GenerationError, LessonPlanRequest, LessonPlanRow, LessonPlanTable,
};
