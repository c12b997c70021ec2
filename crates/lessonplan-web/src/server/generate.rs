use leptos::prelude::*;
use leptos::server_fn::error::NoCustomError;
use lessonplan_types::LessonPlanTable;

/// Generate a lesson plan table from the four form fields.
///
/// Every `GenerationError` comes back as `ServerFnError::ServerError` carrying
/// the error's user-facing message.
#[server]
pub async fn generate_lesson_plan(
    topic: String,
    grade: String,
    subject: String,
    sub_units: String,
) -> Result<LessonPlanTable, ServerFnError<NoCustomError>> {
    use lessonplan_types::LessonPlanRequest;
    use tracing::{info, warn};

    use crate::server::SharedGenerator;

    let generator = use_context::<SharedGenerator>().ok_or_else(|| {
        ServerFnError::<NoCustomError>::ServerError(
            "Lesson plan generator is not available".into(),
        )
    })?;

    let request = LessonPlanRequest {
        topic,
        grade,
        subject,
        sub_units,
    };
    info!(topic = %request.topic, grade = %request.grade, subject = %request.subject, "Generating lesson plan");

    generator.generate(&request).await.map_err(|e| {
        warn!(error = %e, "Lesson plan generation failed");
        ServerFnError::<NoCustomError>::ServerError(e.to_string())
    })
}

/// The text to show the user for a failed server call.
pub fn failure_message(err: ServerFnError<NoCustomError>) -> String {
    match err {
        ServerFnError::ServerError(message) => message,
        other => other.to_string(),
    }
}
