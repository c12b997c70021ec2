use leptos::prelude::*;

use crate::components::lesson_plan_form::LessonPlanForm;

#[component]
pub fn LessonPlannerPage() -> impl IntoView {
    view! {
        <div class="page">
            <div class="card">
                <h2 class="card-title">"Lesson Plan Generator"</h2>
                <LessonPlanForm/>
            </div>
        </div>
    }
}
