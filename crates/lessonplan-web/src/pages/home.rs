use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="page">
            <div class="card">
                <h1 class="card-title">"Lesson Plan Generator"</h1>
                <p class="card-text">
                    "Describe a topic, grade, subject and its sub-units to get a timed lesson plan."
                </p>
                <a href="/lessonplanner" class="primary-link">"Open the planner"</a>
            </div>
        </div>
    }
}
