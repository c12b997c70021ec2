use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use crate::pages::home::HomePage;
use crate::pages::lesson_planner::LessonPlannerPage;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/lessonplan-web.css"/>
        <Title text="Lesson Plan Generator"/>
        <Router>
            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("/") view=HomePage/>
                    <Route path=path!("/lessonplanner") view=LessonPlannerPage/>
                </Routes>
            </main>
        </Router>
    }
}
