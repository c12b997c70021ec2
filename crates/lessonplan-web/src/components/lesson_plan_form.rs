use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::collector::{CollectorState, Field};
use crate::components::lesson_plan_table::LessonPlanTableView;
use crate::server::generate::{failure_message, generate_lesson_plan};

/// The four-field form, its submit button, and the result area below it.
///
/// All local state lives in one `CollectorState` signal; see `collector` for
/// the allowed transitions.
#[component]
pub fn LessonPlanForm() -> impl IntoView {
    let state = RwSignal::new(CollectorState::default());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let mut request = None;
        state.update(|s| request = s.begin_submit());
        let Some(request) = request else {
            return;
        };

        spawn_local(async move {
            let outcome = generate_lesson_plan(
                request.topic,
                request.grade,
                request.subject,
                request.sub_units,
            )
            .await
            .map_err(failure_message);
            state.update(|s| s.finish(outcome));
        });
    };

    let inputs = Field::ALL
        .into_iter()
        .map(|field| {
            view! {
                <div class="form-field">
                    <label class="form-label">{field.label()}</label>
                    <input
                        type="text"
                        class="form-input"
                        required
                        prop:value=move || state.with(|s| s.value(field).to_string())
                        on:input=move |ev| state.update(|s| s.set(field, event_target_value(&ev)))
                    />
                </div>
            }
        })
        .collect_view();

    view! {
        <form class="lesson-plan-form" on:submit=on_submit>
            {inputs}
            <button
                type="submit"
                class="submit-button"
                disabled=move || state.with(|s| s.is_busy())
            >
                {move || state.with(|s| s.submit_label())}
            </button>
        </form>

        {move || {
            state.with(|s| s.error().map(str::to_string)).map(|message| {
                view! { <p class="error-message">{message}</p> }
            })
        }}

        {move || {
            state.with(|s| s.table().cloned()).map(|table| {
                view! { <LessonPlanTableView table=table/> }
            })
        }}
    }
}
