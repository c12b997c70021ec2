use leptos::prelude::*;
use lessonplan_types::LessonPlanTable;

/// Header plus one row per lesson segment, in the order the service returned them.
#[component]
pub fn LessonPlanTableView(table: LessonPlanTable) -> impl IntoView {
    let header = table
        .header()
        .into_iter()
        .map(|title| view! { <th class="table-header-cell">{title}</th> })
        .collect_view();

    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            view! {
                <tr>
                    <td class="table-cell">{row.duration}</td>
                    <td class="table-cell">{row.guide}</td>
                    <td class="table-cell">{row.remarks}</td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="lesson-plan-table-wrapper">
            <table class="lesson-plan-table">
                <thead>
                    <tr>{header}</tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    }
}
