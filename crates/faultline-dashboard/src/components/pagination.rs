//! Page navigation under the table

use dioxus::prelude::*;

#[component]
pub fn Pagination(page: u32, total_pages: u32, total: u64, on_page: EventHandler<u32>) -> Element {
    let has_prev = page > 1;
    let has_next = page < total_pages;

    rsx! {
        div { class: "pagination",
            span { class: "pagination-total", "{total} entries" }
            div { class: "pagination-controls",
                button {
                    class: "btn btn-secondary",
                    disabled: !has_prev,
                    onclick: move |_| on_page.call(1),
                    "«"
                }
                button {
                    class: "btn btn-secondary",
                    disabled: !has_prev,
                    onclick: move |_| on_page.call(page.saturating_sub(1)),
                    "‹ Prev"
                }
                span { class: "pagination-position", "Page {page} of {total_pages}" }
                button {
                    class: "btn btn-secondary",
                    disabled: !has_next,
                    onclick: move |_| on_page.call(page + 1),
                    "Next ›"
                }
                button {
                    class: "btn btn-secondary",
                    disabled: !has_next,
                    onclick: move |_| on_page.call(total_pages),
                    "»"
                }
            }
        }
    }
}
