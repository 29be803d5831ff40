//! Failure banners

use dioxus::prelude::*;

use crate::state::AppState;

/// Shows the transient notice and, when loading failed, a retry affordance.
#[component]
pub fn NoticeBanner() -> Element {
    let mut state = use_context::<AppState>();
    let notice = (state.notice)();
    let load_error = (state.load_error)();

    rsx! {
        if let Some(message) = notice {
            div {
                class: "notice",
                role: "status",
                style: "
                    margin-bottom: 12px;
                    padding: 8px 12px;
                    border-radius: 4px;
                    background: #fff4d6;
                    color: #6b4f00;
                ",
                "{message}"
            }
        }

        if let Some(message) = load_error {
            div {
                class: "load-error",
                role: "alert",
                style: "
                    display: flex;
                    gap: 12px;
                    align-items: center;
                    margin-bottom: 12px;
                    padding: 8px 12px;
                    border-radius: 4px;
                    background: #fde2e2;
                    color: #7f1d1d;
                ",
                span { "{message}" }
                button {
                    style: "cursor: pointer;",
                    onclick: move |_| state.retry_load(),
                    "Retry"
                }
            }
        }
    }
}
