//! Home view - main application screen

use dioxus::prelude::*;

use crate::components::{NoteForm, NoteList, NoticeBanner};

/// Home view component - the form above the note list
#[component]
pub fn Home() -> Element {
    rsx! {
        div {
            class: "home-container",
            style: "
                display: flex;
                flex-direction: column;
                align-items: center;
                padding: 16px;
            ",

            h1 {
                style: "font-family: monospace; font-size: 2rem; margin: 8px 0 16px 0;",
                "NoteMaker"
            }

            NoteForm {}
            NoticeBanner {}
            NoteList {}
        }
    }
}
