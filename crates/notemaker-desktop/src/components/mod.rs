//! UI Components
//!
//! Building blocks of the note list view.

mod note_card;
mod note_form;
mod note_list;
mod notice;

pub use note_card::NoteCard;
pub use note_form::NoteForm;
pub use note_list::NoteList;
pub use notice::NoticeBanner;
