//! Application services
//!
//! Backend selection and access for the desktop application.

mod backend;

pub use backend::NotesBackend;
