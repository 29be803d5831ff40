//! GraphQL documents for the managed notes schema.

pub const LIST_NOTES: &str = r"query ListNotes {
  listNotes {
    items {
      id
      note
    }
  }
}";

pub const CREATE_NOTE: &str = r"mutation CreateNote($input: CreateNoteInput!) {
  createNote(input: $input) {
    id
    note
  }
}";

pub const UPDATE_NOTE: &str = r"mutation UpdateNote($input: UpdateNoteInput!) {
  updateNote(input: $input) {
    id
    note
  }
}";

pub const DELETE_NOTE: &str = r"mutation DeleteNote($input: DeleteNoteInput!) {
  deleteNote(input: $input) {
    id
  }
}";

pub const ON_CREATE_NOTE: &str = r"subscription OnCreateNote {
  onCreateNote {
    id
    note
  }
}";

pub const ON_UPDATE_NOTE: &str = r"subscription OnUpdateNote {
  onUpdateNote {
    id
    note
  }
}";

pub const ON_DELETE_NOTE: &str = r"subscription OnDeleteNote {
  onDeleteNote {
    id
  }
}";
