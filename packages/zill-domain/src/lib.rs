pub mod note_text;
pub mod validation;
