/// Interactive editor state and control flow.
pub mod editor;
