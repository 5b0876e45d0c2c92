//! Output formatting for fusion runs and tutor answers

pub mod console;
pub mod formatter;
