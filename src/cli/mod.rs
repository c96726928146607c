//! CLI module - argument parsing, prompts and the booking form

mod args;
mod form;
mod prompts;

pub use args::*;
pub use form::*;
pub use prompts::*;
