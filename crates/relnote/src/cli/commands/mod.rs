//! CLI commands

mod completions;
mod done;
mod init;
mod list;
mod new;

pub use completions::CompletionsCommand;
pub use done::DoneCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use new::NewCommand;
