pub mod args;
pub mod tail;

pub use args::Cli;
pub use tail::handle_tail_command;
