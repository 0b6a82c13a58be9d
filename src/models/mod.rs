mod command;
mod flag;
mod outcome;

pub use command::{CommandContext, CommandLogEntry, CommandStatus};
pub use flag::FlagRecord;
pub use outcome::OutcomeRecord;
