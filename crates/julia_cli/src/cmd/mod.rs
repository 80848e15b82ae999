/// Flat payload decode command.
pub mod decode;
/// CLI error type.
pub mod error;
/// Label/code translation commands.
pub mod map;
/// Schema-directed parse command.
pub mod parse;
/// Indented text rendering of raw and parsed values.
pub mod print;
/// Schema path lookup command.
pub mod resolve;
/// Shared argument and IO helpers.
pub mod util;

pub use error::{CliError, Result};
