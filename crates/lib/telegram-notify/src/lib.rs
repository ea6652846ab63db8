//! Best-effort chat notifications via the Telegram Bot API.

mod notifier;
mod token;

pub use notifier::*;
pub use token::*;
