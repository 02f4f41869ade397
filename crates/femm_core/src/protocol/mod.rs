//! Textual command protocol spoken with the engine.
//!
//! Outbound messages are call expressions such as `mi_addnode(1.5, -2.25)`;
//! inbound messages are literals, an empty string, or an error sentinel.
//! Quoting, the `<None>` token and boolean coercion are fixed by the engine
//! and must be reproduced exactly.

mod command;
mod literal;
mod response;

pub use command::*;
pub use literal::*;
pub use response::*;
