//! Pre- and post-processor command sets.
//!
//! Each facade fixes an operation-category prefix (`i` or `o`) and forwards
//! to [`Session::call`]. Whether a command also carries the domain prefix is
//! fixed per command, see [`Scope`].

mod geometry;
mod post;
mod pre;

pub use geometry::*;
pub use post::*;
pub use pre::*;

use crate::error::Result;
use crate::protocol::{Arg, Response};
use crate::session::Session;
use crate::transport::Transport;

/// Operation category of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Preprocessor,
    Postprocessor,
}

impl Category {
    pub const fn prefix(self) -> &'static str {
        match self {
            Category::Preprocessor => "i",
            Category::Postprocessor => "o",
        }
    }
}

/// Which prefixes a command carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Domain and category, e.g. `mi_close()`
    Domain,
    /// Category only, e.g. `i_deleteselected()`
    Category,
}

/// Session borrowed under a fixed category prefix
pub(crate) struct CategoryApi<'s, T: Transport> {
    session: &'s mut Session<T>,
    category: Category,
}

impl<'s, T: Transport> CategoryApi<'s, T> {
    pub(crate) fn new(session: &'s mut Session<T>, category: Category) -> Self {
        Self { session, category }
    }

    pub(crate) fn call(&mut self, scope: Scope, name: &str, args: &[Arg]) -> Result<Response> {
        let name = format!("{}_{}", self.category.prefix(), name);
        self.session.call(&name, args, scope == Scope::Domain)
    }

    /// Domain-scoped call with arguments
    pub(crate) fn call_with_args(&mut self, name: &str, args: &[Arg]) -> Result<Response> {
        self.call(Scope::Domain, name, args)
    }
}
