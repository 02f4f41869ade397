//! A live connection to the engine plus the active problem domain.

use std::path::Path;

use crate::api::{Postprocessor, Preprocessor};
use crate::doctype::{Doctype, IntoDoctype};
use crate::error::{FemmError, Result};
use crate::protocol::{Arg, Command, Response, decode};
use crate::transport::Transport;

/// Owns one engine connection and the domain of the current document.
///
/// Every command goes through [`Session::call_raw`]. Commands are not
/// idempotent on the engine side: sending `addnode` twice adds two nodes.
/// A session is used by a single worker and is never shared.
pub struct Session<T: Transport> {
    transport: T,
    doctype: Option<Doctype>,
}

impl<T: Transport> Session<T> {
    /// Wrap a transport without sending anything
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            doctype: None,
        }
    }

    /// Wrap a transport and point the engine at `dir` (or our current
    /// directory)
    pub fn open(transport: T, dir: Option<&Path>) -> Result<Self> {
        let mut session = Self::new(transport);
        session.set_current_directory(dir)?;
        Ok(session)
    }

    /// Send `command` verbatim and decode the reply
    pub fn call_raw(&mut self, command: &str) -> Result<Response> {
        tracing::trace!(command, "-> engine");
        let reply = self.transport.exchange(command)?;
        tracing::trace!(reply = %reply, "<- engine");
        decode(&reply)
    }

    /// Encode `name(args...)` and send it, prefixing the domain letter when
    /// `with_doctype_prefix` is set
    pub fn call(
        &mut self,
        name: &str,
        args: &[Arg],
        with_doctype_prefix: bool,
    ) -> Result<Response> {
        let mut command = Command::with_args(name, args.to_vec());
        if with_doctype_prefix {
            let prefix = self.doctype_prefix()?.to_string();
            command = command.prefixed(&prefix);
        }
        self.call_raw(&command.to_string())
    }

    pub fn set_current_directory(&mut self, path: Option<&Path>) -> Result<()> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let fixed = fix_path(&path.to_string_lossy());
        self.call("setcurrentdirectory", &[Arg::Str(fixed)], false)?;
        Ok(())
    }

    /// Create a document for `doctype` and make it the active domain
    pub fn new_document(&mut self, doctype: impl IntoDoctype) -> Result<()> {
        let doctype = doctype.into_doctype()?;
        self.call("newdocument", &[Arg::from(doctype.code())], false)?;
        self.set_mode(doctype);
        tracing::debug!(%doctype, "document created");
        Ok(())
    }

    /// Ask the engine to close its documents and exit
    pub fn quit(&mut self) -> Result<()> {
        self.call("quit", &[], false)?;
        Ok(())
    }

    pub fn set_mode(&mut self, doctype: Doctype) {
        self.doctype = Some(doctype);
    }

    /// The active domain; an error before any document exists
    pub fn mode(&self) -> Result<Doctype> {
        self.doctype.ok_or(FemmError::ModeUnset)
    }

    pub fn doctype_prefix(&self) -> Result<char> {
        self.mode().map(Doctype::prefix)
    }

    pub fn pre(&mut self) -> Preprocessor<'_, T> {
        Preprocessor::new(self)
    }

    pub fn post(&mut self) -> Postprocessor<'_, T> {
        Postprocessor::new(self)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// Replace `\` and `//` with a single forward slash
pub fn fix_path(path: &str) -> String {
    path.replace('\\', "/").replace("//", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_path() {
        assert_eq!(fix_path(r"C:\work\motor"), "C:/work/motor");
        assert_eq!(fix_path("C://work//motor"), "C:/work/motor");
        assert_eq!(fix_path(r"C:\\work"), "C:/work");
    }
}
