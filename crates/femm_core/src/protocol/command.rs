//! Outbound half of the codec: rendering a command name and its arguments
//! into the call expression the engine evaluates.

use std::fmt;

/// Token sent for an absent argument
pub const NONE_TOKEN: &str = "<None>";

/// A single positional argument of an engine command
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Rendered double-quoted; the value must not contain `"`
    Str(String),
    /// Rendered as `1` / `0`
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Rendered as the quoted `<None>` sentinel
    Null,
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => write!(f, "\"{s}\""),
            Arg::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            Arg::Int(i) => write!(f, "{i}"),
            // Debug keeps the fractional part (`3.0`) and round-trips exactly
            Arg::Float(x) => write!(f, "{x:?}"),
            Arg::Null => write!(f, "\"{NONE_TOKEN}\""),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Str(value.clone())
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::Float(f64::from(value))
    }
}

macro_rules! int_arg {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg::Int(i64::from(value))
                }
            }
        )*
    };
}

int_arg!(i8, i16, i32, i64, u8, u16, u32);

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        Arg::Int(value as i64)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::Null, Into::into)
    }
}

/// A command name plus its ordered arguments.
///
/// Renders as `name(arg1, arg2, ...)`; a command without arguments still
/// renders its parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    args: Vec<Arg>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Prepend a prefix to the command name
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.name.insert_str(0, prefix);
        self
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// Render `name(args...)` as sent to the engine
pub fn encode(name: &str, args: &[Arg]) -> String {
    Command::with_args(name, args.to_vec()).to_string()
}
