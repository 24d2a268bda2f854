//! Line-oriented operator session.
//!
//! Each input line is one command. Every reply ends with a status line:
//! `ok` (followed by the number of bytes consumed for endpoint writes) or
//! `error <errno>: <message>`. Listings print their body before the status
//! line.
//!
//! | Command | Effect |
//! |---|---|
//! | `<endpoint> [payload]` | Reads or writes a control endpoint |
//! | `plugins` | Lists loaded plugins with check and pin counts |
//! | `load <plugin>` | Loads a sample plugin |
//! | `unload <plugin>` | Unloads a plugin unless its checks are pinned |
//! | `help` | Lists the commands |
//! | `quit` | Ends the session |

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;
use vigil_control::{Access, ControlError, Endpoint};

use crate::host::{Host, HostError};

const SESSION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::session");

const HELP: &str = "\
available | selected | results     read a listing
add <checks> | remove <checks>     select or deselect checks
empty | addall                     clear or fill the selection
plugins                            list loaded plugins
load <plugin> | unload <plugin>    load or unload a sample plugin
help | quit
";

/// Errors that end a session early.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading a command or writing a reply failed.
    #[error("session I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command<'line> {
    Read(Endpoint),
    Write(Endpoint, &'line str),
    Plugins,
    Load(&'line str),
    Unload(&'line str),
    Help,
    Quit,
}

impl<'line> Command<'line> {
    fn parse(line: &'line str) -> Result<Self, ControlError> {
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));
        match word.to_ascii_lowercase().as_str() {
            "plugins" => Ok(Self::Plugins),
            "load" => Ok(Self::Load(rest)),
            "unload" => Ok(Self::Unload(rest)),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => {
                let endpoint = Endpoint::parse(word)?;
                Ok(match endpoint.access() {
                    Access::Read => Self::Read(endpoint),
                    Access::Write => Self::Write(endpoint, rest),
                })
            }
        }
    }
}

enum Flow {
    Continue,
    Stop,
}

/// Operator session bound to one [`Host`].
#[derive(Debug, Clone, Copy)]
pub struct Session<'host> {
    host: &'host Host,
}

impl<'host> Session<'host> {
    /// Creates a session over `host`.
    #[must_use]
    pub const fn new(host: &'host Host) -> Self {
        Self { host }
    }

    /// Answers commands from `input` on `output` until `quit` or end of
    /// input.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] when reading or writing fails.
    pub fn run<R, W>(&self, input: R, mut output: W) -> Result<(), SessionError>
    where
        R: BufRead,
        W: Write,
    {
        for read in input.lines() {
            let line = read?;
            let command = line.trim();
            if command.is_empty() {
                continue;
            }
            let flow = self.respond(command, &mut output)?;
            output.flush()?;
            if matches!(flow, Flow::Stop) {
                break;
            }
        }
        debug!(target: SESSION_TARGET, "session ended");
        Ok(())
    }

    fn respond<W: Write>(&self, line: &str, output: &mut W) -> io::Result<Flow> {
        debug!(target: SESSION_TARGET, command = line, "command received");
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(error) => {
                write_error(output, error.errno(), &error)?;
                return Ok(Flow::Continue);
            }
        };
        match command {
            Command::Read(endpoint) => match self.host.control().read(endpoint) {
                Ok(body) => {
                    output.write_all(body.as_bytes())?;
                    writeln!(output, "ok")?;
                }
                Err(error) => write_error(output, error.errno(), &error)?,
            },
            Command::Write(endpoint, payload) => {
                match self.host.control().write(endpoint, payload.as_bytes()) {
                    Ok(consumed) => writeln!(output, "ok {consumed}")?,
                    Err(error) => write_error(output, error.errno(), &error)?,
                }
            }
            Command::Plugins => {
                for status in self.host.plugin_status() {
                    writeln!(
                        output,
                        "{} checks={} pins={}",
                        status.name, status.checks, status.pins
                    )?;
                }
                writeln!(output, "ok")?;
            }
            Command::Load(name) => plugin_reply(output, self.host.load_plugin(name))?,
            Command::Unload(name) => plugin_reply(output, self.host.unload_plugin(name))?,
            Command::Help => {
                output.write_all(HELP.as_bytes())?;
                writeln!(output, "ok")?;
            }
            Command::Quit => {
                writeln!(output, "ok")?;
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }
}

fn plugin_reply<W: Write>(output: &mut W, result: Result<(), HostError>) -> io::Result<()> {
    match result {
        Ok(()) => writeln!(output, "ok"),
        Err(error) => write_error(output, error.errno(), &error),
    }
}

fn write_error<W: Write>(
    output: &mut W,
    errno: i32,
    error: &dyn std::error::Error,
) -> io::Result<()> {
    writeln!(output, "error {errno}: {error}")
}
