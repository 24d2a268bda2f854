//! Endpoint dispatch over a [`CheckHost`].

use tracing::{debug, warn};
use vigil_checks::{CheckError, CheckHost};

use crate::CONTROL_TARGET;
use crate::endpoint::Endpoint;
use crate::error::ControlError;
use crate::payload::{decode, tokens};

/// Operator-facing view of one [`CheckHost`].
#[derive(Debug, Clone, Copy)]
pub struct ControlSurface<'host> {
    host: &'host CheckHost,
}

impl<'host> ControlSurface<'host> {
    /// Creates a surface over `host`.
    #[must_use]
    pub const fn new(host: &'host CheckHost) -> Self {
        Self { host }
    }

    /// Renders a readable endpoint.
    ///
    /// Listings hold one entry per line; `results` runs the selected checks.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::NotReadable`] for write endpoints.
    pub fn read(&self, endpoint: Endpoint) -> Result<String, ControlError> {
        debug!(target: CONTROL_TARGET, endpoint = %endpoint, "endpoint read");
        match endpoint {
            Endpoint::Available => Ok(listing(self.host.available_aliases())),
            Endpoint::Selected => Ok(listing(self.host.selected_names())),
            Endpoint::Results => Ok(self.host.render_results()),
            Endpoint::Add | Endpoint::Remove | Endpoint::Empty | Endpoint::AddAll => {
                Err(ControlError::NotReadable { endpoint })
            }
        }
    }

    /// Applies `payload` to a writable endpoint and returns the number of
    /// bytes consumed.
    ///
    /// `add` and `remove` attempt every token even after a failure. `empty`
    /// and `addall` ignore the payload.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::NotWritable`] for listings, or the last
    /// [`CheckError`] encountered while applying the payload.
    pub fn write(&self, endpoint: Endpoint, payload: &[u8]) -> Result<usize, ControlError> {
        debug!(
            target: CONTROL_TARGET,
            endpoint = %endpoint,
            bytes = payload.len(),
            "endpoint written"
        );
        match endpoint {
            Endpoint::Available | Endpoint::Selected | Endpoint::Results => {
                Err(ControlError::NotWritable { endpoint })
            }
            Endpoint::Add => apply_tokens(endpoint, payload, |token| self.host.select(token)),
            Endpoint::Remove => apply_tokens(endpoint, payload, |token| self.host.remove(token)),
            Endpoint::Empty => {
                self.host.empty();
                Ok(payload.len())
            }
            Endpoint::AddAll => {
                self.host.select_all()?;
                Ok(payload.len())
            }
        }
    }

    /// Parses `name` and reads that endpoint.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::parse`] and [`ControlSurface::read`].
    pub fn read_named(&self, name: &str) -> Result<String, ControlError> {
        self.read(Endpoint::parse(name)?)
    }

    /// Parses `name` and writes `payload` to that endpoint.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::parse`] and [`ControlSurface::write`].
    pub fn write_named(&self, name: &str, payload: &[u8]) -> Result<usize, ControlError> {
        self.write(Endpoint::parse(name)?, payload)
    }
}

fn listing(entries: Vec<String>) -> String {
    entries.into_iter().fold(String::new(), |mut text, entry| {
        text.push_str(&entry);
        text.push('\n');
        text
    })
}

fn apply_tokens<F>(endpoint: Endpoint, payload: &[u8], mut apply: F) -> Result<usize, ControlError>
where
    F: FnMut(&str) -> Result<(), CheckError>,
{
    let text = decode(payload)?;
    let mut last_error = None;
    for token in tokens(text) {
        if let Err(error) = apply(token) {
            warn!(
                target: CONTROL_TARGET,
                endpoint = %endpoint,
                token,
                error = %error,
                "token rejected"
            );
            last_error = Some(error);
        }
    }
    last_error.map_or(Ok(payload.len()), |error| Err(error.into()))
}
