//! Endpoint names and their access direction.

use std::fmt;

use crate::error::ControlError;

/// Direction in which an endpoint may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The endpoint renders a listing.
    Read,
    /// The endpoint accepts a payload.
    Write,
}

/// Known control endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Aliases of every available check.
    Available,
    /// Names of every selected check.
    Selected,
    /// Report produced by running the selected checks.
    Results,
    /// Selects the checks named in the payload.
    Add,
    /// Deselects the checks named in the payload.
    Remove,
    /// Clears the selection.
    Empty,
    /// Selects every available check.
    AddAll,
}

impl Endpoint {
    /// Every endpoint, listings first.
    pub const ALL: [Self; 7] = [
        Self::Available,
        Self::Selected,
        Self::Results,
        Self::Add,
        Self::Remove,
        Self::Empty,
        Self::AddAll,
    ];

    /// Parses an endpoint name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::UnknownEndpoint`] if the value does not match
    /// any known endpoint.
    pub fn parse(value: &str) -> Result<Self, ControlError> {
        match value.to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "selected" => Ok(Self::Selected),
            "results" => Ok(Self::Results),
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "empty" => Ok(Self::Empty),
            "addall" => Ok(Self::AddAll),
            _ => Err(ControlError::UnknownEndpoint {
                endpoint: value.to_owned(),
            }),
        }
    }

    /// Returns the canonical endpoint name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Selected => "selected",
            Self::Results => "results",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Empty => "empty",
            Self::AddAll => "addall",
        }
    }

    /// Returns whether the endpoint is read or written.
    #[must_use]
    pub const fn access(self) -> Access {
        match self {
            Self::Available | Self::Selected | Self::Results => Access::Read,
            Self::Add | Self::Remove | Self::Empty | Self::AddAll => Access::Write,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
