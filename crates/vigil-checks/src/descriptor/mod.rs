//! Check descriptors and the capability they expose.
//!
//! A plugin describes each of its checks with a [`CheckDescriptor`] built once
//! at load time. The descriptor is immutable and shared as an
//! `Arc<CheckDescriptor>`; the core compares descriptors by `Arc` identity,
//! never by name, because names and aliases are not required to be unique.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::error::CheckError;
use crate::owner::PluginOwner;

/// Version of the check ABI understood by this host.
pub const CHECK_API_VERSION: u32 = 1;

/// Maximum length in bytes of a check name or alias.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum length in bytes of a check category.
pub const MAX_CATEGORY_LEN: usize = 64;

/// Text sink a check writes its report section into.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    text: String,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Appends `text` followed by a newline.
    pub fn line(&mut self, text: &str) {
        self.text.push_str(text);
        self.text.push('\n');
    }

    /// Returns the accumulated text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Returns `true` when nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consumes the report, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Write for Report {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        self.text.push_str(text);
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.text)
    }
}

/// Failure reported by a check's own logic.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CheckFailure {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CheckFailure {
    /// Builds a failure without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a failure that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable message describing the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Capability to produce one report section.
///
/// Implementations are foreign to the core: they may block, log, or call
/// back into the registry. The core never invokes them while holding one of
/// its locks.
#[cfg_attr(test, mockall::automock)]
pub trait Check: Send + Sync {
    /// Writes this check's findings into `report`.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckFailure`] when the check could not complete.
    fn run(&self, report: &mut Report) -> Result<(), CheckFailure>;
}

impl<F> Check for F
where
    F: Fn(&mut Report) -> Result<(), CheckFailure> + Send + Sync,
{
    fn run(&self, report: &mut Report) -> Result<(), CheckFailure> {
        self(report)
    }
}

/// Immutable description of one check and the plugin that contributed it.
pub struct CheckDescriptor {
    name: String,
    alias: String,
    category: String,
    api_version: u32,
    owner: PluginOwner,
    check: Box<dyn Check>,
}

impl CheckDescriptor {
    /// Starts building a descriptor for `check`, owned by `owner`.
    ///
    /// # Example
    ///
    /// ```
    /// use vigil_checks::{CheckDescriptor, CheckFailure, PluginOwner, Report};
    ///
    /// let owner = PluginOwner::new("plugina");
    /// let descriptor = CheckDescriptor::builder("plugina", owner, |report: &mut Report| {
    ///     report.line("hello");
    ///     Ok::<(), CheckFailure>(())
    /// })
    /// .alias("a")
    /// .category("sample")
    /// .build()
    /// .expect("valid descriptor");
    /// assert!(descriptor.matches("a"));
    /// assert!(descriptor.matches("plugina"));
    /// ```
    #[must_use]
    pub fn builder(
        name: impl Into<String>,
        owner: PluginOwner,
        check: impl Check + 'static,
    ) -> CheckDescriptorBuilder {
        CheckDescriptorBuilder {
            name: name.into(),
            alias: None,
            category: String::new(),
            api_version: CHECK_API_VERSION,
            owner,
            check: Box::new(check),
        }
    }

    /// Unique display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Lookup alias; equals the name unless set explicitly.
    #[must_use]
    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }

    /// Free-text category.
    #[must_use]
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// ABI version the plugin was built against.
    #[must_use]
    pub const fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Lifetime controller of the contributing plugin.
    #[must_use]
    pub const fn owner(&self) -> &PluginOwner {
        &self.owner
    }

    /// Returns `true` when `token` equals the name or the alias.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.alias == token
    }

    /// Invokes the check.
    ///
    /// # Errors
    ///
    /// Propagates the [`CheckFailure`] returned by the check.
    pub fn run(&self, report: &mut Report) -> Result<(), CheckFailure> {
        self.check.run(report)
    }
}

impl fmt::Debug for CheckDescriptor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CheckDescriptor")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("category", &self.category)
            .field("api_version", &self.api_version)
            .field("owner", &self.owner.name())
            .finish_non_exhaustive()
    }
}

/// Builder returned by [`CheckDescriptor::builder`].
pub struct CheckDescriptorBuilder {
    name: String,
    alias: Option<String>,
    category: String,
    api_version: u32,
    owner: PluginOwner,
    check: Box<dyn Check>,
}

impl CheckDescriptorBuilder {
    /// Sets the lookup alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Overrides the ABI version the plugin declares.
    #[must_use]
    pub const fn api_version(mut self, version: u32) -> Self {
        self.api_version = version;
        self
    }

    /// Validates the fields and produces the shared descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidArgument`] when the name or alias is
    /// empty, too long, or contains separator characters, when the category
    /// is too long, or when the ABI version is not [`CHECK_API_VERSION`].
    pub fn build(self) -> Result<Arc<CheckDescriptor>, CheckError> {
        let alias = self.alias.unwrap_or_else(|| self.name.clone());
        validate_identifier("name", &self.name)?;
        validate_identifier("alias", &alias)?;
        if self.category.len() > MAX_CATEGORY_LEN {
            return Err(CheckError::invalid_argument(format!(
                "category exceeds {MAX_CATEGORY_LEN} bytes"
            )));
        }
        if self.api_version != CHECK_API_VERSION {
            return Err(CheckError::invalid_argument(format!(
                "check '{}' targets API version {}, host supports {CHECK_API_VERSION}",
                self.name, self.api_version
            )));
        }
        Ok(Arc::new(CheckDescriptor {
            name: self.name,
            alias,
            category: self.category,
            api_version: self.api_version,
            owner: self.owner,
            check: self.check,
        }))
    }
}

impl fmt::Debug for CheckDescriptorBuilder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CheckDescriptorBuilder")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("category", &self.category)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

fn validate_identifier(field: &str, value: &str) -> Result<(), CheckError> {
    if value.is_empty() {
        return Err(CheckError::invalid_argument(format!(
            "{field} must not be empty"
        )));
    }
    if value.len() > MAX_NAME_LEN {
        return Err(CheckError::invalid_argument(format!(
            "{field} '{value}' exceeds {MAX_NAME_LEN} bytes"
        )));
    }
    // Separators would make the check unreachable through the tokenising
    // control surface.
    if value.chars().any(|c| c.is_whitespace() || c == ',') {
        return Err(CheckError::invalid_argument(format!(
            "{field} '{value}' contains whitespace or commas"
        )));
    }
    Ok(())
}
