//! Engine configuration.

use reportgrid_proto::DEFAULT_PAGE_SIZE;

use crate::error::Error;

/// Configuration for the report engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Key of the single implicit group used when no group fields are set.
    pub root_label: String,

    /// Reject operators that are illegal for a field's type when a catalog
    /// is attached.
    pub validate_operators: bool,

    /// Reject references to fields missing from the catalog. When false,
    /// unknown fields are logged and evaluated as null.
    pub strict_fields: bool,

    /// Page size used when a report does not set one.
    pub default_page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_label: "All Data".to_string(),
            validate_operators: true,
            strict_fields: false,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root group label.
    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Enable or disable operator validation.
    pub fn validate_operators(mut self, validate: bool) -> Self {
        self.validate_operators = validate;
        self
    }

    /// Enable or disable strict field checking.
    pub fn strict_fields(mut self, strict: bool) -> Self {
        self.strict_fields = strict;
        self
    }

    /// Set the default page size.
    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.default_page_size == 0 {
            return Err(Error::InvalidConfig("default_page_size must be at least 1".into()));
        }
        if self.root_label.is_empty() {
            return Err(Error::InvalidConfig("root_label must not be empty".into()));
        }
        Ok(())
    }
}
