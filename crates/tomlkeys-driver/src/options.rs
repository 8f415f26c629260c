//! Parse configuration.

use tomlkeys_tree::KeyName;

/// Settings of one parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Name every produced key lives below.
    pub root: KeyName,
    /// Source name used in diagnostics.
    pub filename: Option<String>,
    /// Largest number of elements accepted in a single array.
    pub max_array_elements: usize,
}

impl Options {
    /// Options for a parse below `root`.
    pub fn new(root: impl Into<KeyName>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_max_array_elements(mut self, max: usize) -> Self {
        self.max_array_elements = max;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            root: KeyName::parse("user:/"),
            filename: None,
            max_array_elements: usize::MAX,
        }
    }
}
