//! Purpose: Hold the knobs that shape input normalization and the default catalog.
//! Exports: `DecoderConfig`.
//! Role: Explicit configuration passed to the catalog builder and the engine.
//! Invariants: Defaults match the CLI defaults (`@` prefix, `,` separator, from-file on).

pub const DEFAULT_ITEM_SEP: &str = ",";
pub const DEFAULT_FILE_PREFIX: char = '@';

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecoderConfig {
    /// Allow `@path` inputs to be replaced by file contents.
    pub from_file: bool,
    pub file_prefix: char,
    pub item_sep: String,
    /// Let numeric leaves evaluate arithmetic expressions.
    pub allow_expressions: bool,
    pub bool_case_sensitive: bool,
    /// Decode `Constructed` records; off because construction may run arbitrary code.
    pub allow_constructed: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            from_file: true,
            file_prefix: DEFAULT_FILE_PREFIX,
            item_sep: DEFAULT_ITEM_SEP.to_string(),
            allow_expressions: true,
            bool_case_sensitive: false,
            allow_constructed: false,
        }
    }
}

impl DecoderConfig {
    pub fn with_from_file(mut self, from_file: bool) -> Self {
        self.from_file = from_file;
        self
    }

    pub fn with_file_prefix(mut self, prefix: char) -> Self {
        self.file_prefix = prefix;
        self
    }

    pub fn with_item_sep(mut self, sep: impl Into<String>) -> Self {
        self.item_sep = sep.into();
        self
    }

    pub fn with_expressions(mut self, allow: bool) -> Self {
        self.allow_expressions = allow;
        self
    }

    pub fn with_bool_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.bool_case_sensitive = case_sensitive;
        self
    }

    pub fn with_constructed(mut self, allow: bool) -> Self {
        self.allow_constructed = allow;
        self
    }

    /// Path named by a file reference, when from-file mode applies to `input`.
    pub fn file_reference<'a>(&self, input: &'a str) -> Option<&'a str> {
        if !self.from_file {
            return None;
        }
        input.strip_prefix(self.file_prefix)
    }
}
