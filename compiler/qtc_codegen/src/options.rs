//! Compilation settings.

/// Package used when the caller does not name one.
pub const DEFAULT_PACKAGE: &str = "templates";

/// Settings for compiling one template document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Go package clause of the generated file.
    pub package_name: String,
    /// Precede every generated statement with a `//line file:N` directive
    /// pointing back at the template.
    pub line_comments: bool,
}

impl CompileOptions {
    pub fn new(package_name: impl Into<String>) -> Self {
        CompileOptions {
            package_name: package_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_line_comments(mut self, enabled: bool) -> Self {
        self.line_comments = enabled;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            package_name: DEFAULT_PACKAGE.to_string(),
            line_comments: true,
        }
    }
}
