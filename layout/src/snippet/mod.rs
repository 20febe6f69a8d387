//! Dependency declaration snippets for the tools which consume each layout.
//!
//! Formatters are keyed by `(layout alias, formatter alias)`, e.g.
//! `("Maven 2", "gradle")`. Snippets are byte stable: the same coordinates
//! always produce the same text, terminated by a newline.

use std::fmt;
use std::sync::Arc;

use provider_registry::ProviderRegistry;

use crate::coordinates::ArtifactCoordinates;
use crate::error::{CoordinatesMismatch, DuplicateProvider, ProviderNotFound};

mod maven;
mod npm;
mod nuget;

pub use self::maven::{
    GradleDependencyFormatter, IvyDependencyFormatter, LeiningenDependencyFormatter,
    MavenDependencyFormatter, SbtDependencyFormatter,
};
pub use self::npm::{NpmDependencyFormatter, YarnDependencyFormatter};
pub use self::nuget::{NugetDependencyFormatter, PaketDependencyFormatter};

/// Produces the declaration a build tool needs to depend on an artifact.
pub trait DependencySynonymFormatter: fmt::Debug + Send + Sync {
    /// Alias of the layout whose coordinates this formatter understands.
    fn layout(&self) -> &'static str;

    /// Name of the consuming tool, e.g. `gradle`.
    fn alias(&self) -> &'static str;

    /// Render the snippet. Fails for coordinates of another layout.
    fn dependency_snippet(
        &self,
        coordinates: &ArtifactCoordinates,
    ) -> Result<String, CoordinatesMismatch>;
}

pub(crate) fn mismatch(expected: &'static str, coordinates: &ArtifactCoordinates) -> CoordinatesMismatch {
    CoordinatesMismatch {
        expected: expected.to_owned(),
        actual: coordinates.layout(),
    }
}

/// Escape a value for use inside a double quoted string literal of a build script.
pub(crate) fn quote_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape a value for use inside XML text or a double quoted attribute.
pub(crate) fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Dependency formatters keyed by layout alias and formatter alias.
pub struct DependencyFormatRegistry {
    inner: ProviderRegistry<String, String, dyn DependencySynonymFormatter>,
}

impl fmt::Debug for DependencyFormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl Default for DependencyFormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyFormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            inner: ProviderRegistry::new("dependency formatter"),
        }
    }

    /// A registry holding every built-in formatter.
    pub fn builtin() -> Self {
        let registry = Self::new();
        let formatters: [Arc<dyn DependencySynonymFormatter>; 9] = [
            Arc::new(MavenDependencyFormatter),
            Arc::new(GradleDependencyFormatter),
            Arc::new(IvyDependencyFormatter),
            Arc::new(SbtDependencyFormatter),
            Arc::new(LeiningenDependencyFormatter),
            Arc::new(NugetDependencyFormatter),
            Arc::new(PaketDependencyFormatter),
            Arc::new(NpmDependencyFormatter),
            Arc::new(YarnDependencyFormatter),
        ];
        for formatter in formatters {
            registry.register_or_replace(formatter);
        }
        registry
    }

    /// Register a formatter under its layout and alias, refusing to shadow an existing one.
    pub fn register(
        &self,
        formatter: Arc<dyn DependencySynonymFormatter>,
    ) -> Result<(), DuplicateProvider> {
        self.inner.register(
            formatter.layout().to_owned(),
            formatter.alias().to_owned(),
            formatter,
        )
    }

    /// Register a formatter, replacing any formatter under the same key.
    pub fn register_or_replace(
        &self,
        formatter: Arc<dyn DependencySynonymFormatter>,
    ) -> Option<Arc<dyn DependencySynonymFormatter>> {
        self.inner.register_or_replace(
            formatter.layout().to_owned(),
            formatter.alias().to_owned(),
            formatter,
        )
    }

    /// Remove a formatter.
    pub fn unregister(
        &self,
        layout: &str,
        alias: &str,
    ) -> Option<Arc<dyn DependencySynonymFormatter>> {
        self.inner.unregister(layout, alias)
    }

    /// Find the formatter for `(layout, alias)`.
    pub fn lookup(
        &self,
        layout: &str,
        alias: &str,
    ) -> Result<Arc<dyn DependencySynonymFormatter>, ProviderNotFound> {
        self.inner.lookup(layout, alias)
    }

    /// Is there a formatter for `(layout, alias)`?
    pub fn contains(&self, layout: &str, alias: &str) -> bool {
        self.inner.contains(layout, alias)
    }

    /// Aliases of the formatters available for a layout, sorted.
    pub fn aliases_for(&self, layout: &str) -> Vec<String> {
        self.inner
            .implementations_for(layout)
            .into_iter()
            .map(|(alias, _)| alias)
            .collect()
    }

    /// Number of registered formatters.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::{MAVEN2, NPM, NUGET};

    static_assertions::assert_impl_all!(DependencyFormatRegistry: Send, Sync);

    #[test]
    fn builtin_formatters_by_layout() {
        let registry = DependencyFormatRegistry::builtin();
        assert_eq!(registry.len(), 9);
        assert_eq!(
            registry.aliases_for(MAVEN2),
            ["gradle", "ivy", "leiningen", "maven", "sbt"]
        );
        assert_eq!(registry.aliases_for(NUGET), ["nuget", "paket"]);
        assert_eq!(registry.aliases_for(NPM), ["npm", "yarn"]);
        assert!(registry.aliases_for("unknown").is_empty());
    }

    #[test]
    fn lookup_misses_name_both_keys() {
        let registry = DependencyFormatRegistry::builtin();
        let err = registry.lookup(NUGET, "gradle").unwrap_err();
        assert_eq!(err.primary, NUGET);
        assert_eq!(err.secondary, "gradle");
        assert_eq!(
            err.to_string(),
            "no dependency formatter registered for 'NuGet' / 'gradle'"
        );
    }

    #[test]
    fn registration_conflicts() {
        let registry = DependencyFormatRegistry::builtin();
        let err = registry
            .register(Arc::new(NugetDependencyFormatter))
            .unwrap_err();
        assert_eq!(err.primary, NUGET);
        assert_eq!(err.secondary, "nuget");

        assert!(registry.unregister(NUGET, "paket").is_some());
        assert!(!registry.contains(NUGET, "paket"));
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn escapes_xml() {
        assert_eq!(xml_escape(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(quote_escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}
