//! Template processor
//!
//! Resolves every placeholder of a template against the configured data
//! sources.

use indexmap::IndexMap;

use docmerge_domain::DomainError;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{SourceRegistry, TemplateScanner};
use crate::settings::ProcessorSettings;

use super::placeholder::Placeholder;

/// A resolved placeholder with the source that answered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlaceholder {
    /// The placeholder as written in the template.
    pub placeholder: String,
    /// Name of the data source that holds the variable.
    pub source: String,
    /// Variable name within that source.
    pub variable: String,
    /// The resolved value.
    pub value: String,
}

/// Result of resolving a template's placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateResolution {
    /// Template identifier or path.
    pub template: String,

    /// Placeholder → value, in first-discovery order.
    pub values: IndexMap<String, String>,

    /// Per-placeholder details, in the same order as `values`.
    pub resolved: Vec<ResolvedPlaceholder>,
}

impl TemplateResolution {
    fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
            values: IndexMap::new(),
            resolved: Vec::new(),
        }
    }

    fn push(&mut self, entry: ResolvedPlaceholder) {
        self.values
            .insert(entry.placeholder.clone(), entry.value.clone());
        self.resolved.push(entry);
    }

    /// Returns the value of a placeholder.
    #[must_use]
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.values.get(placeholder).map(String::as_str)
    }

    /// Returns the number of distinct placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the template had no placeholders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consumes the result, returning the placeholder → value map.
    #[must_use]
    pub fn into_values(self) -> IndexMap<String, String> {
        self.values
    }
}

/// Resolves template placeholders.
///
/// Unqualified placeholders are looked up in the constant source, qualified
/// ones (`source.name`) in the named source. Expression variables are
/// evaluated on first use and cached in the registry, so a processor reused
/// across templates sees values resolved by earlier runs.
pub struct TemplateProcessor<S, R> {
    scanner: S,
    registry: R,
    settings: ProcessorSettings,
}

impl<S: TemplateScanner, R: SourceRegistry> TemplateProcessor<S, R> {
    /// Creates a processor with default settings.
    pub fn new(scanner: S, registry: R) -> Self {
        Self {
            scanner,
            registry,
            settings: ProcessorSettings::default(),
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ProcessorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the settings.
    pub const fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    /// Returns the source registry.
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Consumes the processor, returning the source registry.
    pub fn into_registry(self) -> R {
        self.registry
    }

    /// Scans a template and resolves every placeholder it references.
    ///
    /// # Arguments
    /// * `template` - Template identifier or path, passed to the scanner
    ///
    /// # Errors
    /// Returns `ApplicationError::Scan` if the template cannot be scanned,
    /// otherwise the first placeholder failure. No partial result is returned.
    pub fn extract_variables(&mut self, template: &str) -> ApplicationResult<TemplateResolution> {
        let names = self.scanner.scan(template)?;
        tracing::debug!(template, placeholders = names.len(), "template scanned");
        self.resolve_placeholders(template, names)
    }

    /// Resolves already discovered placeholder names.
    ///
    /// Repeated names are resolved once.
    ///
    /// # Errors
    /// Returns `ApplicationError::InvalidPlaceholder` for a name that is not
    /// an optionally qualified identifier, and `ApplicationError::Placeholder`
    /// wrapping the domain error for a lookup or evaluation failure.
    pub fn resolve_placeholders<I, N>(
        &mut self,
        template: &str,
        names: I,
    ) -> ApplicationResult<TemplateResolution>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut resolution = TemplateResolution::new(template);

        for name in names {
            let raw = name.as_ref().trim();
            if resolution.values.contains_key(raw) {
                continue;
            }

            let entry = self.resolve_one(template, raw).inspect_err(|error| {
                tracing::warn!(template, placeholder = raw, %error, "template resolution aborted");
            })?;
            resolution.push(entry);
        }

        tracing::info!(
            template,
            placeholders = resolution.len(),
            "template variables resolved"
        );
        Ok(resolution)
    }

    /// Computes placeholder values without caching anything in the registry.
    ///
    /// # Errors
    /// Same as [`TemplateProcessor::resolve_placeholders`].
    pub fn preview<I, N>(&self, template: &str, names: I) -> ApplicationResult<TemplateResolution>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut resolution = TemplateResolution::new(template);

        for name in names {
            let raw = name.as_ref().trim();
            if resolution.values.contains_key(raw) {
                continue;
            }

            let placeholder = self.parse(template, raw)?;
            let source = self
                .registry
                .data_source(placeholder.source.as_deref())
                .map_err(|error| placeholder_error(template, raw, error))?;
            let value = source
                .evaluate(&placeholder.name)
                .map_err(|error| placeholder_error(template, raw, error))?;

            resolution.push(ResolvedPlaceholder {
                placeholder: raw.to_string(),
                source: source.name().to_string(),
                variable: placeholder.name,
                value,
            });
        }

        Ok(resolution)
    }

    fn resolve_one(&mut self, template: &str, raw: &str) -> ApplicationResult<ResolvedPlaceholder> {
        let placeholder = self.parse(template, raw)?;
        let source = self
            .registry
            .data_source_mut(placeholder.source.as_deref())
            .map_err(|error| placeholder_error(template, raw, error))?;
        let source_name = source.name().to_string();
        let value = source
            .fill_value(&placeholder.name)
            .map_err(|error| placeholder_error(template, raw, error))?
            .to_string();

        tracing::debug!(
            template,
            placeholder = raw,
            source = source_name.as_str(),
            "placeholder resolved"
        );

        Ok(ResolvedPlaceholder {
            placeholder: raw.to_string(),
            source: source_name,
            variable: placeholder.name,
            value,
        })
    }

    fn parse(&self, template: &str, raw: &str) -> ApplicationResult<Placeholder> {
        Placeholder::parse(raw, self.settings.qualifier_separator).ok_or_else(|| {
            ApplicationError::InvalidPlaceholder {
                template: template.to_string(),
                placeholder: raw.to_string(),
            }
        })
    }
}

fn placeholder_error(template: &str, placeholder: &str, source: DomainError) -> ApplicationError {
    ApplicationError::Placeholder {
        template: template.to_string(),
        placeholder: placeholder.to_string(),
        source,
    }
}
