//! Label generation: input validation, composition and usage counting.

use chrono::NaiveDateTime;
use code_catalog::{Catalog, CatalogEntry, SelectionError, rank};
use label_engine::{ComposedLabel, Dpi, LabelError, LabelSpec, LayoutOptions, compose, find_delimiter};
use usage_store::{UsageError, UsageStore};

/// How the user picked the KDL entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// Display text as shown in the dropdown.
    Display(&'a str),
    /// KDL code given directly.
    Code(&'a str),
}

/// Invalid user input. The operation is aborted and nothing changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter a case number (Fallnummer)")]
    MissingCaseNumber,

    #[error("Case number must not contain '{0}'")]
    ReservedCharacter(char),

    #[error("Please select a KDL entry: {0}")]
    Selection(#[from] SelectionError),

    #[error("Unknown KDL code: {0}")]
    UnknownCode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Label error: {0}")]
    Label(#[from] LabelError),
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedLabel {
    pub label: ComposedLabel,
    /// Usage count of the code after this generation.
    pub uses: u64,
    /// Set when the updated counters could not be saved.
    pub save_error: Option<String>,
}

/// Owns the catalog and the usage counters for one interactive user.
#[derive(Debug)]
pub struct LabelService {
    catalog: Catalog,
    store: UsageStore,
    layout: LayoutOptions,
}

impl LabelService {
    pub fn new(catalog: Catalog, store: UsageStore) -> Self {
        Self {
            catalog,
            store,
            layout: LayoutOptions::default(),
        }
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn usage(&self) -> &UsageStore {
        &self.store
    }

    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Dropdown values: favorites, separator, remaining entries.
    pub fn dropdown(&self) -> Vec<String> {
        rank(&self.catalog, &self.store)
    }

    /// Check the inputs and build the label spec.
    pub fn validate(&self, case_input: &str, selection: Selection<'_>) -> Result<LabelSpec, InputError> {
        let entry = self.resolve(selection)?;

        let case_number = case_input.trim();
        if case_number.is_empty() {
            return Err(InputError::MissingCaseNumber);
        }
        if let Some(c) = find_delimiter(case_number) {
            return Err(InputError::ReservedCharacter(c));
        }

        Ok(LabelSpec {
            case_number: case_number.to_string(),
            code: entry.code.clone(),
            display: entry.display.clone(),
        })
    }

    fn resolve(&self, selection: Selection<'_>) -> Result<&CatalogEntry, InputError> {
        match selection {
            Selection::Display(display) => Ok(self.catalog.resolve_selection(display)?),
            Selection::Code(code) => {
                let code = code.trim();
                if code.is_empty() {
                    return Err(SelectionError::Empty.into());
                }
                self.catalog
                    .get(code)
                    .ok_or_else(|| InputError::UnknownCode(code.to_string()))
            }
        }
    }

    /// Validate, compose, then count the use of the code.
    ///
    /// The counter is saved right away. A failed save does not fail the
    /// generation; it is logged and reported in [`GeneratedLabel::save_error`].
    pub fn generate(
        &mut self,
        case_input: &str,
        selection: Selection<'_>,
        dpi: Dpi,
        at: NaiveDateTime,
    ) -> Result<GeneratedLabel, GenerateError> {
        let spec = self.validate(case_input, selection)?;
        let label = compose(spec, dpi, &self.layout, at)?;

        let code = label.spec.code.as_str();
        let (uses, save_error) = match self.store.increment(code) {
            Ok(uses) => (uses, None),
            Err(e) => {
                tracing::warn!(code, error = %e, "Failed to save usage counters");
                (self.store.counts().get(code).copied().unwrap_or(0), Some(e.to_string()))
            }
        };

        tracing::info!(
            case_number = %label.spec.case_number,
            code,
            uses,
            "Label generated"
        );

        Ok(GeneratedLabel {
            label,
            uses,
            save_error,
        })
    }

    /// Clear all usage counters.
    pub fn reset_favorites(&mut self) -> Result<(), UsageError> {
        self.store.reset()
    }
}
