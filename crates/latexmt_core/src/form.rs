use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_SRC_LANG: &str = "de";
pub const DEFAULT_TGT_LANG: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormKind {
    /// Inline text translation (`POST /api/translate`).
    Inline,
    /// Whole-document job submission (`POST /api/jobs`).
    Document,
}

/// Field values keyed by field name. Every view of a field reads this single
/// value, so there is nothing to mirror between inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// A document picked for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Per-field required-token checks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationRules {
    required_tokens: BTreeMap<String, String>,
}

impl ValidationRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rule set used by the translation form: a mask placeholder, when
    /// given, must contain the `%INDEX%` slot.
    pub fn standard() -> Self {
        Self::new().require_token("mask_placeholder", "%INDEX%")
    }

    pub fn require_token(mut self, field: impl Into<String>, token: impl Into<String>) -> Self {
        self.required_tokens.insert(field.into(), token.into());
        self
    }

    /// A field passes when it is empty (unused) or contains its token.
    /// Missing fields count as empty.
    pub fn validate(&self, fields: &FormFields) -> ValidationReport {
        let mut report = ValidationReport::default();
        for (field, token) in &self.required_tokens {
            let actual = fields.get(field).unwrap_or("");
            if !actual.is_empty() && !actual.contains(token.as_str()) {
                report.invalid.push(field.clone());
            } else {
                report.valid.push(field.clone());
            }
        }
        report
    }
}

/// Values, invalid markers and the enabled flag of one form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub fields: FormFields,
    invalid: BTreeSet<String>,
    disabled: bool,
}

impl FormState {
    /// A form holding every field the server reads for `kind`. Text fields
    /// start empty and are sent as such.
    pub fn for_kind(kind: FormKind) -> Self {
        let mut form = Self::default();
        form.fields.set("src_lang", DEFAULT_SRC_LANG);
        form.fields.set("tgt_lang", DEFAULT_TGT_LANG);
        form.fields.set("glossary", "");
        if kind == FormKind::Inline {
            form.fields.set("input_text", "");
            form.fields.set("mask_placeholder", "");
        }
        form
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_invalid(&self, field: &str) -> bool {
        self.invalid.contains(field)
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = &str> {
        self.invalid.iter().map(String::as_str)
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub(crate) fn mark_invalid(&mut self, field: &str) {
        self.invalid.insert(field.to_string());
    }

    pub(crate) fn mark_valid(&mut self, field: &str) {
        self.invalid.remove(field);
    }

    pub(crate) fn apply_report(&mut self, report: &ValidationReport) {
        for field in &report.invalid {
            self.mark_invalid(field);
        }
        for field in &report.valid {
            self.mark_valid(field);
        }
    }
}
