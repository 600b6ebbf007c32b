//! # Exclusion Policy
//!
//! Decides which declarations become routes. The policy is a plain value
//! handed to the collector on every run; two runs against different packages
//! never share it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// How a declaration proves it is part of the library's exported surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportRule {
    /// `pub` visibility (the Rust export marker)
    #[default]
    PublicVisibility,
    /// `pub` visibility and a name starting with an upper-case letter
    UpperCaseInitial,
}

/// Outcome of applying the policy to one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    NotExported,
    Denylisted,
    InternalHelper,
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eligibility::Eligible => write!(f, "eligible"),
            Eligibility::NotExported => write!(f, "not exported"),
            Eligibility::Denylisted => write!(f, "denylisted"),
            Eligibility::InternalHelper => write!(f, "internal helper"),
        }
    }
}

/// Excluded files, excluded function names and the export rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionPolicy {
    /// Source file names skipped wholesale (compared against the file name only)
    pub files: BTreeSet<String>,
    /// Exact-match function denylist
    pub functions: BTreeSet<String>,
    /// Names always treated as internal, compared case-insensitively
    pub internal_helpers: BTreeSet<String>,
    pub export_rule: ExportRule,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        ExclusionPolicy {
            files: BTreeSet::new(),
            functions: BTreeSet::new(),
            internal_helpers: ["main", "init"].into_iter().map(String::from).collect(),
            export_rule: ExportRule::default(),
        }
    }
}

impl ExclusionPolicy {
    pub fn with_excluded_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    pub fn with_excluded_functions<I, S>(mut self, functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions.extend(functions.into_iter().map(Into::into));
        self
    }

    pub fn with_export_rule(mut self, rule: ExportRule) -> Self {
        self.export_rule = rule;
        self
    }

    pub fn excludes_file(&self, file_name: &str) -> bool {
        self.files.contains(file_name)
    }

    /// Apply the export check, then the denylist, then the helper check.
    pub fn check(&self, name: &str, is_public: bool) -> Eligibility {
        let exported = match self.export_rule {
            ExportRule::PublicVisibility => is_public,
            ExportRule::UpperCaseInitial => {
                is_public && name.chars().next().is_some_and(char::is_uppercase)
            }
        };
        if !exported {
            return Eligibility::NotExported;
        }
        if self.functions.contains(name) {
            return Eligibility::Denylisted;
        }
        if self
            .internal_helpers
            .iter()
            .any(|helper| helper.eq_ignore_ascii_case(name))
        {
            return Eligibility::InternalHelper;
        }
        Eligibility::Eligible
    }
}
