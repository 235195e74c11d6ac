//! Entitlement resolution and project filtering.
//!
//! A signed-in client may only see the projects linked to their
//! organization. The user → organization → project-id traversal itself is
//! performed by the record gateway at request time; this module defines
//! the resulting entitlement set and the filtering rule.
//!
//! Policy: an empty entitlement set means *restricted to nothing*.
//! "Show everything" is never inferred from missing data; it exists only
//! as the explicit [`Entitlements::Unrestricted`] variant granted to
//! agency staff.

use std::collections::HashSet;

/// The set of project codes a caller is authorized to view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entitlements {
    /// Agency staff: no restriction.
    Unrestricted,
    /// Clients: exactly these project codes. Empty means no access.
    Projects(HashSet<String>),
}

impl Entitlements {
    /// Entitlements granting access to nothing.
    pub fn none() -> Self {
        Entitlements::Projects(HashSet::new())
    }

    /// Build a restricted entitlement set from project codes.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Entitlements::Projects(codes.into_iter().map(Into::into).collect())
    }

    /// Whether the caller may view the project with this code.
    pub fn allows(&self, project_code: &str) -> bool {
        match self {
            Entitlements::Unrestricted => true,
            Entitlements::Projects(codes) => codes.contains(project_code),
        }
    }

    /// Narrow a project list to the entitled subset, preserving order.
    ///
    /// `code_of` extracts the business key from an item so the filter can
    /// be applied to any project-shaped type.
    pub fn filter<T, F>(&self, items: Vec<T>, code_of: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        match self {
            Entitlements::Unrestricted => items,
            Entitlements::Projects(_) => items
                .into_iter()
                .filter(|item| self.allows(code_of(item)))
                .collect(),
        }
    }
}
