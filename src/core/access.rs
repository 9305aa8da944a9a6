//! Role-based access policy.
//!
//! The policy is advisory: the application consults it before offering or
//! performing an action, but the store itself does not enforce it.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access
    Admin,
    /// Creates and edits documents
    Editor,
    /// Reads, prints and exports documents
    Viewer,
}

impl Role {
    /// Returns the stored name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }

    /// Parses a stored role name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "editor" => Some(Self::Editor),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something a user may try to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Open the document lists and documents
    ViewDocuments,
    /// Print, download or e-mail a document
    ExportDocument,
    /// Open the dashboard and financial reports
    ViewReports,
    /// Start a new document
    CreateDocument,
    /// Change document contents
    EditDocument,
    /// Change document status
    EditStatus,
    /// Remove a document
    DeleteDocument,
    /// Add, change or remove users
    ManageUsers,
    /// Change company settings
    ManageSettings,
}

impl Action {
    /// Every defined action.
    pub const ALL: [Self; 9] = [
        Self::ViewDocuments,
        Self::ExportDocument,
        Self::ViewReports,
        Self::CreateDocument,
        Self::EditDocument,
        Self::EditStatus,
        Self::DeleteDocument,
        Self::ManageUsers,
        Self::ManageSettings,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ViewDocuments => "view documents",
            Self::ExportDocument => "export documents",
            Self::ViewReports => "view reports",
            Self::CreateDocument => "create documents",
            Self::EditDocument => "edit documents",
            Self::EditStatus => "edit document status",
            Self::DeleteDocument => "delete documents",
            Self::ManageUsers => "manage users",
            Self::ManageSettings => "manage settings",
        };
        f.write_str(s)
    }
}

/// Whether `role` may perform `action`.
#[must_use]
pub const fn is_permitted(role: Role, action: Action) -> bool {
    match role {
        Role::Admin => true,
        Role::Editor => matches!(
            action,
            Action::ViewDocuments
                | Action::ExportDocument
                | Action::ViewReports
                | Action::CreateDocument
                | Action::EditDocument
                | Action::EditStatus
        ),
        Role::Viewer => matches!(action, Action::ViewDocuments | Action::ExportDocument),
    }
}

/// Like [`is_permitted`], but returns [`Error::PermissionDenied`] on refusal.
pub fn require(role: Role, action: Action) -> Result<()> {
    if is_permitted(role, action) {
        Ok(())
    } else {
        Err(Error::PermissionDenied { role, action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_may_do_everything() {
        for action in Action::ALL {
            assert!(is_permitted(Role::Admin, action), "admin refused {action}");
        }
    }

    #[test]
    fn test_viewer_only_views_and_exports() {
        let allowed: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|a| is_permitted(Role::Viewer, *a))
            .collect();
        assert_eq!(allowed, vec![Action::ViewDocuments, Action::ExportDocument]);
        assert!(!is_permitted(Role::Viewer, Action::EditDocument));
        assert!(!is_permitted(Role::Viewer, Action::ViewReports));
    }

    #[test]
    fn test_editor_cannot_delete_or_administer() {
        assert!(is_permitted(Role::Editor, Action::CreateDocument));
        assert!(is_permitted(Role::Editor, Action::EditDocument));
        assert!(is_permitted(Role::Editor, Action::EditStatus));
        assert!(!is_permitted(Role::Editor, Action::DeleteDocument));
        assert!(!is_permitted(Role::Editor, Action::ManageUsers));
        assert!(!is_permitted(Role::Editor, Action::ManageSettings));
    }

    #[test]
    fn test_require_reports_denial() {
        assert!(require(Role::Editor, Action::EditDocument).is_ok());
        let err = require(Role::Viewer, Action::EditDocument).unwrap_err();
        assert!(matches!(
            err,
            Error::PermissionDenied {
                role: Role::Viewer,
                action: Action::EditDocument
            }
        ));
        assert_eq!(
            err.to_string(),
            "Permission denied: viewer may not edit documents"
        );
    }

    #[test]
    fn test_role_names_round_trip() {
        for role in [Role::Admin, Role::Editor, Role::Viewer] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("Admin"), None);
    }
}
