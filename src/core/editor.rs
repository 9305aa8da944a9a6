//! Document editor workflow.
//!
//! A [`DocumentEditor`] owns the one draft being worked on and tracks whether it
//! is shown for editing or as the print layout. Mutations are only applied in
//! [`EditorMode::Editing`] and only for roles the access policy allows.
//!
//! Printing and downloading need the print layout on screen. When an export is
//! requested while editing, the editor switches to [`EditorMode::Previewing`]
//! and parks the request until the host reports that the preview has rendered
//! via [`DocumentEditor::layout_ready`].

use crate::core::{
    access::{Action, Role, is_permitted},
    document::{DocumentField, DocumentId, FinancialDocument, LineItemField},
    email::{MailDraft, compose_email},
    money::Totals,
    persistence,
    settings::AppSettings,
};
use sea_orm::DatabaseConnection;
use tracing::{debug, error, info, instrument};

/// Message shown when saving without a client name.
pub const CLIENT_NAME_REQUIRED: &str = "Please enter a client name";

/// How the document is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Form fields are editable
    Editing,
    /// Print layout, used for printing and PDF export
    Previewing,
}

/// How the editor was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Open for editing
    Edit,
    /// Open for editing but start on the preview
    Preview,
    /// Read-only viewing
    View,
    /// Open the preview and export it as soon as it has rendered
    Download,
}

/// Export facilities of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAction {
    /// Native print dialog
    Print,
    /// PDF download
    Download,
}

/// What the host should do after requesting an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStep {
    /// The preview is showing; run the export now
    Run(ExportAction),
    /// The preview is being rendered; wait for [`DocumentEditor::layout_ready`]
    AwaitLayout,
}

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored under this id
    Saved {
        /// The persisted id
        id: String,
    },
    /// Blocked by validation; nothing was sent to the store
    Rejected {
        /// Message to show next to the form
        message: String,
    },
    /// Saving is not offered in the current mode or for this role
    Unavailable,
    /// The store refused the write; details went to the log
    Failed,
}

/// The single in-progress draft and its presentation state.
#[derive(Debug, Clone)]
pub struct DocumentEditor {
    document: FinancialDocument,
    role: Role,
    mode: EditorMode,
    pending_exports: Vec<ExportAction>,
    validation_message: Option<String>,
}

impl DocumentEditor {
    /// Opens `document` for a user with `role`.
    ///
    /// Starts in [`EditorMode::Editing`] unless the entry point asks for the
    /// preview or the user is a viewer. A download entry point parks a
    /// download until the first [`Self::layout_ready`].
    #[must_use]
    pub fn open(document: FinancialDocument, role: Role, entry: EntryPoint) -> Self {
        let mode = if role == Role::Viewer || entry != EntryPoint::Edit {
            EditorMode::Previewing
        } else {
            EditorMode::Editing
        };
        let pending_exports = if entry == EntryPoint::Download {
            vec![ExportAction::Download]
        } else {
            Vec::new()
        };

        debug!("Opened {} editor as {role} in {mode:?}", document.kind);
        Self {
            document,
            role,
            mode,
            pending_exports,
            validation_message: None,
        }
    }

    /// The draft as currently edited.
    #[must_use]
    pub const fn document(&self) -> &FinancialDocument {
        &self.document
    }

    /// Current presentation mode.
    #[must_use]
    pub const fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Derived totals of the draft.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.document.totals()
    }

    /// Message from the last rejected save, cleared by the next successful one.
    #[must_use]
    pub fn validation_message(&self) -> Option<&str> {
        self.validation_message.as_deref()
    }

    /// Whether the edit/preview toggle is offered.
    #[must_use]
    pub fn can_toggle(&self) -> bool {
        self.role != Role::Viewer
    }

    /// Switches between editing and previewing. Returns `false` if the toggle
    /// is not available.
    ///
    /// Leaving the preview cancels any export still waiting for the layout.
    pub fn toggle(&mut self) -> bool {
        if !self.can_toggle() {
            return false;
        }
        self.mode = match self.mode {
            EditorMode::Editing => EditorMode::Previewing,
            EditorMode::Previewing => {
                self.pending_exports.clear();
                EditorMode::Editing
            }
        };
        true
    }

    fn editing_allows(&self, action: Action) -> bool {
        self.mode == EditorMode::Editing && is_permitted(self.role, action)
    }

    /// Whether form fields accept changes right now.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.editing_allows(Action::EditDocument)
    }

    /// Whether the save control is enabled.
    #[must_use]
    pub fn can_save(&self) -> bool {
        let action = if self.document.id.is_persisted() {
            Action::EditDocument
        } else {
            Action::CreateDocument
        };
        self.editing_allows(action)
    }

    /// Appends a blank line item. Returns its id, or `None` if editing is not
    /// allowed.
    pub fn add_line_item(&mut self) -> Option<String> {
        self.can_edit().then(|| self.document.add_line_item())
    }

    /// Removes a line item (never the last one). Returns whether edits are
    /// allowed.
    pub fn remove_line_item(&mut self, item_id: &str) -> bool {
        let allowed = self.can_edit();
        if allowed {
            self.document.remove_line_item(item_id);
        }
        allowed
    }

    /// Changes one line item field. Returns whether edits are allowed.
    pub fn update_line_item(&mut self, item_id: &str, field: LineItemField, value: &str) -> bool {
        let allowed = self.can_edit();
        if allowed {
            self.document.update_line_item(item_id, field, value);
        }
        allowed
    }

    /// Changes one document field. Status changes need the edit-status
    /// permission. Returns whether the change was allowed.
    pub fn set_field(&mut self, field: DocumentField, value: &str) -> bool {
        let action = if field == DocumentField::Status {
            Action::EditStatus
        } else {
            Action::EditDocument
        };
        let allowed = self.editing_allows(action);
        if allowed {
            self.document.set_field(field, value);
        }
        allowed
    }

    /// Checks the draft before it may be sent to the store.
    #[must_use]
    pub fn validate(&self) -> Option<&'static str> {
        self.document
            .client_name
            .trim()
            .is_empty()
            .then_some(CLIENT_NAME_REQUIRED)
    }

    /// Saves the draft.
    ///
    /// Validation failures come back as [`SaveOutcome::Rejected`] without
    /// touching the store. Store failures are logged and reported as
    /// [`SaveOutcome::Failed`]; the draft keeps its edits and can be saved
    /// again. On success a new draft becomes [`DocumentId::Persisted`].
    #[instrument(skip(self, db), fields(kind = %self.document.kind))]
    pub async fn save(&mut self, db: &DatabaseConnection) -> SaveOutcome {
        if !self.can_save() {
            debug!("Save requested while unavailable");
            return SaveOutcome::Unavailable;
        }

        if let Some(message) = self.validate() {
            self.validation_message = Some(message.to_string());
            return SaveOutcome::Rejected {
                message: message.to_string(),
            };
        }
        self.validation_message = None;

        match persistence::upsert_document(db, &self.document).await {
            Ok(id) => {
                info!("Saved {} {}", self.document.kind, self.document.number);
                self.document.id = DocumentId::Persisted(id.clone());
                SaveOutcome::Saved { id }
            }
            Err(e) => {
                error!("Failed to save {}: {}", self.document.kind, e);
                SaveOutcome::Failed
            }
        }
    }

    /// Asks to print or download the document.
    ///
    /// In the preview the export can run at once. While editing, the editor
    /// switches to the preview and the export waits for [`Self::layout_ready`].
    /// Requests made while others are waiting are queued behind them; asking
    /// for an action that is already queued does not queue it twice.
    pub fn request_export(&mut self, action: ExportAction) -> ExportStep {
        if self.mode == EditorMode::Previewing && self.pending_exports.is_empty() {
            return ExportStep::Run(action);
        }

        self.mode = EditorMode::Previewing;
        if !self.pending_exports.contains(&action) {
            self.pending_exports.push(action);
        }
        ExportStep::AwaitLayout
    }

    /// Called by the host once the preview layout has rendered.
    ///
    /// Hands out the waiting exports in request order, each exactly once.
    pub fn layout_ready(&mut self) -> Vec<ExportAction> {
        if self.mode != EditorMode::Previewing {
            return Vec::new();
        }
        std::mem::take(&mut self.pending_exports)
    }

    /// Prefilled e-mail for the draft's client.
    #[must_use]
    pub fn compose_email(&self, settings: &AppSettings) -> MailDraft {
        compose_email(&self.document, settings)
    }

    /// Leaves the editor without saving; unsaved edits are dropped.
    pub fn back(self) {
        debug!("Leaving {} editor without saving", self.document.kind);
    }
}
