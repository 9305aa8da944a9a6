//! Administrative operations: company settings, user management and document
//! deletion.
//!
//! Each operation checks the acting user's role first, writes to the store and
//! then refreshes the [`AppState`] so the change is visible immediately.

use crate::{
    core::{
        access::{Action, require},
        persistence,
        settings::AppSettings,
        state::AppState,
        user::User,
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

/// Overwrites the company settings.
#[instrument(skip_all, fields(actor = %actor.name))]
pub async fn save_settings(
    db: &DatabaseConnection,
    state: &mut AppState,
    actor: &User,
    settings: &AppSettings,
) -> Result<()> {
    require(actor.role, Action::ManageSettings)?;
    persistence::upsert_settings(db, settings).await?;
    state.refresh(db).await
}

/// Inserts or overwrites users.
///
/// A user whose `password` is `None` keeps no password and cannot sign in.
#[instrument(skip_all, fields(actor = %actor.name, count = users.len()))]
pub async fn save_users(
    db: &DatabaseConnection,
    state: &mut AppState,
    actor: &User,
    users: &[User],
) -> Result<()> {
    require(actor.role, Action::ManageUsers)?;
    persistence::upsert_users(db, users).await?;
    state.refresh(db).await
}

/// Deletes users by id and returns how many were removed.
#[instrument(skip_all, fields(actor = %actor.name))]
pub async fn remove_users(
    db: &DatabaseConnection,
    state: &mut AppState,
    actor: &User,
    ids: &[String],
) -> Result<u64> {
    require(actor.role, Action::ManageUsers)?;
    let removed = persistence::delete_users(db, ids).await?;
    state.refresh(db).await?;
    Ok(removed)
}

/// Deletes a document together with its line items.
#[instrument(skip(db, state, actor), fields(actor = %actor.name))]
pub async fn remove_document(
    db: &DatabaseConnection,
    state: &mut AppState,
    actor: &User,
    id: &str,
) -> Result<()> {
    require(actor.role, Action::DeleteDocument)?;
    persistence::delete_document(db, id).await?;
    info!("{} deleted document {}", actor.name, id);
    state.refresh(db).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{access::Role, document::DocumentKind, persistence::upsert_document};
    use crate::errors::Error;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_admin_saves_settings_and_state_follows() -> Result<()> {
        let db = setup_test_db().await?;
        let mut state = AppState::load(&db).await?;
        let admin = test_user("Amir", Role::Admin);

        let settings = AppSettings {
            company_name: "Kedai Runcit".to_string(),
            default_tax_rate: 6.0,
            ..AppSettings::default()
        };
        save_settings(&db, &mut state, &admin, &settings).await?;

        assert_eq!(state.settings, settings);
        Ok(())
    }

    #[tokio::test]
    async fn test_editor_cannot_manage_users() -> Result<()> {
        let db = setup_test_db().await?;
        let mut state = AppState::load(&db).await?;
        let editor = test_user("Eli", Role::Editor);

        let result = save_users(&db, &mut state, &editor, &[editor.clone()]).await;

        assert!(matches!(
            result,
            Err(Error::PermissionDenied {
                role: Role::Editor,
                action: Action::ManageUsers
            })
        ));
        assert!(AppState::load(&db).await?.users.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_adds_and_removes_users() -> Result<()> {
        let db = setup_test_db().await?;
        let mut state = AppState::load(&db).await?;
        let admin = test_user("Amir", Role::Admin);
        let viewer = test_user("Vee", Role::Viewer);

        save_users(&db, &mut state, &admin, &[admin.clone(), viewer.clone()]).await?;
        assert_eq!(state.users.len(), 2);

        let removed = remove_users(&db, &mut state, &admin, &[viewer.id.clone()]).await?;
        assert_eq!(removed, 1);
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.users[0].name, "Amir");
        Ok(())
    }

    #[tokio::test]
    async fn test_document_deletion_requires_admin() -> Result<()> {
        let db = setup_test_db().await?;
        let id = upsert_document(
            &db,
            &sample_document(DocumentKind::Invoice, "Acme", "2024-01-10", &[(1.0, 1.0)]),
        )
        .await?;
        let mut state = AppState::load(&db).await?;

        let editor = test_user("Eli", Role::Editor);
        let denied = remove_document(&db, &mut state, &editor, &id).await;
        assert!(matches!(denied, Err(Error::PermissionDenied { .. })));
        assert_eq!(state.invoices.len(), 1);

        let admin = test_user("Amir", Role::Admin);
        remove_document(&db, &mut state, &admin, &id).await?;
        assert!(state.invoices.is_empty());
        Ok(())
    }
}
