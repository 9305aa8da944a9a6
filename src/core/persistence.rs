//! Persistence adapter - maps documents, users and settings to and from the store.
//!
//! Every multi-step write runs inside one database transaction: a document row
//! and its line items are replaced together, and deleting a document removes its
//! items in the same transaction. Saves overwrite whatever is stored; there is
//! no version check between concurrent editors.

use crate::{
    core::{
        document::{DocumentId, DocumentKind, FinancialDocument, LineItem},
        settings::{AppSettings, SETTINGS_ROW_ID},
        user::User,
    },
    entities::{
        Document, LineItem as LineItemEntity, Settings, User as UserEntity, document, line_item,
        settings, user,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Everything the application mirrors in memory after a fetch.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Company settings, or defaults if none were saved yet
    pub settings: AppSettings,
    /// All users, ordered by name
    pub users: Vec<User>,
    /// All invoices, newest issue date first
    pub invoices: Vec<FinancialDocument>,
    /// All quotations, newest issue date first
    pub quotations: Vec<FinancialDocument>,
}

/// Loads settings, users, invoices and quotations in one go.
///
/// # Errors
/// Returns an error if a query fails or a stored row holds an unknown kind,
/// status or role.
#[instrument(skip(db))]
pub async fn fetch_all(db: &DatabaseConnection) -> Result<Snapshot> {
    let settings = fetch_settings(db).await?;
    let users = fetch_users(db).await?;
    let documents = fetch_documents(db).await?;

    let (invoices, quotations): (Vec<_>, Vec<_>) = documents
        .into_iter()
        .partition(|doc| doc.kind == DocumentKind::Invoice);

    debug!(
        "Fetched {} users, {} invoices, {} quotations",
        users.len(),
        invoices.len(),
        quotations.len()
    );

    Ok(Snapshot {
        settings,
        users,
        invoices,
        quotations,
    })
}

/// Returns the stored settings, falling back to defaults when none exist.
pub async fn fetch_settings<C>(db: &C) -> Result<AppSettings>
where
    C: ConnectionTrait,
{
    Ok(Settings::find_by_id(SETTINGS_ROW_ID)
        .one(db)
        .await?
        .map(AppSettings::from)
        .unwrap_or_default())
}

/// Returns all users ordered by name.
pub async fn fetch_users<C>(db: &C) -> Result<Vec<User>>
where
    C: ConnectionTrait,
{
    UserEntity::find()
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
}

/// Returns all documents with their line items, newest issue date first.
pub async fn fetch_documents<C>(db: &C) -> Result<Vec<FinancialDocument>>
where
    C: ConnectionTrait,
{
    let rows = Document::find()
        .order_by_desc(document::Column::IssueDate)
        .order_by_desc(document::Column::CreatedAt)
        .all(db)
        .await?;

    let mut items_by_document: HashMap<String, Vec<LineItem>> = HashMap::new();
    for item in LineItemEntity::find()
        .order_by_asc(line_item::Column::DocumentId)
        .order_by_asc(line_item::Column::Position)
        .all(db)
        .await?
    {
        items_by_document
            .entry(item.document_id.clone())
            .or_default()
            .push(LineItem::from(item));
    }

    rows.into_iter()
        .map(|row| {
            let items = items_by_document.remove(&row.id).unwrap_or_default();
            FinancialDocument::from_row(row, items)
        })
        .collect()
}

/// Loads a single document by id.
pub async fn fetch_document<C>(db: &C, id: &str) -> Result<Option<FinancialDocument>>
where
    C: ConnectionTrait,
{
    let Some(row) = Document::find_by_id(id.to_string()).one(db).await? else {
        return Ok(None);
    };

    let items = LineItemEntity::find()
        .filter(line_item::Column::DocumentId.eq(id))
        .order_by_asc(line_item::Column::Position)
        .all(db)
        .await?
        .into_iter()
        .map(LineItem::from)
        .collect();

    FinancialDocument::from_row(row, items).map(Some)
}

/// Writes a document and its line items and returns the stored id.
///
/// A [`DocumentId::Draft`] receives a fresh UUID. A persisted id is updated in
/// place, or inserted again under the same id if the row has disappeared. The
/// row and its items are written in one transaction.
///
/// # Errors
/// Returns an error if any statement fails; nothing is committed in that case.
#[instrument(skip(db, doc), fields(kind = %doc.kind, number = %doc.number))]
pub async fn upsert_document(
    db: &DatabaseConnection,
    doc: &FinancialDocument,
) -> Result<String> {
    let txn = db.begin().await?;

    let id = upsert_document_row(&txn, doc).await?;
    replace_line_items(&txn, &id, doc.items()).await?;

    txn.commit().await?;
    info!(
        "Saved {} {} with {} line items",
        doc.kind,
        id,
        doc.items().len()
    );
    Ok(id)
}

async fn upsert_document_row<C>(db: &C, doc: &FinancialDocument) -> Result<String>
where
    C: ConnectionTrait,
{
    let now = Utc::now();
    let existing = match &doc.id {
        DocumentId::Draft => None,
        DocumentId::Persisted(id) => Document::find_by_id(id.clone()).one(db).await?,
    };

    if let Some(existing) = existing {
        let id = existing.id.clone();
        let mut active: document::ActiveModel = existing.into();
        fill_document_fields(&mut active, doc);
        active.updated_at = Set(now);
        active.update(db).await?;
        return Ok(id);
    }

    let id = doc
        .id
        .as_persisted()
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);

    let mut active = document::ActiveModel {
        id: Set(id.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    fill_document_fields(&mut active, doc);
    active.insert(db).await?;
    Ok(id)
}

fn fill_document_fields(active: &mut document::ActiveModel, doc: &FinancialDocument) {
    active.kind = Set(doc.kind.as_str().to_string());
    active.number = Set(doc.number.clone());
    active.status = Set(doc.status.as_str().to_string());
    active.issue_date = Set(doc.issue_date);
    active.secondary_date = Set(doc.secondary_date);
    active.client_name = Set(doc.client_name.clone());
    active.client_address = Set(doc.client_address.clone());
    active.client_email = Set(doc.client_email.clone());
    active.currency = Set(doc.currency.clone());
    active.tax_rate = Set(doc.tax_rate);
    active.notes = Set(doc.notes.clone());
    active.terms = Set(doc.terms.clone());
}

/// Replaces every line item of a document, keeping the given order.
///
/// Run this on a transaction (as [`upsert_document`] does) to make the delete
/// and the inserts one unit.
pub async fn replace_line_items<C>(db: &C, document_id: &str, items: &[LineItem]) -> Result<()>
where
    C: ConnectionTrait,
{
    LineItemEntity::delete_many()
        .filter(line_item::Column::DocumentId.eq(document_id))
        .exec(db)
        .await?;

    for (position, item) in (0_i32..).zip(items) {
        line_item::ActiveModel {
            id: Set(item.id.clone()),
            document_id: Set(document_id.to_string()),
            position: Set(position),
            description: Set(item.description.clone()),
            quantity: Set(item.quantity),
            rate: Set(item.rate),
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

/// Deletes a document together with its line items.
///
/// # Errors
/// Returns [`Error::DocumentNotFound`] if no document has this id.
#[instrument(skip(db))]
pub async fn delete_document(db: &DatabaseConnection, id: &str) -> Result<()> {
    let txn = db.begin().await?;

    LineItemEntity::delete_many()
        .filter(line_item::Column::DocumentId.eq(id))
        .exec(&txn)
        .await?;
    let deleted = Document::delete_by_id(id.to_string()).exec(&txn).await?;

    if deleted.rows_affected == 0 {
        // Dropping the transaction rolls back the item delete
        return Err(Error::DocumentNotFound { id: id.to_string() });
    }

    txn.commit().await?;
    info!("Deleted document {id}");
    Ok(())
}

/// Overwrites the settings row wholesale, creating it if needed.
#[instrument(skip(db, app_settings))]
pub async fn upsert_settings<C>(db: &C, app_settings: &AppSettings) -> Result<()>
where
    C: ConnectionTrait,
{
    let active = settings::ActiveModel::from(app_settings);
    if Settings::find_by_id(SETTINGS_ROW_ID).one(db).await?.is_some() {
        active.update(db).await?;
    } else {
        active.insert(db).await?;
    }
    info!("Saved settings for {}", app_settings.company_name);
    Ok(())
}

/// Inserts or overwrites each user, in one transaction.
#[instrument(skip(db, users), fields(count = users.len()))]
pub async fn upsert_users(db: &DatabaseConnection, users: &[User]) -> Result<()> {
    let txn = db.begin().await?;

    for member in users {
        let active = user::ActiveModel::from(member);
        if UserEntity::find_by_id(member.id.clone()).one(&txn).await?.is_some() {
            active.update(&txn).await?;
        } else {
            active.insert(&txn).await?;
        }
    }

    txn.commit().await?;
    info!("Saved {} users", users.len());
    Ok(())
}

/// Deletes the users with the given ids. Unknown ids are ignored.
#[instrument(skip(db))]
pub async fn delete_users<C>(db: &C, ids: &[String]) -> Result<u64>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(0);
    }

    let result = UserEntity::delete_many()
        .filter(user::Column::Id.is_in(ids.iter().cloned()))
        .exec(db)
        .await?;
    info!("Deleted {} users", result.rows_affected);
    Ok(result.rows_affected)
}
