/// Role-gated settings, user and deletion operations
pub mod admin;
/// Roles, actions and the access policy
pub mod access;
/// Sign-in against the user list
pub mod auth;
/// Invoices, quotations and their line items
pub mod document;
/// Edit/preview workflow around a single draft
pub mod editor;
/// Prefilled client e-mails
pub mod email;
/// Totals and currency formatting
pub mod money;
/// Mapping between domain types and the store
pub mod persistence;
/// Date-range reports over documents
pub mod report;
/// Persisted sign-in session
pub mod session;
/// Company settings
pub mod settings;
/// In-memory mirror of the store
pub mod state;
/// Application users
pub mod user;
