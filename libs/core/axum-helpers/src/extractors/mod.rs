//! Custom extractors for Axum handlers.

pub mod form_fields;

pub use form_fields::FormFields;
