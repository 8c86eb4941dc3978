//! ofcurve-core
//!
//! Pure data vocabulary for the reaction-probability models: the formula
//! schema, the catalog loader, the calc-expression language, and the
//! localized-string and reference-link resolvers. No I/O.

pub mod catalog;
pub mod error;
pub mod expression;
pub mod i18n;
pub mod links;
pub mod models;
