//! Item catalog - block-format parsing, diagnostics, and the loaded store

mod diagnostics;
mod parser;
mod schema;
mod stock;
mod store;

pub use diagnostics::{Diagnostic, DiagnosticKind, Location};
pub use parser::{parse_catalog, ParsedCatalog, RawField, RawRecord};
pub use schema::{coerce, field_type, suggest_flag, FieldType, FieldValue};
pub use stock::{parse_stock_list, StockEntry, StockListError};
pub use store::{Catalog, CatalogError, LoadReport};
