// Fetching raw rows from the sheet backend

pub mod sheet_source;

pub use sheet_source::{SheetResponse, SheetSource};
