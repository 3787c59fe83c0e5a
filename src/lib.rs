//! Derives record listings and add-record forms from live table schemas:
//! sample one row to learn the columns, fall back to schema metadata for
//! empty tables, and drive a typed insert form over any [`TableStore`].

pub mod libs;

pub use libs::*;
