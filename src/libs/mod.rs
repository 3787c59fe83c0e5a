pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod infer;
pub mod schema;
pub mod store;
pub mod ui;

// Re-export them for easier access from consumers.
pub use app::*;
pub use config::*;
pub use error::*;
pub use form::*;
pub use infer::*;
pub use schema::*;
pub use store::*;
pub use ui::*;
