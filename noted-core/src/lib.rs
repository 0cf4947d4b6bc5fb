pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use config::NotedConfig;
pub use error::NotedError;
pub use models::Note;
pub use store::NoteStore;
