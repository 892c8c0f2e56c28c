pub mod config;
pub mod history;
pub mod session;

pub use config::{ConfigError, HistoryConfig};
pub use history::{History, HistoryBuilder, HistoryError, DEFAULT_HISTORY_LENGTH};
pub use session::{Session, SessionCommand};
