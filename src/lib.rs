pub mod config;
pub mod dictionary;
pub mod distance;
pub mod error;
pub mod matcher;
pub mod server;
pub mod session;

pub use config::{Limits, ServerConfig};
pub use dictionary::{Dictionary, SharedDictionary};
pub use distance::levenshtein;
pub use error::{ConfigError, DictionaryError, SessionError, ValidationError};
pub use matcher::{Candidates, Suggestion, match_tokens, rank_all};
pub use server::Server;
pub use session::{Outcome, Reply, Session};
