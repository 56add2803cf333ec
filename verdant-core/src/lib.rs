pub mod config;
pub mod service;

use verdant_database::Database;
use verdant_llm::LlmService;

/// Shared request-scoped state cloned into every handler.
#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub llm: Option<LlmService>,
}
