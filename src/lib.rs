pub mod checker;
pub mod cli;
pub mod config;
pub mod input;
pub mod server;

pub use checker::client::{LanguageToolClient, Match, MatchContext, Replacement};
pub use checker::GrammarChecker;
pub use config::Config;

#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub issue_count: usize,
    pub fixed_count: usize,
    pub matches: Vec<Match>,
}
