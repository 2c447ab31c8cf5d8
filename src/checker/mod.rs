pub mod apply;
pub mod client;

use crate::cli::output::{self, OutputFormat};
use crate::{input, CheckResult, Config};
use anyhow::{Context, Result};
use apply::{apply_first_suggestions, apply_with};
use client::{LanguageToolClient, Match};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Drives check and fix flows for one file at a time. Matches from a check
/// are only ever applied to the snapshot they were computed against; after
/// an apply they are discarded and a fresh check is required.
pub struct GrammarChecker {
    client: LanguageToolClient,
    language: String,
    disabled_rules: Vec<String>,
    encodings: Vec<String>,
    max_suggestions: usize,
}

impl GrammarChecker {
    pub fn new(config: &Config) -> Result<Self> {
        let client = LanguageToolClient::new(
            &config.server_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        Ok(Self {
            client,
            language: config.language.clone(),
            disabled_rules: config.disabled_rules.clone(),
            encodings: config.encodings.clone(),
            max_suggestions: config.max_suggestions,
        })
    }

    pub fn check(
        &self,
        file_path: &Path,
        colored: bool,
        format: &OutputFormat,
    ) -> Result<CheckResult> {
        let content = input::read_text_file(file_path, &self.encodings)?;
        let matches = self.retrieve(&content, colored);

        let result = CheckResult {
            issue_count: matches.len(),
            fixed_count: 0,
            matches,
        };

        output::print_matches(file_path, &result, colored, format);

        Ok(result)
    }

    pub fn fix_auto(&self, file_path: &Path, colored: bool) -> Result<CheckResult> {
        let content = input::read_text_file(file_path, &self.encodings)?;
        let matches = self.retrieve(&content, colored);

        let (fixed, fixed_count) = apply_first_suggestions(&content, &matches);

        if fixed_count > 0 {
            fs::write(file_path, &fixed)
                .with_context(|| format!("Failed to write file: {}", file_path.display()))?;
        }

        Ok(CheckResult {
            issue_count: 0,
            fixed_count,
            matches: Vec::new(),
        })
    }

    pub fn fix_interactive(&self, file_path: &Path, colored: bool) -> Result<CheckResult> {
        let content = input::read_text_file(file_path, &self.encodings)?;
        let matches = self.retrieve(&content, colored);

        let (fixed, fixed_count) = apply_with(&content, &matches, |m| {
            output::prompt_for_decision(m, self.max_suggestions, colored)
        });

        if fixed_count > 0 {
            fs::write(file_path, &fixed)
                .with_context(|| format!("Failed to write file: {}", file_path.display()))?;
        }

        Ok(CheckResult {
            issue_count: 0,
            fixed_count,
            matches: Vec::new(),
        })
    }

    /// Ask the server for matches. Any service failure is reported once and
    /// yields an empty list; the run carries on.
    fn retrieve(&self, text: &str, colored: bool) -> Vec<Match> {
        match self
            .client
            .check(text, &self.language, &self.disabled_rules)
        {
            Ok(matches) => matches,
            Err(err) => {
                output::print_check_failure(&err, colored);
                Vec::new()
            }
        }
    }
}
