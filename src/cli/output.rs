use crate::checker::apply::Decision;
use crate::checker::client::{ClientError, Language, Match};
use crate::CheckResult;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonMatch {
    file: String,
    offset: usize,
    length: usize,
    error: String,
    message: String,
    suggestions: Vec<String>,
    context: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonOutput {
    files_checked: usize,
    total_issues: usize,
    matches: Vec<JsonMatch>,
}

pub fn print_matches(
    file_path: &Path,
    result: &CheckResult,
    colored_output: bool,
    format: &OutputFormat,
) {
    match format {
        OutputFormat::Text => print_text_matches(file_path, result, colored_output),
        OutputFormat::Json => print_json_matches(file_path, result),
    }
}

fn print_text_matches(file_path: &Path, result: &CheckResult, colored_output: bool) {
    if result.matches.is_empty() {
        return;
    }

    let file_name = file_path.display().to_string();

    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for m in &result.matches {
        let position = format!("@{}", m.offset);
        let error = m.error_text();

        if colored_output {
            println!(
                "  {} {}  {}",
                position.blue().bold(),
                error.red().bold(),
                m.message
            );

            if !m.replacements.is_empty() {
                let suggestions = m
                    .replacements
                    .iter()
                    .take(3)
                    .map(|r| r.value.green().to_string())
                    .collect::<Vec<_>>()
                    .join(&", ".dimmed().to_string());
                println!("    {} {}", "→".dimmed(), suggestions);
            }
        } else {
            println!("  {} {}  {}", position, error, m.message);

            if !m.replacements.is_empty() {
                let suggestions = m
                    .replacements
                    .iter()
                    .take(3)
                    .map(|r| r.value.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("    → {}", suggestions);
            }
        }
    }
}

fn print_json_matches(file_path: &Path, result: &CheckResult) {
    let json_matches: Vec<JsonMatch> = result
        .matches
        .iter()
        .map(|m| JsonMatch {
            file: file_path.display().to_string(),
            offset: m.offset,
            length: m.length,
            error: m.error_text().to_string(),
            message: m.message.clone(),
            suggestions: m.replacements.iter().map(|r| r.value.clone()).collect(),
            context: m.context.text.clone(),
        })
        .collect();

    let output = JsonOutput {
        files_checked: 1,
        total_issues: result.issue_count,
        matches: json_matches,
    };

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

/// Report a failed service call. The run continues with zero matches.
pub fn print_check_failure(err: &ClientError, colored: bool) {
    let hint = match err {
        ClientError::Unreachable(_) => "Make sure the LanguageTool server is running.",
        ClientError::Status(_) => "The server rejected the request.",
        ClientError::MalformedResponse(_) => "The server answered with something unexpected.",
    };

    if colored {
        eprintln!("{} {}", "Warning:".yellow().bold(), err);
        eprintln!("  {}", hint.dimmed());
    } else {
        eprintln!("Warning: {}", err);
        eprintln!("  {}", hint);
    }
}

pub fn print_check_summary(total_issues: usize, files: &[impl AsRef<Path>], colored: bool) {
    println!();
    if total_issues == 0 {
        if colored {
            println!("{}", "✓ No grammar issues found!".green().bold());
        } else {
            println!("✓ No grammar issues found!");
        }
    } else {
        let issue_word = if total_issues == 1 { "issue" } else { "issues" };
        if colored {
            println!(
                "{} {} {} found in {} {}",
                "✗".red().bold(),
                total_issues.to_string().red().bold(),
                issue_word,
                files.len(),
                if files.len() == 1 { "file" } else { "files" }
            );
        } else {
            println!(
                "✗ {} {} found in {} {}",
                total_issues,
                issue_word,
                files.len(),
                if files.len() == 1 { "file" } else { "files" }
            );
        }
    }
}

pub fn print_fix_summary(total_fixed: usize, files: &[impl AsRef<Path>], colored: bool) {
    println!();
    if total_fixed == 0 {
        if colored {
            println!("{}", "No corrections needed!".green().bold());
        } else {
            println!("No corrections needed!");
        }
    } else {
        let fix_word = if total_fixed == 1 {
            "correction"
        } else {
            "corrections"
        };
        if colored {
            println!(
                "{} {} {} applied to {} {}",
                "✓".green().bold(),
                total_fixed.to_string().green().bold(),
                fix_word,
                files.len(),
                if files.len() == 1 { "file" } else { "files" }
            );
        } else {
            println!(
                "✓ {} {} applied to {} {}",
                total_fixed,
                fix_word,
                files.len(),
                if files.len() == 1 { "file" } else { "files" }
            );
        }
    }
}

pub fn print_languages(languages: &[Language], colored: bool) {
    if languages.is_empty() {
        println!("The server reports no supported languages.");
        return;
    }

    if colored {
        println!("{}", "Supported languages:".bold());
    } else {
        println!("Supported languages:");
    }
    println!();

    for language in languages {
        if colored {
            println!(
                "  {} {} ({})",
                "✓".green(),
                language.long_code.cyan().bold(),
                language.name.dimmed()
            );
        } else {
            println!("  ✓ {} ({})", language.long_code, language.name);
        }
    }
}

/// Show one match and read the user's decision: a 1-based suggestion index,
/// free-form replacement text, or empty input to skip. A digit outside the
/// suggestion range is taken literally as replacement text.
pub fn prompt_for_decision(m: &Match, max_suggestions: usize, colored: bool) -> Decision {
    let error = m.error_text();
    let suggestions: Vec<&str> = m
        .replacements
        .iter()
        .take(max_suggestions)
        .map(|r| r.value.as_str())
        .collect();

    if colored {
        println!("\n{} '{}'", "Issue found:".yellow().bold(), error.red().bold());
        println!("  {}", m.message);
        println!("  {}", m.context.text.dimmed());
        println!("\n{}", "Suggestions:".cyan().bold());
    } else {
        println!("\nIssue found: '{}'", error);
        println!("  {}", m.message);
        println!("  {}", m.context.text);
        println!("\nSuggestions:");
    }

    for (i, suggestion) in suggestions.iter().enumerate() {
        if colored {
            println!("  [{}] {}", i + 1, suggestion.green());
        } else {
            println!("  [{}] {}", i + 1, suggestion);
        }
    }

    let prompt = "Number, replacement text, or empty to skip";
    let entered = if colored {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    } else {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    };

    let Ok(entered) = entered else {
        return Decision::Skip;
    };
    let entered = entered.trim();

    if entered.is_empty() {
        return Decision::Skip;
    }

    if let Ok(index) = entered.parse::<usize>() {
        if index >= 1 && index <= suggestions.len() {
            return Decision::Replace(suggestions[index - 1].to_string());
        }
    }

    Decision::Replace(entered.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse(), Ok(OutputFormat::Json)));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
