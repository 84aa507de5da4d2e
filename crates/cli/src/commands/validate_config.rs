use hotelier_dom::{ScrollBehavior, ScrollBlock};
use hotelier_search::{HexColor, is_valid_class_name};

use crate::config::config_path;

const VALID_KEYS: &[&str] = &[
    "highlight_color",
    "highlight_text_color",
    "active_color",
    "highlight_class",
    "active_class",
    "scroll_behavior",
    "scroll_block",
    "search_debounce_ms",
    "debounce_ms",
    "wrap_lines",
    "default_page",
];

const MAX_SEARCH_DEBOUNCE_MS: u64 = 2_000;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

pub fn run() {
    let path = match config_path() {
        Some(p) => p,
        None => {
            eprintln!("Could not determine config directory");
            std::process::exit(1);
        }
    };

    println!("Config file: {}", path.display());

    if !path.exists() {
        println!("Status: File does not exist (using defaults)");
        println!("Result: Valid");
        return;
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            println!("Status: Failed to read file");
            println!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let report = validate_contents(&contents);

    // Print results
    if report.is_clean() {
        println!("Status: Valid");
        return;
    }

    if !report.errors.is_empty() {
        println!();
        println!("Errors:");
        for error in &report.errors {
            println!("  {}", error);
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  {}", warning);
        }
    }

    println!();
    if report.errors.is_empty() {
        println!("Result: Valid (with warnings)");
    } else {
        println!("Result: Invalid");
        std::process::exit(1);
    }
}

pub fn validate_contents(contents: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut marker_class: Option<(usize, String)> = None;
    let mut active_class: Option<(usize, String)> = None;

    for (line_num, line) in contents.lines().enumerate() {
        let line_num = line_num + 1;
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            report.errors.push(format!(
                "Line {}: Invalid syntax. Expected 'key = value'",
                line_num
            ));
            continue;
        };

        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        let unquoted = value.trim_matches(|c| c == '"' || c == '\'');

        if !VALID_KEYS.contains(&key.as_str()) {
            report
                .warnings
                .push(format!("Line {}: Unknown key '{}'", line_num, key));
            continue;
        }

        match key.as_str() {
            "highlight_color" | "highlight_text_color" | "active_color" => {
                if HexColor::parse(unquoted).is_none() {
                    report.errors.push(format!(
                        "Line {}: {} must be a hex color like #ffeb3b",
                        line_num, key
                    ));
                }
            }
            "highlight_class" | "active_class" => {
                if !is_valid_class_name(unquoted) {
                    report.errors.push(format!(
                        "Line {}: '{}' is not a valid class name",
                        line_num, unquoted
                    ));
                } else if key == "highlight_class" {
                    marker_class = Some((line_num, unquoted.to_string()));
                } else {
                    active_class = Some((line_num, unquoted.to_string()));
                }
            }
            "scroll_behavior" => {
                if ScrollBehavior::from_str(unquoted).is_none() {
                    report.errors.push(format!(
                        "Line {}: scroll_behavior must be 'smooth', 'instant' or 'auto'",
                        line_num
                    ));
                }
            }
            "scroll_block" => {
                if ScrollBlock::from_str(unquoted).is_none() {
                    report.errors.push(format!(
                        "Line {}: scroll_block must be 'center', 'start', 'end' or 'nearest'",
                        line_num
                    ));
                }
            }
            "search_debounce_ms" | "debounce_ms" => match value.parse::<u64>() {
                Ok(delay) if delay > MAX_SEARCH_DEBOUNCE_MS => report.warnings.push(format!(
                    "Line {}: {} above {} is clamped",
                    line_num, key, MAX_SEARCH_DEBOUNCE_MS
                )),
                Ok(_) => {}
                Err(_) => report.errors.push(format!(
                    "Line {}: {} must be a positive integer",
                    line_num, key
                )),
            },
            "wrap_lines" => {
                if !["true", "false"].contains(&value.to_lowercase().as_str()) {
                    report.errors.push(format!(
                        "Line {}: {} must be 'true' or 'false'",
                        line_num, key
                    ));
                }
            }
            "default_page" => {
                if unquoted.is_empty() {
                    report
                        .errors
                        .push(format!("Line {}: default_page is empty", line_num));
                }
            }
            _ => {}
        }
    }

    if let (Some((_, marker)), Some((line_num, active))) = (&marker_class, &active_class)
        && marker == active
    {
        report.errors.push(format!(
            "Line {}: active_class must differ from highlight_class",
            line_num
        ));
    }

    report
}
