//! Build script for tinytag-core
//!
//! Validates the embedded tag.toml at compile time so a bad default
//! configuration never reaches a device.

use std::fs;
use std::path::Path;

/// (section, key, min, max)
const INTEGER_KEYS: &[(&str, &str, i64, i64)] = &[
    ("motion", "threshold", 1, 4096),
    ("motion", "start_samples", 1, 100),
    ("motion", "stop_samples", 1, 1000),
    ("motion", "baseline_shift", 0, 8),
    ("sampler", "failure_limit", 1, 255),
    ("advertising", "idle_timeout_ms", 1, 86_400_000),
    ("link", "retries", 0, 255),
    ("intervals", "idle_ms", 1, 65_535),
    ("intervals", "advertising_ms", 1, 65_535),
    ("intervals", "connecting_ms", 1, 65_535),
    ("intervals", "connected_ms", 1, 65_535),
];

fn main() {
    println!("cargo:rerun-if-changed=tag.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("tag.toml");

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Failed to read tag.toml                                  ║\n\
            ║                                                                  ║\n\
            ║  Error: {:<56} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            e
        ),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid TOML syntax in tag.toml                          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n\
            {}\n",
            e
        ),
    };

    let errors = validate(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid tag.toml                                         ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

fn validate(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    for (section, key, min, max) in INTEGER_KEYS {
        match config.get(section).and_then(|s| s.get(key)) {
            Some(toml::Value::Integer(v)) if (*min..=*max).contains(v) => {}
            Some(toml::Value::Integer(_)) => {
                errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            }
            Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
            None => errors.push(format!("[{}] missing '{}'", section, key)),
        }
    }

    let start = config
        .get("motion")
        .and_then(|m| m.get("start_samples"))
        .and_then(|v| v.as_integer());
    let stop = config
        .get("motion")
        .and_then(|m| m.get("stop_samples"))
        .and_then(|v| v.as_integer());
    if let (Some(start), Some(stop)) = (start, stop) {
        if start >= stop {
            errors.push("[motion] start_samples must be below stop_samples".to_string());
        }
    }

    errors
}
