//! Build script for charpipe-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate display.toml configuration at compile time
fn validate_config() {
    // Re-run if display.toml changes
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the charpipe-firmware directory.           ║\n\
            ║                                                                  ║\n\
            ║  See the comments in the shipped display.toml for the format.    ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    // Validate the bus selection and the wiring for the selected mode
    let mode = validate_bus_section(&config);
    validate_mode_section(&config, &mode);

    println!("cargo:warning=display.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate the [bus] section and return the selected mode
fn validate_bus_section(config: &toml::Value) -> String {
    let mut errors = Vec::new();

    let mode = match config.get("bus") {
        Some(toml::Value::Table(bus)) => match bus.get("mode") {
            Some(toml::Value::String(mode)) => {
                if !["parallel8", "parallel4", "serial"].contains(&mode.as_str()) {
                    errors.push(format!(
                        "[bus] mode must be 'parallel8', 'parallel4' or 'serial', got '{}'",
                        mode
                    ));
                }
                mode.clone()
            }
            Some(_) => {
                errors.push("[bus] mode must be a string".to_string());
                String::new()
            }
            None => {
                errors.push("[bus] missing 'mode'".to_string());
                String::new()
            }
        },
        Some(_) => {
            errors.push("[bus] must be a table".to_string());
            String::new()
        }
        None => {
            errors.push("Missing [bus] section".to_string());
            String::new()
        }
    };

    if !errors.is_empty() {
        panic_with_errors("Invalid bus selection in display.toml", &errors);
    }

    mode
}

/// Validate the wiring section for the selected mode
fn validate_mode_section(config: &toml::Value, mode: &str) {
    let mut errors = Vec::new();

    let section = match config.get(mode) {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push(format!("[{}] must be a table", mode));
            panic_with_errors("Invalid wiring in display.toml", &errors);
            return;
        }
        None => {
            errors.push(format!("Missing [{}] section for the selected mode", mode));
            panic_with_errors("Invalid wiring in display.toml", &errors);
            return;
        }
    };

    match mode {
        "parallel8" | "parallel4" => {
            let width = if mode == "parallel8" { 8 } else { 4 };
            match section.get("data") {
                Some(toml::Value::Array(pins)) => {
                    if pins.len() != width {
                        errors.push(format!("[{}] data must list {} pins", mode, width));
                    }
                    for pin in pins {
                        check_pin(mode, "data", pin, &mut errors);
                    }
                }
                Some(_) => errors.push(format!("[{}] data must be an array", mode)),
                None => errors.push(format!("[{}] missing 'data'", mode)),
            }
            for key in ["rs", "rw", "e"] {
                match section.get(key) {
                    Some(pin) => check_pin(mode, key, pin, &mut errors),
                    None => errors.push(format!("[{}] missing '{}'", mode, key)),
                }
            }
        }
        "serial" => {
            for key in ["clock", "data_out", "chip_select"] {
                match section.get(key) {
                    Some(pin) => check_pin(mode, key, pin, &mut errors),
                    None => errors.push(format!("[{}] missing '{}'", mode, key)),
                }
            }
            match section.get("frequency_hz") {
                Some(toml::Value::Integer(hz)) => {
                    if *hz <= 0 {
                        errors.push("[serial] frequency_hz must be positive".to_string());
                    }
                }
                Some(_) => errors.push("[serial] frequency_hz must be an integer".to_string()),
                None => errors.push("[serial] missing 'frequency_hz'".to_string()),
            }
        }
        _ => {}
    }

    if !errors.is_empty() {
        panic_with_errors("Invalid wiring in display.toml", &errors);
    }
}

/// Check a single pin value is an integer in the RP2040 GPIO range
fn check_pin(section: &str, key: &str, value: &toml::Value, errors: &mut Vec<String>) {
    match value {
        toml::Value::Integer(pin) => {
            if *pin < 0 || *pin > 29 {
                errors.push(format!("[{}] {} must be a GPIO number 0-29", section, key));
            }
        }
        _ => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn panic_with_errors(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
