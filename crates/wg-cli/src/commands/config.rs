//! Config command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};

use wg_core::config::{self, GateConfig};

use crate::output::{print_error, print_info, print_success, print_warning};

fn effective_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(config::default_config_path)
}

/// Show current configuration
pub fn config_show(config_path: Option<&PathBuf>) -> Result<()> {
    let path = effective_path(config_path);

    if !path.exists() {
        print_warning(&format!("No configuration file found at {:?}", path));
        print_info("Defaults are in effect; 'walletgate config set' creates the file");
        return Ok(());
    }

    print_info(&format!("Configuration file: {:?}", path));
    println!();

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    println!("{}", content);

    Ok(())
}

/// Get a config value by key
pub fn config_get(config_path: Option<&PathBuf>, key: &str) -> Result<()> {
    let path = effective_path(config_path);

    if !path.exists() {
        print_error(&format!("Config file not found: {:?}", path));
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let table: toml::Table =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Navigate through the key path (e.g., "walletconnect.project_id")
    let parts: Vec<&str> = key.split('.').collect();
    let mut current: &toml::Value = &toml::Value::Table(table);

    for part in &parts {
        match current {
            toml::Value::Table(t) => {
                if let Some(v) = t.get(*part) {
                    current = v;
                } else {
                    print_error(&format!("Key not found: {}", key));
                    return Ok(());
                }
            }
            _ => {
                print_error(&format!("Key not found: {}", key));
                return Ok(());
            }
        }
    }

    match current {
        toml::Value::String(s) => println!("{}", s),
        toml::Value::Integer(i) => println!("{}", i),
        toml::Value::Float(f) => println!("{}", f),
        toml::Value::Boolean(b) => println!("{}", b),
        toml::Value::Array(a) => {
            for item in a {
                println!("{}", item);
            }
        }
        toml::Value::Table(_) => {
            println!("{}", toml::to_string_pretty(current)?);
        }
        toml::Value::Datetime(d) => println!("{}", d),
    }

    Ok(())
}

/// Set a config value by key
pub fn config_set(config_path: Option<&PathBuf>, key: &str, value: &str) -> Result<()> {
    let path = effective_path(config_path);

    // Materialize the defaults on first use
    if !path.exists() {
        print_info("Creating default configuration...");
        config::save_config(&path, &GateConfig::default())
            .with_context(|| format!("Failed to create config file: {:?}", path))?;
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let mut table: toml::Table =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    let parts: Vec<&str> = key.split('.').collect();
    if parts.is_empty() {
        anyhow::bail!("Invalid key");
    }

    // Navigate/create path to the parent table
    let mut current = &mut table;
    for part in &parts[..parts.len() - 1] {
        if !current.contains_key(*part) {
            current.insert(part.to_string(), toml::Value::Table(toml::Table::new()));
        }
        current = current
            .get_mut(*part)
            .and_then(|v| v.as_table_mut())
            .ok_or_else(|| anyhow::anyhow!("Cannot navigate to key: {}", key))?;
    }

    let last_key = parts
        .last()
        .ok_or_else(|| anyhow::anyhow!("Invalid key: key path cannot be empty"))?;
    let toml_value = if value == "true" {
        toml::Value::Boolean(true)
    } else if value == "false" {
        toml::Value::Boolean(false)
    } else if let Ok(i) = value.parse::<i64>() {
        toml::Value::Integer(i)
    } else if let Ok(f) = value.parse::<f64>() {
        toml::Value::Float(f)
    } else {
        toml::Value::String(value.to_string())
    };

    current.insert(last_key.to_string(), toml_value);

    // Reject writes that would produce an unloadable config
    let rendered = toml::to_string_pretty(&table)?;
    toml::from_str::<GateConfig>(&rendered)
        .with_context(|| format!("'{}' is not a valid setting", key))?;

    std::fs::write(&path, rendered)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    print_success(&format!("Set {} = {}", key, value));
    Ok(())
}
