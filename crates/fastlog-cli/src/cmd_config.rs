use crate::ctx::Ctx;
use clap::Subcommand;
use fastlog_store::{read_config, set_value, write_config, CONFIG_KEYS};

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value (fast_hours, eat_hours)
    Set {
        /// Config key
        key: String,
        /// Whole number of hours
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values, including the effective interval
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, ctx: &Ctx) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(ctx, &key, &value),
        ConfigCmd::Get { key } => get(ctx, &key),
        ConfigCmd::List => list(ctx),
    }
}

// ── Command Implementations ──

/// `fastlog config set <key> <value>`
pub fn set(ctx: &Ctx, key: &str, value: &str) -> anyhow::Result<()> {
    let path = &ctx.paths.config_json;
    let mut config = read_config(path)?;
    set_value(&mut config, key, value)?;
    write_config(path, &config)?;
    println!("{key} = {value}");
    Ok(())
}

/// `fastlog config get <key>`
pub fn get(ctx: &Ctx, key: &str) -> anyhow::Result<()> {
    let config = read_config(&ctx.paths.config_json)?;
    match config.get(key) {
        Some(val) => println!("{val}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `fastlog config list`
pub fn list(ctx: &Ctx) -> anyhow::Result<()> {
    let config = read_config(&ctx.paths.config_json)?;
    for key in CONFIG_KEYS {
        match config.get(*key) {
            Some(v) => println!("{key} = {v}"),
            None => println!("{key} = (not set)"),
        }
    }
    println!(
        "effective: {}h fasting / {}h eating",
        ctx.config.fast_hours(),
        ctx.config.eat_hours()
    );
    Ok(())
}
