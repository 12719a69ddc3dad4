//! Command-line surface and configuration loading

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use desktop_state::api::module::{run_gnome_extension, run_gsettings};
use desktop_state::{Config, DesktopStateModule};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde_json::json;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "WORKSTATION_";

#[derive(Parser, Debug)]
#[command(name = "workstation")]
#[command(version)]
#[command(about = "Reconcile GSettings keys and GNOME Shell extensions")]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Report what would change without changing anything
    #[arg(long, global = true)]
    pub check: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set a GSettings key to the desired value
    Gsettings {
        #[arg(long)]
        schema: String,

        /// Path of a relocatable schema
        #[arg(long)]
        path: Option<String>,

        #[arg(long)]
        key: String,

        #[arg(long)]
        value: String,

        /// Parse VALUE as JSON instead of taking it as a string
        #[arg(long)]
        json: bool,
    },

    /// Install, remove, enable or disable a shell extension
    Extension {
        /// Extension uuid
        #[arg(long)]
        name: String,

        #[arg(long, value_enum, default_value = "present")]
        state: StateArg,

        #[arg(long, action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        enabled: Option<bool>,

        /// Bundle path or URL to install from
        #[arg(long)]
        src: Option<String>,

        #[arg(long)]
        force: bool,
    },

    /// Run a module with JSON arguments read from a file
    Module {
        #[arg(value_enum)]
        name: ModuleName,

        args_file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StateArg {
    Present,
    Absent,
}

impl StateArg {
    fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModuleName {
    Gsettings,
    #[value(name = "gnome_extension")]
    GnomeExtension,
}

/// Run the command; `Ok(false)` means the module reported a failure
pub async fn run(cli: Cli) -> Result<bool> {
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    let module = DesktopStateModule::new(config);
    let client = module.client();

    let (name, args) = match cli.command {
        Commands::Gsettings {
            schema,
            path,
            key,
            value,
            json,
        } => {
            let value = if json {
                serde_json::from_str(&value)
                    .with_context(|| format!("--value is not valid JSON: {}", value))?
            } else {
                serde_json::Value::String(value)
            };
            let mut args = json!({ "schema": schema, "key": key, "value": value });
            if let Some(path) = path {
                args["path"] = json!(path);
            }
            (ModuleName::Gsettings, args)
        }
        Commands::Extension {
            name,
            state,
            enabled,
            src,
            force,
        } => {
            let mut args = json!({ "name": name, "state": state.as_str(), "force": force });
            if let Some(enabled) = enabled {
                args["enabled"] = json!(enabled);
            }
            if let Some(src) = src {
                args["src"] = json!(src);
            }
            (ModuleName::GnomeExtension, args)
        }
        Commands::Module { name, args_file } => (name, read_args_file(&args_file).await?),
    };

    let args = with_check_mode(args, cli.check);

    let (rendered, failed) = match name {
        ModuleName::Gsettings => {
            let response = run_gsettings(client.as_ref(), args).await;
            (serde_json::to_string_pretty(&response)?, response.is_failed())
        }
        ModuleName::GnomeExtension => {
            let response = run_gnome_extension(client.as_ref(), args).await;
            (serde_json::to_string_pretty(&response)?, response.is_failed())
        }
    };

    println!("{}", rendered);
    Ok(!failed)
}

/// Defaults, then YAML, then environment
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("configuration file {} does not exist", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        None => {
            if let Some(path) = default_config_path().filter(|p| p.is_file()) {
                tracing::debug!(path = %path.display(), "using default configuration file");
                figment = figment.merge(Yaml::file(path));
            }
        }
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .context("invalid configuration")
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("workstation").join("config.yaml"))
}

async fn read_args_file(path: &Path) -> Result<serde_json::Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// `--check` turns check mode on; arguments may also request it themselves
fn with_check_mode(mut args: serde_json::Value, check: bool) -> serde_json::Value {
    if check {
        if let Some(fields) = args.as_object_mut() {
            fields.insert("_ansible_check_mode".to_string(), json!(true));
        }
    }
    args
}
