//! Settings store backed by the `gsettings` command-line tool

use super::text;
use crate::contract::{DesktopError, SettingsKeyRef};
use crate::domain::repository::SettingsStore;
use crate::domain::{Signature, TypedVariant};
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;

/// `gsettings` error text for a schema that is not installed
const NO_SUCH_SCHEMA: &str = "No such schema";

/// `gsettings` error texts for a path that does not suit the schema
const PATH_ERRORS: &[&str] = &[
    "path must be specified",
    "path must not be specified",
    "Path must begin and end with",
    "must not contain two adjacent",
];

pub struct GsettingsCli {
    executable: PathBuf,
}

impl GsettingsCli {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    async fn exec(&self, args: &[&str]) -> Result<Output> {
        tracing::trace!(executable = %self.executable.display(), ?args, "running gsettings");

        tokio::process::Command::new(&self.executable)
            .args(args)
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.executable.display()))
    }

    /// Run and return stdout, failing on a non-zero exit
    async fn exec_ok(&self, args: &[&str]) -> Result<String> {
        let output = self.exec(args).await?;
        if !output.status.success() {
            bail!(
                "gsettings {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr_of(&output)
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn signature(&self, key: &SettingsKeyRef) -> Result<Signature> {
        let target = key.schema_with_path();
        let range = self.exec_ok(&["range", &target, &key.key]).await?;
        parse_range(&range)
    }
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Map a relocation complaint from `gsettings` to the path error
///
/// Covers a relocatable schema addressed without a path and a fixed schema
/// addressed with one.
fn path_error(stderr: &str, path: Option<&str>) -> Option<DesktopError> {
    PATH_ERRORS
        .iter()
        .any(|marker| stderr.contains(marker))
        .then(|| DesktopError::InvalidPath {
            path: path.unwrap_or_default().to_string(),
        })
}

/// Derive the value signature from `gsettings range` output
///
/// The first line is one of `type T`, `enum`, `flags` or `range T MIN MAX`.
pub fn parse_range(output: &str) -> Result<Signature> {
    let first = output
        .lines()
        .next()
        .map(str::trim)
        .ok_or_else(|| anyhow!("empty range description"))?;

    let mut words = first.split_whitespace();
    let signature = match (words.next(), words.next()) {
        (Some("type"), Some(sig)) | (Some("range"), Some(sig)) => sig,
        (Some("enum"), None) => "s",
        (Some("flags"), None) => "as",
        _ => bail!("unrecognised range description {:?}", first),
    };

    Ok(Signature::parse(signature)?)
}

#[async_trait]
impl SettingsStore for GsettingsCli {
    async fn list_keys(&self, schema: &str, path: Option<&str>) -> Result<Option<Vec<String>>> {
        let target = match path {
            Some(path) => format!("{}:{}", schema, path),
            None => schema.to_string(),
        };

        let output = self.exec(&["list-keys", &target]).await?;
        if !output.status.success() {
            let stderr = stderr_of(&output);
            if stderr.contains(NO_SUCH_SCHEMA) {
                return Ok(None);
            }
            if let Some(error) = path_error(&stderr, path) {
                return Err(error.into());
            }
            bail!("gsettings list-keys {} failed: {}", target, stderr);
        }

        let keys = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Some(keys))
    }

    async fn read(&self, key: &SettingsKeyRef) -> Result<TypedVariant> {
        let signature = self.signature(key).await?;
        let target = key.schema_with_path();
        let printed = self.exec_ok(&["get", &target, &key.key]).await?;

        let value = text::parse(printed.trim(), &signature)
            .with_context(|| format!("cannot parse value of {}", key))?;
        Ok(TypedVariant::build(value, &signature)?)
    }

    async fn is_writable(&self, key: &SettingsKeyRef) -> Result<bool> {
        let target = key.schema_with_path();
        let answer = self.exec_ok(&["writable", &target, &key.key]).await?;
        Ok(answer.trim() == "true")
    }

    async fn write(&self, key: &SettingsKeyRef, variant: &TypedVariant) -> Result<bool> {
        let target = key.schema_with_path();
        let formatted = text::format(variant);

        let output = self.exec(&["set", &target, &key.key, &formatted]).await?;
        if !output.status.success() {
            // Out-of-range numbers, unknown enum nicks and the like
            tracing::warn!(key = %key, value = %formatted, stderr = %stderr_of(&output), "gsettings refused value");
            return Ok(false);
        }

        // A write the backend silently dropped leaves the old value in place
        let stored = self.read(key).await?;
        Ok(stored.value() == variant.value())
    }

    async fn sync(&self) -> Result<()> {
        // Every `gsettings set` run flushes before it exits
        Ok(())
    }
}
