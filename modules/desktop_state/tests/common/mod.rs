//! Common test utilities: in-memory collaborators for the live desktop
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use desktop_state::contract::{SettingsKeyRef, Value};
use desktop_state::domain::repository::{
    CommandOutput, ExtensionCommand, ExtensionInventory, ExtensionManager, SettingsStore,
};
use desktop_state::domain::{Signature, TypedVariant};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;

pub const SHELL_SCHEMA: &str = "org.gnome.shell";
pub const ENABLED_KEY: &str = "enabled-extensions";
pub const DISABLED_KEY: &str = "disabled-extensions";

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

pub fn key(schema: &str, key: &str) -> SettingsKeyRef {
    SettingsKeyRef::new(schema, None, key)
}

pub fn strings(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|s| Value::from(*s)).collect())
}

// ===== Settings store =====

/// Schemas keyed by `schema[:path]`, each holding typed key values
#[derive(Default)]
pub struct MockStore {
    schemas: RwLock<BTreeMap<String, BTreeMap<String, TypedVariant>>>,
    read_only: RwLock<HashSet<String>>,
    ignore_writes: RwLock<bool>,
    reads: RwLock<usize>,
    writes: RwLock<Vec<(String, Value)>>,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store with the shell's extension lists
    pub fn with_shell_lists(enabled: &[&str], disabled: &[&str]) -> Arc<Self> {
        let store = Self::new();
        store.insert(&key(SHELL_SCHEMA, ENABLED_KEY), "as", strings(enabled));
        store.insert(&key(SHELL_SCHEMA, DISABLED_KEY), "as", strings(disabled));
        store
    }

    pub fn insert(&self, key: &SettingsKeyRef, signature: &str, value: Value) {
        let signature = Signature::parse(signature).unwrap();
        let variant = TypedVariant::build(value, &signature).unwrap();
        self.schemas
            .write()
            .entry(key.schema_with_path())
            .or_default()
            .insert(key.key.clone(), variant);
    }

    pub fn lock(&self, key: &SettingsKeyRef) {
        self.read_only.write().insert(key.to_string());
    }

    /// Accept writes without storing anything
    pub fn ignore_writes(&self) {
        *self.ignore_writes.write() = true;
    }

    pub fn value(&self, key: &SettingsKeyRef) -> Option<Value> {
        self.schemas
            .read()
            .get(&key.schema_with_path())
            .and_then(|keys| keys.get(&key.key))
            .map(|variant| variant.value().clone())
    }

    pub fn read_count(&self) -> usize {
        *self.reads.read()
    }

    pub fn writes(&self) -> Vec<(String, Value)> {
        self.writes.read().clone()
    }

    pub fn print_state(&self, context: &str) {
        println!("\n========== Store State: {} ==========", context);
        for (schema, keys) in self.schemas.read().iter() {
            for (name, variant) in keys {
                println!("  {} {} = {} ({})", schema, name, variant.value(), variant.signature());
            }
        }
        println!("=====================================\n");
    }
}

#[async_trait]
impl SettingsStore for MockStore {
    async fn list_keys(&self, schema: &str, path: Option<&str>) -> Result<Option<Vec<String>>> {
        let target = SettingsKeyRef::new(schema, path.map(str::to_string), "").schema_with_path();
        Ok(self
            .schemas
            .read()
            .get(&target)
            .map(|keys| keys.keys().cloned().collect()))
    }

    async fn read(&self, key: &SettingsKeyRef) -> Result<TypedVariant> {
        *self.reads.write() += 1;
        self.schemas
            .read()
            .get(&key.schema_with_path())
            .and_then(|keys| keys.get(&key.key))
            .cloned()
            .ok_or_else(|| anyhow!("no value for {}", key))
    }

    async fn is_writable(&self, key: &SettingsKeyRef) -> Result<bool> {
        Ok(!self.read_only.read().contains(&key.to_string()))
    }

    async fn write(&self, key: &SettingsKeyRef, variant: &TypedVariant) -> Result<bool> {
        self.writes
            .write()
            .push((key.to_string(), variant.value().clone()));
        if *self.ignore_writes.read() {
            return Ok(false);
        }
        self.schemas
            .write()
            .entry(key.schema_with_path())
            .or_default()
            .insert(key.key.clone(), variant.clone());
        Ok(true)
    }

    async fn sync(&self) -> Result<()> {
        Ok(())
    }
}

// ===== Extensions =====

#[derive(Default)]
pub struct MockInventory {
    installed: RwLock<Vec<String>>,
}

impl MockInventory {
    pub fn with(installed: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            installed: RwLock::new(installed.iter().map(|s| s.to_string()).collect()),
        })
    }

    pub fn add(&self, uuid: &str) {
        let mut installed = self.installed.write();
        if !installed.iter().any(|u| u == uuid) {
            installed.push(uuid.to_string());
        }
    }

    pub fn remove(&self, uuid: &str) {
        self.installed.write().retain(|u| u != uuid);
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.installed.read().iter().any(|u| u == uuid)
    }
}

#[async_trait]
impl ExtensionInventory for MockInventory {
    async fn installed(&self) -> Result<Vec<String>> {
        Ok(self.installed.read().clone())
    }
}

/// Extension manager replaying scripted outputs
///
/// Successful installs add `installs_as` to the inventory; successful
/// uninstalls remove the uuid.
pub struct MockManager {
    inventory: Arc<MockInventory>,
    installs_as: String,
    outputs: RwLock<VecDeque<CommandOutput>>,
    calls: RwLock<Vec<ExtensionCommand>>,
}

impl MockManager {
    pub fn new(inventory: Arc<MockInventory>, installs_as: &str) -> Arc<Self> {
        Arc::new(Self {
            inventory,
            installs_as: installs_as.to_string(),
            outputs: RwLock::new(VecDeque::new()),
            calls: RwLock::new(Vec::new()),
        })
    }

    pub fn respond(&self, rc: i32, stdout: &str, stderr: &str) {
        self.outputs.write().push_back(CommandOutput {
            rc,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
    }

    pub fn calls(&self) -> Vec<ExtensionCommand> {
        self.calls.read().clone()
    }
}

#[async_trait]
impl ExtensionManager for MockManager {
    async fn run(&self, command: &ExtensionCommand) -> Result<CommandOutput> {
        self.calls.write().push(command.clone());
        let output = self.outputs.write().pop_front().unwrap_or(CommandOutput {
            rc: 0,
            stdout: String::new(),
            stderr: String::new(),
        });

        if output.rc == 0 {
            match command {
                ExtensionCommand::Install { .. } => self.inventory.add(&self.installs_as),
                ExtensionCommand::Uninstall { uuid } => self.inventory.remove(uuid),
            }
        }
        Ok(output)
    }
}
