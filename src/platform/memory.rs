//! In-memory command platform for tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use super::{CommandDefinition, CommandPlatform, RemoteCommandRecord, RemoteId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    List,
    Create(String),
    Update(RemoteId, String),
    Delete(RemoteId),
}

#[derive(Default)]
pub struct MemoryPlatform {
    commands: Mutex<BTreeMap<RemoteId, CommandDefinition>>,
    next_id: AtomicU64,
    calls: Mutex<Vec<PlatformCall>>,
    fail_listing: AtomicBool,
    failing_names: Mutex<HashSet<String>>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            ..Default::default()
        }
    }

    /// Seed a remote command with a fixed id, bypassing the call log
    pub fn with_command(self, id: u64, name: &str) -> Self {
        self.commands.lock().unwrap().insert(
            RemoteId(id),
            CommandDefinition {
                name: name.to_string(),
                description: format!("remote {name}"),
            },
        );
        self
    }

    pub fn fail_listing(&self) {
        self.fail_listing.store(true, Ordering::SeqCst);
    }

    /// Make create/update/delete calls touching `name` fail
    pub fn fail_calls_for(&self, name: &str) {
        self.failing_names.lock().unwrap().insert(name.to_string());
    }

    pub fn remote_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .lock()
            .unwrap()
            .values()
            .map(|d| d.name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn remote_id_of(&self, name: &str) -> Option<RemoteId> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .find(|(_, d)| d.name == name)
            .map(|(id, _)| *id)
    }

    pub fn description_of(&self, name: &str) -> Option<String> {
        self.commands
            .lock()
            .unwrap()
            .values()
            .find(|d| d.name == name)
            .map(|d| d.description.clone())
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failing(&self, name: &str) -> Result<()> {
        if self.failing_names.lock().unwrap().contains(name) {
            return Err(anyhow!("injected failure for {name}"));
        }
        Ok(())
    }
}

#[async_trait]
impl CommandPlatform for MemoryPlatform {
    async fn list_commands(&self) -> Result<Vec<RemoteCommandRecord>> {
        self.record(PlatformCall::List);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(anyhow!("listing unavailable"));
        }
        Ok(self
            .commands
            .lock()
            .unwrap()
            .iter()
            .map(|(id, d)| RemoteCommandRecord {
                name: d.name.clone(),
                id: *id,
            })
            .collect())
    }

    async fn create_command(&self, definition: &CommandDefinition) -> Result<RemoteId> {
        self.record(PlatformCall::Create(definition.name.clone()));
        self.check_failing(&definition.name)?;
        let id = RemoteId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.commands.lock().unwrap().insert(id, definition.clone());
        Ok(id)
    }

    async fn update_command(&self, id: RemoteId, definition: &CommandDefinition) -> Result<()> {
        self.record(PlatformCall::Update(id, definition.name.clone()));
        self.check_failing(&definition.name)?;
        let mut commands = self.commands.lock().unwrap();
        let slot = commands
            .get_mut(&id)
            .ok_or_else(|| anyhow!("unknown command id {id}"))?;
        *slot = definition.clone();
        Ok(())
    }

    async fn delete_command(&self, id: RemoteId) -> Result<()> {
        self.record(PlatformCall::Delete(id));
        let name = self
            .commands
            .lock()
            .unwrap()
            .get(&id)
            .map(|d| d.name.clone())
            .ok_or_else(|| anyhow!("unknown command id {id}"))?;
        self.check_failing(&name)?;
        self.commands.lock().unwrap().remove(&id);
        Ok(())
    }
}
