//! Command registry and remote reconciliation
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Reconcile against the remote command list instead of bulk-overwriting it
//! - 1.0.0: Initial implementation for handler dispatch

use dashmap::DashMap;
use log::{error, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::handler::{validate_command, BotCommand};
use crate::core::{ReconcileError, RemoteCallFailure, RemoteOperation};
use crate::platform::{CommandPlatform, RemoteCommandRecord, RemoteId};

/// Desired command set keyed by command name
pub type CommandMap = HashMap<String, Arc<dyn BotCommand>>;

/// Key a list of commands by their declared names (later duplicates win)
pub fn command_map<I>(commands: I) -> CommandMap
where
    I: IntoIterator<Item = Arc<dyn BotCommand>>,
{
    let mut map = CommandMap::new();
    for command in commands {
        let name = command.name().to_string();
        if map.insert(name.clone(), command).is_some() {
            warn!("Command '{name}' declared more than once, keeping the last definition");
        }
    }
    map
}

#[derive(Clone)]
struct RegisteredCommand {
    command: Arc<dyn BotCommand>,
    remote_id: Option<RemoteId>,
}

/// Outcome of one reconcile pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    /// Matched remote commands that were re-pushed
    pub updated: Vec<String>,
    /// Matched remote commands left untouched
    pub retained: Vec<String>,
    pub deleted: Vec<String>,
    pub failures: Vec<RemoteCallFailure>,
}

impl ReconcileReport {
    /// Whether every remote call and validation succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, operation: RemoteOperation, command: &str, reason: impl ToString) {
        self.failures.push(RemoteCallFailure {
            operation,
            command: command.to_string(),
            reason: reason.to_string(),
        });
    }
}

/// Authoritative name -> command mapping shared by the reconciler and the dispatcher
///
/// Lookups never block. Reconcile passes are serialised against each other but
/// run concurrently with lookups; routing is by name, so an in-flight pass only
/// affects remote ids.
#[derive(Default)]
pub struct CommandRegistry {
    commands: DashMap<String, RegisteredCommand>,
    reconcile_lock: Mutex<()>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the command registered under `name`
    pub fn get(&self, name: &str) -> Option<Arc<dyn BotCommand>> {
        self.commands
            .get(name)
            .map(|entry| Arc::clone(&entry.command))
    }

    /// Platform id of `name`, absent until a pass registers it remotely
    pub fn remote_id(&self, name: &str) -> Option<RemoteId> {
        self.commands.get(name).and_then(|entry| entry.remote_id)
    }

    /// Check if a command is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Registered command names, sorted
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Record the platform id of `name`, if it is still registered
    fn set_remote_id(&self, name: &str, remote_id: Option<RemoteId>) {
        if let Some(mut entry) = self.commands.get_mut(name) {
            entry.remote_id = remote_id;
        }
    }

    /// Converge the platform's command list onto `desired`
    ///
    /// Remote commands whose name is desired are matched (and re-pushed when
    /// `update_existing`), remote commands whose name is not desired are
    /// deleted, and desired names with no remote match are created. Afterwards
    /// the registry holds exactly the desired names: valid commands as given,
    /// rejected ones as they were before the pass.
    ///
    /// Only a failed listing aborts the pass; individual create/update/delete
    /// failures are recorded in the report.
    pub async fn reconcile<P>(
        &self,
        platform: &P,
        desired: CommandMap,
        update_existing: bool,
    ) -> Result<ReconcileReport, ReconcileError>
    where
        P: CommandPlatform + ?Sized,
    {
        let _guard = self.reconcile_lock.lock().await;
        let mut report = ReconcileReport::default();

        // Names rejected here keep whatever local entry and remote record they
        // already have, like a failed update.
        let mut rejected: HashSet<String> = HashSet::new();
        let mut desired = desired;
        desired.retain(|name, command| {
            let declared = command.name();
            if declared != name.as_str() {
                warn!("Command keyed as '{name}' declares name '{declared}', skipping");
                report.fail(
                    RemoteOperation::Validate,
                    name,
                    format!("declared name '{declared}' does not match key"),
                );
                rejected.insert(name.clone());
                return false;
            }
            match validate_command(&**command) {
                Ok(()) => true,
                Err(reason) => {
                    warn!("Command '{name}' has an invalid definition: {reason}");
                    report.fail(RemoteOperation::Validate, name, reason);
                    rejected.insert(name.clone());
                    false
                }
            }
        });

        let remote = platform
            .list_commands()
            .await
            .map_err(ReconcileError::Listing)?;
        info!(
            "Reconciling {} desired commands against {} remote commands",
            desired.len(),
            remote.len()
        );

        for (name, command) in &desired {
            let command = Arc::clone(command);
            self.commands
                .entry(name.clone())
                .and_modify(|entry| entry.command = Arc::clone(&command))
                .or_insert(RegisteredCommand {
                    command,
                    remote_id: None,
                });
        }

        let mut detected: HashSet<String> = HashSet::new();
        let mut stale: Vec<RemoteCommandRecord> = Vec::new();

        for record in remote {
            if rejected.contains(&record.name) {
                continue;
            }
            let Some(command) = desired.get(&record.name) else {
                stale.push(record);
                continue;
            };
            if detected.contains(&record.name) {
                warn!(
                    "Duplicate remote command '{}' ({}), treating as stale",
                    record.name, record.id
                );
                stale.push(record);
                continue;
            }

            self.set_remote_id(&record.name, Some(record.id));
            if update_existing {
                match platform.update_command(record.id, &command.definition()).await {
                    Ok(()) => {
                        info!("🔄 Updated command /{} ({})", record.name, record.id);
                        report.updated.push(record.name.clone());
                    }
                    Err(e) => {
                        error!("❌ Failed to update command /{}: {e:#}", record.name);
                        report.fail(RemoteOperation::Update, &record.name, format!("{e:#}"));
                    }
                }
            } else {
                report.retained.push(record.name.clone());
            }
            detected.insert(record.name);
        }

        for record in stale {
            match platform.delete_command(record.id).await {
                Ok(()) => {
                    info!("🗑️ Deleted stale command /{} ({})", record.name, record.id);
                    report.deleted.push(record.name);
                }
                Err(e) => {
                    error!("❌ Failed to delete stale command /{}: {e:#}", record.name);
                    report.fail(RemoteOperation::Delete, &record.name, format!("{e:#}"));
                }
            }
        }

        let mut missing: Vec<&String> = desired
            .keys()
            .filter(|name| !detected.contains(*name))
            .collect();
        missing.sort();

        for name in missing {
            let definition = desired[name].definition();
            match platform.create_command(&definition).await {
                Ok(remote_id) => {
                    info!("✅ Created command /{name} ({remote_id})");
                    self.set_remote_id(name, Some(remote_id));
                    report.created.push(name.clone());
                }
                Err(e) => {
                    error!("❌ Failed to create command /{name}: {e:#}");
                    self.set_remote_id(name, None);
                    report.fail(RemoteOperation::Create, name, format!("{e:#}"));
                }
            }
        }

        self.commands
            .retain(|name, _| desired.contains_key(name) || rejected.contains(name));

        info!(
            "Reconcile finished: {} created, {} updated, {} retained, {} deleted, {} failed",
            report.created.len(),
            report.updated.len(),
            report.retained.len(),
            report.deleted.len(),
            report.failures.len()
        );
        Ok(report)
    }
}
