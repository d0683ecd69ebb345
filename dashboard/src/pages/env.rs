//! Locally displayed environment variables with optimistic edits

use openapi_client::models::EnvVar;

/// An edit to the environment variable list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvChange {
    Add(EnvVar),
    Update { key: String, value: String },
    Delete { key: String },
}

/// An applied change that the backend has not confirmed yet
#[derive(Debug)]
#[must_use = "a pending change must be confirmed or rolled back"]
pub struct PendingChange {
    change: EnvChange,
    snapshot: Vec<EnvVar>,
}

impl PendingChange {
    pub fn change(&self) -> &EnvChange {
        &self.change
    }
}

/// The environment variables shown for a deployment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvList {
    vars: Vec<EnvVar>,
}

impl EnvList {
    pub fn new(vars: Vec<EnvVar>) -> Self {
        Self { vars }
    }

    /// Apply a change right away, remembering how to undo it
    pub fn apply(&mut self, change: EnvChange) -> PendingChange {
        let snapshot = self.vars.clone();

        match &change {
            EnvChange::Add(var) => self.vars.push(var.clone()),
            EnvChange::Update { key, value } => {
                for var in self.vars.iter_mut().filter(|v| &v.key == key) {
                    var.value = value.clone();
                }
            }
            EnvChange::Delete { key } => self.vars.retain(|v| &v.key != key),
        }

        PendingChange { change, snapshot }
    }

    /// Undo a change the backend rejected
    pub fn rollback(&mut self, pending: PendingChange) {
        self.vars = pending.snapshot;
    }

    /// Replace the list with the backend's view
    pub fn replace(&mut self, vars: Vec<EnvVar>) {
        self.vars = vars;
    }

    pub fn get(&self, key: &str) -> Option<&EnvVar> {
        self.vars.iter().find(|v| v.key == key)
    }

    pub fn as_slice(&self) -> &[EnvVar] {
        &self.vars
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
