//! Testing utilities for the initgen workspace
//!
//! Shared fixtures for building definition sources without writing TOML by hand.

#![allow(missing_docs)]

use initgen_registry::{CapabilityIndex, DefinitionSource, Registry};
use toml::{Table, Value};

/// Builder for one definition record
#[derive(Debug, Clone)]
pub struct ComponentDef {
    id: String,
    table: Table,
}

impl ComponentDef {
    /// Non-required global component with routine `init::<id>`
    pub fn global(id: &str, phase: &str) -> Self {
        let mut table = Table::new();
        table.insert("name".into(), Value::String(id.to_string()));
        table.insert("required".into(), Value::Boolean(false));
        table.insert("per_cpu".into(), Value::Boolean(false));
        table.insert("phase".into(), Value::String(phase.to_string()));
        table.insert("routine".into(), Value::String(format!("init::{id}")));
        Self {
            id: id.to_string(),
            table,
        }
    }

    /// Non-required per-CPU component using the `routine` shorthand
    pub fn per_cpu(id: &str, phase: &str) -> Self {
        Self::global(id, phase).with("per_cpu", true)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn required(self) -> Self {
        self.with("required", true)
    }

    pub fn named(self, name: &str) -> Self {
        self.with("name", name)
    }

    pub fn routine(self, routine: &str) -> Self {
        self.with("routine", routine)
    }

    /// Replace `routine` with distinct bootstrap and AP routines
    pub fn split_routines(self, bootstrap: &str, ap: &str) -> Self {
        self.without("routine")
            .with("bootstrap_routine", bootstrap)
            .with("ap_routine", ap)
    }

    pub fn provides(self, capabilities: &[&str]) -> Self {
        self.with("provides_capabilities", list(capabilities))
    }

    pub fn depends_on(self, components: &[&str]) -> Self {
        self.with("depends_on", list(components))
    }

    pub fn depends_on_capabilities(self, capabilities: &[&str]) -> Self {
        self.with("depends_on_capabilities", list(capabilities))
    }

    pub fn ap_depends_on_capabilities(self, capabilities: &[&str]) -> Self {
        self.with("ap_depends_on_capabilities", list(capabilities))
    }

    pub fn importance(self, importance: &str) -> Self {
        self.with("logging_importance", importance)
    }

    pub fn disabled(self) -> Self {
        self.with("disabled", true)
    }

    /// Set an arbitrary key
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.table.insert(key.to_string(), value.into());
        self
    }

    /// Remove a key
    pub fn without(mut self, key: &str) -> Self {
        self.table.remove(key);
        self
    }
}

fn list(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|s| Value::String((*s).to_string())).collect())
}

/// Definition source holding `defs` in order
pub fn source(origin: &str, defs: impl IntoIterator<Item = ComponentDef>) -> DefinitionSource {
    let mut table = Table::new();
    for def in defs {
        table.insert(def.id, Value::Table(def.table));
    }
    DefinitionSource::new(origin, table)
}

/// Definition source parsed from TOML text
pub fn source_from_str(origin: &str, text: &str) -> DefinitionSource {
    DefinitionSource::new(origin, text.parse().unwrap())
}

/// Load a single source, panicking on error
pub fn load(defs: impl IntoIterator<Item = ComponentDef>) -> Registry {
    Registry::load(&[source("test.toml", defs)]).unwrap()
}

/// Load a single source and index its capabilities, panicking on error
pub fn load_indexed(defs: impl IntoIterator<Item = ComponentDef>) -> (Registry, CapabilityIndex) {
    let registry = load(defs);
    let index = CapabilityIndex::build(&registry).unwrap();
    (registry, index)
}
