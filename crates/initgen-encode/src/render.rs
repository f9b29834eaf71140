//! C++ table rendering
//!
//! Produces the generated source: an include of the kernel header, forward
//! declarations of every referenced routine grouped by namespace, the entry
//! table terminated by the sentinel and the completion array sized to the
//! entry count.

use crate::config::EncoderConfig;
use crate::sequence::SequenceEntry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Render `entries` as a complete C++ translation unit
#[must_use]
pub fn render(entries: &[SequenceEntry], config: &EncoderConfig) -> String {
    Artifact { entries, config }.to_string()
}

/// Forward declarations: functions by enclosing namespace, top level first
fn forward_declarations(entries: &[SequenceEntry]) -> BTreeMap<Option<&str>, BTreeSet<&str>> {
    let mut declarations: BTreeMap<Option<&str>, BTreeSet<&str>> = BTreeMap::new();
    for (bootstrap, ap) in entries.iter().filter_map(SequenceEntry::routines) {
        for routine in [bootstrap, ap] {
            declarations
                .entry(routine.namespace())
                .or_default()
                .insert(routine.function());
        }
    }
    declarations
}

/// Escape a display name for a C string literal
///
/// Other ASCII control characters become three-digit octal escapes.
fn escape(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() && c.is_ascii() => {
                escaped.push_str(&format!("\\{:03o}", u32::from(c)));
            }
            c => escaped.push(c),
        }
    }
    escaped
}

struct Artifact<'a> {
    entries: &'a [SequenceEntry],
    config: &'a EncoderConfig,
}

impl Artifact<'_> {
    fn write_entry(&self, f: &mut fmt::Formatter<'_>, entry: &SequenceEntry) -> fmt::Result {
        let (bootstrap, ap) = entry
            .routines()
            .map_or(("nullptr", "nullptr"), |(b, a)| (b.as_str(), a.as_str()));
        write!(
            f,
            "\t\t{{ .name = \"{}\", .bootstrap_initializer = {bootstrap}, .ap_initializer = {ap}, .flags = {}, .logging_importance = LoggingImportance::{} }}",
            escape(&entry.name),
            entry.flags,
            entry.logging_importance,
        )
    }
}

impl fmt::Display for Artifact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config;
        writeln!(f, "#include <{}>", config.header)?;

        for (namespace, functions) in forward_declarations(self.entries) {
            match namespace {
                None => {
                    for function in functions {
                        writeln!(f, "extern bool {function}();")?;
                    }
                }
                Some(namespace) => {
                    writeln!(f, "namespace {namespace} {{")?;
                    for function in functions {
                        writeln!(f, "\textern bool {function}();")?;
                    }
                    writeln!(f, "}}")?;
                    writeln!(f)?;
                }
            }
        }

        writeln!(f, "namespace {} {{", config.namespace)?;
        writeln!(f, "\tconst {} {}[] = {{", config.entry_type, config.table_name)?;
        for entry in self.entries {
            self.write_entry(f, entry)?;
            writeln!(f, ",")?;
        }
        writeln!(f, "\t\t{}", config.sentinel)?;
        writeln!(f, "\t}};")?;
        writeln!(
            f,
            "\tAtomic<bool> {}[{}];",
            config.completion_array,
            self.entries.len() + 1
        )?;
        writeln!(f, "}}")
    }
}
