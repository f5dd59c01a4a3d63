use std::collections::BTreeMap;

use clap::Parser;
use serde::Serialize;
use serde_json::Value;

use crate::context::{ContextRead, ContextStore};
use crate::errors::Result;

/// Exit status when any `--get` lookup failed.
pub const EXIT_LOOKUP_FAILED: i32 = 2;
/// Exit status when a `--context` document was rejected.
pub const EXIT_INVALID_CONTEXT: i32 = 1;

/// Seed the context store from JSON documents and query it.
#[derive(Parser, Debug)]
#[command(name = "ctxa", author, version, about)]
pub struct Args {
    /// JSON object of contexts. Repeatable; the first occurrence of a key wins.
    #[arg(long = "context", value_name = "JSON")]
    pub contexts: Vec<String>,
    /// Key to look up (repeatable)
    #[arg(long = "get", value_name = "KEY")]
    pub gets: Vec<String>,
    /// Key to check for presence (repeatable)
    #[arg(long = "has", value_name = "KEY")]
    pub hases: Vec<String>,
    /// Debug logging on stderr
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Lookup {
    Found(Value),
    Error { error: String },
}

#[derive(Serialize, Debug)]
pub struct Report {
    pub context: Value,
    pub lookups: BTreeMap<String, Lookup>,
    pub presence: BTreeMap<String, bool>,
}

impl Report {
    pub fn failed(&self) -> bool {
        self.lookups.values().any(|l| matches!(l, Lookup::Error { .. }))
    }

    pub fn exit_code(&self) -> i32 {
        if self.failed() { EXIT_LOOKUP_FAILED } else { 0 }
    }
}

/// Apply the `--context` documents in order, then answer `--get` and `--has`.
/// Stops at the first rejected document.
pub fn run(args: &Args, ctx: &ContextStore) -> Result<Report> {
    for doc in &args.contexts {
        ctx.set_context_json(doc)?;
    }

    let lookups = args
        .gets
        .iter()
        .map(|key| {
            let lookup = match ctx.get(key) {
                Ok(v) => Lookup::Found(v),
                Err(e) => Lookup::Error { error: e.to_string() },
            };
            (key.clone(), lookup)
        })
        .collect();
    let presence = args.hases.iter().map(|key| (key.clone(), ctx.has(key))).collect();

    Ok(Report {
        context: ctx.snapshot(),
        lookups,
        presence,
    })
}

/// Process exit status for the outcome of [`run`].
pub fn exit_code(outcome: &Result<Report>) -> i32 {
    match outcome {
        Ok(report) => report.exit_code(),
        Err(_) => EXIT_INVALID_CONTEXT,
    }
}
