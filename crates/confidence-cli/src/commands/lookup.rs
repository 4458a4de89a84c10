//! Get and meta command implementations

use std::io::Write;

use confidence_core::{AppliedFilter, Resolver, Store};
use confidence_loader::DocumentLoader;
use serde_json::Value;

use super::Outcome;
use crate::cli::Lookup;
use crate::criteria;
use crate::error::Result;

/// Output options for the get command
#[derive(Debug, Clone, Copy, Default)]
pub struct GetOptions {
    pub applied: bool,
    pub compact: bool,
}

fn open(loader: &DocumentLoader, lookup: &Lookup, file: &std::path::Path) -> Result<(Store, Value)> {
    let store = Store::from_document(&loader.load(file)?)?;
    let criteria = criteria::build(loader, lookup.criteria.as_deref(), &lookup.filters)?;
    Ok((store, criteria))
}

fn print_json(out: &mut impl Write, value: &Value, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, value)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Run the get command
///
/// The resolved value goes to `out`. With `applied` set the applied-filter
/// log is written to `log` as a JSON array.
pub fn run_get(
    loader: &DocumentLoader,
    file: &std::path::Path,
    lookup: &Lookup,
    options: GetOptions,
    out: &mut impl Write,
    log: &mut impl Write,
) -> Result<Outcome> {
    let (store, criteria) = open(loader, lookup, file)?;

    let mut applied: Vec<AppliedFilter> = Vec::new();
    let resolved = {
        let mut resolver = Resolver::new(&criteria);
        if options.applied {
            resolver = resolver.with_applied(&mut applied);
        }
        store.resolve(&lookup.key, &mut resolver)
    };

    if options.applied {
        serde_json::to_writer(&mut *log, &applied)?;
        writeln!(log)?;
    }

    match resolved {
        Some(value) => {
            print_json(out, &value, options.compact)?;
            Ok(Outcome::Done)
        }
        None => {
            tracing::debug!(key = %lookup.key, "Key resolved to nothing");
            Ok(Outcome::Missing)
        }
    }
}

/// Run the meta command
pub fn run_meta(
    loader: &DocumentLoader,
    file: &std::path::Path,
    lookup: &Lookup,
    out: &mut impl Write,
) -> Result<Outcome> {
    let (store, criteria) = open(loader, lookup, file)?;

    match store.meta(&lookup.key, &criteria) {
        Some(meta) => {
            print_json(out, &meta, false)?;
            Ok(Outcome::Done)
        }
        None => Ok(Outcome::Missing),
    }
}
