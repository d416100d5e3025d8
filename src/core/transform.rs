use crate::domain::model::{FieldValue, PackageChangeSet, RunRecord};
use crate::domain::os::OsFamily;
use crate::utils::error::Result;
use std::collections::BTreeSet;

/// Collapses every whitespace run, newlines included, into one space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_field(record: &RunRecord, name: &str) -> Result<RunRecord> {
    let normalized = normalize_whitespace(record.text(name)?);
    tracing::debug!("Normalized whitespace in '{}'", name);
    Ok(record
        .clone()
        .with_value(name, FieldValue::Text(normalized)))
}

/// Lines of a package listing with the header (line 0) dropped, as a set of raw strings.
///
/// Deduplication happens on the raw line, so two lines naming the same
/// package with different spacing stay distinct.
pub fn package_lines<'a>(record: &'a RunRecord, name: &str) -> Result<BTreeSet<&'a str>> {
    Ok(record.text(name)?.lines().skip(1).collect())
}

pub fn compute_package_changes(
    record: &RunRecord,
    before_field: &str,
    after_field: &str,
) -> Result<PackageChangeSet> {
    let format = OsFamily::from_identifier(record.os()).package_format()?;

    let before = package_lines(record, before_field)?;
    let after = package_lines(record, after_field)?;
    let added: BTreeSet<&str> = after.difference(&before).copied().collect();

    tracing::debug!(
        "Package changes {} -> {}: {} before, {} after, {} added",
        before_field,
        after_field,
        before.len(),
        after.len(),
        added.len()
    );

    Ok(PackageChangeSet {
        before: format.parse_lines(before)?,
        after: format.parse_lines(after)?,
        added: format.parse_lines(added)?,
    })
}

/// Unions the listings in `sources` and stores the parsed entries under `target`.
pub fn derive_packages(record: &RunRecord, sources: &[String], target: &str) -> Result<RunRecord> {
    let format = OsFamily::from_identifier(record.os()).package_format()?;

    let mut lines = BTreeSet::new();
    for source in sources {
        lines.extend(package_lines(record, source)?);
    }

    let packages = format.parse_lines(lines)?;
    tracing::debug!("Derived {} packages into '{}'", packages.len(), target);

    Ok(record
        .clone()
        .with_value(target, FieldValue::Packages(packages)))
}
