use crate::utils::error::{EtlError, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// One `package version repository` triple from a package listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageEntry {
    pub package: String,
    pub version: String,
    pub repository: String,
}

impl PackageEntry {
    pub fn new(package: &str, version: &str, repository: &str) -> Self {
        Self {
            package: package.to_string(),
            version: version.to_string(),
            repository: repository.to_string(),
        }
    }

    /// Splits on whitespace; anything other than exactly three tokens is rejected.
    pub fn from_line(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [package, version, repository] => Ok(Self::new(package, version, repository)),
            _ => Err(EtlError::MalformedPackageLine {
                line: line.to_string(),
                tokens: tokens.len(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Element present but without text content; serialized as `null`.
    Empty,
    Text(String),
    Packages(Vec<PackageEntry>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Empty => Some(""),
            FieldValue::Text(text) => Some(text),
            FieldValue::Packages(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
    pub attributes: BTreeMap<String, String>,
}

impl Field {
    pub fn text(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            value: FieldValue::Text(text.to_string()),
            attributes: BTreeMap::new(),
        }
    }
}

/// The fields of one CI report, in document order, tagged with the OS identifier.
///
/// Records are never mutated in place: every transformation consumes or
/// borrows a record and hands back a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    os: String,
    fields: Vec<Field>,
}

impl RunRecord {
    pub fn new(os: &str) -> Self {
        Self {
            os: os.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&Field> {
        self.get(name).ok_or_else(|| EtlError::MissingField {
            field: name.to_string(),
        })
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        self.require(name)?
            .value
            .as_text()
            .ok_or_else(|| EtlError::NotTextField {
                field: name.to_string(),
            })
    }

    pub fn attributes(&self, name: &str) -> Result<&BTreeMap<String, String>> {
        Ok(&self.require(name)?.attributes)
    }

    /// Adds a field, or replaces the value and attributes of an existing field
    /// with the same name while keeping its position.
    pub fn with_field(mut self, field: Field) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Replaces a field's value; attributes survive. Unknown names are appended.
    pub fn with_value(mut self, name: &str, value: FieldValue) -> Self {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.value = value,
            None => self.fields.push(Field {
                name: name.to_string(),
                value,
                attributes: BTreeMap::new(),
            }),
        }
        self
    }
}

/// The before/after/added view of two package listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageChangeSet {
    pub before: Vec<PackageEntry>,
    pub after: Vec<PackageEntry>,
    pub added: Vec<PackageEntry>,
}

/// Field names the pipeline reads from the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub config: String,
    pub version: String,
    pub timestamp: String,
    pub packages: String,
    pub package_sources: Vec<String>,
    pub changes_before: String,
    pub changes_after: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            config: "bdm-config".to_string(),
            version: "bdm-version".to_string(),
            timestamp: "timestamp".to_string(),
            packages: "packages".to_string(),
            package_sources: vec!["packages-bdm".to_string(), "packages-bdm-all".to_string()],
            changes_before: "packages-pre-bdm".to_string(),
            changes_after: "packages-bdm".to_string(),
        }
    }
}

pub const DEFAULT_DENYLIST: [&str; 10] = [
    "packages-pre-bdm",
    "packages-bdm",
    "packages-bdm-all",
    "timestamp",
    "bdm-version",
    "environment-pre-bdm",
    "environment-bdm",
    "dependency-graph",
    "modules-pre-bdm",
    "modules-bdm",
];

/// Field names kept out of the summary's `info` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist(BTreeSet<String>);

impl Denylist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST)
    }
}

/// Filtered field values in document order; serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info(Vec<(String, FieldValue)>);

impl Info {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for Info {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Info {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Release {
    pub os: String,
    pub version: String,
    pub timestamp: String,
    pub info: Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseSummary {
    pub release: Release,
}

impl ReleaseSummary {
    /// `<os>.<version>.json`
    pub fn file_name(&self) -> String {
        format!("{}.{}.json", self.release.os, self.release.version)
    }

    /// `<os>.<version>.changes.json`
    pub fn changes_file_name(&self) -> String {
        format!("{}.{}.changes.json", self.release.os, self.release.version)
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub summary: ReleaseSummary,
    pub changes: Option<PackageChangeSet>,
}
