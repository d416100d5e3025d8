use crate::domain::model::{Denylist, FieldNames, Info, Release, ReleaseSummary, RunRecord};
use crate::utils::error::Result;

/// Every field not on the denylist, reduced to its value. Attributes are dropped.
pub fn project(record: &RunRecord, denylist: &Denylist) -> Info {
    record
        .fields()
        .iter()
        .filter(|field| !denylist.contains(&field.name))
        .map(|field| (field.name.clone(), field.value.clone()))
        .collect()
}

pub fn build_summary(
    record: &RunRecord,
    fields: &FieldNames,
    denylist: &Denylist,
) -> Result<ReleaseSummary> {
    Ok(ReleaseSummary {
        release: Release {
            os: record.os().to_string(),
            version: record.text(&fields.version)?.to_string(),
            timestamp: record.text(&fields.timestamp)?.to_string(),
            info: project(record, denylist),
        },
    })
}
