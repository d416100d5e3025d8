use crate::core::loader::parse_report_bytes;
use crate::core::projection::build_summary;
use crate::core::transform::{compute_package_changes, derive_packages, normalize_field};
use crate::core::{ConfigProvider, Pipeline, RunRecord, Storage, TransformResult};
use crate::utils::error::Result;

/// Report → release summary pipeline: reads the CI report from storage and
/// writes `<os>.<version>.json` back to it.
pub struct ReleaseInfoPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ReleaseInfoPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for ReleaseInfoPipeline<S, C> {
    fn extract(&self) -> Result<RunRecord> {
        tracing::debug!("Reading CI report: {}", self.config.input_file());
        let data = self.storage.read_file(self.config.input_file())?;
        let record = parse_report_bytes(&data)?;

        tracing::info!("📋 Report for '{}' has {} fields", record.os(), record.len());
        Ok(record)
    }

    fn transform(&self, record: RunRecord) -> Result<TransformResult> {
        let fields = self.config.field_names();

        let record = normalize_field(&record, &fields.config)?;
        let record = derive_packages(&record, &fields.package_sources, &fields.packages)?;

        let changes = if self.config.package_changes() {
            Some(compute_package_changes(
                &record,
                &fields.changes_before,
                &fields.changes_after,
            )?)
        } else {
            None
        };

        let summary = build_summary(&record, fields, self.config.denylist())?;
        tracing::info!(
            "🔧 Summary for {} {} keeps {} of {} fields",
            summary.release.os,
            summary.release.version,
            summary.release.info.len(),
            record.len()
        );

        Ok(TransformResult { summary, changes })
    }

    fn load(&self, result: TransformResult) -> Result<String> {
        let file_name = result.summary.file_name();
        let json = serde_json::to_string(&result.summary)?;

        tracing::debug!("Writing {} bytes to {}", json.len(), file_name);
        self.storage.write_file(&file_name, json.as_bytes())?;

        if let Some(changes) = &result.changes {
            let changes_name = result.summary.changes_file_name();
            let json = serde_json::to_string_pretty(changes)?;
            self.storage.write_file(&changes_name, json.as_bytes())?;
            tracing::info!(
                "📦 Package changes saved: {} ({} added)",
                changes_name,
                changes.added.len()
            );
        }

        Ok(format!("{}/{}", self.config.output_path(), file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Denylist, FieldNames, FieldValue, PackageEntry};
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_report(report: &str) -> Self {
            let mut files = HashMap::new();
            files.insert("ci-run-info.xml".to_string(), report.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned()
        }

        fn file_count(&self) -> usize {
            self.files.lock().unwrap().len()
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().unwrap();
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        fields: FieldNames,
        denylist: Denylist,
        package_changes: bool,
    }

    impl MockConfig {
        fn new(package_changes: bool) -> Self {
            Self {
                fields: FieldNames::default(),
                denylist: Denylist::default(),
                package_changes,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_file(&self) -> &str {
            "ci-run-info.xml"
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn field_names(&self) -> &FieldNames {
            &self.fields
        }

        fn denylist(&self) -> &Denylist {
            &self.denylist
        }

        fn package_changes(&self) -> bool {
            self.package_changes
        }
    }

    fn report(os: &str) -> String {
        format!(
            r#"<ci-run name="{}">
<bdm-version>1.2.3</bdm-version>
<timestamp>2021-01-01T00:00:00Z</timestamp>
<bdm-config>a
b</bdm-config>
<packages-pre-bdm>hdr
x 1 r1</packages-pre-bdm>
<packages-bdm>hdr
x 1 r1</packages-bdm>
<packages-bdm-all>hdr
x 1 r1
y 2 r2</packages-bdm-all>
<environment-bdm>HOME=/root</environment-bdm>
</ci-run>"#,
            os
        )
    }

    #[test]
    fn test_extract_reads_report_from_storage() {
        let storage = MockStorage::with_report(&report("centos-7"));
        let pipeline = ReleaseInfoPipeline::new(storage, MockConfig::new(false));

        let record = pipeline.extract().unwrap();

        assert_eq!(record.os(), "centos-7");
        assert_eq!(record.len(), 7);
    }

    #[test]
    fn test_extract_missing_report() {
        let storage = MockStorage {
            files: Arc::new(Mutex::new(HashMap::new())),
        };
        let pipeline = ReleaseInfoPipeline::new(storage, MockConfig::new(false));

        assert!(matches!(pipeline.extract(), Err(EtlError::IoError(_))));
    }

    #[test]
    fn test_transform_builds_summary() {
        let storage = MockStorage::with_report(&report("centos-7"));
        let pipeline = ReleaseInfoPipeline::new(storage, MockConfig::new(false));

        let record = pipeline.extract().unwrap();
        let result = pipeline.transform(record).unwrap();
        let info = &result.summary.release.info;

        assert!(result.changes.is_none());
        assert_eq!(info.get("bdm-config"), Some(&FieldValue::Text("a b".to_string())));
        assert_eq!(
            info.get("packages"),
            Some(&FieldValue::Packages(vec![
                PackageEntry::new("x", "1", "r1"),
                PackageEntry::new("y", "2", "r2"),
            ]))
        );
        for denied in Denylist::default().iter() {
            assert!(!info.contains_key(denied), "{} leaked into info", denied);
        }
    }

    #[test]
    fn test_transform_unsupported_os() {
        let storage = MockStorage::with_report(&report("macos-10-15"));
        let pipeline = ReleaseInfoPipeline::new(storage, MockConfig::new(false));

        let record = pipeline.extract().unwrap();
        assert!(matches!(
            pipeline.transform(record),
            Err(EtlError::UnsupportedOs { .. })
        ));
    }

    #[test]
    fn test_load_writes_summary_file() {
        let storage = MockStorage::with_report(&report("centos-7"));
        let pipeline = ReleaseInfoPipeline::new(storage.clone(), MockConfig::new(false));

        let record = pipeline.extract().unwrap();
        let result = pipeline.transform(record).unwrap();
        let output_path = pipeline.load(result).unwrap();

        assert_eq!(output_path, "test_output/centos-7.1.2.3.json");
        assert_eq!(storage.file_count(), 2);

        let written = storage.get_file("centos-7.1.2.3.json").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(json["release"]["os"], "centos-7");
        assert_eq!(json["release"]["version"], "1.2.3");
        assert_eq!(json["release"]["timestamp"], "2021-01-01T00:00:00Z");
    }

    #[test]
    fn test_load_writes_package_changes_when_enabled() {
        let storage = MockStorage::with_report(&report("centos-7"));
        let pipeline = ReleaseInfoPipeline::new(storage.clone(), MockConfig::new(true));

        let record = pipeline.extract().unwrap();
        let result = pipeline.transform(record).unwrap();
        pipeline.load(result).unwrap();

        let written = storage.get_file("centos-7.1.2.3.changes.json").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(json["before"].as_array().unwrap().len(), 1);
        assert_eq!(json["after"].as_array().unwrap().len(), 1);
        assert!(json["added"].as_array().unwrap().is_empty());
    }
}
