use crate::domain::model::{Denylist, FieldNames, RunRecord, TransformResult};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    /// Report file, relative to the storage root.
    fn input_file(&self) -> &str;
    /// Storage root; outputs are written here.
    fn output_path(&self) -> &str;
    fn field_names(&self) -> &FieldNames;
    fn denylist(&self) -> &Denylist;
    fn package_changes(&self) -> bool;
}

pub trait Pipeline {
    fn extract(&self) -> Result<RunRecord>;
    fn transform(&self, record: RunRecord) -> Result<TransformResult>;
    fn load(&self, result: TransformResult) -> Result<String>;
}
