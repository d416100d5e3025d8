use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting release info extraction");

        let record = self.pipeline.extract()?;
        tracing::info!("📊 Extracted {} fields", record.len());

        let result = self.pipeline.transform(record)?;
        tracing::info!(
            "✅ Transformed report into {} info fields",
            result.summary.release.info.len()
        );

        let output_path = self.pipeline.load(result)?;
        tracing::info!("💾 Output saved to: {}", output_path);

        Ok(output_path)
    }
}
