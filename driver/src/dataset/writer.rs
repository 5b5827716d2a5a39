use anyhow::{ensure, Context};
use placecore::FeatureVector;
use std::io::Write;

/// Writes `label,label_index,<features...>` rows under a named header.
pub struct FeatureCsvWriter<W: Write> {
    inner: W,
    width: usize,
    rows: usize,
}

impl<W: Write> FeatureCsvWriter<W> {
    pub fn new(mut inner: W, feature_names: &[String]) -> anyhow::Result<Self> {
        writeln!(inner, "label,label_index,{}", feature_names.join(","))
            .context("writing feature header")?;
        Ok(Self {
            inner,
            width: feature_names.len(),
            rows: 0,
        })
    }

    pub fn write_row(
        &mut self,
        label: &str,
        label_index: usize,
        features: &FeatureVector,
    ) -> anyhow::Result<()> {
        ensure!(
            features.len() == self.width,
            "feature row has {} values, header has {}",
            features.len(),
            self.width
        );
        ensure!(!label.contains(','), "label {:?} contains a comma", label);

        let values: Vec<String> = features.as_slice().iter().map(|v| v.to_string()).collect();
        writeln!(self.inner, "{},{},{}", label, label_index, values.join(","))
            .with_context(|| format!("writing feature row {}", self.rows + 1))?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> anyhow::Result<W> {
        self.inner.flush().context("flushing feature rows")?;
        Ok(self.inner)
    }
}
