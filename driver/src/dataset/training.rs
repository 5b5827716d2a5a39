use anyhow::{bail, Context};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dense label indices handed out in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    indices: HashMap<String, usize>,
    labels: Vec<String>,
}

impl LabelIndex {
    pub fn index_of(&mut self, label: &str) -> usize {
        if let Some(&index) = self.indices.get(label) {
            return index;
        }
        let index = self.labels.len();
        self.indices.insert(label.to_string(), index);
        self.labels.push(label.to_string());
        index
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

/// One `label,r1,r2,...` row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRanges {
    pub line: usize,
    pub label: String,
    pub label_index: usize,
    pub ranges: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub rows: Vec<LabeledRanges>,
    pub labels: LabelIndex,
}

pub fn parse_training_data<R: BufRead>(reader: R) -> anyhow::Result<TrainingSet> {
    let mut set = TrainingSet::default();

    for (offset, line) in reader.lines().enumerate() {
        let line_number = offset + 1;
        let line = line.with_context(|| format!("reading training line {}", line_number))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut fields = trimmed.split(',');
        let label = fields.next().map(str::trim).unwrap_or_default();
        if label.is_empty() {
            bail!("training line {} has no label", line_number);
        }

        let ranges = fields
            .map(|field| {
                field.trim().parse::<f64>().with_context(|| {
                    format!("training line {}: bad range {:?}", line_number, field)
                })
            })
            .collect::<anyhow::Result<Vec<f64>>>()?;
        if ranges.is_empty() {
            bail!("training line {} has no ranges", line_number);
        }

        let label_index = set.labels.index_of(label);
        set.rows.push(LabeledRanges {
            line: line_number,
            label: label.to_string(),
            label_index,
            ranges,
        });
    }

    Ok(set)
}

pub fn load_training_file<P: AsRef<Path>>(path: P) -> anyhow::Result<TrainingSet> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref)
        .with_context(|| format!("opening training file {}", path_ref.display()))?;
    parse_training_data(BufReader::new(file))
        .with_context(|| format!("parsing training file {}", path_ref.display()))
}
