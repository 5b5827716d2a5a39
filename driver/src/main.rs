use anyhow::Context;
use bridge::FeatureBridge;
use clap::Parser;
use dataset::{load_training_file, FeatureCsvWriter, LabelIndex};
use generator::profile::{build_labeled_scans, GeneratorConfig};
use log::warn;
use placecore::RangeScan;
use std::fs::{self, File};
use std::io::BufWriter;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod bridge;
mod dataset;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Range-scan place feature extraction driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Labeled scans, one `label,r1,r2,...` row per line
    #[arg(long, conflicts_with = "synthetic")]
    training: Option<PathBuf>,
    /// Generate this many synthetic scans per place instead of reading a file
    #[arg(long)]
    synthetic: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write `label,label_index,features...` rows here
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, allow_negative_numbers = true)]
    angle_min: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    angle_increment: Option<f64>,
    #[arg(long)]
    workers: Option<usize>,
    /// Keep the live-scan HTTP endpoint alive until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value = "127.0.0.1:9000")]
    bind: SocketAddr,
}

struct LabeledScan {
    origin: String,
    label: String,
    label_index: usize,
    scan: RangeScan,
}

fn collect_scans(args: &Args, runner: &Runner) -> anyhow::Result<(Vec<LabeledScan>, LabelIndex)> {
    if let Some(path) = &args.training {
        let set = load_training_file(path)?;
        let scans = set
            .rows
            .into_iter()
            .map(|row| LabeledScan {
                origin: format!("line {}", row.line),
                label: row.label,
                label_index: row.label_index,
                scan: runner.scan_from_ranges(row.ranges),
            })
            .collect();
        return Ok((scans, set.labels));
    }

    let mut labels = LabelIndex::default();
    if let Some(per_place) = args.synthetic {
        let base = GeneratorConfig {
            seed: args.seed,
            ..Default::default()
        };
        let scans = build_labeled_scans(per_place, &base)?
            .into_iter()
            .enumerate()
            .map(|(k, (label, scan))| LabeledScan {
                origin: format!("synthetic #{}", k),
                label_index: labels.index_of(&label),
                label,
                scan,
            })
            .collect();
        return Ok((scans, labels));
    }

    Ok((Vec::new(), labels))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    }
    .with_overrides(args.angle_min, args.angle_increment, args.workers);

    let runner = Runner::new(workflow_config)?;
    let (scans, labels) = collect_scans(&args, &runner)?;

    let bridge = if args.serve {
        Some(FeatureBridge::spawn(Arc::new(runner.clone()), args.bind)?)
    } else {
        None
    };

    if !scans.is_empty() {
        println!("Labels ({}): {}", labels.len(), labels.labels().join(", "));
        let (meta, batch): (Vec<_>, Vec<_>) = scans
            .into_iter()
            .map(|labeled| {
                let meta = (labeled.origin, labeled.label, labeled.label_index);
                (meta, labeled.scan)
            })
            .unzip();
        let results = runner.execute_batch(batch)?;

        let mut writer = match &args.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                let file = File::create(path)
                    .with_context(|| format!("creating feature file {}", path.display()))?;
                let names = runner.extractor().config().feature_names();
                Some(FeatureCsvWriter::new(BufWriter::new(file), &names)?)
            }
            None => None,
        };

        let mut last = None;
        for ((origin, label, label_index), result) in meta.iter().zip(results) {
            match result {
                Ok(result) => {
                    if let Some(writer) = writer.as_mut() {
                        writer.write_row(label, *label_index, &result.features)?;
                    }
                    last = Some(result);
                }
                Err(err) => warn!("skipping {} ({}): {}", origin, label, err),
            }
        }
        if let Some(writer) = writer {
            let rows = writer.rows();
            writer.finish()?;
            println!("Wrote {} feature rows", rows);
        }
        if let (Some(bridge), Some(result)) = (bridge.as_ref(), last) {
            bridge.publish(result);
        }

        let metrics = runner.metrics();
        println!(
            "Batch run -> scans {}, extracted {}, failed {}, zero-divisor substitutions {}, features per scan {}",
            meta.len(),
            metrics.processed,
            metrics.errors,
            metrics.substitutions,
            runner.extractor().feature_len()
        );
    }

    if let Some(bridge) = bridge {
        bridge.publish_status(&format!(
            "HTTP bridge running on {} (Ctrl+C to stop)...",
            bridge.address()
        ));
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
