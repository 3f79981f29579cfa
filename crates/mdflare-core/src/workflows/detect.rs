use crate::core::contacts::header::ContactFileHeader;
use crate::core::contacts::record::ContactRecord;
use crate::core::contacts::writer::{render_contacts, write_contacts_to_path};
use crate::engine::config::DetectionConfig;
use crate::engine::detectors::{self, Detector};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::provider::StructureProvider;
use crate::engine::scheduler::{self, FrameReport};
use std::io;
use std::path::Path;
use tracing::{info, instrument};

/// Merged output of a detection run, ordered by frame.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub header: ContactFileHeader,
    pub frames: Vec<FrameReport>,
}

impl DetectionResult {
    pub fn records(&self) -> impl Iterator<Item = &ContactRecord> + '_ {
        self.frames.iter().flat_map(|report| report.records.iter())
    }

    pub fn record_count(&self) -> usize {
        self.frames.iter().map(|report| report.records.len()).sum()
    }

    pub fn skipped_pairs(&self) -> usize {
        self.frames.iter().map(|report| report.skipped_pairs).sum()
    }

    pub fn failed_frames(&self) -> Vec<usize> {
        self.frames
            .iter()
            .filter(|report| report.failure.is_some())
            .map(|report| report.frame)
            .collect()
    }

    /// The full contact file text, header first.
    pub fn render(&self) -> String {
        render_contacts(&self.header, self.records())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        write_contacts_to_path(path, &self.header, self.records())
    }
}

/// Detects every configured interaction over the configured frame range.
///
/// Detectors collect their candidates once from the first frame of the range; frames are
/// then processed in parallel and merged back in frame order.
#[instrument(skip_all, name = "detection_workflow")]
pub fn run(
    provider: &dyn StructureProvider,
    config: &DetectionConfig,
    reporter: &ProgressReporter,
) -> Result<DetectionResult, EngineError> {
    // === Phase 1: Resolve frames and prepare detectors ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });

    let frame_count = provider.frame_count();
    let end = config.range.resolved_end(frame_count);
    let frames = config.range.frames(frame_count);
    let Some(&first_frame) = frames.first() else {
        return Err(EngineError::EmptyRange {
            begin: config.range.begin,
            end,
            frame_count,
        });
    };
    info!(
        frame_count,
        begin = config.range.begin,
        end,
        stride = config.range.stride,
        detectors = config.detectors.len(),
        "Preparing interaction detectors."
    );

    let prepared = config
        .detectors
        .iter()
        .map(|&kind| {
            detectors::prepare(kind, provider, first_frame, config).map_err(|source| {
                EngineError::Preparation {
                    detector: kind.tag(),
                    source,
                }
            })
        })
        .collect::<Result<Vec<Box<dyn Detector>>, _>>()?;

    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Per-frame detection ===
    reporter.report(Progress::PhaseStart { name: "Detection" });
    let reports = scheduler::run_frames(provider, &prepared, &frames, config, reporter)?;
    reporter.report(Progress::PhaseFinish);

    let result = DetectionResult {
        header: ContactFileHeader {
            total_frames: frame_count,
            begin: config.range.begin,
            end: end - 1,
            stride: config.range.stride,
            interaction_types: config
                .detectors
                .iter()
                .map(|kind| kind.interaction_type())
                .collect(),
        },
        frames: reports,
    };

    info!(
        records = result.record_count(),
        skipped_pairs = result.skipped_pairs(),
        failed_frames = result.failed_frames().len(),
        "Detection workflow complete."
    );
    Ok(result)
}
