use super::config::DetectionConfig;
use super::detectors::{Detector, FrameContext, FrameOutput};
use super::error::{EngineError, ProviderError};
use super::progress::{Progress, ProgressReporter};
use super::provider::StructureProvider;
use super::scope::SelectionScope;
use crate::core::contacts::record::ContactRecord;
use rayon::prelude::*;
use tracing::{info, instrument, warn};

/// Everything one frame task produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: usize,
    pub records: Vec<ContactRecord>,
    /// Candidate pairs dropped because their geometry could not be evaluated.
    pub skipped_pairs: usize,
    /// Set when the frame could not be processed at all; `records` is then empty.
    pub failure: Option<String>,
}

impl FrameReport {
    fn failed(frame: usize, error: &ProviderError) -> Self {
        Self {
            frame,
            records: Vec::new(),
            skipped_pairs: 0,
            failure: Some(error.to_string()),
        }
    }
}

/// Runs every detector over every frame on a dedicated pool of `config.workers` threads.
///
/// Reports come back sorted by frame index, so the result does not depend on the worker
/// count or on scheduling order.
#[instrument(skip_all, name = "frame_scheduler", fields(frames = frames.len(), workers = config.workers))]
pub fn run_frames(
    provider: &dyn StructureProvider,
    detectors: &[Box<dyn Detector>],
    frames: &[usize],
    config: &DetectionConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<FrameReport>, EngineError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|e| EngineError::WorkerPool(e.to_string()))?;

    reporter.report(Progress::TaskStart {
        total_steps: frames.len() as u64,
    });

    let mut reports: Vec<FrameReport> = pool.install(|| {
        frames
            .par_iter()
            .map(|&frame| {
                let report = process_frame(provider, detectors, frame, config);
                if let Some(reason) = &report.failure {
                    warn!(frame, %reason, "Frame failed, continuing without its contacts");
                    reporter.report(Progress::FrameFailed {
                        frame,
                        reason: reason.clone(),
                    });
                }
                reporter.report(Progress::TaskIncrement);
                report
            })
            .collect()
    });

    reporter.report(Progress::TaskFinish);

    reports.sort_by_key(|report| report.frame);
    info!(
        records = reports.iter().map(|r| r.records.len()).sum::<usize>(),
        failed = reports.iter().filter(|r| r.failure.is_some()).count(),
        "Frame processing complete."
    );
    Ok(reports)
}

fn process_frame(
    provider: &dyn StructureProvider,
    detectors: &[Box<dyn Detector>],
    frame: usize,
    config: &DetectionConfig,
) -> FrameReport {
    let frame_count = provider.frame_count();
    if frame >= frame_count {
        return FrameReport::failed(frame, &ProviderError::FrameOutOfRange { frame, frame_count });
    }

    let scope = match SelectionScope::resolve(
        provider,
        frame,
        config.selection.as_ref(),
        config.selection2.as_ref(),
    ) {
        Ok(scope) => scope,
        Err(error) => return FrameReport::failed(frame, &error),
    };

    let ctx = FrameContext {
        provider,
        frame,
        scope: &scope,
        cutoffs: &config.cutoffs,
    };
    let mut out = FrameOutput::default();
    for detector in detectors {
        detector.detect(&ctx, &mut out);
    }

    FrameReport {
        frame,
        records: out.records,
        skipped_pairs: out.skipped_pairs,
        failure: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::DetectionConfigBuilder;
    use crate::engine::detectors::test_support::trajectory;
    use crate::engine::detectors::{DetectorKind, prepare};
    use crate::core::models::trajectory::Trajectory;
    use nalgebra::Point3;
    use std::sync::Mutex;

    /// A lysine drifting away from an aspartate by 0.5 Å per frame.
    fn drifting_pair(frame_count: usize) -> Trajectory {
        let mut t = trajectory(&[
            ('A', 1, "ASP", "OD1", [0.0, 0.0, 0.0]),
            ('A', 5, "LYS", "NZ", [3.0, 0.0, 0.0]),
        ]);
        let frames = (0..frame_count)
            .map(|i| {
                let x = 3.0 + 0.5 * i as f64;
                t.frame_from_labels([
                    ("A:ASP:1:OD1", Point3::origin()),
                    ("A:LYS:5:NZ", Point3::new(x, 0.0, 0.0)),
                ])
                .0
            })
            .collect();
        t.replace_frames(frames);
        t
    }

    fn config(workers: usize) -> DetectionConfig {
        DetectionConfigBuilder::new()
            .detectors(vec![DetectorKind::SaltBridge, DetectorKind::VanDerWaals])
            .workers(workers)
            .build()
            .unwrap()
    }

    fn detectors(t: &Trajectory, config: &DetectionConfig) -> Vec<Box<dyn Detector>> {
        config
            .detectors
            .iter()
            .map(|&kind| prepare(kind, t, 0, config).unwrap())
            .collect()
    }

    #[test]
    fn output_is_identical_for_one_and_four_workers() {
        let t = drifting_pair(12);
        let frames: Vec<usize> = (0..12).collect();
        let reporter = ProgressReporter::new();

        let single = config(1);
        let quad = config(4);
        let a = run_frames(&t, &detectors(&t, &single), &frames, &single, &reporter).unwrap();
        let b = run_frames(&t, &detectors(&t, &quad), &frames, &quad, &reporter).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.iter().map(|r| r.frame).collect::<Vec<_>>(), frames);
        assert_eq!(a[0].records.len(), 2);
        assert_eq!(a[1].records.len(), 2);
        assert!(a[11].records.is_empty());
    }

    #[test]
    fn records_follow_detector_registration_order() {
        let t = drifting_pair(1);
        let config = config(2);
        let reports = run_frames(&t, &detectors(&t, &config), &[0], &config, &ProgressReporter::new())
            .unwrap();
        let tags: Vec<&str> = reports[0]
            .records
            .iter()
            .map(|r| r.interaction_type().tag())
            .collect();
        assert_eq!(tags, ["sb", "vdw"]);
    }

    #[test]
    fn failed_frame_does_not_affect_its_siblings() {
        let t = drifting_pair(2);
        let config = config(2);
        let failures = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::FrameFailed { frame, .. } = event {
                failures.lock().unwrap().push(frame);
            }
        }));

        let reports = run_frames(&t, &detectors(&t, &config), &[0, 7, 1], &config, &reporter)
            .unwrap();
        drop(reporter);

        assert_eq!(reports.iter().map(|r| r.frame).collect::<Vec<_>>(), [0, 1, 7]);
        assert_eq!(reports[0].records.len(), 2);
        assert_eq!(reports[1].records.len(), 2);
        assert!(reports[2].records.is_empty());
        assert!(reports[2].failure.is_some());
        assert_eq!(failures.into_inner().unwrap(), [7]);
    }

    #[test]
    fn progress_counts_every_frame() {
        let t = drifting_pair(3);
        let config = config(2);
        let increments = Mutex::new(0u64);
        let total = Mutex::new(0u64);
        let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
            Progress::TaskStart { total_steps } => *total.lock().unwrap() = total_steps,
            Progress::TaskIncrement => *increments.lock().unwrap() += 1,
            _ => {}
        }));
        run_frames(&t, &detectors(&t, &config), &[0, 1, 2], &config, &reporter).unwrap();
        drop(reporter);
        assert_eq!(total.into_inner().unwrap(), 3);
        assert_eq!(increments.into_inner().unwrap(), 3);
    }
}
