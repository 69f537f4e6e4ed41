//! End-to-end capture session tests with scripted collaborators.

mod common;

use std::sync::atomic::Ordering;

use common::{init_tracing, ms, solid_frame, ScriptedClassifier, ScriptedLocalizer};
use facecap_models::{CapturePhase, FaceDetection, FrameReport};
use facecap_vision::{CaptureSession, PipelineConfig};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

/// `n` non-overlapping faces along the middle row.
fn faces(n: usize, confidence: f64) -> Vec<FaceDetection> {
    (0..n)
        .map(|i| FaceDetection::new(120.0, 40.0 + 80.0 * i as f64, 40.0, confidence))
        .collect()
}

/// Feed one frame every 100 ms from 0 to `until` inclusive.
fn run(session: &mut CaptureSession, until: u64) -> Vec<FrameReport> {
    let frame = solid_frame(WIDTH, HEIGHT, 128);
    (0..=until)
        .step_by(100)
        .map(|t| session.process_frame(&frame, WIDTH, HEIGHT, ms(t)).unwrap())
        .collect()
}

fn capture_times(reports: &[FrameReport]) -> Vec<u64> {
    reports
        .iter()
        .filter(|r| r.did_capture())
        .map(|r| r.timestamp.as_millis() as u64)
        .collect()
}

#[test]
fn test_steady_face_captures_once_after_window() {
    init_tracing();
    let mut session = CaptureSession::new(PipelineConfig::new(), ms(0))
        .unwrap()
        .with_classifier(Box::new(ScriptedClassifier::constant(faces(1, 60.0))))
        .with_localizer(Box::new(ScriptedLocalizer::offset(1.0, -1.0)));

    let reports = run(&mut session, 12_000);

    assert_eq!(capture_times(&reports), vec![8000]);
    assert_eq!(reports[29].phase, CapturePhase::Warming);
    assert_eq!(reports[30].phase, CapturePhase::Validating);
    assert!(reports[80..].iter().all(|r| r.phase == CapturePhase::Captured));

    let captured = reports[80].captured.as_ref().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!((captured[0].x, captured[0].y), (20, 100));
    assert_eq!((captured[0].width, captured[0].height), (40, 40));
    assert!(captured[0].to_data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));

    let pupils = reports[80].pupils[0];
    assert_eq!(pupils.found(), 2);
    assert_eq!(session.stats().max_for_key("0.20"), 1);
}

#[test]
fn test_single_bad_frame_delays_capture() {
    init_tracing();
    // Frame index = t / 100. Best count 4 at t=0, steady 3, one frame with 1 at t=4000
    let classifier = ScriptedClassifier::from_fn(|i, _| {
        Ok(match i {
            0 => faces(4, 60.0),
            40 => faces(1, 60.0),
            _ => faces(3, 60.0),
        })
    });
    let config = PipelineConfig::new().with_memory_size(1);
    let mut session = CaptureSession::new(config, ms(0))
        .unwrap()
        .with_classifier(Box::new(classifier));

    let reports = run(&mut session, 12_000);

    assert_eq!(reports[40].stats.current, 1);
    assert_eq!(reports[40].stats.max_for_key("0.20"), 4);
    assert_eq!(capture_times(&reports), vec![9000]);
    assert_eq!(reports[90].captured.as_ref().unwrap().len(), 1);
}

#[test]
fn test_no_faces_captures_empty_list_by_default() {
    init_tracing();
    let mut session = CaptureSession::new(PipelineConfig::new(), ms(0))
        .unwrap()
        .with_classifier(Box::new(ScriptedClassifier::constant(Vec::new())));

    let reports = run(&mut session, 9000);

    assert_eq!(capture_times(&reports), vec![8000]);
    assert!(reports[80].captured.as_ref().unwrap().is_empty());
}

#[test]
fn test_require_faces_blocks_empty_capture() {
    init_tracing();
    let config = PipelineConfig::new().with_require_faces(true);
    let mut session = CaptureSession::new(config, ms(0))
        .unwrap()
        .with_classifier(Box::new(ScriptedClassifier::constant(Vec::new())));

    let reports = run(&mut session, 15_000);

    assert!(capture_times(&reports).is_empty());
    assert_eq!(session.phase(), CapturePhase::Validating);
}

#[test]
fn test_failing_classifier_degrades_to_empty() {
    init_tracing();
    let classifier = ScriptedClassifier::failing();
    let calls = classifier.calls();
    let mut session = CaptureSession::new(PipelineConfig::new(), ms(0))
        .unwrap()
        .with_classifier(Box::new(classifier));

    let reports = run(&mut session, 1000);

    assert_eq!(calls.load(Ordering::SeqCst), 11);
    assert!(reports.iter().all(|r| r.faces.is_empty() && r.stats.current == 0));
}

#[test]
fn test_malformed_candidates_are_dropped_not_fatal() {
    init_tracing();
    let good = FaceDetection::new(120.0, 160.0, 100.0, 80.0);
    let classifier = ScriptedClassifier::from_fn(move |i, _| {
        let malformed = match i % 3 {
            0 => FaceDetection::new(121.0, 160.0, 100.0, f64::NAN),
            1 => FaceDetection::new(120.0, 161.0, -100.0, 90.0),
            _ => FaceDetection::new(f64::INFINITY, 160.0, 100.0, 90.0),
        };
        Ok(vec![good, malformed])
    });
    let config = PipelineConfig::new().with_memory_size(1);
    let mut session = CaptureSession::new(config, ms(0))
        .unwrap()
        .with_classifier(Box::new(classifier))
        .with_localizer(Box::new(ScriptedLocalizer::offset(0.0, 0.0)));

    let reports = run(&mut session, 8000);

    assert!(reports.iter().all(|r| r.faces == vec![good]));
    assert!(reports.iter().all(|r| r.stats.current == 1));
    assert_eq!(capture_times(&reports), vec![8000]);
    assert_eq!(reports[80].captured.as_ref().unwrap().len(), 1);
}

#[test]
fn test_weak_faces_need_temporal_support() {
    init_tracing();
    // 20 per frame: below the floor until three frames are remembered
    let mut session = CaptureSession::new(PipelineConfig::new(), ms(0))
        .unwrap()
        .with_classifier(Box::new(ScriptedClassifier::constant(faces(1, 20.0))));

    let reports = run(&mut session, 400);

    let counts: Vec<usize> = reports.iter().map(|r| r.faces.len()).collect();
    assert_eq!(counts, vec![0, 0, 1, 1, 1]);
}

#[test]
fn test_classifier_attached_late() {
    init_tracing();
    let config = PipelineConfig::new().with_memory_size(1);
    let mut session = CaptureSession::new(config, ms(0)).unwrap();
    let frame = solid_frame(WIDTH, HEIGHT, 0);

    let before = session.process_frame(&frame, WIDTH, HEIGHT, ms(0)).unwrap();
    assert!(before.faces.is_empty());

    session.attach_classifier(Box::new(ScriptedClassifier::constant(faces(2, 60.0))));
    let after = session.process_frame(&frame, WIDTH, HEIGHT, ms(100)).unwrap();
    assert_eq!(after.faces.len(), 2);
    // No localizer yet: faces are reported without pupils
    assert_eq!(after.pupils.len(), 2);
    assert!(after.pupils.iter().all(|p| p.found() == 0));
}

#[test]
fn test_out_of_frame_eyes_never_reach_localizer() {
    init_tracing();
    // Face in the top-left corner: both eye rows are negative
    let corner = FaceDetection::new(2.0, 10.0, 60.0, 60.0);
    let localizer = ScriptedLocalizer::offset(0.0, 0.0);
    let calls = localizer.calls();
    let windows = localizer.windows();
    let config = PipelineConfig::new().with_memory_size(1);
    let mut session = CaptureSession::new(config, ms(0))
        .unwrap()
        .with_classifier(Box::new(ScriptedClassifier::constant(vec![
            corner,
            FaceDetection::new(120.0, 200.0, 60.0, 60.0),
        ])))
        .with_localizer(Box::new(localizer));

    let report = run(&mut session, 0).remove(0);

    assert_eq!(report.faces.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    for (row, col, size) in windows.lock().unwrap().iter() {
        assert!(*row >= 0.0 && *row < HEIGHT as f64);
        assert!(*col >= 0.0 && *col < WIDTH as f64);
        assert!(*size > 0.0);
    }
    let corner_index = report.faces.iter().position(|f| f.row == 2.0).unwrap();
    assert_eq!(report.pupils[corner_index].found(), 0);
    assert_eq!(report.pupils[1 - corner_index].found(), 2);
}

#[test]
fn test_bad_localizer_output_is_not_fatal() {
    init_tracing();
    let localizer = ScriptedLocalizer::from_fn(|row, _, _| {
        if row > 100.0 {
            Ok(vec![f64::NAN, 1.0])
        } else {
            Ok(vec![1.0])
        }
    });
    let config = PipelineConfig::new().with_memory_size(1);
    let mut session = CaptureSession::new(config, ms(0))
        .unwrap()
        .with_classifier(Box::new(ScriptedClassifier::constant(faces(2, 60.0))))
        .with_localizer(Box::new(localizer));

    let report = run(&mut session, 0).remove(0);
    assert_eq!(report.faces.len(), 2);
    assert!(report.pupils.iter().all(|p| p.found() == 0));
}

#[test]
fn test_reset_starts_new_capture_cycle() {
    init_tracing();
    let mut session = CaptureSession::new(PipelineConfig::new(), ms(0))
        .unwrap()
        .with_classifier(Box::new(ScriptedClassifier::constant(faces(1, 60.0))));
    run(&mut session, 8000);
    assert_eq!(session.phase(), CapturePhase::Captured);

    session.reset(ms(10_000));
    assert_eq!(session.phase(), CapturePhase::Warming);

    let frame = solid_frame(WIDTH, HEIGHT, 128);
    let captures: Vec<u64> = (10_000..=20_000)
        .step_by(100)
        .filter_map(|t| {
            let report = session.process_frame(&frame, WIDTH, HEIGHT, ms(t)).unwrap();
            report.did_capture().then_some(t)
        })
        .collect();
    assert_eq!(captures, vec![18_000]);
}

#[test]
fn test_report_serializes() {
    init_tracing();
    let mut session = CaptureSession::new(PipelineConfig::new().with_memory_size(1), ms(0))
        .unwrap()
        .with_classifier(Box::new(ScriptedClassifier::constant(faces(1, 60.0))));
    let report = run(&mut session, 0).remove(0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["phase"], "warming");
    assert_eq!(json["stats"]["current"], 1);
    assert_eq!(json["stats"]["max_by_threshold"]["0.20"], 1);
    assert!(json["captured"].is_null());
}
