use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use ndarray::Array1;

use facetrack_rs::tracker::Rect;
use facetrack_rs::{
    FaceDetection, FaceDetector, FaceEmbedder, FaceImage, Frame, FrameProcessor, Identity,
    IdentityIndex, IdentityMatcher, Ledger, LedgerStatus, MatcherConfig, PoolConfig,
    SessionClassifier, SessionStatus, SightingSink, TrackingConfig,
};

/// Pixel value marking a face region that embeds close to the enrolled
/// "alice" vectors.
const ALICE: u8 = 10;
/// Pixel value marking a face that embeds far from everything enrolled.
const STRANGER: u8 = 20;
/// Pixel value marking a face whose embedding cannot be computed.
const UNEMBEDDABLE: u8 = 30;

struct ScriptedDetector {
    frames: VecDeque<Vec<FaceDetection>>,
}

impl ScriptedDetector {
    fn new(frames: Vec<Vec<FaceDetection>>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl FaceDetector for ScriptedDetector {
    type Error = std::convert::Infallible;

    fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceDetection>, Self::Error> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}

/// Maps the marker value in a crop's first pixel to a fixed embedding.
struct MarkerEmbedder;

impl FaceEmbedder for MarkerEmbedder {
    fn embed(&self, face: &FaceImage) -> Option<Array1<f32>> {
        match face.data().first().copied().unwrap_or(0) {
            ALICE => Some(Array1::from_vec(vec![1.0, 0.0, 0.0, 0.05])),
            STRANGER => Some(Array1::from_vec(vec![0.0, 0.0, 1.0, 0.0])),
            _ => None,
        }
    }
}

struct MemoryLedger {
    seen: Mutex<HashSet<String>>,
    closed: bool,
}

impl MemoryLedger {
    fn open() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            closed: false,
        }
    }

    fn closing() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            closed: true,
        }
    }
}

impl Ledger for MemoryLedger {
    fn check_and_mark(&self, label: &str) -> LedgerStatus {
        if self.closed {
            return LedgerStatus::SessionClosed;
        }
        let mut seen = self.seen.lock().unwrap();
        if seen.insert(label.to_string()) {
            LedgerStatus::NewlySet
        } else {
            LedgerStatus::AlreadyLogged
        }
    }
}

/// Records persisted sightings into a handle the test keeps.
#[derive(Default, Clone)]
struct RecordingSink {
    persisted: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    fn labels(&self) -> Vec<String> {
        self.persisted.lock().unwrap().clone()
    }
}

impl SightingSink for RecordingSink {
    fn persist(&self, identity: &Identity, _image: &FaceImage) -> bool {
        self.persisted.lock().unwrap().push(identity.to_string());
        true
    }
}

fn face_rect() -> Rect {
    Rect::new(10.0, 10.0, 20.0, 20.0)
}

fn frame_with_face(marker: u8) -> Frame {
    let mut data = vec![0u8; 100 * 100 * 3];
    let (x, y, w, h) = face_rect().to_pixel_bounds(100, 100);
    for row in y..y + h {
        for col in x..x + w {
            let idx = (row as usize * 100 + col as usize) * 3;
            data[idx..idx + 3].copy_from_slice(&[marker; 3]);
        }
    }
    Frame::new(data, 100, 100)
}

fn enrolled_matcher() -> IdentityMatcher {
    let index = IdentityIndex::new(4);
    index
        .add("alice", Array1::from_vec(vec![1.0, 0.0, 0.0, 0.0]))
        .unwrap();
    index
        .add("alice", Array1::from_vec(vec![0.99, 0.05, 0.0, 0.0]))
        .unwrap();
    IdentityMatcher::new(Some(Arc::new(index)), MatcherConfig::default())
}

fn tracking_config() -> TrackingConfig {
    TrackingConfig {
        max_life: 2,
        sure_known: 2,
        sure_unknown: 2,
        ..TrackingConfig::default()
    }
}

fn processor(
    detector: ScriptedDetector,
    ledger: MemoryLedger,
) -> FrameProcessor<ScriptedDetector, MemoryLedger, RecordingSink> {
    processor_with_sink(detector, ledger, RecordingSink::default())
}

fn processor_with_sink(
    detector: ScriptedDetector,
    ledger: MemoryLedger,
    sink: RecordingSink,
) -> FrameProcessor<ScriptedDetector, MemoryLedger, RecordingSink> {
    FrameProcessor::new(
        detector,
        Arc::new(MarkerEmbedder),
        enrolled_matcher(),
        SessionClassifier::new(ledger, sink),
        tracking_config(),
        PoolConfig::default(),
    )
}

fn run_stream(
    processor: &mut FrameProcessor<ScriptedDetector, MemoryLedger, RecordingSink>,
    marker: u8,
    frames_with_face: usize,
    empty_frames: usize,
) -> Vec<SessionStatus> {
    let face_frame = frame_with_face(marker);
    let empty_frame = Frame::blank(100, 100);
    let mut statuses = Vec::new();
    for _ in 0..frames_with_face {
        let (_, outcome) = processor.process_frame(&face_frame);
        statuses.push(outcome.status);
    }
    for _ in 0..empty_frames {
        let (_, outcome) = processor.process_frame(&empty_frame);
        statuses.push(outcome.status);
    }
    statuses
}

fn scripted(marker_frames: usize, empty_frames: usize) -> ScriptedDetector {
    let mut frames = Vec::new();
    for _ in 0..marker_frames {
        frames.push(vec![FaceDetection::new(face_rect(), 0.9)]);
    }
    for _ in 0..empty_frames {
        frames.push(vec![]);
    }
    ScriptedDetector::new(frames)
}

#[test]
fn test_known_person_reported_once() {
    let mut processor = processor(scripted(4, 2), MemoryLedger::open());
    let statuses = run_stream(&mut processor, ALICE, 4, 2);

    // While the face is present nothing expires, so every frame reads as
    // NOT_FOUND; the verdict lands when the track dies out.
    assert_eq!(&statuses[..5], &[SessionStatus::NotFound; 5]);
    assert_eq!(statuses[5], SessionStatus::FoundPerson);
}

#[test]
fn test_second_sighting_is_already_logged() {
    let mut frames = Vec::new();
    for _ in 0..4 {
        frames.push(vec![FaceDetection::new(face_rect(), 0.9)]);
    }
    frames.push(vec![]);
    frames.push(vec![]);
    for _ in 0..4 {
        frames.push(vec![FaceDetection::new(face_rect(), 0.9)]);
    }
    frames.push(vec![]);
    frames.push(vec![]);

    let mut processor = processor(ScriptedDetector::new(frames), MemoryLedger::open());
    let first = run_stream(&mut processor, ALICE, 4, 2);
    assert_eq!(first[5], SessionStatus::FoundPerson);

    let second = run_stream(&mut processor, ALICE, 4, 2);
    assert_eq!(second[5], SessionStatus::AlreadyLogged);
}

#[test]
fn test_stranger_reported_unknown() {
    let sink = RecordingSink::default();
    let mut processor = processor_with_sink(scripted(4, 2), MemoryLedger::open(), sink.clone());
    let statuses = run_stream(&mut processor, STRANGER, 4, 2);

    assert_eq!(statuses[5], SessionStatus::FoundUnknown);

    // The unknown sighting was routed to the sink with its snapshot.
    assert_eq!(sink.labels(), vec!["UNKNOWN"]);
}

#[test]
fn test_unembeddable_face_never_tracks() {
    let mut processor = processor(scripted(4, 2), MemoryLedger::open());
    let statuses = run_stream(&mut processor, UNEMBEDDABLE, 4, 2);

    assert!(statuses.iter().all(|s| *s == SessionStatus::NotFound));
    assert!(processor.manager().is_empty());
}

#[test]
fn test_session_closing_short_circuits() {
    let mut processor = processor(scripted(4, 2), MemoryLedger::closing());
    let statuses = run_stream(&mut processor, ALICE, 4, 2);

    assert_eq!(statuses[5], SessionStatus::SessionEnd);
}

#[test]
fn test_flush_session_drains_live_tracks() {
    let mut processor = processor(scripted(4, 0), MemoryLedger::open());
    run_stream(&mut processor, ALICE, 4, 0);
    assert_eq!(processor.manager().len(), 1);

    let summaries = processor.flush_session();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].identity, Identity::known("alice"));
    assert!(processor.manager().is_empty());
}

#[test]
fn test_annotated_frame_differs_from_input() {
    let mut processor = processor(scripted(1, 0), MemoryLedger::open());
    let frame = frame_with_face(ALICE);
    let (annotated, _) = processor.process_frame(&frame);

    assert_ne!(annotated.data(), frame.data());
}

#[test]
fn test_empty_frame_returns_original_pixels() {
    let mut processor = processor(scripted(0, 1), MemoryLedger::open());
    let frame = Frame::blank(100, 100);
    let (returned, outcome) = processor.process_frame(&frame);

    assert_eq!(returned.data(), frame.data());
    assert_eq!(outcome.status, SessionStatus::NotFound);
}
