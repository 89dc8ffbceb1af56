/*!
 * Tests for timeline assembly - the clip placement algorithm
 */

use subvoice::app_config::ClipPolicy;
use subvoice::audio::AudioFormat;
use subvoice::errors::AssemblyError;
use subvoice::subtitle_processor::SubtitleEntry;
use subvoice::timeline::{TimelineAssembler, MIN_TRUNCATE_WINDOW_MS, TAIL_PAD_MS};

use crate::common;
use crate::common::mock_provider::{MockTtsProvider, MOCK_AMPLITUDE};

const FORMAT: AudioFormat = AudioFormat {
    sample_rate: 24_000,
    channels: 1,
};

fn assembler() -> TimelineAssembler {
    TimelineAssembler::new(FORMAT, ClipPolicy::Overlay)
}

fn entry(seq: usize, start_ms: u64, end_ms: u64, text: &str) -> SubtitleEntry {
    SubtitleEntry::new(seq, start_ms, end_ms, text.to_string())
}

fn frame_at(ms: u64) -> usize {
    (ms * FORMAT.sample_rate as u64 / 1000) as usize
}

/// Test empty caption input yields no track
#[tokio::test]
async fn test_assemble_withNoEntries_shouldReturnNone() {
    let provider = MockTtsProvider::new(FORMAT);
    let track = assembler()
        .assemble(&[], &provider, "alloy", |_, _| {})
        .await
        .unwrap();

    assert!(track.is_none());
    assert_eq!(provider.call_count(), 0);
}

/// Test the track always spans the last caption's end plus the tail pad
#[tokio::test]
async fn test_assemble_withMultipleCaptions_shouldFixTotalDuration() {
    let entries = vec![
        entry(1, 0, 2000, "first"),
        entry(2, 3000, 5000, "second"),
        entry(3, 6000, 9000, "third"),
    ];
    // Clip lengths have no bearing on the total duration
    let provider = MockTtsProvider::new(FORMAT).with_clip_ms(400);

    let track = assembler()
        .assemble(&entries, &provider, "alloy", |_, _| {})
        .await
        .unwrap()
        .unwrap();

    assert_eq!(track.duration_ms(), 9000 + TAIL_PAD_MS);
    assert_eq!(provider.call_count(), 3);
}

/// Scenario B: clip longer than a >500ms window is truncated exactly to it
#[tokio::test]
async fn test_assemble_withOverrunningClip_shouldTruncateToWindow() {
    let entries = vec![entry(1, 0, 2000, "hello")];
    let provider = MockTtsProvider::new(FORMAT).with_clip_ms(3000);

    let track = assembler()
        .assemble(&entries, &provider, "alloy", |_, _| {})
        .await
        .unwrap()
        .unwrap();

    assert_eq!(track.duration_ms(), 3000);
    // Audio up to the window's end, silence after it
    assert_eq!(track.samples()[frame_at(1999)], MOCK_AMPLITUDE);
    assert_eq!(track.samples()[frame_at(2000)], 0);
    assert_eq!(track.samples()[frame_at(2500)], 0);
}

/// Scenario C: a window at or below 500ms never truncates its clip
#[tokio::test]
async fn test_assemble_withShortWindow_shouldKeepNaturalClipLength() {
    let entries = vec![entry(1, 1000, 1300, "hi")];
    let provider = MockTtsProvider::new(FORMAT).with_clip_ms(900);

    let track = assembler()
        .assemble(&entries, &provider, "alloy", |_, _| {})
        .await
        .unwrap()
        .unwrap();

    assert_eq!(track.duration_ms(), 1300 + TAIL_PAD_MS);
    // The clip's natural tail extends past the caption window
    assert_eq!(track.samples()[frame_at(999)], 0);
    assert_eq!(track.samples()[frame_at(1000)], MOCK_AMPLITUDE);
    assert_eq!(track.samples()[frame_at(1500)], MOCK_AMPLITUDE);
    assert_eq!(track.samples()[frame_at(1899)], MOCK_AMPLITUDE);
    assert_eq!(track.samples()[frame_at(1900)], 0);
}

/// Test a window of exactly 500ms sits on the keep side of the truncation rule
#[tokio::test]
async fn test_assemble_withExactThresholdWindow_shouldKeepNaturalClipLength() {
    let entries = vec![entry(1, 1000, 1000 + MIN_TRUNCATE_WINDOW_MS, "hi")];
    let provider = MockTtsProvider::new(FORMAT).with_clip_ms(900);

    let track = assembler()
        .assemble(&entries, &provider, "alloy", |_, _| {})
        .await
        .unwrap()
        .unwrap();

    // Only windows strictly longer than the threshold truncate, so the
    // overrunning clip survives in full
    assert_eq!(entries[0].window_ms(), MIN_TRUNCATE_WINDOW_MS);
    assert_eq!(track.samples()[frame_at(1499)], MOCK_AMPLITUDE);
    assert_eq!(track.samples()[frame_at(1500)], MOCK_AMPLITUDE);
    assert_eq!(track.samples()[frame_at(1899)], MOCK_AMPLITUDE);
    assert_eq!(track.samples()[frame_at(1900)], 0);
}

/// Scenario D: untruncated clips bleeding into the next caption mix additively
#[tokio::test]
async fn test_assemble_withBleedingClips_shouldMixOverlapRegion() {
    let entries = vec![
        entry(1, 1000, 1300, "short window"),
        entry(2, 1600, 2600, "next caption"),
    ];
    let provider = MockTtsProvider::new(FORMAT)
        .with_clip_ms_for("short window", 900)
        .with_clip_ms_for("next caption", 800);

    let track = assembler()
        .assemble(&entries, &provider, "alloy", |_, _| {})
        .await
        .unwrap()
        .unwrap();

    // First clip alone: 1000..1600
    assert_eq!(track.samples()[frame_at(1200)], MOCK_AMPLITUDE);
    // Overlap region 1600..1900 carries both signals
    assert_eq!(track.samples()[frame_at(1700)], 2 * MOCK_AMPLITUDE);
    // Second clip alone: 1900..2400
    assert_eq!(track.samples()[frame_at(2000)], MOCK_AMPLITUDE);
    assert_eq!(track.samples()[frame_at(2500)], 0);
}

/// Test whitespace-only captions are skipped without a synthesis call
#[tokio::test]
async fn test_assemble_withWhitespaceCaption_shouldSkipSynthesis() {
    let entries = vec![
        entry(1, 0, 1000, "spoken"),
        entry(2, 2000, 3000, "   "),
        entry(3, 4000, 5000, "also spoken"),
    ];
    let provider = MockTtsProvider::new(FORMAT).with_clip_ms(500);

    let track = assembler()
        .assemble(&entries, &provider, "alloy", |_, _| {})
        .await
        .unwrap()
        .unwrap();

    assert_eq!(provider.calls(), vec!["spoken", "also spoken"]);
    // The skipped caption's region stays silent
    assert_eq!(track.samples()[frame_at(2100)], 0);
    assert_eq!(track.samples()[frame_at(2900)], 0);
}

/// Test progress advances over every caption, including skipped ones
#[tokio::test]
async fn test_assemble_withSkippedCaptions_shouldStillReportFullProgress() {
    let entries = vec![
        entry(1, 0, 1000, ""),
        entry(2, 2000, 3000, "spoken"),
        entry(3, 4000, 5000, " "),
    ];
    let provider = MockTtsProvider::new(FORMAT).with_clip_ms(500);

    let mut reported = Vec::new();
    assembler()
        .assemble(&entries, &provider, "alloy", |completed, total| {
            reported.push((completed, total));
        })
        .await
        .unwrap();

    assert_eq!(reported, vec![(1, 3), (2, 3), (3, 3)]);
}

/// Test the strict policy hard-clips even below the 500ms threshold
#[tokio::test]
async fn test_assemble_withStrictPolicy_shouldClipShortWindows() {
    let entries = vec![entry(1, 1000, 1300, "hi")];
    let provider = MockTtsProvider::new(FORMAT).with_clip_ms(900);

    let track = TimelineAssembler::new(FORMAT, ClipPolicy::Strict)
        .assemble(&entries, &provider, "alloy", |_, _| {})
        .await
        .unwrap()
        .unwrap();

    assert!(entries[0].window_ms() <= MIN_TRUNCATE_WINDOW_MS);
    assert_eq!(track.samples()[frame_at(1299)], MOCK_AMPLITUDE);
    assert_eq!(track.samples()[frame_at(1300)], 0);
}

/// Scenario E (assembly level): a mid-run synthesis failure aborts everything
#[tokio::test]
async fn test_assemble_withSynthesisFailure_shouldAbortRun() {
    let entries: Vec<SubtitleEntry> = (0..5)
        .map(|i| {
            entry(
                i + 1,
                i as u64 * 2000,
                i as u64 * 2000 + 1000,
                &format!("caption {}", i + 1),
            )
        })
        .collect();
    let provider = MockTtsProvider::new(FORMAT).failing_on_call(2);

    let result = assembler()
        .assemble(&entries, &provider, "alloy", |_, _| {})
        .await;

    assert!(matches!(result, Err(AssemblyError::Provider(_))));
    // Captions after the failure are never synthesized
    assert_eq!(provider.call_count(), 2);
}

/// Test determinism: the same input produces byte-identical tracks
#[test]
fn test_assemble_runTwice_shouldProduceIdenticalTracks() {
    common::init_test_logging();

    let entries = vec![
        entry(1, 0, 2000, "first caption"),
        entry(2, 2500, 3000, "second caption"),
    ];
    let provider = MockTtsProvider::new(FORMAT).with_clip_ms(1500);

    let (first, second) = tokio_test::block_on(async {
        let first = assembler()
            .assemble(&entries, &provider, "alloy", |_, _| {})
            .await
            .unwrap()
            .unwrap();
        let second = assembler()
            .assemble(&entries, &provider, "alloy", |_, _| {})
            .await
            .unwrap()
            .unwrap();
        (first, second)
    });

    assert_eq!(first.samples(), second.samples());
}

/// Test clips exactly matching their window are never truncated
#[tokio::test]
async fn test_assemble_withExactFitClip_shouldNotTruncate() {
    let entries = vec![entry(1, 0, 2000, "exact fit")];
    let provider = MockTtsProvider::new(FORMAT).with_clip_ms(2000);

    let track = assembler()
        .assemble(&entries, &provider, "alloy", |_, _| {})
        .await
        .unwrap()
        .unwrap();

    assert_eq!(track.samples()[frame_at(1999)], MOCK_AMPLITUDE);
    assert_eq!(track.samples()[frame_at(2000)], 0);
}
