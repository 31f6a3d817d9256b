use super::metrics::{FrameRecorder, Recording};

/// Length of one benchmark window.
pub const BENCHMARK_INTERVAL_MICROS: u64 = 1_000_000;

/// Converts per-frame timestamps into a once-per-second fps estimate and,
/// optionally, a log of per-frame intervals.
///
/// One instance is owned by the render loop. The caller keeps its own counter of
/// frames rendered since the last benchmark window and passes it to [`tick`];
/// the timer resets it whenever a new fps value is derived.
///
/// Metrics I/O never interrupts the loop: if the log cannot be opened or written,
/// recording is switched off with a warning and fps estimation continues.
///
/// [`tick`]: FrameTimer::tick
pub struct FrameTimer {
    label: String,
    fps: f32,
    window_start: Option<u64>,
    frame_id: u64,
    recorder: Option<FrameRecorder>,
}

impl FrameTimer {
    pub fn new(recording: Recording) -> Self {
        Self {
            label: String::from("gpustress"),
            fps: 0.0,
            window_start: None,
            frame_id: 0,
            recorder: FrameRecorder::new(recording),
        }
    }

    /// Sets the name printed in front of each fps report (usually the scene).
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Most recently computed fps; 0 until the first window closes.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Number of `tick` calls so far.
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Start of the current benchmark window, once anchored.
    pub fn window_start(&self) -> Option<u64> {
        self.window_start
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Samples buffered in the ring and not yet written.
    pub fn buffered_samples(&self) -> usize {
        self.recorder.as_ref().map_or(0, FrameRecorder::buffered)
    }

    /// Batches written to the metrics log so far.
    pub fn batches_written(&self) -> u64 {
        self.recorder.as_ref().map_or(0, FrameRecorder::batches_written)
    }

    /// Advances the timer to `now_micros` and returns the current fps estimate.
    ///
    /// `frames` is the number of frames rendered since the window last reset; it is
    /// set back to 0 whenever more than [`BENCHMARK_INTERVAL_MICROS`] have elapsed
    /// and a new estimate is computed. Between those points the previous estimate
    /// is returned unchanged.
    pub fn tick(&mut self, now_micros: u64, frames: &mut u32) -> f32 {
        let start = *self.window_start.get_or_insert(now_micros);

        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(err) = recorder.record(self.frame_id, now_micros) {
                log::warn!("frame-time recording disabled: {err:#}");
                self.recorder = None;
            }
        }

        let elapsed = now_micros.saturating_sub(start);
        if elapsed > BENCHMARK_INTERVAL_MICROS {
            let secs = elapsed as f64 / 1_000_000.0;
            self.fps = (f64::from(*frames) / secs) as f32;

            log::info!(
                "{}: {} frames in {:.4} seconds: {:.4} fps.",
                self.label,
                frames,
                secs,
                self.fps
            );

            self.window_start = Some(now_micros);
            *frames = 0;
        }

        // Label only; never reset.
        self.frame_id += 1;

        self.fps
    }

    /// Flushes the metrics log. Call once at shutdown.
    pub fn finish(&mut self) {
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(err) = recorder.finish() {
                log::warn!("{err:#}");
            }
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(Recording::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::metrics::{FRAME_TIME_WINDOW, METRICS_HEADER};

    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    /// Accepts `budget` bytes, then fails every write.
    struct FailAfter {
        budget: usize,
        accepted: SharedBuf,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            self.accepted.write(&buf[..n])
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Ticks a full window at `n` evenly spaced frames per second and returns
    /// the estimate reported on the first tick past the window boundary.
    fn fps_at_uniform_rate(n: u32) -> (f32, u32) {
        let mut timer = FrameTimer::default();
        let mut frames = 0u32;
        let mut fps = 0.0;

        for k in 0..=(n + 1) {
            let now = (f64::from(k) * 1_000_000.0 / f64::from(n)).round() as u64;
            fps = timer.tick(now, &mut frames);
            frames += 1;
        }

        (fps, frames)
    }

    fn recording_timer(buf: &SharedBuf) -> FrameTimer {
        FrameTimer::new(Recording::Writer(Box::new(buf.clone())))
    }

    // ── fps estimate ──────────────────────────────────────────────────────

    #[test]
    fn fps_matches_uniform_frame_rate() {
        for n in [24, 30, 60, 75, 144, 240] {
            let (fps, _) = fps_at_uniform_rate(n);
            assert!((fps - n as f32).abs() < 0.01, "n = {n}, fps = {fps}");
        }
    }

    #[test]
    fn frame_counter_resets_at_window_boundary() {
        // Reset to 0 inside tick, then incremented once by the caller.
        let (_, frames) = fps_at_uniform_rate(60);
        assert_eq!(frames, 1);
    }

    #[test]
    fn first_tick_returns_zero_without_io() {
        let mut timer = FrameTimer::default();
        let mut frames = 0;
        assert_eq!(timer.tick(0, &mut frames), 0.0);
        assert!(!timer.is_recording());
        assert_eq!(timer.window_start(), Some(0));
        assert_eq!(timer.batches_written(), 0);
    }

    #[test]
    fn estimate_is_stale_inside_window() {
        let mut timer = FrameTimer::default();
        let mut frames = 0;

        timer.tick(0, &mut frames);
        frames = 50;
        let fps = timer.tick(1_000_001, &mut frames);
        assert!((fps - 50.0).abs() < 0.001);

        frames = 10;
        assert_eq!(timer.tick(1_500_000, &mut frames), fps);
        assert_eq!(frames, 10);
    }

    #[test]
    fn exactly_one_second_does_not_close_window() {
        let mut timer = FrameTimer::default();
        let mut frames = 0;
        timer.tick(0, &mut frames);
        frames = 60;
        assert_eq!(timer.tick(1_000_000, &mut frames), 0.0);
        assert_eq!(frames, 60);
    }

    #[test]
    fn frame_id_counts_every_tick() {
        let mut timer = FrameTimer::default();
        let mut frames = 0;
        for t in 0..10 {
            timer.tick(t * 1_000, &mut frames);
        }
        assert_eq!(timer.frame_id(), 10);
    }

    #[test]
    fn label_does_not_affect_estimate() {
        let mut timer = FrameTimer::default();
        timer.set_label("longShader");
        let mut frames = 0;
        timer.tick(0, &mut frames);
        frames = 30;
        assert!((timer.tick(2_000_001, &mut frames) - 15.0).abs() < 0.001);
    }

    // ── recording ─────────────────────────────────────────────────────────

    #[test]
    fn first_recorded_tick_writes_header_only() {
        let buf = SharedBuf::default();
        let mut timer = recording_timer(&buf);
        let mut frames = 0;

        timer.tick(5_000, &mut frames);

        assert!(timer.is_recording());
        assert_eq!(timer.buffered_samples(), 0);
        assert_eq!(buf.text(), METRICS_HEADER);
    }

    #[test]
    fn ring_flushes_once_at_capacity_minus_one() {
        let buf = SharedBuf::default();
        let mut timer = recording_timer(&buf);
        let mut frames = 0;

        // Anchor, then FRAME_TIME_WINDOW - 2 samples: still buffered.
        timer.tick(0, &mut frames);
        for k in 1..(FRAME_TIME_WINDOW as u64 - 1) {
            timer.tick(k * 1_000, &mut frames);
        }
        assert_eq!(timer.buffered_samples(), FRAME_TIME_WINDOW - 2);
        assert_eq!(timer.batches_written(), 0);

        // 499th sample triggers the flush.
        timer.tick(499_000, &mut frames);
        assert_eq!(timer.batches_written(), 1);
        assert_eq!(timer.buffered_samples(), 0);

        let text = buf.text();
        let body = text.strip_prefix(METRICS_HEADER).unwrap();
        assert!(body.starts_with("1,\t1000,\n2,\t1000,\n"));
        assert!(body.ends_with("498,\t1000,\n499,\t1000"));
        assert_eq!(body.lines().count(), FRAME_TIME_WINDOW - 1);
    }

    #[test]
    fn second_batch_is_preceded_by_separator() {
        let buf = SharedBuf::default();
        let mut timer = recording_timer(&buf);
        let mut frames = 0;

        for k in 0..=(2 * (FRAME_TIME_WINDOW as u64 - 1)) {
            timer.tick(k * 2_000, &mut frames);
        }

        assert_eq!(timer.batches_written(), 2);
        assert_eq!(timer.buffered_samples(), 0);

        let text = buf.text();
        assert!(text.contains("499,\t2000,\n500,\t2000,\n"));
        assert!(text.ends_with("998,\t2000"));
        assert_eq!(text.matches(METRICS_HEADER).count(), 1);
    }

    #[test]
    fn deltas_follow_actual_intervals() {
        let buf = SharedBuf::default();
        let mut timer = recording_timer(&buf);
        let mut frames = 0;

        let mut now = 0;
        timer.tick(now, &mut frames);
        for k in 1..FRAME_TIME_WINDOW as u64 {
            now += k;
            timer.tick(now, &mut frames);
        }

        let text = buf.text();
        assert!(text.contains("\n3,\t3,\n"));
        assert!(text.ends_with("499,\t499"));
    }

    #[test]
    fn write_failure_disables_recording_but_keeps_fps() {
        let mut timer = FrameTimer::new(Recording::Writer(Box::new(BrokenPipe)));
        let mut frames = 0;

        timer.tick(0, &mut frames);
        assert!(!timer.is_recording());

        frames = 20;
        assert!((timer.tick(2_000_001, &mut frames) - 10.0).abs() < 0.001);
    }

    #[test]
    fn batch_write_failure_disables_recording_but_keeps_fps() {
        let accepted = SharedBuf::default();
        let sink = FailAfter {
            budget: METRICS_HEADER.len() + 16,
            accepted: accepted.clone(),
        };
        let mut timer = FrameTimer::new(Recording::Writer(Box::new(sink)));
        let mut frames = 0;

        timer.tick(0, &mut frames);
        for k in 1..(FRAME_TIME_WINDOW as u64 - 1) {
            timer.tick(k * 1_000, &mut frames);
        }
        assert!(timer.is_recording());
        assert_eq!(accepted.text(), METRICS_HEADER);

        // 499th sample starts the first batch, which runs out of space.
        timer.tick(499_000, &mut frames);
        assert!(!timer.is_recording());
        assert_eq!(timer.batches_written(), 0);
        assert!(accepted.text().starts_with(METRICS_HEADER));

        frames = 40;
        let fps = timer.tick(2_000_001, &mut frames);
        assert!((fps - 20.0).abs() < 0.001);
        assert_eq!(frames, 0);
        assert_eq!(timer.frame_id(), FRAME_TIME_WINDOW as u64 + 1);
    }

    #[test]
    fn unopenable_directory_disables_recording() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does").join("not").join("exist");

        let mut timer = FrameTimer::new(Recording::Directory(missing));
        let mut frames = 0;
        timer.tick(0, &mut frames);
        timer.tick(1_000, &mut frames);

        assert!(!timer.is_recording());
        assert_eq!(timer.frame_id(), 2);
    }

    #[test]
    fn directory_log_is_created_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let mut timer = FrameTimer::new(Recording::Directory(dir.path().to_path_buf()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let mut frames = 0;
        timer.tick(0, &mut frames);
        timer.finish();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("metrics_"));
        assert!(entries[0].ends_with(".cvs"));

        let contents = std::fs::read_to_string(dir.path().join(&entries[0])).unwrap();
        assert_eq!(contents, METRICS_HEADER);
    }
}
