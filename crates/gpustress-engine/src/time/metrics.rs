use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, Timelike};

/// Number of slots in the frame-time ring buffer.
///
/// A batch is written once `FRAME_TIME_WINDOW - 1` samples are buffered.
pub const FRAME_TIME_WINDOW: usize = 500;

/// Column header written once at the top of every metrics log.
pub const METRICS_HEADER: &str = "frame,\tmicroseconds (1e-6)\n";

/// Written before every batch except the first one.
const BATCH_SEPARATOR: &[u8] = b",\n";

/// One recorded frame interval.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameSample {
    /// Process-wide frame id, used only as a label in the log.
    pub frame_id: u64,

    /// Time since the previously recorded frame.
    pub delta_micros: u64,
}

/// Where recorded frame times go.
pub enum Recording {
    /// No per-frame recording; only the fps estimate is maintained.
    Disabled,

    /// Create a timestamped `metrics_*.cvs` file in this directory on the first
    /// recorded frame.
    Directory(PathBuf),

    /// Write the log to an arbitrary sink.
    Writer(Box<dyn Write>),
}

impl Recording {
    /// Records into a timestamped file in the current working directory.
    pub fn current_dir() -> Self {
        Self::Directory(PathBuf::from("."))
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl fmt::Debug for Recording {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Directory(dir) => f.debug_tuple("Directory").field(dir).finish(),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Builds the metrics log name for a local date/time.
///
/// Fields are not zero-padded and the extension is `.cvs`; existing tooling
/// that globs for these logs depends on both.
pub fn metrics_file_name<T>(at: &T) -> String
where
    T: Datelike + Timelike,
{
    format!(
        "metrics_{}-{}-{}__{}-{}-{}.cvs",
        at.year(),
        at.month(),
        at.day(),
        at.hour(),
        at.minute(),
        at.second()
    )
}

/// Fixed-capacity frame-time ring buffer with batch flushing.
///
/// The sink is opened lazily on the first recorded frame. That first frame only
/// anchors the previous-frame timestamp; it never produces a sample.
pub(crate) struct FrameRecorder {
    pending: Option<Recording>,
    out: Option<Box<dyn Write>>,

    ring: Box<[FrameSample]>,
    write_index: usize,
    batches_written: u64,

    prev_timestamp: Option<u64>,
}

impl FrameRecorder {
    /// Returns `None` for `Recording::Disabled`.
    pub(crate) fn new(target: Recording) -> Option<Self> {
        if !target.is_enabled() {
            return None;
        }

        Some(Self {
            pending: Some(target),
            out: None,
            ring: vec![FrameSample::default(); FRAME_TIME_WINDOW].into_boxed_slice(),
            write_index: 0,
            batches_written: 0,
            prev_timestamp: None,
        })
    }

    pub(crate) fn buffered(&self) -> usize {
        self.write_index
    }

    pub(crate) fn batches_written(&self) -> u64 {
        self.batches_written
    }

    /// Records the interval ending at `now_micros`.
    ///
    /// Any error means the sink is unusable; the caller drops the recorder.
    pub(crate) fn record(&mut self, frame_id: u64, now_micros: u64) -> Result<()> {
        let Some(prev) = self.prev_timestamp.replace(now_micros) else {
            return self.open();
        };

        self.ring[self.write_index] = FrameSample {
            frame_id,
            delta_micros: now_micros.saturating_sub(prev),
        };
        self.write_index += 1;

        if self.write_index >= self.ring.len() - 1 {
            self.write_batch()?;
        }

        Ok(())
    }

    /// Flushes the underlying writer. Buffered samples of an incomplete batch
    /// are not written.
    pub(crate) fn finish(&mut self) -> Result<()> {
        if let Some(out) = self.out.as_mut() {
            out.flush().context("failed to flush metrics log")?;
        }
        Ok(())
    }

    fn open(&mut self) -> Result<()> {
        let Some(target) = self.pending.take() else {
            return Ok(());
        };

        let mut out: Box<dyn Write> = match target {
            Recording::Disabled => return Ok(()),
            Recording::Directory(dir) => {
                let path = dir.join(metrics_file_name(&Local::now()));
                log::info!("saving metrics in file: {}", path.display());

                let file = File::create(&path)
                    .with_context(|| format!("failed to create metrics file {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            Recording::Writer(writer) => writer,
        };

        out.write_all(METRICS_HEADER.as_bytes())
            .context("failed to write metrics header")?;

        self.out = Some(out);
        Ok(())
    }

    fn write_batch(&mut self) -> Result<()> {
        let out = self.out.as_mut().context("metrics sink is not open")?;
        let batch = &self.ring[..self.write_index];

        log::debug!("dumping {} frame times", batch.len());

        if self.batches_written > 0 {
            out.write_all(BATCH_SEPARATOR)?;
        }

        if let Some((last, body)) = batch.split_last() {
            for sample in body {
                writeln!(out, "{},\t{},", sample.frame_id, sample.delta_micros)?;
            }
            write!(out, "{},\t{}", last.frame_id, last.delta_micros)?;
        }

        out.flush().context("failed to flush metrics batch")?;

        self.write_index = 0;
        self.batches_written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn file_name_fields_are_not_padded() {
        let at = NaiveDate::from_ymd_opt(2017, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 2))
            .unwrap();
        assert_eq!(metrics_file_name(&at), "metrics_2017-3-7__9-5-2.cvs");
    }

    #[test]
    fn file_name_two_digit_fields() {
        let at = NaiveDate::from_ymd_opt(2024, 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 58))
            .unwrap();
        assert_eq!(metrics_file_name(&at), "metrics_2024-12-31__23-59-58.cvs");
    }

    #[test]
    fn disabled_recording_builds_no_recorder() {
        assert!(FrameRecorder::new(Recording::Disabled).is_none());
    }

    #[test]
    fn first_record_only_anchors() {
        let mut rec = FrameRecorder::new(Recording::Writer(Box::new(Vec::new()))).unwrap();
        rec.record(0, 1_000).unwrap();
        assert_eq!(rec.buffered(), 0);

        rec.record(1, 1_750).unwrap();
        assert_eq!(rec.buffered(), 1);
        assert_eq!(
            rec.ring[0],
            FrameSample { frame_id: 1, delta_micros: 750 }
        );
    }

    #[test]
    fn debug_hides_writer() {
        let rec = Recording::Writer(Box::new(Vec::new()));
        assert_eq!(format!("{rec:?}"), "Writer(..)");
    }
}
