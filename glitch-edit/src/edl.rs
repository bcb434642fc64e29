//! Edit Decision List (EDL) export of a track layout.

use glitch_timecode::{FrameRate, Timecode};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::segment::Segment;
use crate::track::{Track, TrackType};

/// EDL format variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdlFormat {
    /// CMX 3600 standard EDL.
    Cmx3600,
    /// Simple CSV format.
    Csv,
    /// JSON format.
    Json,
}

/// One placed segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdlEntry {
    pub source: String,
    pub source_in: Timecode,
    pub source_out: Timecode,
    pub record_in: Timecode,
    pub record_out: Timecode,
    pub reversed: bool,
    pub pitch: f64,
}

impl EdlEntry {
    pub fn from_segment(segment: &Segment) -> Self {
        let source_in = segment
            .active_take()
            .map(|t| t.offset)
            .unwrap_or(Timecode::ZERO);
        Self {
            source: segment.source().into(),
            source_in,
            source_out: source_in + segment.length,
            record_in: segment.start,
            record_out: segment.end(),
            reversed: segment.is_reversed(),
            pitch: segment.pitch,
        }
    }

    pub fn duration(&self) -> Timecode {
        self.record_out.saturating_sub(self.record_in)
    }
}

/// An Edit Decision List.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditDecisionList {
    pub title: String,
    pub rate: FrameRate,
    pub audio: bool,
    pub entries: Vec<EdlEntry>,
}

impl EditDecisionList {
    pub fn with_title(title: &str, rate: FrameRate) -> Self {
        Self {
            title: title.into(),
            rate,
            audio: false,
            entries: Vec::new(),
        }
    }

    /// One entry per segment of `track`, in timeline order.
    pub fn from_track(track: &Track, rate: FrameRate) -> Self {
        Self {
            title: track.name.clone(),
            rate,
            audio: track.track_type == TrackType::Audio,
            entries: track.segments().iter().map(EdlEntry::from_segment).collect(),
        }
    }

    pub fn add_entry(&mut self, entry: EdlEntry) {
        self.entries.push(entry);
    }

    /// Sum of entry durations, gaps excluded.
    pub fn total_duration(&self) -> Timecode {
        self.entries.iter().map(EdlEntry::duration).sum()
    }

    /// Serialize to the specified format.
    pub fn render(&self, format: EdlFormat) -> Result<String> {
        match format {
            EdlFormat::Cmx3600 => Ok(self.to_cmx3600()),
            EdlFormat::Csv => Ok(self.to_csv()),
            EdlFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn to_cmx3600(&self) -> String {
        let channel = if self.audio { "A" } else { "V" };
        let mut out = format!("TITLE: {}\nFCM: NON-DROP FRAME\n", self.title);
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!(
                "{:03}  {:<8}  {}  C        {} {} {} {}\n",
                i + 1,
                reel_name(&entry.source),
                channel,
                entry.source_in.to_smpte(self.rate),
                entry.source_out.to_smpte(self.rate),
                entry.record_in.to_smpte(self.rate),
                entry.record_out.to_smpte(self.rate),
            ));
            out.push_str(&format!("* FROM CLIP NAME: {}\n", entry.source));
            if entry.reversed || (entry.pitch - 1.0).abs() > f64::EPSILON {
                let fps = self.rate.as_f64() * entry.pitch;
                let speed = if entry.reversed { -fps } else { fps };
                out.push_str(&format!(
                    "M2   {:<8}  {:05.1}    {}\n",
                    reel_name(&entry.source),
                    speed,
                    entry.source_in.to_smpte(self.rate),
                ));
            }
        }
        out
    }

    fn to_csv(&self) -> String {
        let mut out = "source,source_in,source_out,record_in,record_out,reversed,pitch\n".to_string();
        for entry in &self.entries {
            out.push_str(&format!(
                "{},{},{},{},{},{},{:.3}\n",
                entry.source,
                entry.source_in.to_millis(),
                entry.source_out.to_millis(),
                entry.record_in.to_millis(),
                entry.record_out.to_millis(),
                entry.reversed,
                entry.pitch,
            ));
        }
        out
    }
}

/// CMX reel names are at most eight characters without extension.
fn reel_name(source: &str) -> String {
    let stem = source
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source)
        .split('.')
        .next()
        .unwrap_or(source);
    stem.chars().take(8).collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{SegmentId, TrackId};
    use crate::host::HostEdit;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Timecode {
        Timecode::from_millis(v)
    }

    fn sample_track() -> Track {
        let mut track = Track::new(TrackId(0), "Glitch Test", TrackType::Video);
        let a = Segment::new(SegmentId(1), "media/intro.mp4", ms(0), ms(1_000));
        let mut b = Segment::new(SegmentId(2), "media/intro.mp4", ms(1_000), ms(500)).offset(ms(2_000));
        b.takes[0].reversed = true;
        for segment in [a, b] {
            track
                .apply(&HostEdit::Insert {
                    track: TrackId(0),
                    segment,
                })
                .unwrap();
        }
        track
    }

    #[test]
    fn test_edl_cmx3600() {
        let edl = EditDecisionList::from_track(&sample_track(), FrameRate::Fps30);
        let text = edl.render(EdlFormat::Cmx3600).unwrap();
        assert!(text.starts_with("TITLE: Glitch Test\n"));
        assert!(text.contains("001  INTRO"));
        assert!(text.contains("00:00:00:00 00:00:01:00 00:00:00:00 00:00:01:00"));
        assert!(text.contains("M2   INTRO     -30.0"));
    }

    #[test]
    fn test_edl_csv() {
        let edl = EditDecisionList::from_track(&sample_track(), FrameRate::Fps25);
        let csv = edl.render(EdlFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "media/intro.mp4,2000,2500,1000,1500,true,1.000");
    }

    #[test]
    fn test_edl_json_round_trip() {
        let edl = EditDecisionList::from_track(&sample_track(), FrameRate::Fps24);
        let json = edl.render(EdlFormat::Json).unwrap();
        let back: EditDecisionList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, edl);
    }

    #[test]
    fn test_total_duration() {
        let mut edl = EditDecisionList::from_track(&sample_track(), FrameRate::Fps30);
        assert_eq!(edl.total_duration(), ms(1_500));
        edl.add_entry(EdlEntry::from_segment(&Segment::new(
            SegmentId(9),
            "b.wav",
            ms(3_000),
            ms(250),
        )));
        assert_eq!(edl.total_duration(), ms(1_750));
    }

    #[test]
    fn test_reel_name() {
        assert_eq!(reel_name("C:\\clips\\very_long_name.mov"), "VERY_LON");
        assert_eq!(reel_name("a.wav"), "A");
    }
}
