use crate::codes::{
    AudioFormat, CharacterCode, ColorSpace, DynamicRange, FrameRate, FrameRateFraction, MarkType,
    PlaybackType, SampleRate, StreamCodingType, StreamType, SubPathType, VideoFormat,
};
use crate::decoder::{Parser, ParserOptions};
use crate::MplsError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Display},
    io::Read,
    ops::{Add, AddAssign, Sub},
};

/// The movie playlist.
///
/// See the [crate-level docs] for high-level documentation about how to use this type.
///
/// [crate-level docs]: ../index.html
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mpls {
    pub header: Header,
    pub app_info_play_list: AppInfoPlayList,
    pub play_list: Playlist,
    pub marks: Vec<PlayListMark>,
    /// Chapter start times relative to the start of the playlist.
    pub chapters: Vec<TimeStamp>,
}

/// Represents a playlist's angle.
///
/// "Angles", as they are called, are just a variation of a playlist where one
/// or more segments are swapped out for different ones. The overall number of
/// segments, however, is always the same for all angles.
///
/// You can use the [`segments`] method to retrieve the playlist segments
/// associated with this angle.
///
/// [`segments`]: #method.segments
#[derive(Copy, Clone, Debug)]
pub struct Angle<'mpls> {
    /// The angle index in this playlist.
    pub index: u8,
    mpls: &'mpls Mpls,
}

impl Display for Angle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index)
    }
}

impl Mpls {
    /// Parses a movie playlist from an in-memory buffer with default options.
    pub fn parse(bytes: &[u8]) -> Result<Mpls, MplsError> {
        Mpls::parse_with(bytes, ParserOptions::default())
    }

    /// Parses a movie playlist from an in-memory buffer.
    pub fn parse_with(bytes: &[u8], options: ParserOptions) -> Result<Mpls, MplsError> {
        let mut parser = Parser::new().with_options(options);
        parser.parse(bytes)?;
        Ok(parser.into_parts())
    }

    /// Attempts to parse a movie playlist from the given reader.
    ///
    /// # Examples
    /// ```no_run
    /// # fn main() -> std::io::Result<()> {
    /// use std::fs::File;
    /// use bluray_mpls::Mpls;
    ///
    /// let file = File::open("00800.mpls")?;
    /// let mpls = Mpls::from(&file).expect("failed to parse MPLS file.");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from<R: Read>(mut reader: R) -> Result<Mpls, MplsError> {
        let bytes = {
            let mut buffer = Vec::new();
            reader.read_to_end(&mut buffer)?;
            buffer
        };

        Mpls::parse(&bytes)
    }

    /// Gets all of the movie's angles.
    ///
    /// This method returns at least one element for any playlist with play
    /// items, since it counts the main feature as an angle regardless of
    /// whether the movie contains any additional angles.
    pub fn angles(&self) -> Vec<Angle> {
        self.play_list
            .items
            .iter()
            .map(|p| p.angles.len() + 1)
            .max()
            .map(|n| {
                (0..n)
                    .map(|i| Angle {
                        index: i as u8,
                        mpls: self,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Angle<'_> {
    /// Gets all segments for this angle, one per play item.
    pub fn segments(&self) -> Vec<&Clip> {
        self.mpls
            .play_list
            .items
            .iter()
            .map(|item| item.clip_for_angle(self))
            .collect()
    }
}

/// A time stamp, relative to some System Time Clock sequence, expressed in 45 KHz.
///
/// To get a floating-point value in seconds, you can use the [`seconds`] method.
///
/// [`seconds`]: #method.seconds
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeStamp(pub i64);

impl TimeStamp {
    pub const ZERO: TimeStamp = TimeStamp(0);
    pub const CLOCK_RATE: i64 = 45_000;

    /// Returns this time stamp in units of seconds.
    pub fn seconds(&self) -> f64 {
        (self.0 as f64) / (TimeStamp::CLOCK_RATE as f64)
    }

    /// Returns this time stamp in nanoseconds.
    ///
    /// Saturates at the `i64` range.
    pub fn nanoseconds(&self) -> i64 {
        // 1e9 / 45e3 == 200_000 / 9
        let ns = i128::from(self.0) * 200_000 / 9;
        ns.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for TimeStamp {
    type Output = TimeStamp;

    fn add(self, rhs: TimeStamp) -> TimeStamp {
        TimeStamp(self.0 + rhs.0)
    }
}

impl AddAssign for TimeStamp {
    fn add_assign(&mut self, rhs: TimeStamp) {
        self.0 += rhs.0;
    }
}

impl Sub for TimeStamp {
    type Output = TimeStamp;

    fn sub(self, rhs: TimeStamp) -> TimeStamp {
        TimeStamp(self.0 - rhs.0)
    }
}

impl Debug for TimeStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeStamp")
            .field("raw", &self.0)
            .field("secs", &self.seconds())
            .finish()
    }
}

impl Display for TimeStamp {
    /// Formats as `HH:MM:SS.mmm`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let millis = self.0.abs() / 45;
        write!(
            f,
            "{}{:02}:{:02}:{:02}.{:03}",
            sign,
            millis / 3_600_000,
            millis / 60_000 % 60,
            millis / 1_000 % 60,
            millis % 1_000
        )
    }
}

/// A four character code, such as the `MPLS` type indicator.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub const MPLS: FourCc = FourCc(*b"MPLS");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<&[u8; 4]> for FourCc {
    fn from(bytes: &[u8; 4]) -> Self {
        FourCc(*bytes)
    }
}

impl Display for FourCc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl Debug for FourCc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FourCc({:?})", String::from_utf8_lossy(&self.0))
    }
}

/// The fixed file header: type indicators and the section start addresses.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    pub type_indicator: FourCc,
    pub version: FourCc,
    pub playlist_pos: u32,
    pub chapter_pos: u32,
    pub ext_pos: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AppInfoPlayList {
    pub playback_type: PlaybackType,
    pub playback_count: Option<u16>,
    pub user_opt_mask: u64,
    pub flags: u16,
}

impl Default for AppInfoPlayList {
    fn default() -> Self {
        AppInfoPlayList {
            playback_type: PlaybackType::Unknown,
            playback_count: None,
            user_opt_mask: 0,
            flags: 0,
        }
    }
}

/// An elementary stream selectable during a play item.
///
/// `format` and `rate` hold the raw nibbles of the attribute block; use the
/// decoding helpers to interpret them for the stream's coding type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stream {
    pub stream_type: StreamType,
    pub coding_type: StreamCodingType,
    pub sub_path_id: u8,
    pub sub_clip_id: u8,
    pub pid: u16,
    pub format: u8,
    pub rate: u8,
    pub char_code: u8,
    pub language: String,
    /// Only present for HEVC video.
    pub hdr: Option<HdrAttributes>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HdrAttributes {
    pub dynamic_range: DynamicRange,
    pub color_space: ColorSpace,
}

impl Stream {
    pub fn is_video(&self) -> bool {
        use StreamCodingType::*;
        matches!(
            self.coding_type,
            Mpeg1Video | Mpeg2Video | Mpeg4AvcVideo | MvcVideo | HevcVideo | Vc1Video
        )
    }

    pub fn is_audio(&self) -> bool {
        use StreamCodingType::*;
        matches!(
            self.coding_type,
            Mpeg1Audio
                | Mpeg2Audio
                | LpcmAudio
                | Ac3Audio
                | DtsAudio
                | TrueHdAudio
                | Eac3AudioPrimary
                | DtsHdAudioPrimary
                | DtsHdXllAudio
                | Eac3AudioSecondary
                | DtsHdAudioSecondary
        )
    }

    pub fn is_graphics(&self) -> bool {
        matches!(
            self.coding_type,
            StreamCodingType::PresentationGraphics | StreamCodingType::InteractiveGraphics
        )
    }

    pub fn video_format(&self) -> Option<VideoFormat> {
        if self.is_video() {
            Some(VideoFormat::from_code(self.format))
        } else {
            None
        }
    }

    pub fn frame_rate(&self) -> FrameRate {
        if self.is_video() {
            FrameRateFraction::from_code(self.rate)
        } else {
            None
        }
    }

    pub fn audio_format(&self) -> Option<AudioFormat> {
        if self.is_audio() {
            Some(AudioFormat::from_code(self.format))
        } else {
            None
        }
    }

    pub fn sample_rate(&self) -> Option<SampleRate> {
        if self.is_audio() {
            Some(SampleRate::from_code(self.rate))
        } else {
            None
        }
    }

    pub fn character_code(&self) -> Option<CharacterCode> {
        match self.coding_type {
            StreamCodingType::TextSubtitles => Some(CharacterCode::from_code(self.char_code)),
            _ => None,
        }
    }
}

/// The stream number table of a play item.
///
/// Only video, audio and presentation graphics streams are kept; the counts
/// of the other categories are recorded as declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreamNumberTable {
    pub num_video: u8,
    pub num_audio: u8,
    pub num_pg: u8,
    pub num_ig: u8,
    pub num_secondary_audio: u8,
    pub num_secondary_video: u8,
    pub num_pip_pg: u8,
    pub video_streams: Vec<Stream>,
    pub audio_streams: Vec<Stream>,
    pub pg_streams: Vec<Stream>,
}

/// A clip file, also known as a segment.
///
/// This identifies the playable stream file. `file_name` consists of 5 numbers
/// (e.g. "00055"), and `codec_id` of 4 letters which will usually be "M2TS" on
/// blu-rays. `stc_id` selects the system time clock sequence within the clip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Clip {
    pub file_name: String,
    pub codec_id: String,
    pub stc_id: u8,
}

/// An additional clip of a multi-clip sub play item.
pub type SubPlayItemClip = Clip;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngleInfo {
    pub is_different_audios: bool,
    pub is_seamless_angle_change: bool,
}

/// One segment of the main path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlayItem {
    pub clip: Clip,
    pub connection_condition: u8,
    pub in_time: TimeStamp,
    pub out_time: TimeStamp,
    /// Start of this item on the playlist timeline.
    pub relative_in_time: TimeStamp,
    pub is_multi_angle: bool,
    pub user_opt_mask: u64,
    pub angle_info: Option<AngleInfo>,
    /// Clips of angles 1 and up; angle 0 is `clip`.
    pub angles: Vec<Clip>,
    pub stn: StreamNumberTable,
}

impl PlayItem {
    pub fn duration(&self) -> TimeStamp {
        self.out_time - self.in_time
    }

    pub fn clip_for_angle(&self, angle: &Angle) -> &Clip {
        match angle.index {
            0 => &self.clip,
            i => self
                .angles
                .get(i.saturating_sub(1) as usize)
                .unwrap_or(&self.clip),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubPlayItem {
    pub clip: Clip,
    pub connection_condition: u8,
    pub is_multi_clip_entries: bool,
    pub in_time: TimeStamp,
    pub out_time: TimeStamp,
    pub sync_playitem_id: u16,
    pub sync_start_pts_of_playitem: TimeStamp,
    /// Empty unless `is_multi_clip_entries` is set.
    pub clips: Vec<SubPlayItemClip>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubPath {
    pub sub_path_type: SubPathType,
    pub is_repeat_sub_path: bool,
    pub items: Vec<SubPlayItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Playlist {
    pub list_count: u16,
    pub sub_count: u16,
    pub items: Vec<PlayItem>,
    pub sub_paths: Vec<SubPath>,
    /// Sum of all play item spans.
    pub duration: TimeStamp,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlayListMark {
    pub mark_type: MarkType,
    pub play_item: PlayItemRef,
    pub time_stamp: TimeStamp,
    pub entry_es_pid: u16,
    pub duration: Option<TimeStamp>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlayItemRef(pub u16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_stamp_conversions() {
        let ts = TimeStamp(90_000);
        assert_eq!(ts.seconds(), 2.0);
        assert_eq!(ts.nanoseconds(), 2_000_000_000);
        assert!(!ts.is_zero());
        assert!(TimeStamp::ZERO.is_zero());
    }

    #[test]
    fn large_time_stamp_nanoseconds() {
        assert_eq!(
            TimeStamp(1 << 48).nanoseconds(),
            ((1i128 << 48) * 200_000 / 9) as i64
        );
        assert_eq!(TimeStamp(i64::MAX).nanoseconds(), i64::MAX);
        assert_eq!(TimeStamp(i64::MIN).nanoseconds(), i64::MIN);
    }

    #[test]
    fn time_stamp_arithmetic() {
        let a = TimeStamp(5_000);
        let b = TimeStamp(12_000);
        assert_eq!(b - a, TimeStamp(7_000));
        assert_eq!(a + b, TimeStamp(17_000));
        assert!(a < b);
        assert_eq!((a - b).0, -7_000);
    }

    #[test]
    fn time_stamp_display() {
        // 1h 2m 3.5s
        let ts = TimeStamp((3_723 * 45_000) + 22_500);
        assert_eq!(ts.to_string(), "01:02:03.500");
    }

    #[test]
    fn four_cc_display() {
        assert_eq!(FourCc::MPLS.to_string(), "MPLS");
        assert_eq!(FourCc::from(b"0300"), FourCc(*b"0300"));
    }
}
