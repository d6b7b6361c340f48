//! Numeric classifications used by the playlist format.
//!
//! The three classification enumerations ([`StreamType`],
//! [`StreamCodingType`] and [`SubPathType`]) are closed: the decoders reject
//! any value that converts to an `Unrecognized` variant. The remaining
//! enumerations describe stream attributes and are informational only, so
//! unknown values there simply map to `Unknown`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a stream lives, Blu-ray table 5-8.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StreamType {
    Reserved,
    UsedByPlayItem,
    UsedBySubPathType23456,
    UsedBySubPathType7,
    Unrecognized(u8),
}

impl From<u8> for StreamType {
    fn from(n: u8) -> Self {
        match n {
            0 => StreamType::Reserved,
            1 => StreamType::UsedByPlayItem,
            2 => StreamType::UsedBySubPathType23456,
            3 => StreamType::UsedBySubPathType7,
            n => StreamType::Unrecognized(n),
        }
    }
}

impl StreamType {
    pub fn value(self) -> u8 {
        match self {
            StreamType::Reserved => 0,
            StreamType::UsedByPlayItem => 1,
            StreamType::UsedBySubPathType23456 => 2,
            StreamType::UsedBySubPathType7 => 3,
            StreamType::Unrecognized(n) => n,
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, StreamType::Unrecognized(_))
    }
}

/// The codec of an elementary stream, Blu-ray table 5-16.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StreamCodingType {
    Mpeg1Video,
    Mpeg2Video,
    Mpeg4AvcVideo,
    MvcVideo,
    HevcVideo,
    Vc1Video,
    Mpeg1Audio,
    Mpeg2Audio,
    LpcmAudio,
    Ac3Audio,
    DtsAudio,
    TrueHdAudio,
    Eac3AudioPrimary,
    DtsHdAudioPrimary,
    DtsHdXllAudio,
    Eac3AudioSecondary,
    DtsHdAudioSecondary,
    PresentationGraphics,
    InteractiveGraphics,
    TextSubtitles,
    Unrecognized(u8),
}

/// The shape of the attribute bytes that follow a coding type.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum AttributeLayout {
    /// format/rate nibbles
    Video,
    /// format/rate nibbles plus dynamic range/colour space
    HdrVideo,
    /// format/rate nibbles plus language
    Audio,
    /// language only
    Graphics,
    /// character code plus language
    Text,
}

impl From<u8> for StreamCodingType {
    fn from(n: u8) -> Self {
        use StreamCodingType::*;
        match n {
            0x01 => Mpeg1Video,
            0x02 => Mpeg2Video,
            0x1b => Mpeg4AvcVideo,
            0x20 => MvcVideo,
            0x24 => HevcVideo,
            0xea => Vc1Video,
            0x03 => Mpeg1Audio,
            0x04 => Mpeg2Audio,
            0x80 => LpcmAudio,
            0x81 => Ac3Audio,
            0x82 => DtsAudio,
            0x83 => TrueHdAudio,
            0x84 => Eac3AudioPrimary,
            0x85 => DtsHdAudioPrimary,
            0x86 => DtsHdXllAudio,
            0xa1 => Eac3AudioSecondary,
            0xa2 => DtsHdAudioSecondary,
            0x90 => PresentationGraphics,
            0x91 => InteractiveGraphics,
            0x92 => TextSubtitles,
            n => Unrecognized(n),
        }
    }
}

impl StreamCodingType {
    /// Every recognized coding type.
    pub const ALL: [StreamCodingType; 20] = [
        StreamCodingType::Mpeg1Video,
        StreamCodingType::Mpeg2Video,
        StreamCodingType::Mpeg4AvcVideo,
        StreamCodingType::MvcVideo,
        StreamCodingType::HevcVideo,
        StreamCodingType::Vc1Video,
        StreamCodingType::Mpeg1Audio,
        StreamCodingType::Mpeg2Audio,
        StreamCodingType::LpcmAudio,
        StreamCodingType::Ac3Audio,
        StreamCodingType::DtsAudio,
        StreamCodingType::TrueHdAudio,
        StreamCodingType::Eac3AudioPrimary,
        StreamCodingType::DtsHdAudioPrimary,
        StreamCodingType::DtsHdXllAudio,
        StreamCodingType::Eac3AudioSecondary,
        StreamCodingType::DtsHdAudioSecondary,
        StreamCodingType::PresentationGraphics,
        StreamCodingType::InteractiveGraphics,
        StreamCodingType::TextSubtitles,
    ];

    pub fn value(self) -> u8 {
        use StreamCodingType::*;
        match self {
            Mpeg1Video => 0x01,
            Mpeg2Video => 0x02,
            Mpeg4AvcVideo => 0x1b,
            MvcVideo => 0x20,
            HevcVideo => 0x24,
            Vc1Video => 0xea,
            Mpeg1Audio => 0x03,
            Mpeg2Audio => 0x04,
            LpcmAudio => 0x80,
            Ac3Audio => 0x81,
            DtsAudio => 0x82,
            TrueHdAudio => 0x83,
            Eac3AudioPrimary => 0x84,
            DtsHdAudioPrimary => 0x85,
            DtsHdXllAudio => 0x86,
            Eac3AudioSecondary => 0xa1,
            DtsHdAudioSecondary => 0xa2,
            PresentationGraphics => 0x90,
            InteractiveGraphics => 0x91,
            TextSubtitles => 0x92,
            Unrecognized(n) => n,
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, StreamCodingType::Unrecognized(_))
    }

    pub(crate) fn layout(self) -> Option<AttributeLayout> {
        use StreamCodingType::*;
        let layout = match self {
            Mpeg1Video | Mpeg2Video | Mpeg4AvcVideo | MvcVideo | Vc1Video => {
                AttributeLayout::Video
            }
            HevcVideo => AttributeLayout::HdrVideo,
            Mpeg1Audio | Mpeg2Audio | LpcmAudio | Ac3Audio | DtsAudio | TrueHdAudio
            | Eac3AudioPrimary | DtsHdAudioPrimary | DtsHdXllAudio | Eac3AudioSecondary
            | DtsHdAudioSecondary => AttributeLayout::Audio,
            PresentationGraphics | InteractiveGraphics => AttributeLayout::Graphics,
            TextSubtitles => AttributeLayout::Text,
            Unrecognized(_) => return None,
        };
        Some(layout)
    }
}

/// The purpose of a sub path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SubPathType {
    Reserved0,
    Reserved1,
    PrimaryAudioOfBrowsableSlideshow,
    InteractiveGraphicsPresentationMenu,
    TextSubtitlePresentation,
    OutOfMuxSynchronousElementaryStreams,
    OutOfMuxAsynchronousPictureInPicture,
    InMuxSynchronousPictureInPicture,
    Unrecognized(u8),
}

impl From<u8> for SubPathType {
    fn from(n: u8) -> Self {
        use SubPathType::*;
        match n {
            0 => Reserved0,
            1 => Reserved1,
            2 => PrimaryAudioOfBrowsableSlideshow,
            3 => InteractiveGraphicsPresentationMenu,
            4 => TextSubtitlePresentation,
            5 => OutOfMuxSynchronousElementaryStreams,
            6 => OutOfMuxAsynchronousPictureInPicture,
            7 => InMuxSynchronousPictureInPicture,
            n => Unrecognized(n),
        }
    }
}

impl SubPathType {
    pub fn value(self) -> u8 {
        use SubPathType::*;
        match self {
            Reserved0 => 0,
            Reserved1 => 1,
            PrimaryAudioOfBrowsableSlideshow => 2,
            InteractiveGraphicsPresentationMenu => 3,
            TextSubtitlePresentation => 4,
            OutOfMuxSynchronousElementaryStreams => 5,
            OutOfMuxAsynchronousPictureInPicture => 6,
            InMuxSynchronousPictureInPicture => 7,
            Unrecognized(n) => n,
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, SubPathType::Unrecognized(_))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VideoFormat {
    Interlaced480,
    Interlaced576,
    Interlaced1080,
    Progressive480,
    Progressive576,
    Progressive720,
    Progressive1080,
    Progressive2160,
    Unknown,
}

impl VideoFormat {
    pub fn from_code(n: u8) -> Self {
        match n {
            0x1 => VideoFormat::Interlaced480,
            0x2 => VideoFormat::Interlaced576,
            0x3 => VideoFormat::Progressive480,
            0x4 => VideoFormat::Interlaced1080,
            0x5 => VideoFormat::Progressive720,
            0x6 => VideoFormat::Progressive1080,
            0x7 => VideoFormat::Progressive576,
            0x8 => VideoFormat::Progressive2160,
            _ => VideoFormat::Unknown,
        }
    }
}

pub type FrameRate = Option<FrameRateFraction>;

/// A video frame rate, represented as a fraction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameRateFraction {
    pub numerator: i32,
    pub denominator: i32,
}

impl FrameRateFraction {
    pub fn from_code(n: u8) -> FrameRate {
        let (numerator, denominator) = match n {
            0x1 => (24_000, 1_001),
            0x2 => (24, 1),
            0x3 => (25, 1),
            0x4 => (30_000, 1_001),
            0x6 => (50, 1),
            0x7 => (60_000, 1_001),
            _ => return None,
        };
        Some(FrameRateFraction {
            numerator,
            denominator,
        })
    }

    /// Returns the fraction's value as an `f64`.
    pub fn fps(&self) -> f64 {
        (self.numerator as f64) / (self.denominator as f64)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AudioFormat {
    Mono,
    Stereo,
    Multichannel,
    StereoAndMultichannel,
    Unknown,
}

impl AudioFormat {
    pub fn from_code(n: u8) -> Self {
        match n {
            0x1 => AudioFormat::Mono,
            0x3 => AudioFormat::Stereo,
            0x6 => AudioFormat::Multichannel,
            0xC => AudioFormat::StereoAndMultichannel,
            _ => AudioFormat::Unknown,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SampleRate {
    One(u32),
    Two(u32, u32),
    Unknown,
}

impl SampleRate {
    pub fn from_code(n: u8) -> Self {
        match n {
            0x1 => SampleRate::One(48_000),
            0x4 => SampleRate::One(96_000),
            0x5 => SampleRate::One(192_000),
            0xC => SampleRate::Two(48_000, 192_000),
            0xE => SampleRate::Two(48_000, 96_000),
            _ => SampleRate::Unknown,
        }
    }
}

/// Text encoding of a text subtitle stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CharacterCode {
    Utf8,
    Utf16BE,
    ShiftJIS,
    EucKr,
    Gb18030,
    EucCn,
    Big5,
    Unknown,
}

impl CharacterCode {
    pub fn from_code(n: u8) -> Self {
        match n {
            0x1 => CharacterCode::Utf8,
            0x2 => CharacterCode::Utf16BE,
            0x3 => CharacterCode::ShiftJIS,
            0x4 => CharacterCode::EucKr,
            0x5 => CharacterCode::Gb18030,
            0x6 => CharacterCode::EucCn,
            0x7 => CharacterCode::Big5,
            _ => CharacterCode::Unknown,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DynamicRange {
    Sdr,
    Hdr10,
    DolbyVision,
    Unknown,
}

impl DynamicRange {
    pub fn from_code(n: u8) -> Self {
        match n {
            0x0 => DynamicRange::Sdr,
            0x1 => DynamicRange::Hdr10,
            0x2 => DynamicRange::DolbyVision,
            _ => DynamicRange::Unknown,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorSpace {
    BT709,
    BT2020,
    Unknown,
}

impl ColorSpace {
    pub fn from_code(n: u8) -> Self {
        match n {
            0x1 => ColorSpace::BT709,
            0x2 => ColorSpace::BT2020,
            _ => ColorSpace::Unknown,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MarkType {
    EntryPoint,
    LinkPoint,
    Unknown,
}

impl MarkType {
    pub fn from_code(n: u8) -> Self {
        match n {
            0x1 => MarkType::EntryPoint,
            0x2 => MarkType::LinkPoint,
            _ => MarkType::Unknown,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlaybackType {
    Standard,
    Random,
    Shuffle,
    Unknown,
}

impl PlaybackType {
    pub fn from_code(n: u8) -> Self {
        match n {
            0x1 => PlaybackType::Standard,
            0x2 => PlaybackType::Random,
            0x3 => PlaybackType::Shuffle,
            _ => PlaybackType::Unknown,
        }
    }
}
