//! The parse driver.
//!
//! [`Parser`] sequences the header, playlist and playlist mark decoders over
//! one input buffer and keeps whatever it managed to decode. The decoders
//! themselves sit behind the [`PlaylistDecoder`] trait, so a caller can swap
//! in different behaviour for any of the three sections.

use crate::chapters;
use crate::error::{DecodeError, MplsError, ParseStage};
use crate::parser;
use crate::types::{AppInfoPlayList, Header, Mpls, PlayListMark, Playlist, TimeStamp};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::{debug, warn};

/// Behavioural switches for a [`Parser`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserOptions {
    /// Drop the last chapter if it starts at the end of the title.
    pub drop_last_entry_if_at_end: bool,
    /// How close to the end the last chapter must be to get dropped.
    pub end_tolerance: TimeStamp,
}

/// The section decoders used by a [`Parser`].
pub trait PlaylistDecoder {
    /// Decodes the file header and the application info that follows it.
    fn parse_header(&self, input: &[u8]) -> Result<(Header, AppInfoPlayList), DecodeError>;

    /// Decodes the playlist section at `header.playlist_pos`.
    fn parse_playlist(&self, input: &[u8], header: &Header) -> Result<Playlist, DecodeError>;

    /// Decodes the raw playlist marks at `header.chapter_pos`.
    fn parse_marks(&self, input: &[u8], header: &Header)
        -> Result<Vec<PlayListMark>, DecodeError>;

    fn derive_chapters(
        &self,
        marks: &[PlayListMark],
        playlist: &Playlist,
        options: &ParserOptions,
    ) -> Vec<TimeStamp> {
        chapters::derive_chapters(marks, playlist, options)
    }
}

/// The standard MPLS section decoders.
#[derive(Debug, Copy, Clone, Default)]
pub struct MplsDecoder;

impl PlaylistDecoder for MplsDecoder {
    fn parse_header(&self, input: &[u8]) -> Result<(Header, AppInfoPlayList), DecodeError> {
        let (rest, header) = parser::header(input)?;
        let (_, app_info) = parser::app_info_play_list(rest)?;
        Ok((header, app_info))
    }

    fn parse_playlist(&self, input: &[u8], header: &Header) -> Result<Playlist, DecodeError> {
        let section = parser::seek(input, header.playlist_pos)?;
        let (_, playlist) = parser::play_list(section)?;
        Ok(playlist)
    }

    fn parse_marks(
        &self,
        input: &[u8],
        header: &Header,
    ) -> Result<Vec<PlayListMark>, DecodeError> {
        let section = parser::seek(input, header.chapter_pos)?;
        let (_, marks) = parser::play_list_mark(section)?;
        Ok(marks)
    }
}

/// Receives the result of every successful parse.
pub trait ParseObserver: Send {
    fn on_parsed(&self, header: &Header, playlist: &Playlist, chapters: &[TimeStamp]);
}

/// Logs a summary of each parsed playlist at debug level.
#[derive(Debug, Copy, Clone, Default)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn on_parsed(&self, header: &Header, playlist: &Playlist, chapters: &[TimeStamp]) {
        debug!(
            version = %header.version,
            play_items = playlist.items.len(),
            sub_paths = playlist.sub_paths.len(),
            duration = %playlist.duration,
            chapters = chapters.len(),
            "parsed playlist"
        );
        for (idx, item) in playlist.items.iter().enumerate() {
            debug!(
                idx,
                clip = %item.clip.file_name,
                start = %item.relative_in_time,
                video = item.stn.video_streams.len(),
                audio = item.stn.audio_streams.len(),
                pg = item.stn.pg_streams.len(),
                "play item"
            );
        }
    }
}

/// Progress of a [`Parser`] through its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseState {
    Fresh,
    HeaderParsed,
    PlaylistParsed,
    Done,
    Failed { stage: ParseStage, error: DecodeError },
}

/// Parses MPLS buffers and holds the most recent result.
///
/// A failed parse leaves the sections decoded so far in place, but
/// [`is_ok`] stays `false` and they should not be relied upon. Calling
/// [`parse`] again starts over from a clean state.
///
/// # Examples
/// ```
/// use bluray_mpls::Parser;
///
/// let mut parser = Parser::new();
/// parser.enable_dropping_last_entry_if_at_end(true);
/// assert!(parser.parse(b"not a playlist").is_err());
/// assert!(!parser.is_ok());
/// ```
///
/// [`is_ok`]: #method.is_ok
/// [`parse`]: #method.parse
pub struct Parser<D = MplsDecoder> {
    decoder: D,
    options: ParserOptions,
    observer: Option<Box<dyn ParseObserver>>,
    state: ParseState,
    header: Option<Header>,
    app_info: Option<AppInfoPlayList>,
    playlist: Playlist,
    marks: Vec<PlayListMark>,
    chapters: Vec<TimeStamp>,
}

impl Parser<MplsDecoder> {
    pub fn new() -> Self {
        Parser::with_decoder(MplsDecoder)
    }
}

impl Default for Parser<MplsDecoder> {
    fn default() -> Self {
        Parser::new()
    }
}

impl<D: PlaylistDecoder> Parser<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Parser {
            decoder,
            options: ParserOptions::default(),
            observer: None,
            state: ParseState::Fresh,
            header: None,
            app_info: None,
            playlist: Playlist::default(),
            marks: Vec::new(),
            chapters: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer<O: ParseObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn enable_dropping_last_entry_if_at_end(&mut self, enable: bool) {
        self.options.drop_last_entry_if_at_end = enable;
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Reads the whole input into memory and parses it.
    pub fn parse_reader<R: Read>(&mut self, mut reader: R) -> Result<(), MplsError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        self.parse(&buffer)
    }

    /// Parses one complete MPLS file.
    pub fn parse(&mut self, input: &[u8]) -> Result<(), MplsError> {
        self.reset();

        if let Err((stage, error)) = self.run(input) {
            warn!(%stage, %error, "failed to parse MPLS");
            self.state = ParseState::Failed {
                stage,
                error: error.clone(),
            };
            return Err(MplsError::ParseError {
                stage,
                source: error,
            });
        }

        self.state = ParseState::Done;
        if let (Some(observer), Some(header)) = (&self.observer, &self.header) {
            observer.on_parsed(header, &self.playlist, &self.chapters);
        }
        Ok(())
    }

    fn run(&mut self, input: &[u8]) -> Result<(), (ParseStage, DecodeError)> {
        let (header, app_info) = self
            .decoder
            .parse_header(input)
            .map_err(|e| (ParseStage::Header, e))?;
        self.header = Some(header);
        self.app_info = Some(app_info);
        self.state = ParseState::HeaderParsed;

        self.playlist = self
            .decoder
            .parse_playlist(input, &header)
            .map_err(|e| (ParseStage::Playlist, e))?;
        self.state = ParseState::PlaylistParsed;

        self.marks = self
            .decoder
            .parse_marks(input, &header)
            .map_err(|e| (ParseStage::Chapters, e))?;
        self.chapters = self
            .decoder
            .derive_chapters(&self.marks, &self.playlist, &self.options);
        Ok(())
    }

    fn reset(&mut self) {
        self.state = ParseState::Fresh;
        self.header = None;
        self.app_info = None;
        self.playlist = Playlist::default();
        self.marks.clear();
        self.chapters.clear();
    }

    pub fn is_ok(&self) -> bool {
        self.state == ParseState::Done
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn app_info(&self) -> Option<&AppInfoPlayList> {
        self.app_info.as_ref()
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn marks(&self) -> &[PlayListMark] {
        &self.marks
    }

    pub fn chapters(&self) -> &[TimeStamp] {
        &self.chapters
    }

    /// Hands out the decoded playlist, if the last parse succeeded.
    pub fn into_mpls(self) -> Option<Mpls> {
        if self.is_ok() {
            Some(self.into_parts())
        } else {
            None
        }
    }

    pub(crate) fn into_parts(self) -> Mpls {
        Mpls {
            header: self.header.unwrap_or_default(),
            app_info_play_list: self.app_info.unwrap_or_default(),
            play_list: self.playlist,
            marks: self.marks,
            chapters: self.chapters,
        }
    }
}
