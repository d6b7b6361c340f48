//! A Blu-ray movie playlist (MPLS) parser.
//!
//! The quickest way in is [`Mpls::parse`] (or [`Mpls::from`] for a reader),
//! which decodes a whole playlist file into a [`Mpls`]: the header, the play
//! items with their time ranges and stream number tables, the sub paths, the
//! raw playlist marks and the chapter start times derived from them.
//!
//! For more control, use a [`Parser`]. It keeps the outcome of the last
//! parse (including whatever was decoded before a failure), lets you drop a
//! trailing chapter mark that sits at the very end of the title, and accepts
//! a custom [`PlaylistDecoder`] or [`ParseObserver`].
//!
//! Stream classifications ([`StreamType`], [`StreamCodingType`] and
//! [`SubPathType`]) are decoded strictly: a value outside the known tables
//! fails the parse instead of being silently mapped to a default.
//!
//! The MPLS file format is not publicly documented. This parser relies on
//! the third-party file specs in the [lw/BluRay] repository as well as the
//! [bdinfo/mpls] Wikibooks page.
//!
//! [lw/BluRay]: https://github.com/lw/BluRay/wiki/MPLS
//! [bdinfo/mpls]: https://en.wikibooks.org/wiki/User:Bdinfo/mpls
//!
//! # Examples
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use bluray_mpls::{Parser, ParserOptions};
//!
//! let bytes = std::fs::read("00800.mpls")?;
//!
//! let mut parser = Parser::new().with_options(ParserOptions {
//!     drop_last_entry_if_at_end: true,
//!     ..ParserOptions::default()
//! });
//! parser.parse(&bytes)?;
//!
//! for item in &parser.playlist().items {
//!     println!(
//!         "{} {} -> {} ({} audio streams)",
//!         item.clip.file_name,
//!         item.in_time,
//!         item.out_time,
//!         item.stn.audio_streams.len()
//!     );
//! }
//! for (idx, chapter) in parser.chapters().iter().enumerate() {
//!     println!("chapter {}: {}", idx + 1, chapter);
//! }
//! # Ok(())
//! # }
//! ```
#![doc(html_root_url = "https://docs.rs/bluray-mpls/0.3.0")]

pub mod chapters;
pub mod codes;
pub mod decoder;
mod error;
mod parser;
pub mod types;

pub use codes::*;
pub use decoder::{
    MplsDecoder, ParseObserver, ParseState, Parser, ParserOptions, PlaylistDecoder,
    TracingObserver,
};
pub use error::*;
pub use types::*;
