//! Chapter start times derived from playlist marks.

use crate::codes::MarkType;
use crate::decoder::ParserOptions;
use crate::types::{PlayListMark, Playlist, TimeStamp};
use tracing::debug;

/// Converts the playlist's entry marks into chapter start times on the
/// playlist timeline.
///
/// Marks keep their source order. Link points and marks that reference a
/// play item the playlist does not have are skipped. With
/// `drop_last_entry_if_at_end` enabled, a final chapter that lands at (or
/// within `end_tolerance` of) the end of the playlist is removed.
pub fn derive_chapters(
    marks: &[PlayListMark],
    playlist: &Playlist,
    options: &ParserOptions,
) -> Vec<TimeStamp> {
    let mut chapters: Vec<TimeStamp> = marks
        .iter()
        .filter_map(|mark| chapter_time(mark, playlist))
        .collect();

    if options.drop_last_entry_if_at_end {
        if let Some(&last) = chapters.last() {
            if last + options.end_tolerance >= playlist.duration {
                debug!(chapter = %last, duration = %playlist.duration, "dropping chapter at end of title");
                chapters.pop();
            }
        }
    }

    chapters
}

/// Resolves a single mark against the play item it references.
pub fn chapter_time(mark: &PlayListMark, playlist: &Playlist) -> Option<TimeStamp> {
    if mark.mark_type != MarkType::EntryPoint {
        debug!(mark_type = ?mark.mark_type, "skipping non-entry mark");
        return None;
    }

    let item = match playlist.items.get(mark.play_item.0 as usize) {
        Some(item) => item,
        None => {
            debug!(
                play_item = mark.play_item.0,
                items = playlist.items.len(),
                "skipping mark for missing play item"
            );
            return None;
        }
    };

    Some(item.relative_in_time + (mark.time_stamp - item.in_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Clip, PlayItem, PlayItemRef, StreamNumberTable};

    fn item(in_time: i64, out_time: i64, relative_in_time: i64) -> PlayItem {
        PlayItem {
            clip: Clip::default(),
            connection_condition: 1,
            in_time: TimeStamp(in_time),
            out_time: TimeStamp(out_time),
            relative_in_time: TimeStamp(relative_in_time),
            is_multi_angle: false,
            user_opt_mask: 0,
            angle_info: None,
            angles: Vec::new(),
            stn: StreamNumberTable::default(),
        }
    }

    // spans of 5000, 7000 and 0 starting at 0, 5000 and 12000
    fn playlist() -> Playlist {
        Playlist {
            list_count: 3,
            sub_count: 0,
            items: vec![
                item(100, 5_100, 0),
                item(20_000, 27_000, 5_000),
                item(300, 300, 12_000),
            ],
            sub_paths: Vec::new(),
            duration: TimeStamp(12_000),
        }
    }

    fn entry(play_item: u16, ts: i64) -> PlayListMark {
        PlayListMark {
            mark_type: MarkType::EntryPoint,
            play_item: PlayItemRef(play_item),
            time_stamp: TimeStamp(ts),
            entry_es_pid: 0xffff,
            duration: None,
        }
    }

    #[test]
    fn mark_in_second_item() {
        let marks = [entry(1, 21_000)];
        let chapters = derive_chapters(&marks, &playlist(), &ParserOptions::default());
        assert_eq!(chapters, vec![TimeStamp(6_000)]);
    }

    #[test]
    fn source_order_is_kept() {
        let marks = [entry(1, 20_000), entry(0, 100)];
        let chapters = derive_chapters(&marks, &playlist(), &ParserOptions::default());
        assert_eq!(chapters, vec![TimeStamp(5_000), TimeStamp(0)]);
    }

    #[test]
    fn trailing_mark_kept_by_default() {
        let marks = [entry(0, 100), entry(1, 20_000), entry(2, 300)];
        let chapters = derive_chapters(&marks, &playlist(), &ParserOptions::default());
        assert_eq!(
            chapters,
            vec![TimeStamp(0), TimeStamp(5_000), TimeStamp(12_000)]
        );
    }

    #[test]
    fn trailing_mark_dropped_when_enabled() {
        let marks = [entry(0, 100), entry(1, 20_000), entry(2, 300)];
        let options = ParserOptions {
            drop_last_entry_if_at_end: true,
            ..ParserOptions::default()
        };
        let chapters = derive_chapters(&marks, &playlist(), &options);
        assert_eq!(chapters, vec![TimeStamp(0), TimeStamp(5_000)]);
    }

    #[test]
    fn last_mark_before_end_is_kept_when_enabled() {
        let marks = [entry(0, 100), entry(1, 26_999)];
        let options = ParserOptions {
            drop_last_entry_if_at_end: true,
            ..ParserOptions::default()
        };
        let chapters = derive_chapters(&marks, &playlist(), &options);
        assert_eq!(chapters, vec![TimeStamp(0), TimeStamp(11_999)]);
    }

    #[test]
    fn tolerance_widens_the_end_window() {
        let marks = [entry(0, 100), entry(1, 26_000)];
        let options = ParserOptions {
            drop_last_entry_if_at_end: true,
            end_tolerance: TimeStamp(1_000),
        };
        let chapters = derive_chapters(&marks, &playlist(), &options);
        assert_eq!(chapters, vec![TimeStamp(0)]);
    }

    #[test]
    fn link_points_and_dangling_marks_are_skipped() {
        let mut link = entry(0, 1_100);
        link.mark_type = MarkType::LinkPoint;
        let marks = [entry(0, 100), link, entry(7, 100)];
        let chapters = derive_chapters(&marks, &playlist(), &ParserOptions::default());
        assert_eq!(chapters, vec![TimeStamp(0)]);
    }
}
