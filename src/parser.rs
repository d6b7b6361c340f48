use crate::codes::{
    AttributeLayout, ColorSpace, DynamicRange, MarkType, PlaybackType, StreamCodingType,
    StreamType, SubPathType,
};
use crate::error::DecodeError;
use crate::types::{
    AngleInfo, AppInfoPlayList, Clip, FourCc, HdrAttributes, Header, PlayItem, PlayItemRef,
    PlayListMark, Playlist, Stream, StreamNumberTable, SubPath, SubPlayItem, TimeStamp,
};
use nom::{
    bytes::complete::take,
    combinator::map,
    multi::length_value,
    number::complete::{be_u16, be_u32, be_u64, be_u8},
    sequence::tuple,
    IResult,
};
use tracing::trace;

pub(crate) type DResult<'a, T> = IResult<&'a [u8], T, DecodeError>;

const SUPPORTED_VERSIONS: [FourCc; 3] = [FourCc(*b"0100"), FourCc(*b"0200"), FourCc(*b"0300")];

fn failure<T>(err: DecodeError) -> Result<T, nom::Err<DecodeError>> {
    Err(nom::Err::Failure(err))
}

/// Moves the cursor to an absolute section address.
pub(crate) fn seek(input: &[u8], pos: u32) -> Result<&[u8], DecodeError> {
    let pos = pos as usize;
    input.get(pos..).ok_or_else(|| DecodeError::Truncated {
        needed: Some(pos - input.len()),
    })
}

/// Runs `f` exactly `declared` times, failing as soon as the data runs out
/// before the next record.
fn counted<'a, T, F>(
    record: &'static str,
    declared: usize,
    mut f: F,
    mut input: &'a [u8],
) -> DResult<'a, Vec<T>>
where
    F: FnMut(&'a [u8]) -> DResult<'a, T>,
{
    let mut records = Vec::with_capacity(declared.min(256));
    for decoded in 0..declared {
        if input.is_empty() {
            return failure(DecodeError::CountMismatch {
                record,
                declared,
                decoded,
            });
        }
        let (rest, r) = f(input)?;
        input = rest;
        records.push(r);
    }
    Ok((input, records))
}

fn str_len(len: usize, input: &[u8]) -> DResult<'_, String> {
    map(take(len), |v: &[u8]| String::from_utf8_lossy(v).into_owned())(input)
}

fn four_cc(input: &[u8]) -> DResult<'_, FourCc> {
    let (input, b) = take(4usize)(input)?;
    Ok((input, FourCc([b[0], b[1], b[2], b[3]])))
}

fn clip_file_name(input: &[u8]) -> DResult<'_, String> {
    str_len(5, input)
}

fn clip_codec_id(input: &[u8]) -> DResult<'_, String> {
    str_len(4, input)
}

fn time_stamp(input: &[u8]) -> DResult<'_, TimeStamp> {
    map(be_u32, |t| TimeStamp(i64::from(t)))(input)
}

fn lang_code(input: &[u8]) -> DResult<'_, String> {
    str_len(3, input)
}

// name, codec and the STC id that follows them
fn clip_with_clock_ref(input: &[u8]) -> DResult<'_, Clip> {
    let (input, (file_name, codec_id, stc_id)) =
        tuple((clip_file_name, clip_codec_id, be_u8))(input)?;
    Ok((
        input,
        Clip {
            file_name,
            codec_id,
            stc_id,
        },
    ))
}

pub(crate) fn header(input: &[u8]) -> DResult<'_, Header> {
    let (input, (type_indicator, version, playlist_pos, chapter_pos, ext_pos)) =
        tuple((four_cc, four_cc, be_u32, be_u32, be_u32))(input)?;

    if type_indicator != FourCc::MPLS || !SUPPORTED_VERSIONS.contains(&version) {
        return failure(DecodeError::InvalidHeader {
            type_indicator,
            version,
        });
    }

    // reserved
    let (input, _) = take(20usize)(input)?;

    Ok((
        input,
        Header {
            type_indicator,
            version,
            playlist_pos,
            chapter_pos,
            ext_pos,
        },
    ))
}

pub(crate) fn app_info_play_list(input: &[u8]) -> DResult<'_, AppInfoPlayList> {
    fn playback_count(input: &[u8]) -> DResult<'_, Option<u16>> {
        let (input, v) = be_u16(input)?;
        let res = match v {
            0x2 | 0x3 => Some(v),
            _ => None,
        };
        Ok((input, res))
    }
    fn parser(input: &[u8]) -> DResult<'_, AppInfoPlayList> {
        let (input, _) = take(1usize)(input)?;
        let (input, playback_type) = map(be_u8, PlaybackType::from_code)(input)?;
        let (input, playback_count) = playback_count(input)?;
        let (input, user_opt_mask) = be_u64(input)?;
        let (input, flags) = be_u16(input)?;
        Ok((
            input,
            AppInfoPlayList {
                playback_type,
                playback_count,
                user_opt_mask,
                flags,
            },
        ))
    }

    length_value(be_u32, parser)(input)
}

fn stream_entry(stream: &mut Stream, input: &[u8]) -> Result<(), nom::Err<DecodeError>> {
    let (input, raw) = be_u8(input)?;
    stream.stream_type = StreamType::from(raw);
    match stream.stream_type {
        StreamType::UsedByPlayItem => {
            let (_, pid) = be_u16(input)?;
            stream.pid = pid;
        }
        StreamType::UsedBySubPathType23456 => {
            let (_, (sub_path_id, sub_clip_id, pid)) = tuple((be_u8, be_u8, be_u16))(input)?;
            stream.sub_path_id = sub_path_id;
            stream.sub_clip_id = sub_clip_id;
            stream.pid = pid;
        }
        StreamType::UsedBySubPathType7 => {
            let (_, (sub_path_id, pid)) = tuple((be_u8, be_u16))(input)?;
            stream.sub_path_id = sub_path_id;
            stream.pid = pid;
        }
        StreamType::Reserved => {}
        StreamType::Unrecognized(n) => return failure(DecodeError::UnrecognizedStreamType(n)),
    }
    Ok(())
}

fn stream_attrs(stream: &mut Stream, input: &[u8]) -> Result<(), nom::Err<DecodeError>> {
    fn format_rate(input: &[u8]) -> DResult<'_, (u8, u8)> {
        map(be_u8, |n| ((n & 0xF0) >> 4, n & 0x0F))(input)
    }

    let (input, raw) = be_u8(input)?;
    stream.coding_type = StreamCodingType::from(raw);
    let layout = match stream.coding_type.layout() {
        Some(layout) => layout,
        None => return failure(DecodeError::UnrecognizedCodingType(raw)),
    };

    match layout {
        AttributeLayout::Video => {
            let (_, (format, rate)) = format_rate(input)?;
            stream.format = format;
            stream.rate = rate;
        }
        AttributeLayout::HdrVideo => {
            let (_, ((format, rate), n)) = tuple((format_rate, be_u8))(input)?;
            stream.format = format;
            stream.rate = rate;
            stream.hdr = Some(HdrAttributes {
                dynamic_range: DynamicRange::from_code((n & 0xF0) >> 4),
                color_space: ColorSpace::from_code(n & 0x0F),
            });
        }
        AttributeLayout::Audio => {
            let (_, ((format, rate), language)) = tuple((format_rate, lang_code))(input)?;
            stream.format = format;
            stream.rate = rate;
            stream.language = language;
        }
        AttributeLayout::Graphics => {
            let (_, language) = lang_code(input)?;
            stream.language = language;
        }
        AttributeLayout::Text => {
            let (_, (char_code, language)) = tuple((be_u8, lang_code))(input)?;
            stream.char_code = char_code;
            stream.language = language;
        }
    }
    Ok(())
}

pub(crate) fn stream(input: &[u8]) -> DResult<'_, Stream> {
    let mut stream = Stream {
        stream_type: StreamType::Reserved,
        coding_type: StreamCodingType::Unrecognized(0),
        sub_path_id: 0,
        sub_clip_id: 0,
        pid: 0,
        format: 0,
        rate: 0,
        char_code: 0,
        language: String::new(),
        hdr: None,
    };

    // both blocks are length-prefixed; unread tails are skipped
    let (input, entry) = length_value(be_u8, take_all)(input)?;
    stream_entry(&mut stream, entry)?;
    let (input, attrs) = length_value(be_u8, take_all)(input)?;
    stream_attrs(&mut stream, attrs)?;

    trace!(
        pid = stream.pid,
        coding_type = stream.coding_type.value(),
        "decoded stream"
    );
    Ok((input, stream))
}

fn take_all(input: &[u8]) -> DResult<'_, &[u8]> {
    Ok((&input[input.len()..], input))
}

pub(crate) fn stream_number_table(input: &[u8]) -> DResult<'_, StreamNumberTable> {
    fn parser(input: &[u8]) -> DResult<'_, StreamNumberTable> {
        let (input, (_, num_video, num_audio, num_pg, num_ig)) =
            tuple((take(2usize), be_u8, be_u8, be_u8, be_u8))(input)?;
        let (input, (num_secondary_audio, num_secondary_video, num_pip_pg, _)) =
            tuple((be_u8, be_u8, be_u8, take(5usize)))(input)?;

        let (input, video_streams) = counted("video stream", num_video as usize, stream, input)?;
        let (input, audio_streams) = counted("audio stream", num_audio as usize, stream, input)?;
        let (input, pg_streams) = counted("PG stream", num_pg as usize, stream, input)?;

        // IG, secondary and PiP streams stay in the skipped remainder
        Ok((
            input,
            StreamNumberTable {
                num_video,
                num_audio,
                num_pg,
                num_ig,
                num_secondary_audio,
                num_secondary_video,
                num_pip_pg,
                video_streams,
                audio_streams,
                pg_streams,
            },
        ))
    }

    length_value(be_u16, parser)(input)
}

pub(crate) fn sub_play_item_clip(input: &[u8]) -> DResult<'_, Clip> {
    clip_with_clock_ref(input)
}

pub(crate) fn sub_play_item(input: &[u8]) -> DResult<'_, SubPlayItem> {
    fn multi_clip_entries(input: &[u8]) -> DResult<'_, Vec<Clip>> {
        let (input, num_entries) = be_u8(input)?;
        // reserved
        let (input, _) = take(1usize)(input)?;
        counted(
            "multi clip entry",
            num_entries as usize,
            sub_play_item_clip,
            input,
        )
    }
    fn parser(input: &[u8]) -> DResult<'_, SubPlayItem> {
        let (input, (file_name, codec_id)) = tuple((clip_file_name, clip_codec_id))(input)?;
        // 27 reserved bits, connection_condition, is_multi_clip_entries
        let (input, flags) = be_u32(input)?;
        let connection_condition = ((flags >> 1) & 0x0F) as u8;
        let is_multi_clip_entries = (flags & 0x1) == 1;
        let (input, stc_id) = be_u8(input)?;
        let (input, (in_time, out_time)) = tuple((time_stamp, time_stamp))(input)?;
        let (input, sync_playitem_id) = be_u16(input)?;
        let (input, sync_start_pts_of_playitem) = time_stamp(input)?;
        let (input, clips) = if is_multi_clip_entries {
            multi_clip_entries(input)?
        } else {
            (input, Vec::new())
        };

        Ok((
            input,
            SubPlayItem {
                clip: Clip {
                    file_name,
                    codec_id,
                    stc_id,
                },
                connection_condition,
                is_multi_clip_entries,
                in_time,
                out_time,
                sync_playitem_id,
                sync_start_pts_of_playitem,
                clips,
            },
        ))
    }

    length_value(be_u16, parser)(input)
}

pub(crate) fn sub_path(input: &[u8]) -> DResult<'_, SubPath> {
    fn parser(input: &[u8]) -> DResult<'_, SubPath> {
        let (input, (_, raw_type)) = tuple((take(1usize), be_u8))(input)?;
        let sub_path_type = SubPathType::from(raw_type);
        if !sub_path_type.is_recognized() {
            return failure(DecodeError::UnrecognizedSubPathType(raw_type));
        }
        let (input, is_repeat_sub_path) = map(be_u16, |n| (n & 0x1) == 1)(input)?;
        let (input, (_, num_items)) = tuple((take(1usize), be_u8))(input)?;
        let (input, items) = counted("sub play item", num_items as usize, sub_play_item, input)?;

        trace!(?sub_path_type, items = items.len(), "decoded sub path");
        Ok((
            input,
            SubPath {
                sub_path_type,
                is_repeat_sub_path,
                items,
            },
        ))
    }

    length_value(be_u32, parser)(input)
}

fn play_item_angles(input: &[u8]) -> DResult<'_, (AngleInfo, Vec<Clip>)> {
    // main clip counts as an angle, too, so we want to read (n - 1) angle clips
    let (input, additional_angles) = map(be_u8, |n| n.saturating_sub(1))(input)?;
    let (input, angle_info) = map(be_u8, |b| AngleInfo {
        is_seamless_angle_change: (b & 0x1) == 1,
        is_different_audios: ((b & 0x2) >> 1) == 1,
    })(input)?;

    let (input, clips) = counted(
        "angle",
        additional_angles as usize,
        clip_with_clock_ref,
        input,
    )?;
    Ok((input, (angle_info, clips)))
}

/// Decodes one play item whose span starts at `relative_in_time` on the
/// playlist timeline.
pub(crate) fn play_item<'a>(relative_in_time: TimeStamp, input: &'a [u8]) -> DResult<'a, PlayItem> {
    let parser = |input: &'a [u8]| -> DResult<'a, PlayItem> {
        let (input, (file_name, codec_id)) = tuple((clip_file_name, clip_codec_id))(input)?;
        // 0000 0000 000X .... <-- connection_condition
        // |-reserved -|^---- is_multi_angle
        let (input, flags) = be_u16(input)?;
        let is_multi_angle = ((flags & 0x1F) >> 4) == 1;
        let connection_condition = (flags & 0x0F) as u8;
        let (input, stc_id) = be_u8(input)?;
        let (input, (in_time, out_time)) = tuple((time_stamp, time_stamp))(input)?;
        let (input, user_opt_mask) = be_u64(input)?;
        // PlayItemRandomAccessFlag, StillMode, StillTime
        let (input, _) = take(4usize)(input)?;
        let (input, (angle_info, angles)) = if is_multi_angle {
            map(play_item_angles, |(a, c)| (Some(a), c))(input)?
        } else {
            (input, (None, Vec::new()))
        };
        let (input, stn) = stream_number_table(input)?;

        Ok((
            input,
            PlayItem {
                clip: Clip {
                    file_name,
                    codec_id,
                    stc_id,
                },
                connection_condition,
                in_time,
                out_time,
                relative_in_time,
                is_multi_angle,
                user_opt_mask,
                angle_info,
                angles,
                stn,
            },
        ))
    };

    length_value(be_u16, parser)(input)
}

pub(crate) fn play_list(input: &[u8]) -> DResult<'_, Playlist> {
    fn parser(input: &[u8]) -> DResult<'_, Playlist> {
        let (input, (_, list_count, sub_count)) = tuple((take(2usize), be_u16, be_u16))(input)?;

        let mut duration = TimeStamp::ZERO;
        let (input, items) = counted(
            "play item",
            list_count as usize,
            |i| {
                let (i, item) = play_item(duration, i)?;
                duration += item.duration();
                trace!(
                    clip = %item.clip.file_name,
                    in_time = item.in_time.0,
                    out_time = item.out_time.0,
                    "decoded play item"
                );
                Ok((i, item))
            },
            input,
        )?;
        let (input, sub_paths) = counted("sub path", sub_count as usize, sub_path, input)?;

        Ok((
            input,
            Playlist {
                list_count,
                sub_count,
                items,
                sub_paths,
                duration,
            },
        ))
    }

    length_value(be_u32, parser)(input)
}

pub(crate) fn play_list_mark(input: &[u8]) -> DResult<'_, Vec<PlayListMark>> {
    fn mark(input: &[u8]) -> DResult<'_, PlayListMark> {
        let (input, _) = be_u8(input)?;
        let (input, mark_type) = map(be_u8, MarkType::from_code)(input)?;
        let (input, play_item) = map(be_u16, PlayItemRef)(input)?;
        let (input, ts) = time_stamp(input)?;
        let (input, entry_es_pid) = be_u16(input)?;
        let (input, duration) = map(time_stamp, |t| if t.is_zero() { None } else { Some(t) })(input)?;
        Ok((
            input,
            PlayListMark {
                mark_type,
                play_item,
                time_stamp: ts,
                entry_es_pid,
                duration,
            },
        ))
    }
    fn parser(input: &[u8]) -> DResult<'_, Vec<PlayListMark>> {
        let (input, n_marks) = be_u16(input)?;
        counted("playlist mark", n_marks as usize, mark, input)
    }

    length_value(be_u32, parser)(input)
}
