//! Writes synthetic MPLS files for the integration tests.
#![allow(dead_code)]

pub const AVC: u8 = 0x1b;
pub const AC3: u8 = 0x81;
pub const DTS_HD_XLL: u8 = 0x86;
pub const PGS: u8 = 0x90;
pub const IGS: u8 = 0x91;
pub const TEXT: u8 = 0x92;

fn with_u16_len(body: Vec<u8>) -> Vec<u8> {
    let mut out = (body.len() as u16).to_be_bytes().to_vec();
    out.extend(body);
    out
}

fn with_u32_len(body: Vec<u8>) -> Vec<u8> {
    let mut out = (body.len() as u32).to_be_bytes().to_vec();
    out.extend(body);
    out
}

fn padded_with_u8_len(mut body: Vec<u8>, min: usize) -> Vec<u8> {
    body.resize(body.len().max(min), 0);
    let mut out = vec![body.len() as u8];
    out.extend(body);
    out
}

fn clip_ref(name: &str, stc_id: Option<u8>) -> Vec<u8> {
    assert_eq!(name.len(), 5);
    let mut out = name.as_bytes().to_vec();
    out.extend_from_slice(b"M2TS");
    out.extend(stc_id);
    out
}

/// A stream entry plus attribute block, as carried in a stream number table.
#[derive(Clone)]
pub struct StreamSpec {
    pub stream_type: u8,
    pub coding_type: u8,
    pub pid: u16,
    pub language: &'static str,
}

impl StreamSpec {
    pub fn new(coding_type: u8, pid: u16) -> Self {
        StreamSpec {
            stream_type: 1,
            coding_type,
            pid,
            language: "eng",
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut entry = vec![self.stream_type];
        match self.stream_type {
            2 => entry.extend_from_slice(&[1, 0]),
            3 => entry.push(1),
            _ => {}
        }
        entry.extend_from_slice(&self.pid.to_be_bytes());

        let mut attrs = vec![self.coding_type];
        match self.coding_type {
            0x01 | 0x02 | 0x1b | 0x20 | 0xea => attrs.push(0x61),
            0x24 => attrs.extend_from_slice(&[0x81, 0x12]),
            0x90 | 0x91 => attrs.extend_from_slice(self.language.as_bytes()),
            0x92 => {
                attrs.push(0x01);
                attrs.extend_from_slice(self.language.as_bytes());
            }
            // audio and anything unknown
            _ => {
                attrs.push(0x61);
                attrs.extend_from_slice(self.language.as_bytes());
            }
        }

        let mut out = padded_with_u8_len(entry, 9);
        out.extend(padded_with_u8_len(attrs, 5));
        out
    }
}

#[derive(Clone)]
pub struct ItemSpec {
    pub clip: &'static str,
    pub in_time: u32,
    pub out_time: u32,
    pub angles: Vec<&'static str>,
    pub video: Vec<StreamSpec>,
    pub audio: Vec<StreamSpec>,
    pub pg: Vec<StreamSpec>,
    pub ig: Vec<StreamSpec>,
    pub secondary_audio: u8,
}

impl ItemSpec {
    pub fn new(clip: &'static str, in_time: u32, out_time: u32) -> Self {
        ItemSpec {
            clip,
            in_time,
            out_time,
            angles: Vec::new(),
            video: vec![StreamSpec::new(AVC, 0x1011)],
            audio: vec![StreamSpec::new(AC3, 0x1100)],
            pg: Vec::new(),
            ig: Vec::new(),
            secondary_audio: 0,
        }
    }

    fn stn(&self) -> Vec<u8> {
        let mut body = vec![0, 0];
        body.extend_from_slice(&[
            self.video.len() as u8,
            self.audio.len() as u8,
            self.pg.len() as u8,
            self.ig.len() as u8,
            self.secondary_audio,
            0,
            0,
        ]);
        body.extend_from_slice(&[0; 5]);
        for s in self
            .video
            .iter()
            .chain(&self.audio)
            .chain(&self.pg)
            .chain(&self.ig)
        {
            body.extend(s.bytes());
        }
        with_u16_len(body)
    }

    pub fn bytes(&self) -> Vec<u8> {
        let multi_angle = !self.angles.is_empty();
        let mut body = clip_ref(self.clip, None);
        let flags: u16 = if multi_angle { 0x10 | 0x1 } else { 0x1 };
        body.extend_from_slice(&flags.to_be_bytes());
        body.push(0); // stc id
        body.extend_from_slice(&self.in_time.to_be_bytes());
        body.extend_from_slice(&self.out_time.to_be_bytes());
        body.extend_from_slice(&[0; 8]); // UO mask
        body.extend_from_slice(&[0; 4]); // random access, still mode/time
        if multi_angle {
            body.push(self.angles.len() as u8 + 1);
            body.push(0x01);
            for a in &self.angles {
                body.extend(clip_ref(a, Some(0)));
            }
        }
        body.extend(self.stn());
        with_u16_len(body)
    }
}

#[derive(Clone)]
pub struct SubItemSpec {
    pub clip: &'static str,
    pub is_multi_clip_entries: bool,
    /// Written whenever non-empty, even without the multi clip flag.
    pub clips: Vec<&'static str>,
}

impl SubItemSpec {
    pub fn bytes(&self) -> Vec<u8> {
        let mut body = clip_ref(self.clip, None);
        let flags: u32 = (1 << 1) | u32::from(self.is_multi_clip_entries);
        body.extend_from_slice(&flags.to_be_bytes());
        body.push(0); // ref to stc id
        body.extend_from_slice(&0u32.to_be_bytes());
        body.extend_from_slice(&45_000u32.to_be_bytes());
        body.extend_from_slice(&0u16.to_be_bytes());
        body.extend_from_slice(&900u32.to_be_bytes());
        if !self.clips.is_empty() {
            body.push(self.clips.len() as u8);
            body.push(0);
            for c in &self.clips {
                body.extend(clip_ref(c, Some(0)));
            }
        }
        with_u16_len(body)
    }
}

#[derive(Clone)]
pub struct SubPathSpec {
    pub sub_path_type: u8,
    pub items: Vec<SubItemSpec>,
}

impl SubPathSpec {
    pub fn bytes(&self) -> Vec<u8> {
        let mut body = vec![0, self.sub_path_type, 0, 0, 0, self.items.len() as u8];
        for item in &self.items {
            body.extend(item.bytes());
        }
        with_u32_len(body)
    }
}

#[derive(Clone, Copy)]
pub struct MarkSpec {
    pub mark_type: u8,
    pub play_item: u16,
    pub time_stamp: u32,
}

impl MarkSpec {
    pub fn entry(play_item: u16, time_stamp: u32) -> Self {
        MarkSpec {
            mark_type: 1,
            play_item,
            time_stamp,
        }
    }
}

#[derive(Clone)]
pub struct MplsBuilder {
    pub version: [u8; 4],
    pub items: Vec<ItemSpec>,
    pub sub_paths: Vec<SubPathSpec>,
    pub marks: Vec<MarkSpec>,
}

pub struct Built {
    pub bytes: Vec<u8>,
    pub playlist_pos: usize,
    pub chapter_pos: usize,
}

impl MplsBuilder {
    pub fn new() -> Self {
        MplsBuilder {
            version: *b"0200",
            items: Vec::new(),
            sub_paths: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn item(mut self, item: ItemSpec) -> Self {
        self.items.push(item);
        self
    }

    pub fn sub_path(mut self, sub_path: SubPathSpec) -> Self {
        self.sub_paths.push(sub_path);
        self
    }

    pub fn mark(mut self, mark: MarkSpec) -> Self {
        self.marks.push(mark);
        self
    }

    fn app_info() -> Vec<u8> {
        let mut body = vec![0, 1, 0, 0];
        body.extend_from_slice(&[0; 8]);
        body.extend_from_slice(&[0x40, 0x00]);
        with_u32_len(body)
    }

    fn play_list(&self) -> Vec<u8> {
        let mut body = vec![0, 0];
        body.extend_from_slice(&(self.items.len() as u16).to_be_bytes());
        body.extend_from_slice(&(self.sub_paths.len() as u16).to_be_bytes());
        for item in &self.items {
            body.extend(item.bytes());
        }
        for sub_path in &self.sub_paths {
            body.extend(sub_path.bytes());
        }
        with_u32_len(body)
    }

    fn play_list_marks(&self) -> Vec<u8> {
        let mut body = (self.marks.len() as u16).to_be_bytes().to_vec();
        for m in &self.marks {
            body.push(0);
            body.push(m.mark_type);
            body.extend_from_slice(&m.play_item.to_be_bytes());
            body.extend_from_slice(&m.time_stamp.to_be_bytes());
            body.extend_from_slice(&0xffffu16.to_be_bytes());
            body.extend_from_slice(&0u32.to_be_bytes());
        }
        with_u32_len(body)
    }

    pub fn build_with_layout(&self) -> Built {
        let app_info = MplsBuilder::app_info();
        let play_list = self.play_list();
        let marks = self.play_list_marks();

        let playlist_pos = 40 + app_info.len();
        let chapter_pos = playlist_pos + play_list.len();

        let mut bytes = b"MPLS".to_vec();
        bytes.extend_from_slice(&self.version);
        bytes.extend_from_slice(&(playlist_pos as u32).to_be_bytes());
        bytes.extend_from_slice(&(chapter_pos as u32).to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&[0; 20]);
        bytes.extend(app_info);
        bytes.extend(play_list);
        bytes.extend(marks);

        Built {
            bytes,
            playlist_pos,
            chapter_pos,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_with_layout().bytes
    }
}

/// Three segments at playlist offsets 0, 5000 and 12000, one chapter each.
pub fn simple() -> MplsBuilder {
    MplsBuilder::new()
        .item(ItemSpec::new("00055", 0, 5_000))
        .item(ItemSpec::new("00059", 10_000, 17_000))
        .item(ItemSpec::new("00061", 40_000, 42_000))
        .mark(MarkSpec::entry(0, 0))
        .mark(MarkSpec::entry(1, 11_000))
        .mark(MarkSpec::entry(2, 40_000))
}
