use std::collections::{BTreeMap, BTreeSet, HashMap};

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;

/// A loaded font and its advance widths. Immutable after load, so one handle
/// can be shared by any number of concurrent generation calls.
pub struct FontHandle {
    name: String,
    source: FontSource,
    ascender_ratio: f64,
}

enum FontSource {
    /// Standard-14 Helvetica, WinAnsi encoded, never embedded.
    Helvetica { widths_1000: Vec<f32> },
    TrueType {
        data: Vec<u8>,
        face_index: u32,
        glyphs: HashMap<char, u16>,
        /// Indexed by glyph id, in 1000-units.
        advances_1000: Vec<f32>,
    },
}

impl FontHandle {
    /// Parse TrueType/OpenType bytes. Collections use their first face.
    pub fn load(bytes: &[u8]) -> Result<FontHandle, Error> {
        let face_index = 0;
        let face = Face::parse(bytes, face_index)
            .map_err(|e| Error::Asset(format!("not a usable font: {e}")))?;

        let units = face.units_per_em() as f32;
        let advances_1000: Vec<f32> = (0..face.number_of_glyphs())
            .map(|gid| {
                face.glyph_hor_advance(ttf_parser::GlyphId(gid))
                    .map(|adv| adv as f32 / units * 1000.0)
                    .unwrap_or(0.0)
            })
            .collect();

        let mut glyphs = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    if let (Some(ch), Some(gid)) = (char::from_u32(cp), subtable.glyph_index(cp)) {
                        glyphs.entry(ch).or_insert(gid.0);
                    }
                });
            }
        }
        if glyphs.is_empty() {
            return Err(Error::Asset("font has no unicode cmap".into()));
        }

        let name = font_family_name(&face).unwrap_or_else(|| "Embedded".to_string());
        let ascender_ratio = face.ascender() as f64 / face.units_per_em() as f64;
        log::debug!(
            "Loaded font {name}: {} glyphs, {} mapped chars",
            advances_1000.len(),
            glyphs.len()
        );

        Ok(FontHandle {
            name,
            source: FontSource::TrueType {
                data: bytes.to_vec(),
                face_index,
                glyphs,
                advances_1000,
            },
            ascender_ratio,
        })
    }

    /// Built-in fallback used when no font asset is supplied. Latin only.
    pub fn helvetica() -> FontHandle {
        FontHandle {
            name: "Helvetica".to_string(),
            source: FontSource::Helvetica {
                widths_1000: helvetica_widths(),
            },
            ascender_ratio: 0.718,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ascender_ratio(&self) -> f64 {
        self.ascender_ratio
    }

    /// Whether `ch` can be drawn with this font. Whitespace always can.
    pub fn has_glyph(&self, ch: char) -> bool {
        if ch.is_whitespace() {
            return true;
        }
        match &self.source {
            FontSource::Helvetica { .. } => char_to_winansi(ch) >= 32,
            FontSource::TrueType { glyphs, .. } => glyphs.contains_key(&ch),
        }
    }

    /// Distinct characters of `text` the font has no glyph for, in order.
    pub fn missing_chars(&self, text: &str) -> Vec<char> {
        let mut missing: Vec<char> = Vec::new();
        for ch in text.chars() {
            if !self.has_glyph(ch) && !missing.contains(&ch) {
                missing.push(ch);
            }
        }
        missing
    }

    fn char_width_1000(&self, ch: char) -> f32 {
        match &self.source {
            FontSource::Helvetica { widths_1000 } => {
                let byte = char_to_winansi(ch);
                if byte >= 32 {
                    widths_1000[(byte - 32) as usize]
                } else {
                    0.0
                }
            }
            FontSource::TrueType {
                glyphs,
                advances_1000,
                ..
            } => {
                let gid = glyphs.get(&ch).copied().unwrap_or(0);
                advances_1000.get(gid as usize).copied().unwrap_or(0.0)
            }
        }
    }

    pub fn width_of_text(&self, text: &str, size_pt: f64) -> f64 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) as f64)
            .sum::<f64>()
            * size_pt
            / 1000.0
    }

    /// Write the font objects for the characters in `used_chars`.
    pub(crate) fn embed(
        &self,
        pdf: &mut Pdf,
        font_ref: Ref,
        used_chars: &BTreeSet<char>,
        alloc: &mut impl FnMut() -> Ref,
    ) -> Result<EmbeddedFont, Error> {
        match &self.source {
            FontSource::Helvetica { .. } => {
                pdf.type1_font(font_ref)
                    .base_font(Name(b"Helvetica"))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
                Ok(EmbeddedFont { char_to_gid: None })
            }
            FontSource::TrueType {
                data, face_index, ..
            } => {
                let char_to_gid = embed_truetype(
                    pdf,
                    font_ref,
                    &self.name,
                    data,
                    *face_index,
                    used_chars,
                    alloc,
                )?;
                Ok(EmbeddedFont {
                    char_to_gid: Some(char_to_gid),
                })
            }
        }
    }
}

/// Encoding state of a font once written into a PDF.
pub(crate) struct EmbeddedFont {
    char_to_gid: Option<BTreeMap<char, u16>>,
}

impl EmbeddedFont {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// UTF-8 to WinAnsi bytes; characters outside the code page are dropped.
fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 32)
        .collect()
}

/// Big-endian 2-byte glyph IDs for Identity-H content streams.
fn encode_as_gids(text: &str, char_to_gid: &BTreeMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.extend_from_slice(&gid.to_be_bytes());
    }
    out
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            44 | 46 => 278.0,                     // , .
            45 => 333.0,                          // -
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 | 74 => 278.0,                     // I J (narrow uppercase)
            77 => 833.0,                          // M (wide)
            65..=90 => 667.0,                     // uppercase A-Z (average)
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
            109 | 119 => 833.0,                   // m w (wide)
            97..=122 => 556.0,                    // lowercase a-z (average)
            _ => 556.0,
        })
        .collect()
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding.
/// The font data is subsetted to only include glyphs used in the document.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &BTreeSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<BTreeMap<char, u16>, Error> {
    let face = Face::parse(font_data, face_index)
        .map_err(|e| Error::Asset(format!("font {font_name} no longer parses: {e}")))?;
    let descriptor_ref = alloc();
    let data_ref = alloc();

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    // Remap in char order so the subset is identical on every run
    let mut remapper = subsetter::GlyphRemapper::new();
    let mut glyphs = Vec::with_capacity(used_chars.len());
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            let width = face
                .glyph_hor_advance(gid)
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0);
            glyphs.push((ch, gid.0, remapper.remap(gid.0), width));
        }
    }

    let (subset_data, subsetted) = match subsetter::subset(font_data, face_index, &remapper) {
        Ok(data) => (data, true),
        Err(e) => {
            log::warn!("Font subsetting failed for {font_name}: {e}; embedding full font");
            (font_data.to_vec(), false)
        }
    };

    let mut char_to_gid = BTreeMap::new();
    let mut gid_widths: BTreeMap<u16, f32> = BTreeMap::new();
    // Unmapped characters are drawn as .notdef and measured with its advance
    let notdef_width = face
        .glyph_hor_advance(ttf_parser::GlyphId(0))
        .map(|adv| adv as f32 / units * 1000.0)
        .unwrap_or(0.0);
    gid_widths.insert(0, notdef_width);
    for (ch, old_gid, new_gid, width) in glyphs {
        let gid = if subsetted { new_gid } else { old_gid };
        char_to_gid.insert(ch, gid);
        gid_widths.insert(gid, width);
    }

    let data_len = i32::try_from(subset_data.len())
        .map_err(|_| Error::Asset(format!("font {font_name} is too large to embed")))?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font_name.replace(' ', "");

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        let mut w = cid.widths();
        for (&gid, &width) in &gid_widths {
            w.consecutive(gid, [width]);
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Ok(char_to_gid)
}
