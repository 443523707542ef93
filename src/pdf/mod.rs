use std::collections::{BTreeMap, BTreeSet};

use pdf_writer::types::TextRenderingMode;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::layout::{DrawOp, Emphasis, PageLayout, RenderRequest, TextOp};
use crate::template::{DocumentTemplate, PageImage};

const FONT_NAME: &[u8] = b"F1";
const MUTED_GRAY: f32 = 0.35;
const BAND_RGB: [f32; 3] = [0.93, 0.93, 0.93];

/// Write the template backgrounds that `pages` refer to. Returns the XObject
/// name per template page index.
fn embed_backgrounds(
    pdf: &mut Pdf,
    template: &DocumentTemplate,
    pages: &[PageLayout],
    alloc: &mut impl FnMut() -> Ref,
) -> Result<BTreeMap<usize, (String, Ref)>, Error> {
    let used: BTreeSet<usize> = pages.iter().map(|p| p.template_page).collect();
    let mut names = BTreeMap::new();

    for index in used {
        let page = template
            .page(index)
            .ok_or_else(|| Error::Asset(format!("template has no page {}", index + 1)))?;
        let xobj_ref = alloc();
        let (w, h) = (page.pixel_width as i32, page.pixel_height as i32);

        match &page.image {
            PageImage::Jpeg { data, gray } => {
                let mut xobj = pdf.image_xobject(xobj_ref, data);
                xobj.filter(Filter::DctDecode);
                xobj.width(w);
                xobj.height(h);
                if *gray {
                    xobj.color_space().device_gray();
                } else {
                    xobj.color_space().device_rgb();
                }
                xobj.bits_per_component(8);
            }
            PageImage::Flate { rgb, alpha } => {
                let smask_ref = alpha.as_ref().map(|alpha| {
                    let mask_ref = alloc();
                    let mut mask = pdf.image_xobject(mask_ref, alpha);
                    mask.filter(Filter::FlateDecode);
                    mask.width(w);
                    mask.height(h);
                    mask.color_space().device_gray();
                    mask.bits_per_component(8);
                    mask_ref
                });

                let mut xobj = pdf.image_xobject(xobj_ref, rgb);
                xobj.filter(Filter::FlateDecode);
                xobj.width(w);
                xobj.height(h);
                xobj.color_space().device_rgb();
                xobj.bits_per_component(8);
                if let Some(mask_ref) = smask_ref {
                    xobj.s_mask(mask_ref);
                }
            }
        }

        names.insert(index, (format!("Bg{}", index + 1), xobj_ref));
    }
    Ok(names)
}

fn draw_text(content: &mut Content, op: &TextOp, bytes: &[u8]) {
    match op.emphasis {
        Emphasis::Normal => {}
        Emphasis::Muted => {
            content.set_fill_gray(MUTED_GRAY);
        }
        Emphasis::Strong => {
            content.set_text_rendering_mode(TextRenderingMode::FillStroke);
            content.set_line_width((op.size * 0.04) as f32);
        }
    }

    content
        .begin_text()
        .set_font(Name(FONT_NAME), op.size as f32)
        .next_line(op.x as f32, op.y as f32)
        .show(Str(bytes))
        .end_text();

    match op.emphasis {
        Emphasis::Normal => {}
        Emphasis::Muted => {
            content.set_fill_gray(0.0);
        }
        Emphasis::Strong => {
            content.set_text_rendering_mode(TextRenderingMode::Fill);
        }
    }
}

/// Serialize laid-out pages, in order, each over its template background.
pub fn write(pages: &[PageLayout], request: &RenderRequest) -> Result<Vec<u8>, Error> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let font_ref = alloc();

    let used_chars: BTreeSet<char> = pages
        .iter()
        .flat_map(|p| p.texts())
        .flat_map(|t| t.text.chars())
        .chain(std::iter::once(' '))
        .collect();
    let font = request.font.embed(&mut pdf, font_ref, &used_chars, &mut alloc)?;

    let backgrounds = embed_backgrounds(&mut pdf, &request.template, pages, &mut alloc)?;

    let table = &request.table;
    let (page_w, page_h) = (table.page_width as f32, table.page_height as f32);

    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in pages.iter().enumerate() {
        let mut content = Content::new();

        if let Some((name, _)) = backgrounds.get(&page.template_page) {
            content.save_state();
            content.transform([page_w, 0.0, 0.0, page_h, 0.0, 0.0]);
            content.x_object(Name(name.as_bytes()));
            content.restore_state();
        }

        for op in &page.ops {
            match op {
                DrawOp::Band {
                    x,
                    y,
                    width,
                    height,
                } => {
                    content.save_state();
                    content.set_fill_rgb(BAND_RGB[0], BAND_RGB[1], BAND_RGB[2]);
                    content.rect(*x as f32, *y as f32, *width as f32, *height as f32);
                    content.fill_nonzero();
                    content.restore_state();
                }
                DrawOp::Text(text) => draw_text(&mut content, text, &font.encode(&text.text)),
            }
        }

        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let title = format!("{} {}", request.record.kind.label(), request.record.code);
    pdf.document_info(info_id)
        .title(TextStr(&title))
        .producer(TextStr("paperform-pdf"));

    for (i, layout) in pages.iter().enumerate() {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, page_w, page_h))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        resources.fonts().pair(Name(FONT_NAME), font_ref);
        if let Some((name, xobj_ref)) = backgrounds.get(&layout.template_page) {
            resources.x_objects().pair(Name(name.as_bytes()), *xobj_ref);
        }
    }

    Ok(pdf.finish())
}
