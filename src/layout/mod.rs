//! Layout of one bill onto fixed stationery.
//!
//! `assemble` walks the line items in order, lets the
//! [`PaginationController`] place each block, and returns a display list per
//! physical page. Nothing here touches PDF objects; `crate::pdf` turns the
//! display list into bytes.

pub mod coords;
mod fields;
pub mod paginate;
pub mod text;

use std::sync::Arc;

use crate::fonts::FontHandle;
use crate::model::{BillRecord, DocumentSummary, TerminalRow};
use crate::template::DocumentTemplate;

use coords::{Align, CoordinateTable, Field};
use paginate::{Block, PaginationController};

/// Everything one generation call needs. Font and template are shared,
/// read-only assets; the record is this call's own.
#[derive(Clone)]
pub struct RenderRequest {
    pub record: BillRecord,
    pub template: Arc<DocumentTemplate>,
    pub font: Arc<FontHandle>,
    pub table: CoordinateTable,
    /// Printed when the record carries no date of its own.
    pub as_of: String,
}

impl RenderRequest {
    pub fn new(
        record: BillRecord,
        template: Arc<DocumentTemplate>,
        font: Arc<FontHandle>,
        as_of: impl Into<String>,
    ) -> Self {
        let table = *CoordinateTable::for_kind(record.kind);
        Self {
            record,
            template,
            font,
            table,
            as_of: as_of.into(),
        }
    }

    pub fn with_table(mut self, table: CoordinateTable) -> Self {
        self.table = table;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    /// Description lines: gray.
    Muted,
    /// Terminal pseudo-rows: fill + stroke.
    Strong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Index,
    Name,
    Quantity,
    UnitPrice,
    Amount,
    Marker,
}

/// What a piece of drawn text belongs to. Item positions are indices into
/// `BillRecord::items`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Field(Field),
    Item { item: usize, column: Column },
    Description { item: usize },
    SubItem { item: usize, sub: usize, column: Column },
    Discount { column: Column },
    InstallmentSummary { column: Column },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextOp {
    pub x: f64,
    /// Baseline.
    pub y: f64,
    pub size: f64,
    /// Measured advance width of `text`.
    pub width: f64,
    pub text: String,
    pub emphasis: Emphasis,
    pub origin: Origin,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    /// Highlight band behind a terminal row.
    Band {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    /// 1-based physical page number.
    pub number: usize,
    /// Index into the template's pages.
    pub template_page: usize,
    pub ops: Vec<DrawOp>,
    /// Flowing blocks placed on this page.
    pub blocks: usize,
    /// Cursor position after the last block on this page.
    pub cursor_end: f64,
}

impl PageLayout {
    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            DrawOp::Band { .. } => None,
        })
    }

    /// First text drawn for `origin` on this page.
    pub fn find(&self, origin: Origin) -> Option<&TextOp> {
        self.texts().find(|t| t.origin == origin)
    }
}

/// Mutable state of one assembly call. Owned by that call alone; the shared
/// assets are only borrowed.
pub struct RenderContext<'a> {
    pub(crate) record: &'a BillRecord,
    pub(crate) summary: &'a DocumentSummary,
    pub(crate) table: &'a CoordinateTable,
    pub(crate) template: &'a DocumentTemplate,
    pub(crate) font: &'a FontHandle,
    pub(crate) as_of: &'a str,
    pages: Vec<PageLayout>,
    page: PageLayout,
    pub(crate) cursor_y: f64,
    pub(crate) page_number: usize,
}

impl<'a> RenderContext<'a> {
    fn new(request: &'a RenderRequest, summary: &'a DocumentSummary) -> Self {
        let mut ctx = RenderContext {
            record: &request.record,
            summary,
            table: &request.table,
            template: &request.template,
            font: &request.font,
            as_of: &request.as_of,
            pages: Vec::new(),
            page: blank_page(1, request.template.page_for(1), request.table.body_top),
            cursor_y: request.table.body_top,
            page_number: 1,
        };
        fields::render_static(&mut ctx);
        ctx
    }

    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Close the current page and open the next one from the template.
    pub(crate) fn new_page(&mut self) {
        self.page.cursor_end = self.cursor_y;
        self.page_number += 1;
        let next = blank_page(
            self.page_number,
            self.template.page_for(self.page_number),
            self.table.body_top,
        );
        self.pages.push(std::mem::replace(&mut self.page, next));
        self.cursor_y = self.table.body_top;
        log::debug!(
            "{} {}: page {} allocated",
            self.record.kind.label(),
            self.record.code,
            self.page_number
        );
        fields::render_static(self);
    }

    pub(crate) fn count_block(&mut self) {
        self.page.blocks += 1;
    }

    pub(crate) fn blocks_on_page(&self) -> usize {
        self.page.blocks
    }

    /// Draw one line of text with its baseline at `y`, aligned inside
    /// `[x, x + width]`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn text(
        &mut self,
        x: f64,
        width: f64,
        align: Align,
        y: f64,
        size: f64,
        text: &str,
        emphasis: Emphasis,
        origin: Origin,
    ) {
        if text.is_empty() {
            return;
        }
        let measured = self.font.width_of_text(text, size);
        let x = match align {
            Align::Left => x,
            Align::Center => x + (width - measured) / 2.0,
            Align::Right => x + width - measured,
        };
        self.page.ops.push(DrawOp::Text(TextOp {
            x,
            y,
            size,
            width: measured,
            text: text.to_string(),
            emphasis,
            origin,
        }));
    }

    pub(crate) fn band(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.page.ops.push(DrawOp::Band {
            x,
            y,
            width,
            height,
        });
    }

    /// Baseline of the first line of a block whose top is at `top`.
    pub(crate) fn baseline(&self, top: f64, size: f64) -> f64 {
        top - size * self.font.ascender_ratio()
    }

    fn into_pages(mut self) -> Vec<PageLayout> {
        self.page.cursor_end = self.cursor_y;
        self.pages.push(self.page);
        self.pages
    }
}

fn blank_page(number: usize, template_page: usize, body_top: f64) -> PageLayout {
    PageLayout {
        number,
        template_page,
        ops: Vec::new(),
        blocks: 0,
        cursor_end: body_top,
    }
}

/// Lay out every visible line item, then the terminal pseudo-row, and
/// return the physical pages in creation order.
pub fn assemble(request: &RenderRequest) -> Vec<PageLayout> {
    let record = &request.record;
    let summary = DocumentSummary::from_record(record);
    let mut ctx = RenderContext::new(request, &summary);
    let mut controller = PaginationController::new();

    for (position, item) in record.items.iter().enumerate() {
        if item.hidden {
            log::debug!("Skipping hidden item #{} '{}'", item.index, item.name);
            continue;
        }
        controller.place(&mut ctx, &Block::MainItem { position, item });

        if let Some(text) = item.description.as_deref().filter(|d| !d.trim().is_empty()) {
            controller.place(&mut ctx, &Block::Description { position, text });
        }

        for (sub_position, sub) in item.sub_items().iter().enumerate() {
            controller.place(
                &mut ctx,
                &Block::SubItem {
                    position,
                    sub_position,
                    sub,
                },
            );
        }
    }

    match &record.terminal {
        Some(TerminalRow::Discount { label, .. }) => {
            controller.place(
                &mut ctx,
                &Block::DiscountRow {
                    label,
                    amount: -summary.discount,
                },
            );
        }
        Some(TerminalRow::InstallmentSummary {
            term,
            total_terms,
            amount,
            remaining,
        }) => {
            controller.place(
                &mut ctx,
                &Block::InstallmentSummary {
                    term: *term,
                    total_terms: *total_terms,
                    amount: *amount,
                    remaining: *remaining,
                },
            );
        }
        None => {}
    }

    controller.finish();
    ctx.into_pages()
}
