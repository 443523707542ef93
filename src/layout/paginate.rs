//! Page overflow handling for the flowing body.

use crate::model::{LineItemRecord, Locale, SubItem};
use crate::money::{format_amount, format_quantity};

use super::coords::{Align, ColumnSlot};
use super::text::flow;
use super::{Column, Emphasis, Origin, RenderContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginationState {
    /// Cursor inside the printable body.
    Accumulating,
    /// A block did not fit; a continuation page is being allocated.
    Overflowing,
    Done,
}

/// One renderable unit of the flowing body. Every kind reports the height
/// it consumed, so the controller treats them all alike.
#[derive(Clone, Copy, Debug)]
pub enum Block<'r> {
    MainItem {
        position: usize,
        item: &'r LineItemRecord,
    },
    Description {
        position: usize,
        text: &'r str,
    },
    SubItem {
        position: usize,
        sub_position: usize,
        sub: &'r SubItem,
    },
    DiscountRow {
        label: &'r str,
        amount: f64,
    },
    InstallmentSummary {
        term: u32,
        total_terms: u32,
        amount: f64,
        remaining: f64,
    },
}

fn sub_item_label(sub: &SubItem) -> String {
    format!("- {}", sub.label)
}

fn installment_label(locale: Locale, term: u32, total_terms: u32, remaining: f64) -> String {
    match locale {
        Locale::Thai => format!(
            "งวดที่ {term}/{total_terms}  คงเหลือ {}",
            format_amount(remaining)
        ),
        Locale::English => format!(
            "Installment {term} of {total_terms}  Remaining {}",
            format_amount(remaining)
        ),
    }
}

impl Block<'_> {
    /// Text that wraps inside the name column, with its size and left indent.
    fn flowing_text(&self, ctx: &RenderContext) -> (String, f64, f64) {
        let body = &ctx.table.body;
        match *self {
            Block::MainItem { item, .. } => (item.name.clone(), body.item_size, 0.0),
            Block::Description { text, .. } => {
                (text.to_string(), body.description_size, body.indent)
            }
            Block::SubItem { sub, .. } => (sub_item_label(sub), body.sub_item_size, body.indent),
            Block::DiscountRow { label, .. } => (label.to_string(), body.item_size, 0.0),
            Block::InstallmentSummary {
                term,
                total_terms,
                remaining,
                ..
            } => (
                installment_label(ctx.record.locale, term, total_terms, remaining),
                body.item_size,
                0.0,
            ),
        }
    }

    /// Vertical space this block needs on the page.
    pub fn measure(&self, ctx: &RenderContext) -> f64 {
        let (text, size, indent) = self.flowing_text(ctx);
        let name = ctx.table.columns.name;
        flow(
            &text,
            ctx.font,
            size,
            ctx.table.body.line_height,
            name.width - indent,
        )
        .bbox
        .height
    }

    /// Draw the block with its top edge at `top` and return the height used.
    pub fn render(&self, ctx: &mut RenderContext, top: f64) -> f64 {
        let (text, size, indent) = self.flowing_text(ctx);
        let columns = ctx.table.columns;
        let flowed = flow(
            &text,
            ctx.font,
            size,
            ctx.table.body.line_height,
            columns.name.width - indent,
        );
        let baseline = ctx.baseline(top, size);
        let (emphasis, text_origin) = self.text_origin();

        if emphasis == Emphasis::Strong {
            let left = columns.index.x;
            ctx.band(
                left,
                top - flowed.bbox.height,
                columns.amount.right() - left,
                flowed.bbox.height,
            );
        }

        for (i, line) in flowed.lines.iter().enumerate() {
            ctx.text(
                columns.name.x + indent,
                columns.name.width - indent,
                Align::Left,
                baseline - i as f64 * flowed.line_pitch,
                size,
                line,
                emphasis,
                text_origin,
            );
        }

        match *self {
            Block::MainItem { position, item } => {
                let mut cells = vec![
                    (Some(columns.index), item.index.to_string(), Column::Index),
                    (
                        Some(columns.quantity),
                        format_quantity(item.quantity),
                        Column::Quantity,
                    ),
                    (
                        columns.unit_price,
                        format_amount(item.unit_price),
                        Column::UnitPrice,
                    ),
                    (
                        Some(columns.amount),
                        format_amount(item.amount()),
                        Column::Amount,
                    ),
                ];
                if item.tax_marker {
                    cells.push((columns.marker, "*".to_string(), Column::Marker));
                }
                for (slot, text, column) in cells {
                    let Some(slot) = slot else { continue };
                    let origin = Origin::Item {
                        item: position,
                        column,
                    };
                    put(ctx, slot, baseline, size, &text, emphasis, origin);
                }
            }
            Block::SubItem {
                position,
                sub_position,
                sub,
            } => {
                if sub.quantity != 0.0 {
                    let origin = Origin::SubItem {
                        item: position,
                        sub: sub_position,
                        column: Column::Quantity,
                    };
                    let text = format_quantity(sub.quantity);
                    put(ctx, columns.quantity, baseline, size, &text, emphasis, origin);
                }
            }
            Block::DiscountRow { amount, .. } => {
                let origin = Origin::Discount {
                    column: Column::Amount,
                };
                let text = format_amount(amount);
                put(ctx, columns.amount, baseline, size, &text, emphasis, origin);
            }
            Block::InstallmentSummary { amount, .. } => {
                let origin = Origin::InstallmentSummary {
                    column: Column::Amount,
                };
                let text = format_amount(amount);
                put(ctx, columns.amount, baseline, size, &text, emphasis, origin);
            }
            Block::Description { .. } => {}
        }

        flowed.bbox.height
    }

    fn text_origin(&self) -> (Emphasis, Origin) {
        match *self {
            Block::MainItem { position, .. } => (
                Emphasis::Normal,
                Origin::Item {
                    item: position,
                    column: Column::Name,
                },
            ),
            Block::Description { position, .. } => {
                (Emphasis::Muted, Origin::Description { item: position })
            }
            Block::SubItem {
                position,
                sub_position,
                ..
            } => (
                Emphasis::Normal,
                Origin::SubItem {
                    item: position,
                    sub: sub_position,
                    column: Column::Name,
                },
            ),
            Block::DiscountRow { .. } => (
                Emphasis::Strong,
                Origin::Discount {
                    column: Column::Name,
                },
            ),
            Block::InstallmentSummary { .. } => (
                Emphasis::Strong,
                Origin::InstallmentSummary {
                    column: Column::Name,
                },
            ),
        }
    }
}

fn put(
    ctx: &mut RenderContext,
    slot: ColumnSlot,
    baseline: f64,
    size: f64,
    text: &str,
    emphasis: Emphasis,
    origin: Origin,
) {
    ctx.text(slot.x, slot.width, slot.align, baseline, size, text, emphasis, origin);
}

/// Decides, before each block is drawn, whether it still fits above the
/// footer boundary.
///
/// A block that does not fit moves to a fresh page from the template, which
/// gets its static fields before the block is drawn. A block taller than
/// the whole printable body is drawn as is on an otherwise empty page and
/// runs past the footer boundary; it is never split.
#[derive(Debug)]
pub struct PaginationController {
    state: PaginationState,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationController {
    pub fn new() -> Self {
        Self {
            state: PaginationState::Accumulating,
        }
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// Place one block and return the height it consumed.
    pub fn place(&mut self, ctx: &mut RenderContext, block: &Block) -> f64 {
        debug_assert_ne!(self.state, PaginationState::Done);
        let needed = block.measure(ctx);

        if ctx.cursor_y - needed < ctx.table.footer_boundary {
            if ctx.blocks_on_page() == 0 {
                log::warn!(
                    "Block of {needed:.1}pt exceeds the {:.1}pt printable body on page {}; drawing past the footer",
                    ctx.table.body_height(),
                    ctx.page_number
                );
            } else {
                self.state = PaginationState::Overflowing;
                ctx.new_page();
                self.state = PaginationState::Accumulating;
            }
        }

        let top = ctx.cursor_y;
        let used = block.render(ctx, top);
        ctx.cursor_y -= used;
        ctx.count_block();
        used
    }

    pub fn finish(&mut self) {
        self.state = PaginationState::Done;
    }
}
