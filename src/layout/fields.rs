//! Fields repeated on every physical page: page number, bill code and date,
//! the customer or vendor block and the totals.

use crate::money::format_amount;

use super::coords::Field;
use super::text::flow;
use super::{Emphasis, Origin, RenderContext};

/// Multi-line fields (address, amount in words) wrap inside their slot.
const FIELD_LINE_HEIGHT: f64 = 1.25;

fn field_text(ctx: &RenderContext, field: Field) -> String {
    let record = ctx.record;
    let party = &record.party;
    let summary = ctx.summary;
    match field {
        Field::PageNumber => ctx.page_number.to_string(),
        Field::BillCode => record.code.clone(),
        Field::BillDate => record
            .date
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| ctx.as_of.to_string()),
        Field::Reference => record.reference.clone().unwrap_or_default(),
        Field::PartyName => party.display_name(record.locale),
        Field::PartyAddress => party.address.clone(),
        Field::PartyTaxId => party.tax_id.clone(),
        Field::PartyContact => party.contact_line(record.locale),
        Field::Subtotal => format_amount(summary.subtotal),
        Field::Discount => format_amount(summary.discount),
        Field::Tax => format_amount(summary.tax),
        Field::GrandTotal => format_amount(summary.grand_total),
        Field::AmountInWords => summary.words.clone(),
    }
}

/// Draw every field of the coordinate table on the current page.
pub(crate) fn render_static(ctx: &mut RenderContext) {
    for &(field, slot) in ctx.table.fields {
        let text = field_text(ctx, field);
        if text.is_empty() {
            continue;
        }
        let flowed = flow(&text, ctx.font, slot.size, FIELD_LINE_HEIGHT, slot.width);
        let baseline = ctx.baseline(slot.y, slot.size);
        for (i, line) in flowed.lines.iter().enumerate() {
            ctx.text(
                slot.x,
                slot.width,
                slot.align,
                baseline - i as f64 * flowed.line_pitch,
                slot.size,
                line,
                Emphasis::Normal,
                Origin::Field(field),
            );
        }
    }
}
