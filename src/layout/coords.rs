//! Fixed coordinates of every document kind.
//!
//! These tables mirror the pre-printed stationery: when the artwork moves,
//! the numbers here move with it. Units are PDF points with the origin at
//! the bottom-left corner of an A4 page. Text Y values are the top of the
//! text line, not its baseline.

use crate::model::DocumentKind;

pub const A4_WIDTH: f64 = 595.28;
pub const A4_HEIGHT: f64 = 841.89;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Logical static field, drawn identically on every physical page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    PageNumber,
    BillCode,
    BillDate,
    Reference,
    PartyName,
    PartyAddress,
    PartyTaxId,
    PartyContact,
    Subtotal,
    Discount,
    Tax,
    GrandTotal,
    AmountInWords,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSlot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub align: Align,
    pub size: f64,
}

/// One column of the flowing body. For right-aligned columns the fixed
/// right edge is `x + width`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSlot {
    pub x: f64,
    pub width: f64,
    pub align: Align,
}

impl ColumnSlot {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Columns {
    pub index: ColumnSlot,
    pub name: ColumnSlot,
    pub quantity: ColumnSlot,
    pub unit_price: Option<ColumnSlot>,
    pub amount: ColumnSlot,
    pub marker: Option<ColumnSlot>,
}

/// Type sizes of the flowing rows. Row height is `lines × size × line_height`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyStyle {
    pub item_size: f64,
    pub description_size: f64,
    pub sub_item_size: f64,
    pub line_height: f64,
    /// Left indent of description and sub-item rows inside the name column.
    pub indent: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTable {
    pub kind: DocumentKind,
    pub page_width: f64,
    pub page_height: f64,
    /// Cursor position of the first flowing row on every page.
    pub body_top: f64,
    /// Rows may not end below this line.
    pub footer_boundary: f64,
    pub columns: Columns,
    pub body: BodyStyle,
    pub fields: &'static [(Field, FieldSlot)],
}

impl CoordinateTable {
    pub fn for_kind(kind: DocumentKind) -> &'static CoordinateTable {
        match kind {
            DocumentKind::Quotation => &QUOTATION,
            DocumentKind::PurchaseOrder => &PURCHASE_ORDER,
            DocumentKind::Invoice => &INVOICE,
            DocumentKind::TaxInvoice => &TAX_INVOICE,
            DocumentKind::Receipt => &RECEIPT,
            DocumentKind::InstallmentStatement => &INSTALLMENT_STATEMENT,
        }
    }

    pub fn slot(&self, field: Field) -> Option<&FieldSlot> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, slot)| slot)
    }

    /// Height of the printable body.
    pub fn body_height(&self) -> f64 {
        self.body_top - self.footer_boundary
    }
}

const fn field(x: f64, y: f64, width: f64, align: Align, size: f64) -> FieldSlot {
    FieldSlot {
        x,
        y,
        width,
        align,
        size,
    }
}

const fn col(x: f64, width: f64, align: Align) -> ColumnSlot {
    ColumnSlot { x, width, align }
}

const STANDARD_BODY: BodyStyle = BodyStyle {
    item_size: 10.0,
    description_size: 8.0,
    sub_item_size: 9.0,
    line_height: 1.25,
    indent: 12.0,
};

static QUOTATION: CoordinateTable = CoordinateTable {
    kind: DocumentKind::Quotation,
    page_width: A4_WIDTH,
    page_height: A4_HEIGHT,
    body_top: 548.0,
    footer_boundary: 208.0,
    columns: Columns {
        index: col(36.0, 28.0, Align::Center),
        name: col(70.0, 250.0, Align::Left),
        quantity: col(326.0, 52.0, Align::Right),
        unit_price: Some(col(384.0, 80.0, Align::Right)),
        amount: col(470.0, 86.0, Align::Right),
        marker: Some(col(558.0, 8.0, Align::Left)),
    },
    body: STANDARD_BODY,
    fields: &[
        (Field::PageNumber, field(520.0, 800.0, 40.0, Align::Right, 9.0)),
        (Field::BillCode, field(440.0, 716.0, 120.0, Align::Left, 10.0)),
        (Field::BillDate, field(440.0, 698.0, 120.0, Align::Left, 10.0)),
        (Field::Reference, field(440.0, 680.0, 120.0, Align::Left, 10.0)),
        (Field::PartyName, field(92.0, 716.0, 300.0, Align::Left, 10.0)),
        (Field::PartyAddress, field(92.0, 698.0, 300.0, Align::Left, 9.0)),
        (Field::PartyTaxId, field(92.0, 662.0, 200.0, Align::Left, 9.0)),
        (Field::PartyContact, field(92.0, 646.0, 300.0, Align::Left, 9.0)),
        (Field::Subtotal, field(470.0, 190.0, 86.0, Align::Right, 10.0)),
        (Field::Discount, field(470.0, 172.0, 86.0, Align::Right, 10.0)),
        (Field::Tax, field(470.0, 154.0, 86.0, Align::Right, 10.0)),
        (Field::GrandTotal, field(470.0, 136.0, 86.0, Align::Right, 11.0)),
        (Field::AmountInWords, field(70.0, 136.0, 300.0, Align::Center, 10.0)),
    ],
};

static PURCHASE_ORDER: CoordinateTable = CoordinateTable {
    kind: DocumentKind::PurchaseOrder,
    page_width: A4_WIDTH,
    page_height: A4_HEIGHT,
    body_top: 560.0,
    footer_boundary: 220.0,
    columns: Columns {
        index: col(34.0, 26.0, Align::Center),
        name: col(66.0, 262.0, Align::Left),
        quantity: col(332.0, 48.0, Align::Right),
        unit_price: Some(col(386.0, 80.0, Align::Right)),
        amount: col(472.0, 86.0, Align::Right),
        marker: None,
    },
    body: STANDARD_BODY,
    fields: &[
        (Field::PageNumber, field(520.0, 804.0, 40.0, Align::Right, 9.0)),
        (Field::BillCode, field(446.0, 724.0, 112.0, Align::Left, 10.0)),
        (Field::BillDate, field(446.0, 706.0, 112.0, Align::Left, 10.0)),
        (Field::Reference, field(446.0, 688.0, 112.0, Align::Left, 10.0)),
        (Field::PartyName, field(88.0, 724.0, 310.0, Align::Left, 10.0)),
        (Field::PartyAddress, field(88.0, 706.0, 310.0, Align::Left, 9.0)),
        (Field::PartyTaxId, field(88.0, 670.0, 200.0, Align::Left, 9.0)),
        (Field::PartyContact, field(88.0, 654.0, 310.0, Align::Left, 9.0)),
        (Field::Subtotal, field(472.0, 200.0, 86.0, Align::Right, 10.0)),
        (Field::Discount, field(472.0, 182.0, 86.0, Align::Right, 10.0)),
        (Field::Tax, field(472.0, 164.0, 86.0, Align::Right, 10.0)),
        (Field::GrandTotal, field(472.0, 146.0, 86.0, Align::Right, 11.0)),
        (Field::AmountInWords, field(66.0, 146.0, 310.0, Align::Center, 10.0)),
    ],
};

static INVOICE: CoordinateTable = CoordinateTable {
    kind: DocumentKind::Invoice,
    page_width: A4_WIDTH,
    page_height: A4_HEIGHT,
    body_top: 540.0,
    footer_boundary: 200.0,
    columns: Columns {
        index: col(36.0, 28.0, Align::Center),
        name: col(70.0, 246.0, Align::Left),
        quantity: col(322.0, 54.0, Align::Right),
        unit_price: Some(col(382.0, 82.0, Align::Right)),
        amount: col(470.0, 86.0, Align::Right),
        marker: Some(col(558.0, 8.0, Align::Left)),
    },
    body: STANDARD_BODY,
    fields: &[
        (Field::PageNumber, field(520.0, 800.0, 40.0, Align::Right, 9.0)),
        (Field::BillCode, field(440.0, 708.0, 120.0, Align::Left, 10.0)),
        (Field::BillDate, field(440.0, 690.0, 120.0, Align::Left, 10.0)),
        (Field::Reference, field(440.0, 672.0, 120.0, Align::Left, 10.0)),
        (Field::PartyName, field(92.0, 708.0, 300.0, Align::Left, 10.0)),
        (Field::PartyAddress, field(92.0, 690.0, 300.0, Align::Left, 9.0)),
        (Field::PartyTaxId, field(92.0, 654.0, 200.0, Align::Left, 9.0)),
        (Field::PartyContact, field(92.0, 638.0, 300.0, Align::Left, 9.0)),
        (Field::Subtotal, field(470.0, 182.0, 86.0, Align::Right, 10.0)),
        (Field::Discount, field(470.0, 164.0, 86.0, Align::Right, 10.0)),
        (Field::Tax, field(470.0, 146.0, 86.0, Align::Right, 10.0)),
        (Field::GrandTotal, field(470.0, 128.0, 86.0, Align::Right, 11.0)),
        (Field::AmountInWords, field(70.0, 128.0, 300.0, Align::Center, 10.0)),
    ],
};

static TAX_INVOICE: CoordinateTable = CoordinateTable {
    kind: DocumentKind::TaxInvoice,
    page_width: A4_WIDTH,
    page_height: A4_HEIGHT,
    body_top: 536.0,
    footer_boundary: 196.0,
    columns: Columns {
        index: col(36.0, 28.0, Align::Center),
        name: col(70.0, 246.0, Align::Left),
        quantity: col(322.0, 54.0, Align::Right),
        unit_price: Some(col(382.0, 82.0, Align::Right)),
        amount: col(470.0, 86.0, Align::Right),
        marker: Some(col(558.0, 8.0, Align::Left)),
    },
    body: STANDARD_BODY,
    fields: &[
        (Field::PageNumber, field(520.0, 800.0, 40.0, Align::Right, 9.0)),
        (Field::BillCode, field(440.0, 704.0, 120.0, Align::Left, 10.0)),
        (Field::BillDate, field(440.0, 686.0, 120.0, Align::Left, 10.0)),
        (Field::Reference, field(440.0, 668.0, 120.0, Align::Left, 10.0)),
        (Field::PartyName, field(92.0, 704.0, 300.0, Align::Left, 10.0)),
        (Field::PartyAddress, field(92.0, 686.0, 300.0, Align::Left, 9.0)),
        (Field::PartyTaxId, field(92.0, 650.0, 200.0, Align::Left, 9.0)),
        (Field::PartyContact, field(92.0, 634.0, 300.0, Align::Left, 9.0)),
        (Field::Subtotal, field(470.0, 178.0, 86.0, Align::Right, 10.0)),
        (Field::Discount, field(470.0, 160.0, 86.0, Align::Right, 10.0)),
        (Field::Tax, field(470.0, 142.0, 86.0, Align::Right, 10.0)),
        (Field::GrandTotal, field(470.0, 124.0, 86.0, Align::Right, 11.0)),
        (Field::AmountInWords, field(70.0, 124.0, 300.0, Align::Center, 10.0)),
    ],
};

// Receipts print no unit price and no tax marker.
static RECEIPT: CoordinateTable = CoordinateTable {
    kind: DocumentKind::Receipt,
    page_width: A4_WIDTH,
    page_height: A4_HEIGHT,
    body_top: 520.0,
    footer_boundary: 232.0,
    columns: Columns {
        index: col(40.0, 28.0, Align::Center),
        name: col(76.0, 330.0, Align::Left),
        quantity: col(412.0, 50.0, Align::Right),
        unit_price: None,
        amount: col(468.0, 88.0, Align::Right),
        marker: None,
    },
    body: STANDARD_BODY,
    fields: &[
        (Field::PageNumber, field(520.0, 800.0, 40.0, Align::Right, 9.0)),
        (Field::BillCode, field(444.0, 700.0, 116.0, Align::Left, 10.0)),
        (Field::BillDate, field(444.0, 682.0, 116.0, Align::Left, 10.0)),
        (Field::Reference, field(444.0, 664.0, 116.0, Align::Left, 10.0)),
        (Field::PartyName, field(96.0, 700.0, 290.0, Align::Left, 10.0)),
        (Field::PartyAddress, field(96.0, 682.0, 290.0, Align::Left, 9.0)),
        (Field::PartyTaxId, field(96.0, 646.0, 200.0, Align::Left, 9.0)),
        (Field::PartyContact, field(96.0, 630.0, 290.0, Align::Left, 9.0)),
        (Field::Subtotal, field(468.0, 214.0, 88.0, Align::Right, 10.0)),
        (Field::Discount, field(468.0, 196.0, 88.0, Align::Right, 10.0)),
        (Field::Tax, field(468.0, 178.0, 88.0, Align::Right, 10.0)),
        (Field::GrandTotal, field(468.0, 160.0, 88.0, Align::Right, 11.0)),
        (Field::AmountInWords, field(76.0, 160.0, 330.0, Align::Center, 10.0)),
    ],
};

static INSTALLMENT_STATEMENT: CoordinateTable = CoordinateTable {
    kind: DocumentKind::InstallmentStatement,
    page_width: A4_WIDTH,
    page_height: A4_HEIGHT,
    body_top: 530.0,
    footer_boundary: 230.0,
    columns: Columns {
        index: col(36.0, 28.0, Align::Center),
        name: col(70.0, 250.0, Align::Left),
        quantity: col(326.0, 52.0, Align::Right),
        unit_price: Some(col(384.0, 80.0, Align::Right)),
        amount: col(470.0, 86.0, Align::Right),
        marker: None,
    },
    body: STANDARD_BODY,
    fields: &[
        (Field::PageNumber, field(520.0, 800.0, 40.0, Align::Right, 9.0)),
        (Field::BillCode, field(440.0, 706.0, 120.0, Align::Left, 10.0)),
        (Field::BillDate, field(440.0, 688.0, 120.0, Align::Left, 10.0)),
        (Field::Reference, field(440.0, 670.0, 120.0, Align::Left, 10.0)),
        (Field::PartyName, field(92.0, 706.0, 300.0, Align::Left, 10.0)),
        (Field::PartyAddress, field(92.0, 688.0, 300.0, Align::Left, 9.0)),
        (Field::PartyTaxId, field(92.0, 652.0, 200.0, Align::Left, 9.0)),
        (Field::PartyContact, field(92.0, 636.0, 300.0, Align::Left, 9.0)),
        (Field::Subtotal, field(470.0, 212.0, 86.0, Align::Right, 10.0)),
        (Field::Discount, field(470.0, 194.0, 86.0, Align::Right, 10.0)),
        (Field::Tax, field(470.0, 176.0, 86.0, Align::Right, 10.0)),
        (Field::GrandTotal, field(470.0, 158.0, 86.0, Align::Right, 11.0)),
        (Field::AmountInWords, field(70.0, 158.0, 300.0, Align::Center, 10.0)),
    ],
};
