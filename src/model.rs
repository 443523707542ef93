use std::str::FromStr;

use serde::Deserialize;

use crate::money::{amount_in_words, round2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Quotation,
    PurchaseOrder,
    Invoice,
    TaxInvoice,
    Receipt,
    InstallmentStatement,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 6] = [
        DocumentKind::Quotation,
        DocumentKind::PurchaseOrder,
        DocumentKind::Invoice,
        DocumentKind::TaxInvoice,
        DocumentKind::Receipt,
        DocumentKind::InstallmentStatement,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Quotation => "Quotation",
            DocumentKind::PurchaseOrder => "Purchase order",
            DocumentKind::Invoice => "Invoice",
            DocumentKind::TaxInvoice => "Tax invoice",
            DocumentKind::Receipt => "Receipt",
            DocumentKind::InstallmentStatement => "Installment statement",
        }
    }

    /// Directory / CLI name.
    pub fn slug(self) -> &'static str {
        match self {
            DocumentKind::Quotation => "quotation",
            DocumentKind::PurchaseOrder => "purchase_order",
            DocumentKind::Invoice => "invoice",
            DocumentKind::TaxInvoice => "tax_invoice",
            DocumentKind::Receipt => "receipt",
            DocumentKind::InstallmentStatement => "installment_statement",
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        DocumentKind::ALL
            .into_iter()
            .find(|k| k.slug() == wanted)
            .ok_or_else(|| format!("unknown document kind '{s}'"))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Thai,
    English,
}

/// Customer on sales documents, vendor on purchase orders.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Party {
    pub name: String,
    /// Five-digit branch number; "00000" or empty means head office.
    pub branch: String,
    pub address: String,
    pub tax_id: String,
    pub contact_name: String,
    pub phone: String,
}

impl Party {
    pub fn display_name(&self, locale: Locale) -> String {
        if self.name.is_empty() {
            return String::new();
        }
        let branch = self.branch.trim();
        let head_office = branch.is_empty() || branch.chars().all(|c| c == '0');
        let suffix = match (locale, head_office) {
            (Locale::Thai, true) => "(สำนักงานใหญ่)".to_string(),
            (Locale::Thai, false) => format!("(สาขา {branch})"),
            (Locale::English, true) => "(Head office)".to_string(),
            (Locale::English, false) => format!("(Branch {branch})"),
        };
        format!("{} {}", self.name, suffix)
    }

    pub fn contact_line(&self, locale: Locale) -> String {
        let phone_label = match locale {
            Locale::Thai => "โทร.",
            Locale::English => "Tel.",
        };
        match (self.contact_name.is_empty(), self.phone.is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.contact_name.clone(),
            (true, false) => format!("{phone_label} {}", self.phone),
            (false, false) => format!("{}  {phone_label} {}", self.contact_name, self.phone),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SubItem {
    pub label: String,
    #[serde(default)]
    pub quantity: f64,
}

/// Sub-items arrive either already structured or as the raw JSON text
/// stored next to the line item.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum SubItems {
    List(Vec<SubItem>),
    Raw(String),
}

/// Parse stored sub-item text. Anything malformed yields an empty list.
pub fn parse_sub_items(raw: &str) -> Vec<SubItem> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<SubItem>>(raw) {
        Ok(items) => items,
        Err(e) => {
            log::warn!("Ignoring malformed sub-items ({e}): {raw:.60}");
            Vec::new()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct InstallmentOverride {
    pub amount: f64,
    pub term: u32,
    pub total_terms: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LineItemRecord {
    pub index: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub installment: Option<InstallmentOverride>,
    #[serde(default)]
    pub sub_items: Option<SubItems>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub tax_marker: bool,
}

impl LineItemRecord {
    pub fn new(index: u32, name: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            index,
            name: name.into(),
            description: None,
            quantity,
            unit_price,
            installment: None,
            sub_items: None,
            hidden: false,
            tax_marker: false,
        }
    }

    /// The installment's fixed amount when one applies, else price × quantity.
    pub fn amount(&self) -> f64 {
        match self.installment {
            Some(inst) => round2(inst.amount),
            None => round2(self.unit_price * self.quantity),
        }
    }

    pub fn sub_items(&self) -> Vec<SubItem> {
        match &self.sub_items {
            None => Vec::new(),
            Some(SubItems::List(items)) => items.clone(),
            Some(SubItems::Raw(raw)) => parse_sub_items(raw),
        }
    }
}

/// Pseudo-row printed once after all line items.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TerminalRow {
    /// Printed as the negated summary discount. `amount` (sign ignored)
    /// supplies that discount when `BillRecord::discount` is zero.
    Discount {
        label: String,
        amount: f64,
    },
    InstallmentSummary {
        term: u32,
        total_terms: u32,
        amount: f64,
        remaining: f64,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct BillRecord {
    pub kind: DocumentKind,
    pub code: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub party: Party,
    #[serde(default)]
    pub items: Vec<LineItemRecord>,
    #[serde(default)]
    pub terminal: Option<TerminalRow>,
    #[serde(default)]
    pub discount: f64,
    /// Percent, e.g. 7.0 for Thai VAT. Zero disables the tax line.
    #[serde(default)]
    pub vat_rate: f64,
    #[serde(default)]
    pub locale: Locale,
}

impl BillRecord {
    pub fn new(kind: DocumentKind, code: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            date: None,
            reference: None,
            party: Party::default(),
            items: Vec::new(),
            terminal: None,
            discount: 0.0,
            vat_rate: 0.0,
            locale: Locale::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocumentSummary {
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub grand_total: f64,
    pub words: String,
}

impl DocumentSummary {
    /// Hidden items are bundled into other rows on paper but still priced,
    /// so every item counts toward the subtotal.
    ///
    /// The discount is `record.discount`, or the magnitude of a terminal
    /// discount row when the record carries none. The printed discount row
    /// always shows this same figure.
    pub fn from_record(record: &BillRecord) -> Self {
        let subtotal = round2(record.items.iter().map(LineItemRecord::amount).sum());
        let discount = effective_discount(record);
        let taxable = round2(subtotal - discount);
        let tax = round2(taxable * record.vat_rate / 100.0);
        let grand_total = round2(taxable + tax);
        Self {
            subtotal,
            discount,
            tax,
            grand_total,
            words: amount_in_words(grand_total, record.locale),
        }
    }
}

fn effective_discount(record: &BillRecord) -> f64 {
    let stated = round2(record.discount);
    let Some(TerminalRow::Discount { amount, .. }) = &record.terminal else {
        return stated;
    };
    let row = round2(amount.abs());
    if stated == 0.0 {
        return row;
    }
    if row != stated {
        log::warn!(
            "{} {}: discount row says {row:.2} but the record discount is {stated:.2}; printing {stated:.2}",
            record.kind.label(),
            record.code
        );
    }
    stated
}
