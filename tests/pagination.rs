mod common;

use common::{items, record, request};
use paperform_pdf::layout::coords::{CoordinateTable, Field};
use paperform_pdf::layout::paginate::{PaginationController, PaginationState};
use paperform_pdf::layout::text::compute_bounding_box;
use paperform_pdf::layout::{Column, DrawOp, Emphasis, Origin, PageLayout, assemble};
use paperform_pdf::{DocumentKind, LineItemRecord, SubItem, SubItems, TerminalRow};

const EPS: f64 = 1e-9;

fn short_name(i: usize) -> String {
    format!("Item {}", i + 1)
}

/// Twelve "widget"s wrap onto exactly two lines in a 250pt name column.
fn two_line_name(_: usize) -> String {
    vec!["widget"; 12].join(" ")
}

/// Item positions of main rows on a page, in drawing order.
fn main_rows(page: &PageLayout) -> Vec<(usize, f64)> {
    page.texts()
        .filter_map(|t| match t.origin {
            Origin::Item {
                item,
                column: Column::Index,
            } => Some((item, t.y)),
            _ => None,
        })
        .collect()
}

fn static_positions(page: &PageLayout) -> Vec<(Field, f64, f64)> {
    page.texts()
        .filter_map(|t| match t.origin {
            Origin::Field(f) => Some((f, t.x, t.y)),
            _ => None,
        })
        .collect()
}

#[test]
fn three_short_rows_fit_on_one_page() {
    let req = request(record(DocumentKind::Quotation, items(3, short_name)));
    let pages = assemble(&req);

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].number, 1);
    assert_eq!(pages[0].template_page, 0);
    assert_eq!(main_rows(&pages[0]).len(), 3);
    assert_eq!(
        pages[0].find(Origin::Field(Field::PageNumber)).map(|t| t.text.as_str()),
        Some("1")
    );
}

#[test]
fn wrapped_rows_overflow_and_repeat_static_fields() {
    let req = request(record(DocumentKind::Quotation, items(40, two_line_name)));
    let table = CoordinateTable::for_kind(DocumentKind::Quotation);
    let row = compute_bounding_box(
        &two_line_name(0),
        &req.font,
        table.body.item_size,
        table.body.line_height,
        table.columns.name.width,
    )
    .height;
    assert_eq!(row, 25.0);

    let per_page = (table.body_height() / row).floor() as usize;
    let expected_pages = 40usize.div_ceil(per_page);
    let pages = assemble(&req);
    assert!(pages.len() >= 2);
    assert_eq!(pages.len(), expected_pages);

    let first = pages[0].find(Origin::Field(Field::PartyName)).expect("party on page 1");
    let second = pages[1].find(Origin::Field(Field::PartyName)).expect("party on page 2");
    assert_eq!((first.x, first.y), (second.x, second.y));
    assert_eq!(first.text, second.text);

    // Continuation pages use the second template page.
    assert_eq!(pages[0].template_page, 0);
    assert!(pages[1..].iter().all(|p| p.template_page == 1));

    for page in &pages {
        assert!(page.cursor_end >= table.footer_boundary - EPS);
        assert_eq!(
            page.find(Origin::Field(Field::PageNumber)).map(|t| t.text.clone()),
            Some(page.number.to_string())
        );
    }
}

#[test]
fn description_and_sub_items_advance_by_their_measured_heights() {
    let mut item = LineItemRecord::new(1, "Cabinet hinge", 4.0, 85.0);
    item.description = Some("Brushed finish".into());
    item.sub_items = Some(SubItems::List(vec![
        SubItem {
            label: "Hinge cup".into(),
            quantity: 4.0,
        },
        SubItem {
            label: "Mounting plate".into(),
            quantity: 4.0,
        },
    ]));
    let req = request(record(DocumentKind::Quotation, vec![item]));
    let pages = assemble(&req);
    let table = CoordinateTable::for_kind(DocumentKind::Quotation);
    let body = table.body;

    let expected = body.item_size * body.line_height
        + body.description_size * body.line_height
        + 2.0 * body.sub_item_size * body.line_height;
    assert_eq!(expected, 45.0);
    assert_eq!(pages.len(), 1);
    assert!((table.body_top - pages[0].cursor_end - expected).abs() < EPS);

    let description = pages[0]
        .find(Origin::Description { item: 0 })
        .expect("description drawn");
    assert_eq!(description.emphasis, Emphasis::Muted);
    assert_eq!(description.x, table.columns.name.x + body.indent);

    let sub = pages[0]
        .find(Origin::SubItem {
            item: 0,
            sub: 1,
            column: Column::Name,
        })
        .expect("second sub-item drawn");
    assert_eq!(sub.text, "- Mounting plate");
    let main = pages[0]
        .find(Origin::Item {
            item: 0,
            column: Column::Name,
        })
        .expect("main row drawn");
    assert!(main.y > description.y && description.y > sub.y);
}

#[test]
fn page_count_is_total_height_over_body_height_for_uniform_rows() {
    let mut table = *CoordinateTable::for_kind(DocumentKind::Quotation);
    table.body_top = 500.0;
    table.footer_boundary = 400.0;
    let row = table.body.item_size * table.body.line_height;

    for count in [1usize, 7, 8, 9, 16, 20, 25] {
        let req = request(record(DocumentKind::Quotation, items(count, short_name)))
            .with_table(table);
        let pages = assemble(&req);
        let total = count as f64 * row;
        let expected = (total / table.body_height()).ceil() as usize;
        assert_eq!(pages.len(), expected, "{count} rows");
        assert!(pages.iter().all(|p| p.cursor_end >= table.footer_boundary - EPS));
    }
}

#[test]
fn rows_keep_input_order_within_and_across_pages() {
    let req = request(record(DocumentKind::Invoice, items(40, two_line_name)));
    let pages = assemble(&req);
    assert!(pages.len() > 1);

    let mut seen = Vec::new();
    for page in &pages {
        let rows = main_rows(page);
        for pair in rows.windows(2) {
            assert!(pair[0].1 > pair[1].1, "baselines must descend on a page");
        }
        seen.extend(rows.into_iter().map(|(item, _)| item));
    }
    assert_eq!(seen, (0..40).collect::<Vec<_>>());
}

#[test]
fn every_page_carries_the_same_static_fields() {
    let req = request(record(DocumentKind::TaxInvoice, items(60, short_name)));
    let pages = assemble(&req);
    assert!(pages.len() >= 2);

    let reference: Vec<_> = static_positions(&pages[0])
        .into_iter()
        .filter(|(f, ..)| *f != Field::PageNumber)
        .collect();
    assert!(reference.iter().any(|(f, ..)| *f == Field::GrandTotal));
    for page in &pages[1..] {
        let here: Vec<_> = static_positions(page)
            .into_iter()
            .filter(|(f, ..)| *f != Field::PageNumber)
            .collect();
        assert_eq!(here, reference, "page {}", page.number);
    }
}

#[test]
fn amounts_share_the_column_right_edge() {
    let prices = [0.0, 12.5, 1_234_567.89];
    let rows = prices
        .iter()
        .enumerate()
        .map(|(i, &p)| LineItemRecord::new(i as u32 + 1, format!("Row {i}"), 1.0, p))
        .collect();
    let req = request(record(DocumentKind::Quotation, rows));
    let pages = assemble(&req);
    let right = req.table.columns.amount.right();

    let amounts: Vec<_> = (0..prices.len())
        .map(|item| {
            pages[0]
                .find(Origin::Item {
                    item,
                    column: Column::Amount,
                })
                .expect("amount drawn")
        })
        .collect();
    assert_eq!(amounts[0].text, "0.00");
    assert_eq!(amounts[2].text, "1,234,567.89");
    for op in amounts {
        assert!((op.x + op.width - right).abs() < EPS, "{} ends at {}", op.text, op.x + op.width);
    }
}

#[test]
fn oversized_block_is_drawn_whole_on_its_own_page() {
    let mut big = LineItemRecord::new(1, "Terms", 1.0, 0.0);
    let lines: Vec<String> = (1..=40).map(|i| format!("Clause {i}")).collect();
    big.description = Some(lines.join("\n"));
    let rows = vec![big, LineItemRecord::new(2, "Next row", 1.0, 10.0)];
    let req = request(record(DocumentKind::Quotation, rows));
    let table = req.table;
    let pages = assemble(&req);

    // Main row on page 1, the 400pt description alone on page 2, the next row on page 3.
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[1].blocks, 1);
    assert!(pages[1].cursor_end < table.footer_boundary);
    assert!((table.body_top - pages[1].cursor_end - 400.0).abs() < EPS);
    let described: Vec<_> = pages[1]
        .texts()
        .filter(|t| t.origin == Origin::Description { item: 0 })
        .collect();
    assert_eq!(described.len(), 40);
    assert!(pages[2].find(Origin::Item { item: 1, column: Column::Name }).is_some());
}

#[test]
fn hidden_items_are_not_drawn() {
    let mut rows = items(3, short_name);
    rows[1].hidden = true;
    let req = request(record(DocumentKind::Quotation, rows));
    let pages = assemble(&req);

    let drawn: Vec<_> = main_rows(&pages[0]).into_iter().map(|(i, _)| i).collect();
    assert_eq!(drawn, vec![0, 2]);
    assert_eq!(
        pages[0].find(Origin::Field(Field::Subtotal)).map(|t| t.text.as_str()),
        Some("900.00")
    );
}

#[test]
fn malformed_sub_items_render_nothing() {
    let mut item = LineItemRecord::new(1, "Bracket", 2.0, 40.0);
    item.sub_items = Some(SubItems::Raw("[{\"label\": ".into()));
    let req = request(record(DocumentKind::Quotation, vec![item]));
    let pages = assemble(&req);

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].blocks, 1);
    assert!(
        !pages[0]
            .texts()
            .any(|t| matches!(t.origin, Origin::SubItem { .. }))
    );
}

#[test]
fn raw_sub_items_from_stored_json_are_parsed() {
    let json = r#"{
        "kind": "quotation",
        "code": "QT-1",
        "items": [{
            "index": 1,
            "name": "Shelf kit",
            "quantity": 1,
            "unit_price": 900,
            "sub_items": "[{\"label\": \"Bolt\", \"quantity\": 4}]"
        }]
    }"#;
    let rec: paperform_pdf::BillRecord = serde_json::from_str(json).expect("record");
    let pages = assemble(&request(rec));
    let sub = pages[0]
        .find(Origin::SubItem {
            item: 0,
            sub: 0,
            column: Column::Quantity,
        })
        .expect("sub-item quantity");
    assert_eq!(sub.text, "4");
}

#[test]
fn terminal_row_that_overflows_gets_a_full_page() {
    let mut table = *CoordinateTable::for_kind(DocumentKind::Quotation);
    table.body_top = 500.0;
    table.footer_boundary = 400.0;
    let mut rec = record(DocumentKind::Quotation, items(8, short_name));
    rec.terminal = Some(TerminalRow::Discount {
        label: "Special discount".into(),
        amount: -200.0,
    });
    let req = request(rec).with_table(table);
    let pages = assemble(&req);

    assert_eq!(pages.len(), 2);
    let last = &pages[1];
    assert_eq!(last.blocks, 1);
    assert_eq!(static_positions(last).len(), static_positions(&pages[0]).len());
    let label = last
        .find(Origin::Discount {
            column: Column::Name,
        })
        .expect("discount label");
    assert_eq!(label.emphasis, Emphasis::Strong);
    assert_eq!(
        last.find(Origin::Discount {
            column: Column::Amount
        })
        .map(|t| t.text.as_str()),
        Some("-200.00")
    );
    assert!(last.ops.iter().any(|op| matches!(op, DrawOp::Band { .. })));
}

#[test]
fn installment_summary_row_is_labelled_with_the_term() {
    let mut rec = record(DocumentKind::InstallmentStatement, items(2, short_name));
    rec.terminal = Some(TerminalRow::InstallmentSummary {
        term: 3,
        total_terms: 12,
        amount: 1500.0,
        remaining: 13500.0,
    });
    let pages = assemble(&request(rec));
    let label = pages[0]
        .find(Origin::InstallmentSummary {
            column: Column::Name,
        })
        .expect("installment label");
    assert_eq!(label.text, "Installment 3 of 12  Remaining 13,500.00");
}

#[test]
fn controller_reports_its_state() {
    let mut controller = PaginationController::new();
    assert_eq!(controller.state(), PaginationState::Accumulating);
    controller.finish();
    assert_eq!(controller.state(), PaginationState::Done);
}

#[test]
fn record_date_falls_back_to_as_of() {
    let mut rec = record(DocumentKind::Receipt, items(1, short_name));
    rec.date = None;
    let pages = assemble(&request(rec));
    assert_eq!(
        pages[0].find(Origin::Field(Field::BillDate)).map(|t| t.text.as_str()),
        Some("19/10/2026")
    );
}

#[test]
fn discount_row_and_summary_print_the_same_figure() {
    let mut rec = record(DocumentKind::Quotation, items(2, short_name));
    rec.discount = 150.0;
    rec.terminal = Some(TerminalRow::Discount {
        label: "Loyalty discount".into(),
        amount: -999.0,
    });
    let pages = assemble(&request(rec));
    let page = &pages[0];

    assert_eq!(
        page.find(Origin::Discount {
            column: Column::Amount
        })
        .map(|t| t.text.as_str()),
        Some("-150.00")
    );
    assert_eq!(
        page.find(Origin::Field(Field::Discount)).map(|t| t.text.as_str()),
        Some("150.00")
    );
}

#[test]
fn negative_quantity_prints_with_its_sign() {
    let rows = vec![LineItemRecord::new(1, "Returned bracket", -2.0, 40.0)];
    let pages = assemble(&request(record(DocumentKind::Receipt, rows)));
    let qty = pages[0]
        .find(Origin::Item {
            item: 0,
            column: Column::Quantity,
        })
        .expect("quantity drawn");
    let amount = pages[0]
        .find(Origin::Item {
            item: 0,
            column: Column::Amount,
        })
        .expect("amount drawn");
    assert_eq!(qty.text, "-2");
    assert_eq!(amount.text, "-80.00");
}
