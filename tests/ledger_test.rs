//! 台帳セッションの統合テスト
//!
//! 状態ディレクトリを介した保存・再読み込み・バックアップ取込を確認する。

use product_ledger::ledger::Ledger;
use product_ledger::state::StateFiles;
use product_ledger_common::{parse_locale_decimal, CellValue, ListName, ProductField, Row};
use tempfile::tempdir;

fn sheet_row(barcode: &str, name: &str, price: &str, commission: f64) -> Row {
    let mut row = Row::new();
    row.insert("Barkod".into(), CellValue::from(barcode));
    row.insert("Ürün Adı".into(), CellValue::from(name));
    row.insert("Fiyat".into(), CellValue::from(price));
    row.insert("Komisyon".into(), CellValue::Number(commission));
    row
}

fn map_required(ledger: &mut Ledger, list: ListName) {
    ledger.set_mapping_field(list, ProductField::Barcode, Some("Barkod"));
    ledger.set_mapping_field(list, ProductField::Description, Some("Ürün Adı"));
    ledger.set_mapping_field(list, ProductField::Price, Some("Fiyat"));
    ledger.set_mapping_field(list, ProductField::Commission, Some("Komisyon"));
}

#[test]
fn test_session_persists_and_reopens() {
    let dir = tempdir().expect("Failed to create temp dir");

    {
        let mut ledger = Ledger::open(StateFiles::new(dir.path()));
        map_required(&mut ledger, ListName::Main);
        let product = ledger
            .add_product(ListName::Main, &sheet_row("869001", "Kalem", "12,50", 8.0))
            .expect("add failed");
        assert_eq!(product.price, 12.5);
        ledger.add_link("Panel", "https://example.com/panel").expect("link failed");
    }

    let reopened = Ledger::open(StateFiles::new(dir.path()));
    let store = reopened.store();
    assert_eq!(store.get(ListName::Main).len(), 1);
    assert_eq!(store.get(ListName::Main)[0].barcode, "869001");
    assert!(store.mapping(ListName::Main).is_complete());
    assert!(!store.mapping(ListName::Data1).is_complete());
    assert_eq!(store.links().len(), 1);
}

#[test]
fn test_duplicate_barcode_is_rejected_per_list() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut ledger = Ledger::open(StateFiles::new(dir.path()));
    map_required(&mut ledger, ListName::Main);
    map_required(&mut ledger, ListName::Data1);

    let row = sheet_row("A1", "Defter", "5", 1.0);
    ledger.add_product(ListName::Main, &row).expect("first add failed");
    assert!(ledger.add_product(ListName::Main, &row).is_err());
    ledger.add_product(ListName::Data1, &row).expect("other list should accept");

    assert_eq!(ledger.store().get(ListName::Main).len(), 1);
    assert_eq!(ledger.store().get(ListName::Data1).len(), 1);
}

#[test]
fn test_add_all_counts_skips() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut ledger = Ledger::open(StateFiles::new(dir.path()));
    map_required(&mut ledger, ListName::Data2);

    let rows = vec![
        sheet_row("A", "Bir", "1", 0.0),
        sheet_row("B", "İki", "2", 0.0),
        sheet_row("A", "Tekrar", "3", 0.0),
        sheet_row("", "Boş", "4", 0.0),
    ];
    let summary = ledger.add_all_products(ListName::Data2, &rows);
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.unmapped, 1);

    let reopened = Ledger::open(StateFiles::new(dir.path()));
    let barcodes: Vec<_> = reopened
        .store()
        .get(ListName::Data2)
        .iter()
        .map(|p| p.barcode.as_str())
        .collect();
    assert_eq!(barcodes.len(), 2);
    assert!(barcodes.contains(&"A"));
    assert!(barcodes.contains(&"B"));
}

#[test]
fn test_broadcast_operations_span_lists() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut ledger = Ledger::open(StateFiles::new(dir.path()));
    map_required(&mut ledger, ListName::Main);
    map_required(&mut ledger, ListName::Data1);

    let row = sheet_row("X9", "Silgi", "10", 0.0);
    ledger.add_product(ListName::Main, &row).expect("add failed");
    ledger.add_product(ListName::Data1, &row).expect("add failed");

    assert_eq!(ledger.update_cost_by_barcode("X9", 3.0), 2);
    assert_eq!(ledger.toggle_favorite_by_barcode("X9"), 2);
    assert!(ledger.store().get(ListName::Data1)[0].is_favorite);
    assert_eq!(ledger.store().get(ListName::Main)[0].cost, 3.0);

    assert_eq!(ledger.delete_by_barcode("X9"), 2);
    assert_eq!(ledger.delete_by_barcode("X9"), 0);

    let reopened = Ledger::open(StateFiles::new(dir.path()));
    assert!(reopened.store().get(ListName::Main).is_empty());
    assert!(reopened.store().get(ListName::Data1).is_empty());
}

#[test]
fn test_import_invalid_backup_leaves_state_unchanged() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut ledger = Ledger::open(StateFiles::new(dir.path()));
    ledger.add_link("Panel", "https://example.com").expect("link failed");

    let before = ledger.store().clone();
    assert!(ledger.import_backup("{ not json").is_err());
    assert!(ledger.import_backup("[1, 2, 3]").is_err());
    assert_eq!(ledger.store(), &before);
}

#[test]
fn test_export_then_import_is_idempotent() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut ledger = Ledger::open(StateFiles::new(dir.path()));
    map_required(&mut ledger, ListName::Main);
    ledger
        .add_product(ListName::Main, &sheet_row("A", "Kalem", "1", 0.0))
        .expect("add failed");
    ledger.add_link("Panel", "https://example.com").expect("link failed");

    let json = ledger.export_backup().to_json_pretty().expect("serialize failed");
    let before = ledger.store().clone();

    let summary = ledger.import_backup(&json).expect("import failed");
    assert!(summary.has_product_lists);
    assert!(summary.has_links);
    assert_eq!(ledger.store(), &before);
}

#[test]
fn test_import_merges_into_fresh_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let backup = r#"{
        "productLists": {
            "main": [{"barcode": "A", "description": "Kalem", "price": "7,5", "commission": 1}],
            "data3": [{"barcode": 42, "description": "Sayı", "price": 1, "commission": 0}, {"description": "kayıp"}]
        },
        "links": [{"name": "Site", "url": "https://example.com"}, {"name": "", "url": "x"}]
    }"#;

    {
        let mut ledger = Ledger::open(StateFiles::new(dir.path()));
        let summary = ledger.import_backup(backup).expect("import failed");
        assert_eq!(summary.products_merged, 2);
        assert_eq!(summary.products_dropped, 1);
        assert_eq!(summary.links_merged, 1);
        assert_eq!(summary.links_dropped, 1);
    }

    let reopened = Ledger::open(StateFiles::new(dir.path()));
    assert_eq!(reopened.store().get(ListName::Main)[0].price, 7.5);
    assert_eq!(reopened.store().get(ListName::Data3)[0].barcode, "42");
    assert_eq!(reopened.store().links().len(), 1);
}

#[test]
fn test_malformed_state_file_starts_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let files = StateFiles::new(dir.path());
    std::fs::write(files.product_lists_path(), "not json at all").expect("write failed");
    std::fs::write(files.links_path(), r#"[{"name": "Site", "url": "https://example.com"}]"#).expect("write failed");

    let ledger = Ledger::open(files);
    assert_eq!(ledger.store().product_count(), 0);
    assert_eq!(ledger.store().links().len(), 1);
}

#[test]
fn test_partial_saved_product_survives_next_save() {
    let dir = tempdir().expect("Failed to create temp dir");
    let files = StateFiles::new(dir.path());
    std::fs::write(
        files.product_lists_path(),
        r#"{"main": [{"barcode": "M", "description": "Kalem", "price": 4, "commission": 1, "cost": -2}],
            "data1": [{"barcode": "P", "description": "partial", "price": 1}]}"#,
    )
    .expect("write failed");

    let mut ledger = Ledger::open(files.clone());
    assert_eq!(ledger.store().get(ListName::Data1)[0].barcode, "P");
    map_required(&mut ledger, ListName::Main);
    ledger
        .add_product(ListName::Main, &sheet_row("NEW", "Defter", "2", 0.0))
        .expect("add failed");

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(files.product_lists_path()).expect("read failed"))
            .expect("saved file is not JSON");
    let main: Vec<_> = saved["main"]
        .as_array()
        .expect("main missing")
        .iter()
        .map(|p| p["barcode"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(main, vec!["NEW", "M"]);
    assert_eq!(saved["main"][1]["cost"], serde_json::json!(-2.0));
    assert_eq!(saved["data1"][0]["barcode"], "P");
    assert_eq!(saved["data1"][0]["commission"], serde_json::json!(0.0));
}

#[test]
fn test_negative_cost_is_stored_across_lists() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut ledger = Ledger::open(StateFiles::new(dir.path()));
    map_required(&mut ledger, ListName::Main);
    map_required(&mut ledger, ListName::Data2);

    let row = sheet_row("C1", "Cetvel", "10", 0.0);
    ledger.add_product(ListName::Main, &row).expect("add failed");
    ledger.add_product(ListName::Data2, &row).expect("add failed");

    let cost = parse_locale_decimal("-3,25");
    assert_eq!(ledger.update_cost_by_barcode("C1", cost), 2);

    let reopened = Ledger::open(StateFiles::new(dir.path()));
    assert_eq!(reopened.store().get(ListName::Main)[0].cost, -3.25);
    assert_eq!(reopened.store().get(ListName::Data2)[0].cost, -3.25);
}
