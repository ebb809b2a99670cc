use std::path::PathBuf;

use tabview::domain::{Message, TVConfig, TabError};
use tabview::engine::{Row, TableEngine, Value};
use tabview::export;
use tabview::loader::load_data_file;
use tabview::model::Model;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn csv_becomes_typed_records() {
    let ds = load_data_file(fixture("users.csv")).unwrap();
    assert_eq!(ds.name, "users.csv");
    assert_eq!(ds.rows.len(), 11);
    assert_eq!(
        ds.columns.iter().map(|c| c.header().to_string()).collect::<Vec<_>>(),
        vec!["id", "name", "email", "role", "plan", "mrr", "status"]
    );
    assert_eq!(ds.rows[2].field("mrr"), Some(Value::Int(14900)));
    assert_eq!(ds.rows[10].field("name"), Some(Value::from("Patel, Ava")));
}

#[test]
fn numeric_columns_sort_by_magnitude() {
    let ds = load_data_file(fixture("users.csv")).unwrap();
    let mut e = TableEngine::new(ds.columns).with_rows(ds.rows).with_page_size(20);
    e.toggle_sort("mrr");
    e.toggle_sort("mrr");
    let first = e.visible_rows().next().map(|(_, r)| r.field("mrr"));
    assert_eq!(first, Some(Some(Value::Int(14900))));
}

#[test]
fn search_spans_every_file_column() {
    let ds = load_data_file(fixture("users.csv")).unwrap();
    let mut e = TableEngine::new(ds.columns).with_rows(ds.rows);
    e.set_search_text("  AVA ");
    e.flush_search();
    assert_eq!(e.filtered_len(), 2);
    e.set_search_text("suspended");
    e.flush_search();
    assert_eq!(e.filtered_len(), 3);
}

#[test]
fn unknown_extension_is_rejected() {
    let err = load_data_file(fixture("users.xlsx"));
    assert!(matches!(err, Err(TabError::FileNotFound) | Err(TabError::UnknownFileType)));
}

#[test]
fn export_writes_filtered_sorted_rows() {
    let ds = load_data_file(fixture("users.csv")).unwrap();
    let mut e = TableEngine::new(ds.columns).with_rows(ds.rows);
    e.set_search_text("ava");
    e.flush_search();
    e.toggle_sort("id");
    e.toggle_sort("id");

    let path = std::env::temp_dir().join(format!("tabview-it-{}.csv", std::process::id()));
    let n = export::write_csv(&path, e.columns(), e.ordered_rows()).unwrap();
    assert_eq!(n, 2);
    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "id,name,email,role,plan,mrr,status");
    assert!(lines[1].starts_with("11,\"Patel, Ava\","));
    assert!(lines[2].starts_with("1,\"Ava Patel\","));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn model_drives_search_from_keys() {
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    let ds = load_data_file(fixture("users.csv")).unwrap();
    let cfg = TVConfig::default().with_debounce_ms(0);
    let mut model = Model::init(&cfg, ds).unwrap();

    model.update(Some(Message::Search)).unwrap();
    assert!(model.raw_keyevents());
    for c in "zara".chars() {
        let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        model.update(Some(Message::RawKey(key))).unwrap();
    }
    model.update(Some(Message::RawKey(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))))
        .unwrap();

    let ui = model.get_uidata();
    assert!(!ui.active_cmdinput);
    assert_eq!(ui.table.search_text, "zara");
    assert_eq!(ui.table.rows.len(), 1);
    assert_eq!(ui.table.summary, "Showing 1–1 of 1");
}
