use std::time::{Duration, Instant};

use proptest::prelude::*;
use tabview::engine::search::{filter_indices, normalize_query, resolve_fields, row_matches};
use tabview::engine::{ColumnDef, EMPTY_MESSAGE, Record, Row, SortDirection, TableEngine, Value};

fn named(n: usize) -> Vec<Record> {
    (1..=n)
        .map(|i| Record::from_pairs([("id", Value::from(i as i64)), ("name", format!("User {i}").into())]))
        .collect()
}

fn names(e: &TableEngine<Record>) -> Vec<String> {
    e.visible_rows()
        .map(|(_, r)| r.field("name").unwrap_or_default().to_string())
        .collect()
}

fn arb_word() -> impl Strategy<Value = String> {
    "[a-zA-Z]{1,6}( [a-zA-Z]{1,6})?"
}

fn arb_rows(max: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((arb_word(), arb_word(), 0i64..5), 0..max).prop_map(|rows| {
        rows.into_iter()
            .map(|(name, role, mrr)| {
                Record::from_pairs([
                    ("name", Value::from(name)),
                    ("role", Value::from(role)),
                    ("mrr", Value::Int(mrr)),
                ])
            })
            .collect()
    })
}

fn arb_query() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{0,3}"
}

#[test]
fn scenario_a_first_and_second_page() {
    let mut e = TableEngine::new(vec![ColumnDef::field("Name", "name")])
        .with_rows(named(25))
        .with_page_size(8);

    let v = e.view();
    assert_eq!(v.rows.len(), 8);
    assert_eq!(v.rows[0].cells, vec!["User 1"]);
    assert_eq!(v.rows[7].cells, vec!["User 8"]);
    assert_eq!(v.summary, "Showing 1–8 of 25");
    assert!(!v.can_prev);
    assert!(v.can_next);

    e.next_page();
    assert_eq!(names(&e), (9..=16).map(|i| format!("User {i}")).collect::<Vec<_>>());
    assert_eq!(e.view().summary, "Showing 9–16 of 25");
}

#[test]
fn scenario_b_search_hit_and_miss() {
    let mut rows = named(12);
    rows.push(Record::from_pairs([("id", Value::Int(99)), ("name", "Ava Patel".into())]));
    let mut e = TableEngine::new(vec![ColumnDef::field("Name", "name")])
        .with_rows(rows)
        .with_searchable_fields(["name"]);

    e.set_search_text("ava");
    e.flush_search();
    assert_eq!(names(&e), vec!["Ava Patel"]);

    e.set_search_text("zzz");
    e.flush_search();
    let v = e.view();
    assert!(v.rows.is_empty());
    assert_eq!(v.empty_message, Some(EMPTY_MESSAGE));
    assert_eq!(v.summary, "Showing 0–0 of 0");
    assert!(!v.can_prev && !v.can_next);
}

#[test]
fn scenario_c_stable_ascending_sort() {
    let rows = vec![
        Record::from_pairs([("id", Value::from("first")), ("mrr", Value::Int(100))]),
        Record::from_pairs([("id", Value::from("second")), ("mrr", Value::Int(100))]),
        Record::from_pairs([("id", Value::from("third")), ("mrr", Value::Int(50))]),
    ];
    let mut e = TableEngine::new(vec![ColumnDef::field("MRR", "mrr")]).with_rows(rows);
    assert!(e.toggle_sort("mrr"));
    assert_eq!(e.sort().map(|s| s.direction), Some(SortDirection::Ascending));

    let ids: Vec<String> = e
        .ordered_rows()
        .map(|r| r.field("id").unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids, vec!["third", "first", "second"]);
}

#[test]
fn scenario_d_new_query_resets_page() {
    let rows: Vec<Record> = (1..=12)
        .map(|i| {
            let team = if i <= 3 { "core" } else { "growth" };
            Record::from_pairs([("name", Value::from(format!("User {i}"))), ("team", team.into())])
        })
        .collect();
    let mut e = TableEngine::new(vec![ColumnDef::field("Name", "name"), ColumnDef::field("Team", "team")])
        .with_rows(rows)
        .with_page_size(5);

    e.next_page();
    assert_eq!(e.page_index(), 1);
    assert_eq!(e.view().summary, "Showing 6–10 of 12");

    e.set_search_text("core");
    e.flush_search();
    let v = e.view();
    assert_eq!(v.page_index, 0);
    assert_eq!(v.rows.len(), 3);
    assert!(!v.can_prev);
    assert!(!v.can_next);
}

#[test]
fn debounced_search_waits_for_quiet_period() {
    let t0 = Instant::now();
    let mut e = TableEngine::new(vec![ColumnDef::field("Name", "name")])
        .with_rows(named(20))
        .with_debounce(Duration::from_millis(250));

    e.set_search_text_at("user 1", t0);
    e.set_search_text_at("user 12", t0 + Duration::from_millis(100));
    assert!(!e.tick_at(t0 + Duration::from_millis(300)));
    assert_eq!(e.filtered_len(), 20);
    assert!(e.tick_at(t0 + Duration::from_millis(350)));
    assert_eq!(names(&e), vec!["User 12"]);
    assert_eq!(e.search_deadline(), None);
}

proptest! {
    #[test]
    fn filtering_is_idempotent(rows in arb_rows(40), raw in arb_query()) {
        let q = normalize_query(&raw);
        let fields = resolve_fields(None, &rows);

        let once = filter_indices(&rows, &fields, &q);
        let kept: Vec<Record> = once.iter().map(|&i| rows[i].clone()).collect();
        let twice = filter_indices(&kept, &fields, &q);
        prop_assert_eq!(twice, (0..kept.len()).collect::<Vec<_>>());
    }

    #[test]
    fn empty_query_keeps_everything_in_order(rows in arb_rows(40), blanks in " {0,3}") {
        let fields = resolve_fields(None, &rows);
        let all: Vec<usize> = (0..rows.len()).collect();
        prop_assert_eq!(filter_indices(&rows, &fields, ""), all.clone());
        prop_assert_eq!(filter_indices(&rows, &fields, &normalize_query(&blanks)), all);
    }

    #[test]
    fn match_iff_some_declared_field_contains_query(rows in arb_rows(30), raw in arb_query()) {
        let declared = vec!["name".to_string()];
        let q = normalize_query(&raw);
        let hits = filter_indices(&rows, &declared, &q);
        for (i, r) in rows.iter().enumerate() {
            let expected = r
                .field("name")
                .map(|v| v.to_string().to_lowercase().contains(&q))
                .unwrap_or(false);
            prop_assert_eq!(hits.contains(&i), expected, "row {} query {:?}", i, q);
        }
    }

    #[test]
    fn descending_reverses_distinct_and_keeps_ties_stable(rows in arb_rows(40)) {
        let n = rows.len();
        let mut e = TableEngine::new(vec![ColumnDef::field("MRR", "mrr")])
            .with_rows(rows.clone())
            .with_page_size(100);

        e.toggle_sort("mrr");
        let asc: Vec<usize> = e.visible_rows().map(|(i, _)| i).collect();
        e.toggle_sort("mrr");
        let desc: Vec<usize> = e.visible_rows().map(|(i, _)| i).collect();
        prop_assert_eq!(e.sort().map(|s| s.direction), Some(SortDirection::Descending));

        let key = |i: usize| rows[i].field("mrr").and_then(|v| v.as_f64()).unwrap_or_default() as i64;
        let asc_keys: Vec<i64> = asc.iter().map(|&i| key(i)).collect();
        let mut desc_keys: Vec<i64> = desc.iter().map(|&i| key(i)).collect();
        desc_keys.reverse();
        prop_assert_eq!(asc_keys, desc_keys);

        // Equal keys keep snapshot order in both directions.
        for order in [&asc, &desc] {
            for w in order.windows(2) {
                if key(w[0]) == key(w[1]) {
                    prop_assert!(w[0] < w[1]);
                }
            }
        }

        e.toggle_sort("mrr");
        prop_assert!(e.sort().is_none());
        prop_assert_eq!(e.visible_rows().map(|(i, _)| i).collect::<Vec<_>>(), (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn new_query_always_resets_page(rows in arb_rows(40), raw in arb_query(), page in 0i64..6) {
        let mut e = TableEngine::new(vec![ColumnDef::field("Name", "name")])
            .with_rows(rows)
            .with_page_size(5);
        e.request_page(page);
        e.set_search_text(raw);
        e.flush_search();
        prop_assert_eq!(e.page_index(), 0);
    }
}

#[test]
fn parallel_filter_agrees_with_sequential() {
    let rows: Vec<Record> = (0..5000)
        .map(|i| {
            let name = if i % 7 == 0 { format!("Riya {i}") } else { format!("Kabir {i}") };
            Record::from_pairs([("name", Value::from(name)), ("mrr", Value::Int(i % 5))])
        })
        .collect();
    let fields = resolve_fields(None, &rows);
    let expected: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| row_matches(*r, &fields, "ri"))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(expected.len(), 715);
    assert_eq!(filter_indices(&rows, &fields, "ri"), expected);
}

#[test]
fn sorting_keeps_page_index() {
    let mut e = TableEngine::new(vec![ColumnDef::field("Name", "name")])
        .with_rows(named(25))
        .with_page_size(8);
    e.request_page(2);
    e.toggle_sort("name");
    assert_eq!(e.page_index(), 2);
}

#[test]
fn out_of_range_pages_clamp() {
    let mut e = TableEngine::new(vec![ColumnDef::field("Name", "name")])
        .with_rows(named(25))
        .with_page_size(8);
    e.request_page(-1);
    assert_eq!(e.page_index(), 0);
    e.request_page(40);
    assert_eq!(e.page_index(), 3);
    assert_eq!(e.view().summary, "Showing 25–25 of 25");
}

#[test]
fn missing_fields_render_blank() {
    let rows = vec![
        Record::from_pairs([("name", "Ava Patel")]),
        Record::from_pairs([("email", "zara@example.com")]),
    ];
    let e = TableEngine::new(vec![ColumnDef::field("Name", "name"), ColumnDef::field("Email", "email")])
        .with_rows(rows);
    let v = e.view();
    assert_eq!(v.rows[0].cells, vec!["Ava Patel", ""]);
    assert_eq!(v.rows[1].cells, vec!["", "zara@example.com"]);
}
