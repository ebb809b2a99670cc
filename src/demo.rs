//! Built-in mock datasets, used when no data file is given.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::engine::{ColumnDef, Record, Row, Value};
use crate::loader::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Demo {
    #[default]
    Users,
    Churn,
    Invoices,
}

pub fn dataset(demo: Demo) -> Dataset {
    match demo {
        Demo::Users => users(),
        Demo::Churn => churn(),
        Demo::Invoices => invoices(),
    }
}

const NAMES: [&str; 10] = [
    "Ava Patel",
    "Arjun Singh",
    "Ishaan Rao",
    "Neha Sharma",
    "Riya Kapoor",
    "Kabir Mehta",
    "Zara Khan",
    "Anaya Joshi",
    "Vihaan Das",
    "Advait Iyer",
];
const ROLES: [&str; 4] = ["Owner", "Admin", "Manager", "Member"];
const PLANS: [&str; 3] = ["Starter", "Pro", "Enterprise"];
const PLAN_MRR: [i64; 3] = [800, 2900, 14900];
const STATUSES: [&str; 3] = ["Active", "Invited", "Suspended"];

pub fn users() -> Dataset {
    let schema = Arc::new(
        ["id", "name", "email", "role", "plan", "mrr", "status", "joined"]
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>(),
    );
    let rows = (0..36usize)
        .map(|i| {
            // Joined dates walk back one day per user from the end of October.
            let joined = if i < 31 {
                format!("2025-10-{:02}", 31 - i)
            } else {
                format!("2025-09-{:02}", 30 - (i - 31))
            };
            Record::new(
                Arc::clone(&schema),
                vec![
                    Value::Int(i as i64 + 1),
                    NAMES[i % 10].into(),
                    format!("user{}@example.com", i + 1).into(),
                    ROLES[i % 4].into(),
                    PLANS[i % 3].into(),
                    Value::Int(PLAN_MRR[i % 3]),
                    STATUSES[i % 3].into(),
                    joined.into(),
                ],
            )
            .with_id_field("id")
        })
        .collect();

    let columns = vec![
        ColumnDef::field("User", "name").cell(|v, row: &Record| {
            let name = v.to_string();
            let initials: String = name.chars().take(2).collect::<String>().to_uppercase();
            format!("{initials}  {name} · {}", row.field("email").unwrap_or_default())
        }),
        ColumnDef::field("Role", "role"),
        ColumnDef::field("Plan / MRR", "mrr").cell(|v, row: &Record| {
            format!(
                "{} {}",
                row.field("plan").unwrap_or_default(),
                v.as_f64().map(format_inr).unwrap_or_default()
            )
        }),
        ColumnDef::field("Status", "status").cell(|v, _| format!("● {v}")),
        ColumnDef::field("Joined", "joined").cell(|v, _| format_date(&v.to_string(), true)),
        ColumnDef::display("", "open", |_, _| "›".to_string()),
    ];

    let mut ds = Dataset::new("Users", rows, columns);
    ds.searchable_fields = Some(
        ["name", "email", "role", "plan", "status"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    ds.placeholder = Some("Search name, email, role…".to_string());
    ds.page_size = Some(10);
    ds
}

pub fn churn() -> Dataset {
    let rows = [
        (1, "Acme Labs", "Pro", 29000, "Switched vendor", "2025-10-02"),
        (2, "Nimbus Retail", "Starter", 800, "Budget", "2025-10-05"),
        (3, "Hubble AI", "Enterprise", 149000, "Missing features", "2025-10-08"),
        (4, "Orbit Fintech", "Pro", 29000, "Bugs", "2025-10-11"),
        (5, "Stellar Edu", "Starter", 800, "Inactive", "2025-10-12"),
    ]
    .into_iter()
    .map(|(id, account, plan, mrr, reason, date)| {
        Record::from_pairs([
            ("id", Value::Int(id)),
            ("account", account.into()),
            ("plan", plan.into()),
            ("mrr", Value::Int(mrr)),
            ("reason", reason.into()),
            ("date", date.into()),
        ])
        .with_id_field("id")
    })
    .collect();

    let columns = vec![
        ColumnDef::field("Account", "account"),
        ColumnDef::field("Plan", "plan"),
        ColumnDef::field("MRR", "mrr").cell(|v, _| v.as_f64().map(format_inr).unwrap_or_default()),
        ColumnDef::field("Reason", "reason"),
        ColumnDef::field("Date", "date").cell(|v, _| format_date(&v.to_string(), false)),
    ];

    let mut ds = Dataset::new("Churned Accounts", rows, columns);
    ds.searchable_fields = Some(vec!["account".into(), "plan".into(), "reason".into()]);
    ds.placeholder = Some("Search churn by account, reason…".to_string());
    ds.page_size = Some(6);
    ds
}

pub fn invoices() -> Dataset {
    let rows = [
        (1, "INV-10251", "2025-10-11", "Sep 01–30"),
        (2, "INV-10250", "2025-09-10", "Aug 01–31"),
        (3, "INV-10249", "2025-08-11", "Jul 01–31"),
        (4, "INV-10248", "2025-07-11", "Jun 01–30"),
        (5, "INV-10247", "2025-06-11", "May 01–31"),
    ]
    .into_iter()
    .map(|(id, number, date, period)| {
        Record::from_pairs([
            ("id", Value::Int(id)),
            ("number", number.into()),
            ("date", date.into()),
            ("period", period.into()),
            ("amount", Value::Int(2900)),
            ("status", "Paid".into()),
        ])
        .with_id_field("id")
    })
    .collect();

    let columns = vec![
        ColumnDef::field("Invoice #", "number"),
        ColumnDef::field("Date", "date").cell(|v, _| format_date(&v.to_string(), true)),
        ColumnDef::field("Period", "period"),
        ColumnDef::field("Amount", "amount")
            .cell(|v, _| v.as_f64().map(format_inr).unwrap_or_default()),
        ColumnDef::field("Status", "status").cell(|v, _| format!("● {v}")),
    ];

    let mut ds = Dataset::new("Invoices", rows, columns);
    ds.searchable_fields = Some(vec!["number".into(), "period".into(), "status".into()]);
    ds.placeholder = Some("Search invoice by number, status…".to_string());
    ds.page_size = Some(6);
    ds
}

/// Rupee amount with Indian digit grouping, no fraction: 149000 -> "₹1,49,000".
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (h, t) = rest.split_at(rest.len() - 2);
            groups.push(t);
            rest = h;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}₹{grouped}")
}

/// "2025-10-02" -> "02 Oct" or "02 Oct 2025". Anything that is not a valid date is
/// returned unchanged.
pub fn format_date(iso: &str, with_year: bool) -> String {
    match NaiveDate::parse_from_str(iso.get(..10).unwrap_or(iso), "%Y-%m-%d") {
        Ok(date) if with_year => date.format("%d %b %Y").to_string(),
        Ok(date) => date.format("%d %b").to_string(),
        Err(_) => iso.to_string(),
    }
}
