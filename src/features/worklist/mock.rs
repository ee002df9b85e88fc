//! Mock Worklist
//!
//! Ten demo order records with clinical form statuses, and the column set
//! used to show them.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::data_table::{Column, ColumnType, Row};
use crate::domain::form_status::{StatusTagsFormatter, TagCountFormatter};

/// Random `BCH-XXXXXX-1` identifier (six uppercase letters)
pub fn generate_force_id() -> String {
    let letters: String = Uuid::new_v4().as_bytes()[..6]
        .iter()
        .map(|b| char::from(b'A' + b % 26))
        .collect();
    format!("BCH-{letters}-1")
}

/// Demo order records, ids 1 to 10
pub fn mock_orders() -> Vec<Row> {
    let records = json!([
        {
            "id": 1,
            "customer": {"name": "John Doe", "email": "john@example.com"},
            "amount": 1250.50,
            "orderDate": "2024-01-15",
            "formStatuses": {
                "Demographics": "Complete",
                "Surgical History": "Unverified",
                "CMR": ["Incomplete", "Complete"],
                "CCT": "Complete",
                "Echo": ["Incomplete", "Unverified"],
                "Cath": "Incomplete",
                "Stress Test": "Incomplete",
                "Pt. Outcomes": "Incomplete"
            }
        },
        {
            "id": 2,
            "customer": {"name": "Jane Smith", "email": "jane@example.com"},
            "amount": 850.00,
            "orderDate": "2024-01-14",
            "formStatuses": {
                "Demographics": "Complete",
                "Surgical History": "Complete",
                "CMR": "Complete",
                "CCT": ["Complete", "Complete"],
                "Echo": "Complete",
                "Cath": ["Unverified", "Complete"],
                "Stress Test": ["Complete", "Unverified"],
                "Pt. Outcomes": "Incomplete"
            }
        },
        {
            "id": 3,
            "customer": {"name": "Bob Johnson", "email": "bob@example.com"},
            "amount": 2100.75,
            "orderDate": "2024-01-16",
            "formStatuses": {
                "Demographics": "Incomplete",
                "Surgical History": "Incomplete",
                "CMR": "Incomplete",
                "CCT": "Incomplete",
                "Echo": "Incomplete",
                "Cath": "Incomplete",
                "Stress Test": "Incomplete",
                "Pt. Outcomes": "Incomplete"
            }
        },
        {
            "id": 4,
            "customer": {"name": "Alice Williams", "email": "alice@example.com"},
            "amount": 450.25,
            "orderDate": "2024-01-13",
            "formStatuses": {
                "Demographics": "Complete",
                "Surgical History": "Unverified",
                "CMR": ["Unverified", "Complete", "Incomplete"],
                "CCT": "Complete",
                "Echo": "Incomplete",
                "Cath": ["Complete", "Unverified"],
                "Stress Test": "Incomplete",
                "Pt. Outcomes": "Unverified"
            }
        },
        {
            "id": 5,
            "customer": {"name": "Charlie Brown", "email": "charlie@example.com"},
            "amount": 3200.00,
            "orderDate": "2024-01-12",
            "formStatuses": {
                "Demographics": "Complete",
                "Surgical History": "Complete",
                "CMR": "Complete",
                "CCT": "Complete",
                "Echo": "Complete",
                "Cath": "Complete",
                "Stress Test": "Complete",
                "Pt. Outcomes": "Complete"
            }
        },
        {
            "id": 6,
            "customer": {"name": "Diana Prince", "email": "diana@example.com"},
            "amount": 675.50,
            "orderDate": "2024-01-17",
            "formStatuses": {
                "Demographics": "Unverified",
                "Surgical History": "Incomplete",
                "CMR": "Incomplete",
                "CCT": ["Unverified", "Incomplete"],
                "Echo": ["Incomplete", "Complete", "Unverified"],
                "Cath": "Incomplete",
                "Stress Test": ["Incomplete", "Complete"],
                "Pt. Outcomes": "Incomplete"
            }
        },
        {
            "id": 7,
            "customer": {"name": "Edward Norton", "email": "edward@example.com"},
            "amount": 1890.25,
            "orderDate": "2024-01-11",
            "formStatuses": {
                "Demographics": "Complete",
                "Surgical History": "Complete",
                "CMR": ["Unverified", "Complete"],
                "CCT": "Complete",
                "Echo": ["Complete", "Unverified"],
                "Cath": ["Unverified", "Complete", "Incomplete"],
                "Stress Test": "Complete",
                "Pt. Outcomes": "Unverified"
            }
        },
        {
            "id": 8,
            "customer": {"name": "Fiona Apple", "email": "fiona@example.com"},
            "amount": 950.00,
            "orderDate": "2024-01-10",
            "formStatuses": {
                "Demographics": "Complete",
                "Surgical History": "Complete",
                "CMR": "Complete",
                "CCT": "Complete",
                "Echo": "Complete",
                "Cath": "Complete",
                "Stress Test": "Complete",
                "Pt. Outcomes": "Complete"
            }
        },
        {
            "id": 9,
            "customer": {"name": "George Lucas", "email": "george@example.com"},
            "amount": 2750.00,
            "orderDate": "2024-01-18",
            "formStatuses": {
                "Demographics": "Incomplete",
                "Surgical History": "Incomplete",
                "CMR": "Incomplete",
                "CCT": "Incomplete",
                "Echo": "Incomplete",
                "Cath": "Incomplete",
                "Stress Test": "Incomplete",
                "Pt. Outcomes": "Incomplete"
            }
        },
        {
            "id": 10,
            "customer": {"name": "Helen Mirren", "email": "helen@example.com"},
            "amount": 1125.75,
            "orderDate": "2024-01-09",
            "formStatuses": {
                "Demographics": "Complete",
                "Surgical History": "Complete",
                "CMR": "Unverified",
                "CCT": ["Unverified", "Complete"],
                "Echo": "Complete",
                "Cath": ["Incomplete", "Unverified"],
                "Stress Test": ["Complete", "Complete", "Unverified"],
                "Pt. Outcomes": "Unverified"
            }
        }
    ]);

    let Value::Array(records) = records else {
        return Vec::new();
    };
    records
        .into_iter()
        .filter_map(|record| match record {
            Value::Object(mut row) => {
                row.insert("orderNumber".into(), Value::String(generate_force_id()));
                Some(row)
            }
            _ => None,
        })
        .collect()
}

/// Actions, FORCE ID, tag counts and last-updated columns
pub fn order_columns() -> Vec<Column> {
    vec![
        Column::display_only("actions", "Actions", |_: &Row, _: Option<&Value>| {
            "View | Edit".to_string()
        })
        .fixed_width(11),
        Column::new("orderNumber", "FORCE ID", "orderNumber").flex_width(Some(12), None),
        Column::new("tagCounts", "Tag Counts", "formStatuses")
            .kind(ColumnType::Object)
            .formatter(TagCountFormatter),
        Column::new("orderDate", "Last Updated", "orderDate").kind(ColumnType::Date),
    ]
}

/// Optional column listing every form tag with its status
pub fn form_status_column() -> Column {
    Column::new("formStatus", "Form Status", "formStatuses")
        .kind(ColumnType::Object)
        .formatter(StatusTagsFormatter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_table::{run, PageRequest, QueryState, SortDirection};
    use crate::domain::form_status::count_statuses;

    #[test]
    fn force_ids_have_the_expected_shape() {
        let id = generate_force_id();
        assert_eq!(id.len(), 12);
        assert!(id.starts_with("BCH-") && id.ends_with("-1"));
        assert!(id[4..10].chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn ten_orders_with_unique_ids() {
        let orders = mock_orders();
        assert_eq!(orders.len(), 10);
        assert!(orders.iter().all(|o| o["orderNumber"].as_str().is_some()));
        assert_eq!(orders[9]["customer"]["name"], "Helen Mirren");

        let counts = count_statuses(orders[0].get("formStatuses"));
        assert_eq!((counts.incomplete, counts.unverified, counts.complete), (5, 2, 3));
    }

    #[test]
    fn demo_columns_render_a_row() {
        let orders = mock_orders();
        let columns = order_columns();
        let cells: Vec<String> = columns.iter().map(|c| c.render_cell(&orders[4])).collect();
        assert_eq!(cells[0], "View | Edit");
        assert!(cells[1].starts_with("BCH-"));
        assert_eq!(cells[2], "I0 U0 C8");
        assert_eq!(cells[3], "2024-01-12");

        let tags = form_status_column().render_cell(&orders[0]);
        assert!(tags.starts_with("Demographics=Complete, Surgical History=Unverified, CMR1=Incomplete"));
    }

    #[test]
    fn sort_by_last_updated_descending() {
        let orders = mock_orders();
        let query = QueryState::default().with_sort("orderDate", SortDirection::Desc);
        let page = run(&orders, &order_columns(), &query, PageRequest::default());
        assert_eq!(page.total_count, 10);
        assert_eq!(page.rows[0]["orderDate"], "2024-01-18");
        assert_eq!(page.rows[9]["orderDate"], "2024-01-09");
    }
}
