use std::sync::Arc;

use super::value::Value;

/// Identity of a row inside a snapshot, used to track selection across
/// search, sort and paging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    Id(String),
    Index(usize),
}

/// An opaque record the engine can read fields from.
///
/// The engine never looks at a row other than through these methods.
pub trait Row {
    /// Value of the named field, `None` if the row has no such field.
    fn field(&self, name: &str) -> Option<Value>;

    /// Names of the fields this row carries, in declaration order.
    /// Used to infer the searchable fields when none are declared.
    fn field_names(&self) -> Vec<String>;

    /// Optional identifying field.
    fn row_id(&self) -> Option<String> {
        None
    }
}

/// A dynamically shaped row: a shared list of field names plus one value per name.
///
/// This is what the file loader and the demo datasets produce.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Vec<String>>,
    values: Vec<Value>,
    id_field: Option<usize>,
}

impl Record {
    pub fn new(schema: Arc<Vec<String>>, values: Vec<Value>) -> Self {
        Self {
            schema,
            values,
            id_field: None,
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (names, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(Arc::new(names), values)
    }

    /// Marks `field` as the identifying field of this record.
    pub fn with_id_field(mut self, field: &str) -> Self {
        self.id_field = self.schema.iter().position(|n| n == field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .iter()
            .position(|n| n == name)
            .and_then(|idx| self.values.get(idx))
    }
}

impl Row for Record {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn field_names(&self) -> Vec<String> {
        self.schema.as_ref().clone()
    }

    fn row_id(&self) -> Option<String> {
        self.id_field
            .and_then(|idx| self.values.get(idx))
            .filter(|v| !v.is_null())
            .map(|v| v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_fields_and_id() {
        let r = Record::from_pairs([("id", Value::Int(3)), ("name", Value::from("Zara Khan"))])
            .with_id_field("id");
        assert_eq!(r.field("name"), Some(Value::from("Zara Khan")));
        assert_eq!(r.field("email"), None);
        assert_eq!(r.field_names(), vec!["id".to_string(), "name".to_string()]);
        assert_eq!(r.row_id().as_deref(), Some("3"));
    }

    #[test]
    fn record_without_id_field() {
        let r = Record::from_pairs([("mrr", 100)]);
        assert_eq!(r.row_id(), None);
    }
}
