use std::fmt;
use std::sync::Arc;

use super::row::Row;
use super::value::Value;

pub type DeriveFn<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;
pub type RenderFn<T> = Arc<dyn Fn(&Value, &T) -> String + Send + Sync>;

/// Where a column gets its value from.
pub enum Accessor<T> {
    /// A named field of the row.
    Field(String),
    /// A value computed from the whole row.
    Derived(DeriveFn<T>),
    /// No value at all (selection boxes, action buttons). Resolves to `Null`.
    None,
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Field(f) => Accessor::Field(f.clone()),
            Accessor::Derived(d) => Accessor::Derived(Arc::clone(d)),
            Accessor::None => Accessor::None,
        }
    }
}

/// How a column turns its value into cell text.
pub enum CellKind<T> {
    Plain,
    Custom(RenderFn<T>),
}

impl<T> Clone for CellKind<T> {
    fn clone(&self) -> Self {
        match self {
            CellKind::Plain => CellKind::Plain,
            CellKind::Custom(r) => CellKind::Custom(Arc::clone(r)),
        }
    }
}

/// Schema entry describing how to label, sort and render one column.
pub struct ColumnDef<T> {
    id: String,
    header: String,
    accessor: Accessor<T>,
    cell: CellKind<T>,
    sortable: bool,
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            cell: self.cell.clone(),
            sortable: self.sortable,
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accessor = match &self.accessor {
            Accessor::Field(name) => format!("Field({name})"),
            Accessor::Derived(_) => "Derived".to_string(),
            Accessor::None => "None".to_string(),
        };
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor", &accessor)
            .field("custom_cell", &matches!(self.cell, CellKind::Custom(_)))
            .field("sortable", &self.sortable)
            .finish()
    }
}

impl<T: Row> ColumnDef<T> {
    /// Column reading the field `field`. The field name doubles as column id.
    pub fn field(header: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            id: field.clone(),
            header: header.into(),
            accessor: Accessor::Field(field),
            cell: CellKind::Plain,
            sortable: true,
        }
    }

    /// Column whose value is computed from the row.
    pub fn derived<F>(header: impl Into<String>, id: impl Into<String>, derive: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: Accessor::Derived(Arc::new(derive)),
            cell: CellKind::Plain,
            sortable: true,
        }
    }

    /// Column without an accessor, only a renderer. Never sortable.
    pub fn display<F>(header: impl Into<String>, id: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Value, &T) -> String + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: Accessor::None,
            cell: CellKind::Custom(Arc::new(render)),
            sortable: false,
        }
    }

    /// Replaces the plain cell with a custom renderer.
    pub fn cell<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value, &T) -> String + Send + Sync + 'static,
    {
        self.cell = CellKind::Custom(Arc::new(render));
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable && !matches!(self.accessor, Accessor::None);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// True for columns that carry a value (everything except display-only columns).
    pub fn has_value(&self) -> bool {
        !matches!(self.accessor, Accessor::None)
    }

    /// Resolved value for `row`; absent fields resolve to `Null`.
    pub fn value(&self, row: &T) -> Value {
        match &self.accessor {
            Accessor::Field(name) => row.field(name).unwrap_or(Value::Null),
            Accessor::Derived(derive) => derive(row),
            Accessor::None => Value::Null,
        }
    }

    /// Cell text for `row`. Every column renders through here.
    pub fn render(&self, row: &T) -> String {
        let value = self.value(row);
        match &self.cell {
            CellKind::Plain => value.to_string(),
            CellKind::Custom(render) => render(&value, row),
        }
    }
}
