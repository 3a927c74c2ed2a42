//! Generic table rendering
//!
//! Projects a [`TableSnapshot`] of any shape onto a grid of display strings,
//! and a [`BrowserState`] onto the screen regions of the browser. Cells are
//! always looked up by column name, never by position, and nothing is sorted,
//! filtered or paginated.

use std::fmt;
use unicode_width::UnicodeWidthStr;

use crate::client::{BrowserState, DetailPhase, TablesPhase};
use crate::schema::{Row, ScalarValue, TableName, TableSnapshot};

/// Shown for absent cells and for the store's null sentinel
pub const NULL_MARKER: &str = "NULL";
/// Appended to the header of primary-key columns
pub const PRIMARY_KEY_MARKER: &str = "[PK]";

pub const LOADING_TABLES_MESSAGE: &str = "Loading tables...";
pub const NO_TABLES_MESSAGE: &str = "No tables found in database";
pub const NO_SELECTION_MESSAGE: &str = "Select a table from the sidebar to view its data";
pub const NO_ROWS_MESSAGE: &str = "No data available in this table";
pub const LOADING_TABLE_MESSAGE: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub name: String,
    pub declared_type: String,
    pub is_primary_key: bool,
}

impl HeaderCell {
    /// Column name, annotated when the column is part of the primary key
    pub fn label(&self) -> String {
        if self.is_primary_key {
            format!("{} {}", self.name, PRIMARY_KEY_MARKER)
        } else {
            self.name.clone()
        }
    }
}

/// Header cells plus one string per (row, column)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayGrid {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<String>>,
}

/// Display text of one cell
pub fn cell_text(row: &Row, column: &str) -> String {
    match row.get(column) {
        None | Some(ScalarValue::Null) => NULL_MARKER.to_string(),
        Some(value) => value.to_string(),
    }
}

pub fn render_snapshot(snapshot: &TableSnapshot) -> DisplayGrid {
    let headers = snapshot
        .columns
        .iter()
        .map(|column| HeaderCell {
            name: column.name.clone(),
            declared_type: column.declared_type.clone(),
            is_primary_key: column.is_primary_key(),
        })
        .collect();

    let rows = snapshot
        .rows
        .iter()
        .map(|row| {
            snapshot
                .columns
                .iter()
                .map(|column| cell_text(row, &column.name))
                .collect()
        })
        .collect();

    DisplayGrid { headers, rows }
}

impl fmt::Display for DisplayGrid {
    /// Plain-text table, columns padded to their widest cell
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.headers.iter().map(HeaderCell::label).collect();
        let mut widths: Vec<usize> = labels.iter().map(|label| label.width()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        write_line(formatter, &labels, &widths)?;
        let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
        writeln!(formatter, "{}", separator.join("-+-"))?;
        for row in &self.rows {
            write_line(formatter, row, &widths)?;
        }
        Ok(())
    }
}

fn write_line(formatter: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let padding = width.saturating_sub(cell.width());
            format!("{}{}", cell, " ".repeat(padding))
        })
        .collect();
    writeln!(formatter, "{}", padded.join(" | ").trim_end())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarView {
    Loading,
    Empty,
    Tables {
        names: Vec<TableName>,
        selected: Option<TableName>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// Nothing selected yet
    Placeholder,
    Loading { table: TableName },
    Failed { table: TableName, message: String },
    /// The table exists but its sample is empty
    NoRows { table: TableName },
    Grid { table: TableName, grid: DisplayGrid },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserView {
    pub error_banner: Option<String>,
    pub sidebar: SidebarView,
    pub detail: DetailView,
}

pub fn render_view(state: &BrowserState) -> BrowserView {
    let sidebar = match state.tables() {
        TablesPhase::Idle | TablesPhase::Loading => SidebarView::Loading,
        TablesPhase::Loaded(names) if !names.is_empty() => SidebarView::Tables {
            names: names.clone(),
            selected: state.selected().cloned(),
        },
        TablesPhase::Loaded(_) | TablesPhase::Failed(_) => SidebarView::Empty,
    };

    let detail = match (state.selected(), state.detail()) {
        (None, _) | (Some(_), DetailPhase::NoSelection) => DetailView::Placeholder,
        (Some(table), DetailPhase::Loading) => DetailView::Loading {
            table: table.clone(),
        },
        (Some(table), DetailPhase::Failed(failure)) => DetailView::Failed {
            table: table.clone(),
            message: failure.to_string(),
        },
        (Some(table), DetailPhase::Loaded(snapshot)) if snapshot.rows.is_empty() => {
            DetailView::NoRows {
                table: table.clone(),
            }
        }
        (Some(table), DetailPhase::Loaded(snapshot)) => DetailView::Grid {
            table: table.clone(),
            grid: render_snapshot(snapshot),
        },
    };

    BrowserView {
        error_banner: state.error().map(str::to_string),
        sidebar,
        detail,
    }
}

impl fmt::Display for SidebarView {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SidebarView::Loading => writeln!(formatter, "{}", LOADING_TABLES_MESSAGE),
            SidebarView::Empty => writeln!(formatter, "{}", NO_TABLES_MESSAGE),
            SidebarView::Tables { names, selected } => {
                for name in names {
                    let marker = if selected.as_ref() == Some(name) { ">" } else { " " };
                    writeln!(formatter, "{} {}", marker, name)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailView::Placeholder => writeln!(formatter, "{}", NO_SELECTION_MESSAGE),
            DetailView::Loading { table } => {
                writeln!(formatter, "Table: {}\n{}", table, LOADING_TABLE_MESSAGE)
            }
            DetailView::Failed { table, message } => {
                writeln!(formatter, "Table: {}\n{}", table, message)
            }
            DetailView::NoRows { table } => writeln!(formatter, "Table: {}\n{}", table, NO_ROWS_MESSAGE),
            DetailView::Grid { table, grid } => write!(formatter, "Table: {}\n{}", table, grid),
        }
    }
}

impl fmt::Display for BrowserView {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.error_banner {
            writeln!(formatter, "Error: {}\n", message)?;
        }
        writeln!(formatter, "Database Tables")?;
        write!(formatter, "{}", self.sidebar)?;
        writeln!(formatter)?;
        write!(formatter, "{}", self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientFetchError;
    use crate::schema::{ColumnDescriptor, ColumnKey};

    fn column(name: &str, key: ColumnKey) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            declared_type: "varchar".to_string(),
            key,
            is_nullable: true,
        }
    }

    fn snapshot(table: &str, columns: Vec<ColumnDescriptor>, rows: Vec<Row>) -> TableSnapshot {
        TableSnapshot {
            table: TableName::new(table),
            columns,
            rows,
        }
    }

    #[test]
    fn test_cell_text() {
        let row: Row = vec![
            ("name", ScalarValue::from("Ada")),
            ("nickname", ScalarValue::Null),
            ("empty", ScalarValue::from("")),
            ("age", ScalarValue::from(36i64)),
            ("active", ScalarValue::from(false)),
        ]
        .into_iter()
        .collect();

        assert_eq!(cell_text(&row, "name"), "Ada");
        assert_eq!(cell_text(&row, "nickname"), "NULL");
        assert_eq!(cell_text(&row, "empty"), "");
        assert_eq!(cell_text(&row, "age"), "36");
        assert_eq!(cell_text(&row, "active"), "false");
        assert_eq!(cell_text(&row, "missing"), "NULL");
    }

    #[test]
    fn test_cells_follow_column_names_not_row_order() {
        let row: Row = vec![
            ("total", ScalarValue::from(9.5)),
            ("status", ScalarValue::from("shipped")),
            ("id", ScalarValue::from(3i64)),
        ]
        .into_iter()
        .collect();
        let snapshot = snapshot(
            "orders",
            vec![
                column("id", ColumnKey::Primary),
                column("status", ColumnKey::None),
                column("total", ColumnKey::None),
            ],
            vec![row],
        );

        let grid = render_snapshot(&snapshot);
        assert_eq!(grid.rows, vec![vec!["3", "shipped", "9.5"]]);
    }

    #[test]
    fn test_primary_key_annotation() {
        let keyed = render_snapshot(&snapshot(
            "orders",
            vec![
                column("order_id", ColumnKey::Primary),
                column("line_no", ColumnKey::Primary),
                column("sku", ColumnKey::Multiple),
            ],
            vec![],
        ));
        let labels: Vec<_> = keyed.headers.iter().map(HeaderCell::label).collect();
        assert_eq!(labels, vec!["order_id [PK]", "line_no [PK]", "sku"]);

        let unkeyed = render_snapshot(&snapshot(
            "log",
            vec![column("message", ColumnKey::None)],
            vec![],
        ));
        assert!(!unkeyed.headers[0].is_primary_key);
        assert_eq!(unkeyed.headers[0].label(), "message");
    }

    #[test]
    fn test_grid_text_alignment() {
        let grid = DisplayGrid {
            headers: vec![
                HeaderCell {
                    name: "id".to_string(),
                    declared_type: "int".to_string(),
                    is_primary_key: true,
                },
                HeaderCell {
                    name: "city".to_string(),
                    declared_type: "varchar".to_string(),
                    is_primary_key: false,
                },
            ],
            rows: vec![
                vec!["1".to_string(), "Zürich".to_string()],
                vec!["22".to_string(), "NULL".to_string()],
            ],
        };

        assert_eq!(
            grid.to_string(),
            "id [PK] | city\n\
             --------+-------\n\
             1       | Zürich\n\
             22      | NULL\n"
        );
    }

    #[test]
    fn test_view_before_anything_loads() {
        let view = render_view(&BrowserState::new());
        assert_eq!(view.sidebar, SidebarView::Loading);
        assert_eq!(view.detail, DetailView::Placeholder);
        assert_eq!(view.error_banner, None);
    }

    #[test]
    fn test_view_with_zero_tables() {
        let mut state = BrowserState::new();
        let ticket = state.begin_tables_load();
        state.finish_tables_load(ticket, Ok(vec![]));

        let view = render_view(&state);
        assert_eq!(view.sidebar, SidebarView::Empty);
        assert!(view.to_string().contains(NO_TABLES_MESSAGE));
        assert!(view.to_string().contains(NO_SELECTION_MESSAGE));
    }

    #[test]
    fn test_view_of_selected_table() {
        let mut state = BrowserState::new();
        let ticket = state.begin_tables_load();
        state.finish_tables_load(
            ticket,
            Ok(vec![TableName::new("customers"), TableName::new("orders")]),
        );
        let ticket = state.select_table(TableName::new("orders")).unwrap();
        assert_eq!(
            render_view(&state).detail,
            DetailView::Loading {
                table: TableName::new("orders")
            }
        );

        let row: Row = vec![("id", ScalarValue::from(1i64))].into_iter().collect();
        state.finish_table_load(
            ticket,
            Ok(snapshot("orders", vec![column("id", ColumnKey::Primary)], vec![row])),
        );

        let view = render_view(&state);
        assert_eq!(
            view.sidebar,
            SidebarView::Tables {
                names: vec![TableName::new("customers"), TableName::new("orders")],
                selected: Some(TableName::new("orders")),
            }
        );
        match &view.detail {
            DetailView::Grid { table, grid } => {
                assert_eq!(table, &TableName::new("orders"));
                assert_eq!(grid.rows, vec![vec!["1"]]);
            }
            other => panic!("expected grid, got {:?}", other),
        }
        assert!(view.to_string().contains("> orders"));
    }

    #[test]
    fn test_view_of_table_without_rows() {
        let mut state = BrowserState::new();
        let ticket = state.select_table(TableName::new("archive")).unwrap();
        state.finish_table_load(
            ticket,
            Ok(snapshot("archive", vec![column("id", ColumnKey::Primary)], vec![])),
        );

        let view = render_view(&state);
        assert_eq!(
            view.detail,
            DetailView::NoRows {
                table: TableName::new("archive")
            }
        );
        assert!(view.to_string().contains(NO_ROWS_MESSAGE));
    }

    #[test]
    fn test_view_of_failed_table_with_banner() {
        let mut state = BrowserState::new();
        let ticket = state.select_table(TableName::new("orders")).unwrap();
        state.finish_table_load(
            ticket,
            Err(ClientFetchError::Status {
                message: "Failed to fetch data for table: orders".to_string(),
                status: 500,
            }),
        );

        let view = render_view(&state);
        assert_eq!(
            view.error_banner.as_deref(),
            Some("Failed to fetch data for table: orders")
        );
        assert!(matches!(view.detail, DetailView::Failed { .. }));
        assert!(view
            .to_string()
            .starts_with("Error: Failed to fetch data for table: orders"));
    }
}
