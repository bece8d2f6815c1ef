use tabled::{settings::Style, Table, Tabled};
use crate::codec::format_timestamp;
use crate::record::FileRecord;
use crate::storage::VaultStats;
use crate::ui::output::human_bytes;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    mime_type: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Text")]
    text: &'static str,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&FileRecord> for RecordRow {
    fn from(record: &FileRecord) -> Self {
        let mime_type = if record.mime_type.is_empty() {
            "unknown".to_string()
        } else {
            record.mime_type.clone()
        };
        Self {
            id: record.id,
            name: record.display_name(),
            mime_type,
            size: human_bytes(record.size),
            text: if record.is_text() { "yes" } else { "no" },
            created: format_timestamp(&record.created),
        }
    }
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &VaultStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Files", &stats.records.to_string());
    builder.add_row("Text files", &stats.text_records.to_string());
    builder.add_row("Binary files", &(stats.records - stats.text_records).to_string());
    builder.add_row("Total size", &human_bytes(stats.total_bytes));
    builder.add_row("Schema version", &stats.schema_version.to_string());
    builder.build()
}

/// One row per record, in the order given
pub fn records_table(records: &[FileRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
