pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    error, file_deleted, header, human_bytes, info, media_icon, media_label, muted, section,
    status, success, summary_row, warn,
};
pub use progress::ImportProgress;
pub use table::{records_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
