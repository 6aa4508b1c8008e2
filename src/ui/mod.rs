pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dependency, header, info, job_status, muted, section, success, summary_row, warn};
pub use table::{render, stats_table, JobRow, ProductRow, SourceRow};
pub use theme::{theme, Theme};
