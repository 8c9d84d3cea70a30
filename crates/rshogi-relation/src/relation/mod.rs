//! 関係テーブルとストア

mod kind;
mod store;
mod table;

pub use kind::RelationKind;
pub use store::{ClassifiedMove, RelationStore, compose, decompose, table_file_name};
pub use table::RelationTable;
