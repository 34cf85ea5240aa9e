//! # Blockshelf Table Compiler
//!
//! Turns a block fragment into the row/column table markup the authoring
//! backend pastes as a block.

mod compiler;


pub use compiler::{
    column_count, compile_to_table, icon_name, SerializedTable, ThemeColors,
    DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR, MAX_IMAGE_WIDTH, TABLE_MIME_TYPE,
};
