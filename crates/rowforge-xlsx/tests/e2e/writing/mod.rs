//! Writing tests - build documents through `Spreadsheet` and inspect the
//! resulting archive.

mod basic;
mod cell_values;
mod images;
mod lifecycle;
mod styles;
mod worksheets;
