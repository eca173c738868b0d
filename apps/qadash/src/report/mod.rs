//! Report renderers: the HTML dashboard and the CSV history row.

pub mod csv;
pub mod html;
