// Adapters: concrete access to the statistics site and the xlsx format.

pub mod http;
pub mod workbook;
