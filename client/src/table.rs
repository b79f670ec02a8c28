use comfy_table::{presets::UTF8_HORIZONTAL_ONLY, Attribute, Cell, ContentArrangement, Table};
use kernel::{FileReport, Uploads};

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_HORIZONTAL_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120)
        .set_header(
            header
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

fn index_cell(index: Option<usize>) -> Cell {
    index.map_or_else(|| Cell::new(""), Cell::new)
}

/// One row per file the server processed.
#[must_use]
pub fn reports_table(reports: &[FileReport]) -> Table {
    let mut table = new_table(&["Field", "Index", "Name", "Size", "Error", "Result"]);
    for r in reports {
        let result = match (&r.saved_path, &r.message) {
            (Some(path), _) => path.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => String::new(),
        };
        table.add_row(vec![
            Cell::new(&r.field),
            index_cell(r.index),
            Cell::new(&r.client_name),
            Cell::new(r.size),
            Cell::new(r.error_code),
            Cell::new(result),
        ]);
    }
    table
}

/// One row per file of normalized upload metadata.
#[must_use]
pub fn uploads_table(uploads: &Uploads) -> Table {
    let mut table = new_table(&["Field", "Index", "Name", "Type", "Size", "Error", "Successful"]);
    for (field, index, file) in uploads.files() {
        table.add_row(vec![
            Cell::new(field),
            index_cell(index),
            Cell::new(file.client_name()),
            Cell::new(file.mime_type()),
            Cell::new(file.size()),
            Cell::new(file.error_code()),
            Cell::new(file.is_successful()),
        ]);
    }
    table
}
