use kernel::UploadRegistry;

pub fn run(path: &str) {
    let json = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            println!("cannot read {path}: {e}");
            return;
        }
    };
    match UploadRegistry::from_json(&json) {
        Ok(uploads) => {
            println!(
                "{} field(s), {} file(s)",
                uploads.len(),
                uploads.file_count()
            );
            println!("{}", client::table::uploads_table(&uploads));
        }
        Err(e) => println!("{e}"),
    }
}
