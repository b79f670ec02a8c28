use std::io;
use std::path::Path;

use kernel::FileReport;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use resource::Resource;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

pub mod resource;
pub mod table;

pub struct UploadParams {
    pub uri: String,
    /// Form field and local path of every file to send
    pub files: Vec<(String, String)>,
}

/// Splits a `field=path` argument. A bare path is sent under the `file[]` field.
#[must_use]
pub fn parse_file_arg(arg: &str) -> (String, String) {
    match arg.split_once('=') {
        Some((field, path)) if !field.is_empty() => (field.to_owned(), path.to_owned()),
        _ => ("file[]".to_owned(), arg.to_owned()),
    }
}

pub async fn upload_files(params: UploadParams) {
    let Some(mut resource) = Resource::new(&params.uri) else {
        println!("invalid uri {}", params.uri);
        return;
    };
    resource.append_path("api/upload");

    let mut form = Form::new();
    for (field, file) in params.files {
        match file_part(Path::new(&file)).await {
            Ok(part) => form = form.part(field, part),
            Err(e) => {
                println!("no such file {file}: {e}");
                return;
            }
        }
    }

    let client = Client::new();
    match client.post(resource.to_string()).multipart(form).send().await {
        Ok(response) => {
            let status = response.status();
            match response.json::<Vec<FileReport>>().await {
                Ok(reports) => {
                    println!("Status: {status}");
                    println!("{}", table::reports_table(&reports));
                }
                Err(e) => println!("JSON decode error: {e}"),
            }
        }
        Err(e) => {
            println!("upload error: {e}");
        }
    }
}

async fn file_part(path: &Path) -> io::Result<Part> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let f = File::open(path).await?;
    let len = f.metadata().await?.len();
    let stream = reqwest::Body::wrap_stream(ReaderStream::new(f));
    Part::stream_with_length(stream, len)
        .file_name(file_name)
        .mime_str(mime.essence_str())
        .map_err(io::Error::other)
}
