use client::UploadParams;

pub async fn upload(uri: &str, files: &[String]) {
    let params = UploadParams {
        uri: uri.to_owned(),
        files: files.iter().map(|f| client::parse_file_arg(f)).collect(),
    };
    client::upload_files(params).await;
}
