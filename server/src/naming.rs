/// Last path component of an untrusted client file name.
///
/// Both `/` and `\` count as separators. Control characters are dropped.
#[must_use]
pub fn client_file_name(name: &str) -> String {
    let base = if let Some(ix) = name.rfind(&['\\', '/']) {
        &name[ix + 1..]
    } else {
        name
    };
    base.chars().filter(|c| !c.is_control()).collect()
}

/// File name an upload is saved under: `<uid>-<client file name>`,
/// or the uid alone when nothing usable is left of the client name.
#[must_use]
pub fn destination_name(uid: &str, client_name: &str) -> String {
    let base = client_file_name(client_name);
    match base.as_str() {
        "" | "." | ".." => uid.to_owned(),
        _ => format!("{uid}-{base}"),
    }
}
