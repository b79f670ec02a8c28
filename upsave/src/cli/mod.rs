pub mod bugreport;
pub mod client;
pub mod inspect;
pub mod server;
pub mod version;

pub const SERVER_SUBCOMMAND: &str = "server";
pub const SERVER_DESCRIPTION: &str = "Run the server";

pub const VERSION_SUBCOMMAND: &str = "version";
pub const VERSION_DESCRIPTION: &str = "Display the version and build information";

pub const BUGREPORT_SUBCOMMAND: &str = "bugreport";
pub const BUGREPORT_DESCRIPTION: &str = "Collect information about the system and the environment for bug reports";

pub const UPLOAD_SUBCOMMAND: &str = "upload";
pub const UPLOAD_DESCRIPTION: &str = "Upload file(s) to the server as a multipart form";

pub const INSPECT_SUBCOMMAND: &str = "inspect";
pub const INSPECT_DESCRIPTION: &str = "Normalize upload metadata from a JSON file and list the files it describes";
