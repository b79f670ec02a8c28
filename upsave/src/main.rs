use clap::{arg, command, crate_name, Command};

mod cli;

#[tokio::main]
async fn main() {
    let cli = command!(crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .subcommand(Command::new(cli::VERSION_SUBCOMMAND).about(cli::VERSION_DESCRIPTION))
        .subcommand(Command::new(cli::BUGREPORT_SUBCOMMAND).about(cli::BUGREPORT_DESCRIPTION))
        .subcommand(Command::new(cli::SERVER_SUBCOMMAND).about(cli::SERVER_DESCRIPTION))
        .subcommand(
            Command::new(cli::UPLOAD_SUBCOMMAND)
                .about(cli::UPLOAD_DESCRIPTION)
                .arg(arg!(-u --uri <URI>).required(true).help("Server URI"))
                .arg(
                    arg!(-f --file <FILE>)
                        .required(true)
                        .action(clap::ArgAction::Append)
                        .help("File to upload as field=path, for example photos[]=p0.jpg. Can be repeated"),
                ),
        )
        .subcommand(
            Command::new(cli::INSPECT_SUBCOMMAND)
                .about(cli::INSPECT_DESCRIPTION)
                .arg(
                    arg!(-f --file <FILE>)
                        .required(true)
                        .help("JSON file with field grouped upload metadata"),
                ),
        )
        .arg_required_else_help(true)
        .disable_version_flag(true)
        .get_matches();

    if cli.subcommand_matches(cli::VERSION_SUBCOMMAND).is_some() {
        cli::version::run();
    } else if cli.subcommand_matches(cli::BUGREPORT_SUBCOMMAND).is_some() {
        cli::bugreport::run();
    } else if cli.subcommand_matches(cli::SERVER_SUBCOMMAND).is_some() {
        cli::server::run().await;
    } else if let Some(upload_matches) = cli.subcommand_matches(cli::UPLOAD_SUBCOMMAND) {
        let uri = upload_matches.get_one::<String>("uri").unwrap();
        let files: Vec<String> = upload_matches
            .get_many::<String>("file")
            .unwrap_or_default()
            .cloned()
            .collect();
        cli::client::upload(uri, &files).await;
    } else if let Some(inspect_matches) = cli.subcommand_matches(cli::INSPECT_SUBCOMMAND) {
        let file = inspect_matches.get_one::<String>("file").unwrap();
        cli::inspect::run(file);
    }
}
