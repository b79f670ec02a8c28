use bugreport::{
    bugreport,
    collector::{
        CommandLine, CompileTimeInformation, EnvironmentVariables, OperatingSystem,
        SoftwareVersion,
    },
    format::Markdown,
};

pub fn run() {
    bugreport!()
        .info(SoftwareVersion::default())
        .info(OperatingSystem::default())
        .info(CommandLine::default())
        .info(EnvironmentVariables::list(&[
            "UPSAVE_PORT",
            "UPSAVE_SAVE_DIR",
            "UPSAVE_TEMP_DIR",
            "UPSAVE_MAX_FILE_SIZE",
            "UPSAVE_BODY_LIMIT",
            "RUST_LOG",
        ]))
        .info(CompileTimeInformation::default())
        .print::<Markdown>();
}
