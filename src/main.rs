#![warn(unused_extern_crates)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use std::io::Write;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use certificates::{CertKind, Certificate};
use error::RepoError;
use settings::Settings;

mod certificates;
mod error;
mod settings;

const APP_NAME: &str = "pki_repo";
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let matches = build_cli().get_matches();

    let sub_matches = matches.subcommand().1;
    let debug = matches.is_present("debug") || sub_matches.map_or(false, |sub| sub.is_present("debug"));

    init_logging(if debug { "debug" } else { "info" });

    debug!("{} V{}::Startup", APP_NAME, APP_VERSION);

    // Global options may come before or after the sub-command
    let settings_loc = sub_matches
        .and_then(|sub| sub.value_of("settings"))
        .or_else(|| matches.value_of("settings"))
        .unwrap_or(settings::SETTINGS_FILE);

    if let Err(e) = run(&matches, settings_loc) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn build_cli<'a, 'b>() -> App<'a, 'b> {
    let kind_arg = Arg::with_name("kind")
        .help("Artifact type")
        .required(true)
        .possible_values(&["csr", "cert"]);
    let host_arg = Arg::with_name("host")
        .help("Host name the artifact belongs to")
        .required(true);

    App::new(APP_NAME)
        .version(APP_VERSION)
        .about("Stores certificate signing requests and certificates in a local repository.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("settings")
                .short("s")
                .long("settings")
                .value_name("FILE")
                .help("Settings file to load")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .help("Log more detailed messages")
                .global(true),
        )
        .subcommand(SubCommand::with_name("gen_settings").about("Generate default settings file"))
        .subcommand(
            SubCommand::with_name("path")
                .about("Print the repository path of an artifact")
                .arg(kind_arg.clone())
                .arg(host_arg.clone()),
        )
        .subcommand(
            SubCommand::with_name("save")
                .about("Store the contents of FILE as an artifact")
                .arg(kind_arg.clone())
                .arg(host_arg.clone())
                .arg(Arg::with_name("file").required(true)),
        )
        .subcommand(
            SubCommand::with_name("import")
                .about("Store a '<host>.cert.pem' file in the certs repository")
                .arg(Arg::with_name("file").required(true)),
        )
        .subcommand(
            SubCommand::with_name("show")
                .about("Write a stored artifact to stdout")
                .arg(kind_arg)
                .arg(host_arg),
        )
}

/**
 * Runs the sub-command in `matches`.
 * Every sub-command apart from `gen_settings` loads the settings file first.
 */
fn run(matches: &ArgMatches, settings_loc: &str) -> Result<(), RepoError> {
    if matches.subcommand_matches("gen_settings").is_some() {
        settings::write_default(settings_loc)?;
        info!("Default settings written to '{}'", settings_loc);
        return Ok(());
    }

    let settings = settings::init(settings_loc)?;

    match matches.subcommand() {
        ("path", Some(args)) => {
            let cert = Certificate::new(arg(args, "host"), arg(args, "kind"), Vec::new())?;
            println!("{}", cert.get_path(&settings));
        }
        ("save", Some(args)) => {
            let body = read_input(arg(args, "file"))?;
            let cert = Certificate::new(arg(args, "host"), arg(args, "kind"), body)?;
            store(&cert, &settings)?;
        }
        ("import", Some(args)) => {
            let cert = Certificate::from_file(arg(args, "file"))?;
            store(&cert, &settings)?;
        }
        ("show", Some(args)) => {
            let kind = arg(args, "kind")
                .parse::<CertKind>()
                .map_err(|_| RepoError::InvalidKind(arg(args, "kind").to_owned()))?;
            let cert = Certificate::load(&settings, kind, arg(args, "host"))?;

            if let Err(e) = std::io::stdout().write_all(&cert.body) {
                error!("Could not write to stdout. {}", e);
            }
        }
        _ => {}
    }

    Ok(())
}

fn store(cert: &Certificate, settings: &Settings) -> Result<(), RepoError> {
    let path = cert.save(settings)?;
    info!("Saved {} for '{}' to '{}'", cert.kind, cert.host, path);

    Ok(())
}

fn read_input(file_path: &str) -> Result<Vec<u8>, RepoError> {
    std::fs::read(file_path).map_err(|source| RepoError::Read {
        path: file_path.to_owned(),
        source,
    })
}

// Required arguments are always present once clap has matched
fn arg<'a>(args: &'a ArgMatches, name: &str) -> &'a str {
    args.value_of(name).unwrap_or_default()
}

/**
 * Initializes logging with specified detail:
 * ``` filter: 'info', 'warn', 'debug', 'trace' ```
 */
fn init_logging(filter: &str) {
    let env = env_logger::Env::default().filter_or("RUST_LOG", filter);
    env_logger::init_from_env(env);
}
