use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use debrief_frontend::settings::Settings;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Initialization error")]
    Initialization,
}

#[tokio::main]
async fn main() {
    let logpath = match get_logging_path() {
        Ok(it) => it,
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };

    let logfile = tracing_appender::rolling::daily(logpath, "log");
    tracing_subscriber::fmt()
        .compact()
        .with_writer(logfile)
        .init();

    debug!("starting application");

    let mut settings = Settings::default();
    map_args_to_settings(&cli().get_matches(), &mut settings);

    match debrief_frontend::run(settings).await {
        Ok(outcome) => {
            debug!("closing application with {:?}", outcome);
            if outcome.submitted {
                println!("Postcall submitted.");
            }
        }
        Err(err) => {
            error!("closing application with error: {:?}", err);
            eprintln!("debrief failed: {}", err);
            std::process::exit(1);
        }
    }
}

fn cli() -> Command {
    Command::new("debrief")
        .about("debrief - review what was presented during a call and submit the postcall")
        .args([
            Arg::new("record")
                .long("record")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .help("call record json holding the presentation history"),
            Arg::new("api-url")
                .long("api-url")
                .action(ArgAction::Set)
                .help("base url of the file api used to resolve thumbnails"),
            Arg::new("token")
                .long("token")
                .action(ArgAction::Set)
                .help("bearer token sent to the file api and the action endpoint"),
            Arg::new("action-url")
                .long("action-url")
                .action(ArgAction::Set)
                .help("endpoint executing the postcall action"),
            Arg::new("action-id")
                .long("action-id")
                .action(ArgAction::Set)
                .help("id of the postcall action"),
            Arg::new("chunk-size")
                .long("chunk-size")
                .action(ArgAction::Set)
                .value_parser(value_parser!(usize))
                .default_value("100")
                .help("max count of file ids per lookup request"),
            Arg::new("meeting-name")
                .long("meeting-name")
                .action(ArgAction::Set)
                .help("name of the meeting"),
            Arg::new("meeting-start")
                .long("meeting-start")
                .action(ArgAction::Set)
                .value_parser(value_parser!(DateTime<Utc>))
                .help("start of the meeting as rfc3339 timestamp"),
            Arg::new("meeting-end")
                .long("meeting-end")
                .action(ArgAction::Set)
                .value_parser(value_parser!(DateTime<Utc>))
                .help("end of the meeting as rfc3339 timestamp"),
            Arg::new("notes")
                .long("notes")
                .action(ArgAction::Set)
                .help("initial meeting notes"),
            Arg::new("rating")
                .long("rating")
                .action(ArgAction::Set)
                .value_parser(value_parser!(u8).range(1..=5))
                .help("meeting rating from 1 to 5"),
            Arg::new("follow-up")
                .long("follow-up")
                .action(ArgAction::Set)
                .value_parser(value_parser!(DateTime<Utc>))
                .help("schedule a follow-up at the given rfc3339 timestamp"),
        ])
}

fn map_args_to_settings(args: &ArgMatches, settings: &mut Settings) {
    settings.record_path = args.get_one("record").cloned();
    settings.api_url = args.get_one("api-url").cloned();
    settings.api_token = args.get_one("token").cloned();
    settings.action_url = args.get_one("action-url").cloned();
    settings.action_id = args.get_one("action-id").cloned();

    if let Some(chunk_size) = args.get_one::<usize>("chunk-size") {
        settings.chunk_size = *chunk_size;
    }

    let form = &mut settings.form;
    if let Some(name) = args.get_one::<String>("meeting-name") {
        form.meeting_name = name.clone();
    }
    if let Some(start) = args.get_one::<DateTime<Utc>>("meeting-start") {
        form.meeting_start = *start;
        form.meeting_end = *start;
    }
    if let Some(end) = args.get_one::<DateTime<Utc>>("meeting-end") {
        form.meeting_end = *end;
    }
    if let Some(notes) = args.get_one::<String>("notes") {
        form.notes = notes.clone();
    }
    if let Some(rating) = args.get_one::<u8>("rating") {
        form.meeting_rating = *rating;
    }
    if let Some(date) = args.get_one::<DateTime<Utc>>("follow-up") {
        form.schedule_follow_up = true;
        form.follow_up_date = Some(*date);
    }
}

fn get_logging_path() -> Result<String, Error> {
    let cache_dir = match dirs::cache_dir() {
        Some(cache_dir) => match cache_dir.to_str() {
            Some(cache_dir_string) => cache_dir_string.to_string(),
            None => return Err(Error::Initialization),
        },
        None => return Err(Error::Initialization),
    };

    Ok(format!("{}{}", cache_dir, "/debrief/logs"))
}
