// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde_json::{json, Value};
use std::fs;
use std::process::ExitCode;
use xhsfetch::api::{MessageFeed, NoteShelf};
use xhsfetch::constants::SUCCESS_MESSAGE;
use xhsfetch::export::{export_notes, load_url_file, ExportRequest};
use xhsfetch::media::{no_watermark_image_url, resolve_video_url};
use xhsfetch::output::{deliver_all, OutputPlan, ResultDocument};
use xhsfetch::{
    AppError, ClientConfig, Command, CommandLineInput, Failure, NodeSigner, NoteSearch, Outcome,
    Reply, ShareLink, Transport, XhsApi, XhsHttpClient,
};

/// Sets up logging configuration. The console appender writes to stderr so
/// stdout carries only the result document.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("xhsfetch.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Builds the signed client for commands that talk to the API.
fn connect(config: &ClientConfig) -> Result<XhsApi<XhsHttpClient>, Failure> {
    let credentials = config
        .credentials
        .clone()
        .ok_or_else(|| Failure::infrastructure("command needs a session but none was resolved"))?;
    let signer = NodeSigner::new(
        &config.signer.node,
        &config.signer.sign_script,
        &config.signer.trace_script,
    )?;
    let client = XhsHttpClient::new(credentials, Box::new(signer), config.transport.clone())?;
    Ok(XhsApi::new(client))
}

fn document<T: serde::Serialize>(outcome: Outcome<T>) -> ResultDocument {
    ResultDocument::from_outcome(&outcome)
}

/// Runs the API-backed commands.
fn dispatch<T: Transport>(api: &XhsApi<T>, command: &Command) -> ResultDocument {
    match command {
        Command::UserInfo { user_id } => document(api.user_info(user_id)),
        Command::UserSelfInfo => document(api.self_info()),
        Command::UserSelfInfo2 => document(api.self_info_v2()),
        Command::UserPosts { user_url } => {
            document(api.user_notes(NoteShelf::Posted, &ShareLink::parse(user_url)))
        }
        Command::UserLikes { user_url } => {
            document(api.user_notes(NoteShelf::Liked, &ShareLink::parse(user_url)))
        }
        Command::UserCollects { user_url } => {
            document(api.user_notes(NoteShelf::Collected, &ShareLink::parse(user_url)))
        }
        Command::NoteInfo { url } => document(api.note_detail(&ShareLink::parse(url))),
        Command::NoteComments { url } => document(api.all_comments(&ShareLink::parse(url))),
        Command::SearchKeyword { word } => document(api.search_keyword(word)),
        Command::SearchNotes(args) => document(api.search_notes(&args.to_search(), args.num)),
        Command::SearchUsers { query, num } => document(api.search_users(query, *num)),
        Command::MessagesUnread => document(api.unread_count()),
        Command::MessagesMentions => document(api.messages(MessageFeed::Mentions)),
        Command::MessagesLikes => document(api.messages(MessageFeed::LikesAndCollects)),
        Command::MessagesConnections => document(api.messages(MessageFeed::Connections)),
        Command::HomefeedChannels => document(api.homefeed_channels()),
        Command::HomefeedRecommend { category, num } => document(api.homefeed(category, *num)),
        Command::CreatorPosted => document(api.creator_posted()),
        Command::ExportNotes(args) => {
            let mut urls = args.urls.clone();
            if let Some(path) = &args.url_file {
                match load_url_file(path) {
                    Ok(from_file) => urls.extend(from_file),
                    Err(e) => return document::<Value>(Err(Failure::from(e))),
                }
            }
            let request = ExportRequest {
                urls,
                search: args
                    .query
                    .as_ref()
                    .map(|query| (NoteSearch::new(query.as_str()), args.num)),
            };
            document(export_notes(api, &request))
        }
        Command::NoWaterVideo { .. } | Command::NoWaterImg { .. } => document::<Value>(Err(
            Failure::infrastructure("media commands do not use the signed client"),
        )),
    }
}

/// Executes one command and renders its result.
fn run(config: &ClientConfig) -> ResultDocument {
    match &config.command {
        Command::NoWaterImg { img_url } => {
            let outcome = no_watermark_image_url(img_url)
                .map(|output| {
                    Reply::new(SUCCESS_MESSAGE, json!({"input": img_url, "output": output}))
                })
                .map_err(|e| Failure::from(AppError::from(e)));
            document(outcome)
        }
        Command::NoWaterVideo { note_id } => {
            let outcome = resolve_video_url(note_id, config.transport.use_env_proxy)
                .map(|reply| reply.map(|url| json!({"note_id": note_id, "video_url": url})));
            document(outcome)
        }
        command => match connect(config) {
            Ok(api) => dispatch(&api, command),
            Err(failure) => {
                log::error!("Cannot prepare the client: {}", failure);
                document::<Value>(Err(failure))
            }
        },
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = ClientConfig::resolve(cli).context("configuration error")?;

    let result = run(&config);
    let rendered = result.to_pretty_string();
    deliver_all(OutputPlan::for_result(&rendered, config.out_file.as_ref()))?;

    Ok(ExitCode::from(result.exit_code() as u8))
}
