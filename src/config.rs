// src/config.rs
use crate::api::{
    DistanceFilter, Geo, NoteSearch, NoteTypeFilter, PublishTimeFilter, SortOrder,
    TransportOptions, ViewedRangeFilter, RECOMMEND_CHANNEL,
};
use crate::constants::{API_BASE_URL, REQUEST_TIMEOUT_SECS};
use crate::credentials::{self, CredentialSources};
use crate::error::AppError;
use crate::types::{SessionCredentials, ValidationError};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

const SIGN_SCRIPT_NAME: &str = "xhs_xs_xsc_56.js";
const TRACE_SCRIPT_NAME: &str = "xhs_xray.js";
const SCRIPT_DIR: &str = "assets/js";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(name = "xhsfetch", author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Cookie string copied from a logged-in browser session
    #[arg(long, global = true)]
    pub cookie: Option<String>,

    /// Path to a KEY=VALUE file containing COOKIES
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Ignore proxy settings from the environment for this run
    #[arg(long, global = true, default_value_t = false)]
    pub no_env_proxy: bool,

    /// Also write the JSON result to this file
    #[arg(short, long, global = true)]
    pub out: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Node.js executable used to run the signing scripts
    #[arg(long, global = true, env = "XHS_NODE", default_value = "node")]
    pub node: PathBuf,

    /// Signing script (defaults to assets/js next to the executable)
    #[arg(long, global = true, env = "XHS_SIGN_SCRIPT")]
    pub sign_script: Option<PathBuf>,

    /// Trace-id script (defaults to assets/js next to the executable)
    #[arg(long, global = true, env = "XHS_TRACE_SCRIPT")]
    pub trace_script: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Get another user's profile
    UserInfo {
        #[arg(long)]
        user_id: String,
    },
    /// Get the logged-in user's info (v1)
    UserSelfInfo,
    /// Get the logged-in user's info (v2)
    #[command(name = "user-self-info2")]
    UserSelfInfo2,
    /// Get every note posted by a user
    UserPosts {
        #[arg(long)]
        user_url: String,
    },
    /// Get every note a user liked
    UserLikes {
        #[arg(long)]
        user_url: String,
    },
    /// Get every note a user collected
    UserCollects {
        #[arg(long)]
        user_url: String,
    },
    /// Get a note's detail
    NoteInfo {
        #[arg(long)]
        url: String,
    },
    /// Get every comment on a note, replies included
    NoteComments {
        #[arg(long)]
        url: String,
    },
    /// Get search keyword suggestions
    SearchKeyword {
        #[arg(long)]
        word: String,
    },
    /// Search notes
    SearchNotes(SearchNotesArgs),
    /// Search users
    SearchUsers {
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = 10)]
        num: usize,
    },
    /// Get unread message counters
    MessagesUnread,
    /// Get every mention
    MessagesMentions,
    /// Get every like and collect notification
    MessagesLikes,
    /// Get every new-follower notification
    MessagesConnections,
    /// Get home feed channels
    HomefeedChannels,
    /// Get recommended home feed items
    HomefeedRecommend {
        #[arg(long, default_value = RECOMMEND_CHANNEL)]
        category: String,
        #[arg(long, default_value_t = 20)]
        num: usize,
    },
    /// Get every note on the creator platform
    CreatorPosted,
    /// Resolve a note's watermark-free video URL
    NoWaterVideo {
        #[arg(long)]
        note_id: String,
    },
    /// Rewrite an image URL to its watermark-free original
    NoWaterImg {
        #[arg(long)]
        img_url: String,
    },
    /// Summarize notes from URLs and/or a search
    ExportNotes(ExportArgs),
}

impl Command {
    /// Whether the command talks to the signed API and so needs a session.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Command::NoWaterVideo { .. } | Command::NoWaterImg { .. })
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SearchNotesArgs {
    /// Search keyword
    pub query: String,

    /// Number of notes to return
    #[arg(long, default_value_t = 10)]
    pub num: usize,

    #[arg(long, value_enum, default_value_t = SortOrder::General)]
    pub sort: SortOrder,

    #[arg(long, value_enum, default_value_t = NoteTypeFilter::Any)]
    pub note_type: NoteTypeFilter,

    #[arg(long, value_enum, default_value_t = PublishTimeFilter::Any)]
    pub note_time: PublishTimeFilter,

    #[arg(long, value_enum, default_value_t = ViewedRangeFilter::Any)]
    pub note_range: ViewedRangeFilter,

    #[arg(long, value_enum, default_value_t = DistanceFilter::Any)]
    pub pos_distance: DistanceFilter,

    /// Location as JSON, e.g. '{"latitude":39.9,"longitude":116.4}', or a raw string
    #[arg(long, default_value = "")]
    pub geo: String,
}

impl SearchNotesArgs {
    pub fn to_search(&self) -> NoteSearch {
        NoteSearch {
            keyword: self.query.clone(),
            sort: self.sort,
            note_type: self.note_type,
            publish_time: self.note_time,
            viewed_range: self.note_range,
            distance: self.pos_distance,
            geo: Geo::from_input(&self.geo),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ExportArgs {
    /// Note URL; may be repeated
    #[arg(long = "url", required_unless_present_any = ["url_file", "query"])]
    pub urls: Vec<String>,

    /// Text file with one note URL per line
    #[arg(long)]
    pub url_file: Option<PathBuf>,

    /// Search query used to discover notes
    #[arg(long)]
    pub query: Option<String>,

    /// With --query, number of notes to export
    #[arg(long, default_value_t = 10)]
    pub num: usize,
}

/// Where the signing scripts live and what runs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerConfig {
    pub node: PathBuf,
    pub sign_script: PathBuf,
    pub trace_script: PathBuf,
}

/// Resolved configuration: validated once, immutable afterwards.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub command: Command,
    /// `None` for commands that do not need a session.
    pub credentials: Option<SessionCredentials>,
    pub transport: TransportOptions,
    pub signer: SignerConfig,
    pub out_file: Option<PathBuf>,
    pub verbose: bool,
}

impl ClientConfig {
    /// Resolves a complete configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let sources = CredentialSources::from_process(cli.cookie.clone(), cli.env_file.clone());
        Self::resolve_with(cli, &sources, &default_script_dirs())
    }

    /// Resolution with explicit credential sources and script search dirs.
    pub fn resolve_with(
        cli: CommandLineInput,
        sources: &CredentialSources,
        script_dirs: &[PathBuf],
    ) -> Result<Self, AppError> {
        if cli.timeout == 0 {
            return Err(ValidationError::EmptyField("timeout").into());
        }

        let credentials = if cli.command.requires_session() {
            Some(credentials::resolve(sources)?)
        } else {
            None
        };

        let signer = SignerConfig {
            node: cli.node,
            sign_script: cli
                .sign_script
                .unwrap_or_else(|| locate_script(script_dirs, SIGN_SCRIPT_NAME)),
            trace_script: cli
                .trace_script
                .unwrap_or_else(|| locate_script(script_dirs, TRACE_SCRIPT_NAME)),
        };

        Ok(ClientConfig {
            command: cli.command,
            credentials,
            transport: TransportOptions {
                base_url: API_BASE_URL.to_string(),
                timeout: Duration::from_secs(cli.timeout),
                use_env_proxy: !cli.no_env_proxy,
            },
            signer,
            out_file: cli.out,
            verbose: cli.verbose,
        })
    }
}

/// Executable dir first, then the working directory.
fn default_script_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    dirs
}

/// First existing `assets/js/<name>` among `dirs`, else the first candidate.
fn locate_script(dirs: &[PathBuf], name: &str) -> PathBuf {
    let candidates: Vec<PathBuf> = dirs
        .iter()
        .map(|dir| dir.join(SCRIPT_DIR).join(name))
        .collect();
    candidates
        .iter()
        .find(|path| path.is_file())
        .or_else(|| candidates.first())
        .cloned()
        .unwrap_or_else(|| Path::new(SCRIPT_DIR).join(name))
}
