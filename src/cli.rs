use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "gmail-mailer",
    version,
    about = "List labels and messages, and send mail through the Gmail API"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[arg(short = 'u', long, global = true, help = "Gmail user id (default: me)")]
    pub user_id: Option<String>,
    #[arg(short = 'p', long, global = true, help = "Path to the cached OAuth token JSON")]
    pub token_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every label of the mailbox
    Labels,
    /// Resolve label names to label ids
    LabelIds(LabelIdsArgs),
    /// List and fetch messages
    Messages(MessagesArgs),
    /// Compose and send a message
    Send(SendArgs),
}

#[derive(Debug, Args)]
pub struct LabelIdsArgs {
    #[arg(required = true, num_args = 1.., help = "Label names (case-sensitive)")]
    pub names: Vec<String>,
    #[arg(long, help = "Warn about unknown labels instead of failing")]
    pub skip_missing: bool,
}

#[derive(Debug, Args)]
pub struct MessagesArgs {
    #[arg(long, help = "Gmail search query")]
    pub q: Option<String>,
    #[arg(long, action = ArgAction::Append, help = "Restrict to a label name (repeatable)")]
    pub label: Vec<String>,
    #[arg(short = 'n', long, help = "Maximum messages per listing")]
    pub count: Option<u32>,
    #[arg(long, help = "Warn about unknown labels instead of failing")]
    pub skip_missing: bool,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    #[arg(short = 's', long, help = "Email subject")]
    pub subject: String,
    #[arg(short = 'm', long, help = "UTF-8 file holding the message body")]
    pub message_file: PathBuf,
    #[arg(short = 'f', long = "from", help = "Sender address (default: profile sender)")]
    pub sender: Option<String>,
    #[arg(short = 't', long, help = "Recipient address")]
    pub to: String,
    #[arg(short = 'c', long, help = "CC address")]
    pub cc: Option<String>,
    #[arg(short = 'b', long, help = "BCC address")]
    pub bcc: Option<String>,
    #[arg(help = "Files to attach")]
    pub attachments: Vec<PathBuf>,
}
