use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use freight_lib::model::Mailbox;
use freight_lib::model::Resource;

#[derive(Parser)]
#[command(name = "freight")]
#[command(about = "Freight CRM from the terminal", long_about = None)]
pub struct Cli {
    /// API root, e.g. https://crm.example.by/api
    #[arg(long, global = true, env = "FREIGHT_API_URL")]
    pub api_url: Option<String>,

    /// Log at debug level
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long, env = "FREIGHT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Keep the session after restarts
        #[arg(long)]
        remember: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user after checking the token with the server
    Whoami,

    /// Send a password reset link
    ResetPassword { email: String },

    /// List records of a resource
    List {
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        #[arg(long)]
        search: Option<String>,
        /// One-based page
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },

    /// Delete one record
    Delete {
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Hand a client or carrier to another user (admins only)
    Reassign {
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        id: i64,
        user_id: i64,
    },

    /// Download a resource as a workbook (orders as CSV)
    Export {
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        out: PathBuf,
    },

    /// Upload a workbook into a resource
    Import {
        #[arg(value_parser = parse_resource)]
        resource: Resource,
        file: PathBuf,
    },

    /// Highlight cells, given as ROW-FIELD keys
    Highlight {
        #[arg(value_parser = parse_resource)]
        table: Resource,
        #[arg(required = true)]
        cells: Vec<String>,
        /// Palette index, see `freight palette`
        #[arg(long)]
        color: usize,
    },

    /// Remove highlights from cells, given as ROW-FIELD keys
    Unhighlight {
        #[arg(value_parser = parse_resource)]
        table: Resource,
        #[arg(required = true)]
        cells: Vec<String>,
    },

    /// Show the highlight palette
    Palette,

    /// Show the task calendar of the signed-in user
    Calendar {
        /// Month as YYYY-MM, the current one when omitted
        #[arg(long)]
        month: Option<String>,
        /// Also list the tasks of this day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<String>,
    },

    /// Move a site request through its workflow
    Requests {
        #[arg(value_enum)]
        action: RequestAction,
        id: i64,
    },

    /// Read and send mail through the CRM
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },

    /// Show or change the theme
    Theme {
        #[arg(long)]
        primary: Option<String>,
        #[arg(long)]
        sidebar: Option<String>,
        #[arg(long)]
        font_family: Option<String>,
        /// Font size in pixels
        #[arg(long)]
        font_size: Option<u16>,
        /// Back to the default theme
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum EmailCommand {
    /// List a mailbox
    List {
        /// inbox, sent or trash
        #[arg(long, default_value = "inbox", value_parser = parse_mailbox)]
        mailbox: Mailbox,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Print one message
    Show {
        id: String,
        #[arg(long, default_value = "inbox", value_parser = parse_mailbox)]
        mailbox: Mailbox,
    },
    /// Send a new message
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        /// Plain text; read from stdin when omitted
        #[arg(long)]
        body: Option<String>,
        /// Id of a stored document to attach, repeatable
        #[arg(long = "document")]
        documents: Vec<i64>,
    },
    /// Answer a message, quoting it
    Reply {
        id: String,
        /// Also answer every other recipient
        #[arg(long)]
        all: bool,
        #[arg(long)]
        body: Option<String>,
        #[arg(long, default_value = "inbox", value_parser = parse_mailbox)]
        mailbox: Mailbox,
    },
    /// Forward a message
    Forward {
        id: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long, default_value = "inbox", value_parser = parse_mailbox)]
        mailbox: Mailbox,
    },
    /// Mark or delete messages
    Mark {
        #[arg(value_enum)]
        action: MailAction,
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long, default_value = "inbox", value_parser = parse_mailbox)]
        mailbox: Mailbox,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MailAction {
    Read,
    Unread,
    Delete,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RequestAction {
    Process,
    Complete,
    Reject,
    /// Create a client from the request and take it into work
    Convert,
}

fn parse_resource(s: &str) -> Result<Resource, String> {
    s.parse()
}

fn parse_mailbox(s: &str) -> Result<Mailbox, String> {
    s.parse()
}
