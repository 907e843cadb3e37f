use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pooja")]
#[command(about = "Keep a pooja preparation checklist from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// CLI profile name for backend and auth configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Directory holding the local checklist
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Open a shared list by code or share link
    #[arg(long, global = true, value_name = "CODE|URL")]
    pub share: Option<String>,

    /// Work on one of your saved lists (ID or unique ID prefix)
    #[arg(long, global = true, value_name = "ID")]
    pub list: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current checklist
    Show,
    /// Add an item
    Add {
        /// Item text
        text: Vec<String>,
    },
    /// Mark an item collected, or not collected again
    #[command(alias = "check")]
    Toggle {
        /// Item number or ID
        item: String,
    },
    /// Change the text of an item
    Edit {
        /// Item number or ID
        item: String,
        /// New item text
        text: Vec<String>,
    },
    /// Remove an item
    #[command(alias = "rm")]
    Delete {
        /// Item number or ID
        item: String,
    },
    /// Remove every item
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Rename the checklist
    Rename {
        /// New title
        title: Vec<String>,
    },
    /// Save the current list to your account
    Save,
    /// List your saved checklists
    Lists {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new saved checklist
    New,
    /// Delete one of your saved checklists
    RemoveList {
        /// List ID or unique ID prefix
        id: String,
    },
    /// Share the current list read-only
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },
    /// Export the current checklist
    Export {
        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,
        /// Write here instead of stdout (a directory gets a generated file name)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Start an interactive session
    Shell,
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign a profile in or out of the hosted backend
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Print a tab-completion script for your shell
    Completions {
        /// Shell to generate for
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Write here instead of stdout (a directory gets a generated file name)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for pooja_core::export::ExportFormat {
    fn from(value: ExportFormat) -> Self {
        match value {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

impl From<CompletionShell> for clap_complete::Shell {
    fn from(value: CompletionShell) -> Self {
        match value {
            CompletionShell::Bash => Self::Bash,
            CompletionShell::Zsh => Self::Zsh,
            CompletionShell::Fish => Self::Fish,
            CompletionShell::PowerShell => Self::PowerShell,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Subcommand)]
pub enum ShareCommands {
    /// Make the list public and print its share link
    On,
    /// Make the list private; the old link stops working
    Off,
    /// Print the share link of a public list
    Link,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create a profile or change its backend settings
    Init {
        /// Profile to write (defaults to the resolved profile)
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Project URL of the hosted backend
        #[arg(long, value_name = "URL")]
        supabase_url: Option<String>,
        /// Public anon key of the hosted backend
        #[arg(long, value_name = "KEY")]
        supabase_anon_key: Option<String>,
        /// Origin used when printing share links
        #[arg(long, value_name = "URL")]
        share_origin: Option<String>,
        /// Run this profile local-only, without the hosted backend
        #[arg(long, conflicts_with = "online")]
        offline: bool,
        /// Re-enable the hosted backend for this profile
        #[arg(long)]
        online: bool,
        /// Leave the active profile as it is
        #[arg(long)]
        no_activate: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password; the session goes to the OS keychain
    Login {
        /// Profile to use instead of the active one
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show who the profile is signed in as
    Status {
        /// Profile to use instead of the active one
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout {
        /// Profile to use instead of the active one
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}
