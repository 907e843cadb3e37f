//! Interactive session: one controller kept alive across commands.

use std::io::{self, BufRead, Write};

use pooja_core::controller::{Action, AppState, Controller};
use pooja_core::export::render_list_export;
use pooja_core::gateway::ListGateway;
use pooja_core::local::LocalStore;

use crate::cli::{ExportFormat, ShareCommands};
use crate::commands::items::{
    add_item, clear_items, delete_item, edit_item, is_yes, rename_list, toggle_item,
};
use crate::commands::lists::{browse_lists, open_list, remove_list};
use crate::commands::share::{set_sharing, share_link, share_status};
use crate::error::CliError;
use crate::render::render_checklist;
use crate::session::Session;

pub const HELP: &str = "\
Commands:
  show                   show the checklist
  add <text>             add an item
  toggle <n|id>          mark an item collected or not
  edit <n|id> <text>     change an item's text
  delete <n|id>          remove an item
  clear                  remove every item (asks first)
  rename <title>         rename the checklist
  save                   save the list to your account
  lists                  browse your saved lists
  open <id>              open one of your lists
  new                    create a new saved list
  remove-list <id>       delete one of your lists
  close                  leave the list browser
  share on|off|link      share the list read-only
  export [json|markdown] print the checklist for export
  logout                 sign out and return to the local list
  help                   show this help
  quit                   leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Show,
    Add(String),
    Toggle(String),
    Edit { item: String, text: String },
    Delete(String),
    Clear,
    Rename(String),
    Save,
    Lists,
    Open(String),
    New,
    RemoveList(String),
    Close,
    Share(ShareCommands),
    Export(ExportFormat),
    Logout,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line; `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, CliError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));

        let command = match name.to_ascii_lowercase().as_str() {
            "show" | "ls" => Self::Show,
            "add" | "a" => Self::Add(rest.to_string()),
            "toggle" | "check" | "x" => Self::Toggle(required_item(rest)?),
            "edit" => {
                let (item, text) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CliError::EmptyText)?;
                Self::Edit {
                    item: item.to_string(),
                    text: required(text, CliError::EmptyText)?,
                }
            }
            "delete" | "rm" => Self::Delete(required_item(rest)?),
            "clear" => Self::Clear,
            "rename" | "title" => Self::Rename(required(rest, CliError::EmptyTitle)?),
            "save" => Self::Save,
            "lists" => Self::Lists,
            "open" => Self::Open(required(rest, CliError::ListNotFound(String::new()))?),
            "new" => Self::New,
            "remove-list" => {
                Self::RemoveList(required(rest, CliError::ListNotFound(String::new()))?)
            }
            "close" | "back" => Self::Close,
            "share" => Self::Share(match rest.to_ascii_lowercase().as_str() {
                "on" => ShareCommands::On,
                "off" => ShareCommands::Off,
                "" | "link" => ShareCommands::Link,
                other => return Err(CliError::UnknownCommand(format!("share {other}"))),
            }),
            "export" => Self::Export(match rest.to_ascii_lowercase().as_str() {
                "" | "md" | "markdown" => ExportFormat::Markdown,
                "json" => ExportFormat::Json,
                other => return Err(CliError::UnknownCommand(format!("export {other}"))),
            }),
            "logout" => Self::Logout,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn required(value: &str, missing: CliError) -> Result<String, CliError> {
    let value = value.trim();
    if value.is_empty() {
        Err(missing)
    } else {
        Ok(value.to_string())
    }
}

fn required_item(value: &str) -> Result<String, CliError> {
    required(value, CliError::ItemNotFound(String::new()))
}

/// What the loop should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    Print(String),
    Logout,
    Quit,
}

/// The owned list differs from what was last saved.
pub fn has_unsaved_changes(state: &AppState) -> bool {
    state.is_owned_list()
        && state
            .current_list
            .as_ref()
            .is_some_and(|list| list.title != state.title || list.items != state.items)
}

fn rendered(state: &AppState) -> ShellOutcome {
    ShellOutcome::Print(render_checklist(state))
}

pub async fn execute<G: ListGateway, L: LocalStore>(
    controller: &mut Controller<G, L>,
    command: ShellCommand,
    share_origin: Option<&str>,
    confirm: impl FnOnce(usize) -> Result<bool, CliError>,
) -> Result<ShellOutcome, CliError> {
    let outcome = match command {
        ShellCommand::Show => rendered(controller.state()),
        ShellCommand::Add(text) => {
            add_item(controller, &[text]).await?;
            rendered(controller.state())
        }
        ShellCommand::Toggle(item) => {
            toggle_item(controller, &item).await?;
            rendered(controller.state())
        }
        ShellCommand::Edit { item, text } => {
            edit_item(controller, &item, &[text]).await?;
            rendered(controller.state())
        }
        ShellCommand::Delete(item) => {
            delete_item(controller, &item).await?;
            rendered(controller.state())
        }
        ShellCommand::Clear => {
            if clear_items(controller, confirm).await? {
                rendered(controller.state())
            } else {
                ShellOutcome::Print("Nothing cleared.".to_string())
            }
        }
        ShellCommand::Rename(title) => {
            rename_list(controller, &[title]).await?;
            rendered(controller.state())
        }
        ShellCommand::Save => {
            controller.dispatch(Action::Save).await?;
            ShellOutcome::Print(format!("Saved '{}'", controller.state().title))
        }
        ShellCommand::Lists => {
            browse_lists(controller).await?;
            rendered(controller.state())
        }
        ShellCommand::Open(query) => {
            open_list(controller, &query).await?;
            rendered(controller.state())
        }
        ShellCommand::New => {
            controller.dispatch(Action::CreateList).await?;
            rendered(controller.state())
        }
        ShellCommand::RemoveList(query) => {
            let title = remove_list(controller, &query).await?;
            ShellOutcome::Print(format!("Deleted list '{title}'"))
        }
        ShellCommand::Close => {
            controller.dispatch(Action::CloseListBrowser).await?;
            rendered(controller.state())
        }
        ShellCommand::Share(ShareCommands::Link) => {
            ShellOutcome::Print(share_link(controller, share_origin)?)
        }
        ShellCommand::Share(toggle) => {
            set_sharing(controller, toggle == ShareCommands::On).await?;
            ShellOutcome::Print(share_status(controller, share_origin)?)
        }
        ShellCommand::Export(format) => {
            let state = controller.state();
            ShellOutcome::Print(render_list_export(&state.title, &state.items, format.into())?)
        }
        ShellCommand::Logout => ShellOutcome::Logout,
        ShellCommand::Help => ShellOutcome::Print(HELP.to_string()),
        ShellCommand::Quit => ShellOutcome::Quit,
    };
    Ok(outcome)
}

pub async fn run_shell(session: &mut Session) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    let mut quit_warned = false;

    write!(stdout, "{}", render_checklist(session.controller.state()))?;
    writeln!(stdout, "Type `help` for commands.")?;

    loop {
        write!(stdout, "pooja> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            break;
        }

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                eprintln!("Error: {error}");
                continue;
            }
        };

        let confirm = |count: usize| -> Result<bool, CliError> {
            write!(stdout, "Clear all {count} items? [y/N] ")?;
            stdout.flush()?;
            let mut answer = String::new();
            input.read_line(&mut answer)?;
            Ok(is_yes(&answer))
        };
        let share_origin = session.share_origin.clone();
        let result = execute(
            &mut session.controller,
            command,
            share_origin.as_deref(),
            confirm,
        )
        .await;

        match result {
            Ok(ShellOutcome::Print(text)) => {
                quit_warned = false;
                writeln!(stdout, "{}", text.trim_end())?;
            }
            Ok(ShellOutcome::Logout) => {
                if session.is_signed_in() {
                    session.sign_out().await?;
                    writeln!(stdout, "Signed out of profile '{}'.", session.profile_name)?;
                } else {
                    writeln!(stdout, "Not signed in.")?;
                }
                write!(stdout, "{}", render_checklist(session.controller.state()))?;
            }
            Ok(ShellOutcome::Quit) => {
                if has_unsaved_changes(session.controller.state()) && !quit_warned {
                    quit_warned = true;
                    writeln!(
                        stdout,
                        "'{}' has unsaved changes. Type `save`, or `quit` again to leave.",
                        session.controller.state().title
                    )?;
                    continue;
                }
                break;
            }
            Err(error) => eprintln!("Error: {error}"),
        }
    }

    Ok(())
}
