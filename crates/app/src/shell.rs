//! Interactive session keeping one ledger and its draft across commands.
use engine::{DocumentStore, EditToggle, Ledger};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::{
    error::{self, AppError, Result},
    view,
};

const HELP: &str = "\
commands:
  use <category>     switch category and reload
  list               show records and total
  add                open a blank draft
  edit <index>       edit a record (again to close)
  set <field> <value...>
  show               show the open draft
  submit             validate and save the draft
  cancel             discard the draft
  delete <index>     delete a record
  total              show the running total
  reload             fetch the category again
  help
  quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Use(String),
    List,
    Add,
    Edit(usize),
    Set { field: String, value: String },
    Show,
    Submit,
    Cancel,
    Delete(usize),
    Total,
    Reload,
    Help,
    Quit,
}

pub enum Flow {
    Continue(String),
    Quit,
}

/// Parses one input line; `None` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" => return Ok(None),
        "use" => ShellCommand::Use(required(rest, "use <category>")?.to_string()),
        "list" | "ls" => ShellCommand::List,
        "add" | "new" => ShellCommand::Add,
        "edit" => ShellCommand::Edit(index(rest, "edit <index>")?),
        "set" => {
            let rest = required(rest, "set <field> <value...>")?;
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            ShellCommand::Set {
                field: field.to_string(),
                value: value.to_string(),
            }
        }
        "show" => ShellCommand::Show,
        "submit" | "save" => ShellCommand::Submit,
        "cancel" => ShellCommand::Cancel,
        "delete" | "rm" => ShellCommand::Delete(index(rest, "delete <index>")?),
        "total" => ShellCommand::Total,
        "reload" => ShellCommand::Reload,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(AppError::Usage(format!("unknown command `{other}`, try help"))),
    };
    Ok(Some(command))
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(AppError::Usage(format!("usage: {usage}")))
    } else {
        Ok(rest)
    }
}

fn index(rest: &str, usage: &str) -> Result<usize> {
    required(rest, usage)?
        .parse()
        .map_err(|_| AppError::Usage(format!("usage: {usage}")))
}

pub async fn execute<S: DocumentStore>(
    ledger: &mut Ledger<S>,
    command: ShellCommand,
) -> Result<Flow> {
    let output = match command {
        ShellCommand::Use(key) => {
            ledger.set_category(&key).await?;
            view::table(ledger)
        }
        ShellCommand::List => view::table(ledger),
        ShellCommand::Add => {
            ledger.begin_create();
            view::draft(ledger)
        }
        ShellCommand::Edit(index) => match ledger.begin_edit(index)? {
            EditToggle::Opened => view::draft(ledger),
            EditToggle::Closed => format!("closed edit of record {index}\n"),
        },
        ShellCommand::Set { field, value } => {
            let value = view::input_value(ledger.schema(), &field, &value)?;
            ledger.update_draft_field(field, value)?;
            view::draft(ledger)
        }
        ShellCommand::Show => view::draft(ledger),
        ShellCommand::Submit => {
            ledger.validate_draft()?;
            let index = ledger.submit().await?;
            format!("saved record {index}\n")
        }
        ShellCommand::Cancel => {
            ledger.cancel_edit();
            "draft discarded\n".to_string()
        }
        ShellCommand::Delete(index) => match ledger.delete(index).await? {
            Some(_) => format!("deleted record {index}\n"),
            None => format!("record {index} has no identifier, nothing deleted\n"),
        },
        ShellCommand::Total => format!("{}\n", view::total(ledger)),
        ShellCommand::Reload => {
            ledger.load().await?;
            view::table(ledger)
        }
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit => return Ok(Flow::Quit),
    };
    Ok(Flow::Continue(output))
}

/// Reads commands from stdin until `quit` or end of input. Command errors are
/// reported and the session continues.
pub async fn run<S: DocumentStore>(ledger: &mut Ledger<S>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout.write_all(view::table(ledger).as_bytes()).await?;
    loop {
        stdout
            .write_all(format!("{}> ", ledger.category()).as_bytes())
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let outcome = match parse_line(&line) {
            Ok(Some(command)) => execute(ledger, command).await,
            Ok(None) => continue,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(Flow::Continue(output)) => stdout.write_all(output.as_bytes()).await?,
            Ok(Flow::Quit) => break,
            Err(err) => {
                tracing::debug!("shell command failed: {err}");
                stdout.write_all(format!("{}\n", error::report(&err)).as_bytes()).await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use engine::{Document, FieldValue, LedgerError, MemoryStore, fields};

    use super::*;

    async fn run_line(ledger: &mut Ledger<MemoryStore>, line: &str) -> Result<String> {
        let command = parse_line(line)?.expect("command");
        match execute(ledger, command).await? {
            Flow::Continue(output) => Ok(output),
            Flow::Quit => Ok("quit".to_string()),
        }
    }

    async fn ledger() -> Ledger<MemoryStore> {
        let store = MemoryStore::new();
        store
            .seed(
                "bills",
                vec![Document {
                    id: "a".to_string(),
                    fields: fields([
                        ("name", FieldValue::from("Rent")),
                        ("description", FieldValue::from("May")),
                        ("amount", FieldValue::from(100.0)),
                    ]),
                }],
            )
            .await;
        let mut ledger = Ledger::builder(store).build().unwrap();
        ledger.load().await.unwrap();
        ledger
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(
            parse_line("set description  water and power ").unwrap(),
            Some(ShellCommand::Set {
                field: "description".to_string(),
                value: "water and power".to_string()
            })
        );
        assert_eq!(parse_line("edit 3").unwrap(), Some(ShellCommand::Edit(3)));
        assert_eq!(
            parse_line("use team-members").unwrap(),
            Some(ShellCommand::Use("team-members".to_string()))
        );
        assert!(parse_line("edit x").is_err());
        assert!(parse_line("delete").is_err());
        assert!(parse_line("frobnicate").is_err());
    }

    #[tokio::test]
    async fn add_set_submit_updates_total() {
        let mut ledger = ledger().await;
        run_line(&mut ledger, "add").await.unwrap();
        run_line(&mut ledger, "set name Water").await.unwrap();
        run_line(&mut ledger, "set description Utility").await.unwrap();
        run_line(&mut ledger, "set amount 50").await.unwrap();
        assert_eq!(run_line(&mut ledger, "submit").await.unwrap(), "saved record 1\n");

        assert!(ledger.session().is_idle());
        assert_eq!(
            run_line(&mut ledger, "total").await.unwrap(),
            "Bill Tracker: $150.00\n"
        );
        assert_eq!(ledger.store().documents("bills").await.len(), 2);
    }

    #[tokio::test]
    async fn submit_rejects_invalid_draft_and_keeps_it() {
        let mut ledger = ledger().await;
        run_line(&mut ledger, "add").await.unwrap();
        run_line(&mut ledger, "set name Water").await.unwrap();

        let err = run_line(&mut ledger, "submit").await.unwrap_err();
        assert!(matches!(err, AppError::Ledger(LedgerError::Validation(_))));
        assert!(ledger.session().draft().is_some());
        assert_eq!(ledger.records().len(), 1);
    }

    #[tokio::test]
    async fn edit_toggles_and_set_needs_draft() {
        let mut ledger = ledger().await;
        let err = run_line(&mut ledger, "set name X").await.unwrap_err();
        assert!(matches!(err, AppError::Ledger(LedgerError::NoDraft)));

        assert!(run_line(&mut ledger, "edit 0").await.unwrap().starts_with("editing record 0"));
        assert_eq!(
            run_line(&mut ledger, "edit 0").await.unwrap(),
            "closed edit of record 0\n"
        );
        assert!(ledger.session().is_idle());
    }

    #[tokio::test]
    async fn use_switches_category_and_delete_removes() {
        let mut ledger = ledger().await;
        run_line(&mut ledger, "delete 0").await.unwrap();
        assert!(ledger.records().is_empty());

        let out = run_line(&mut ledger, "use team-members").await.unwrap();
        assert!(out.starts_with("User Management\n"));
        assert_eq!(ledger.category(), "team-members");

        let err = run_line(&mut ledger, "use payroll").await.unwrap_err();
        assert!(matches!(err, AppError::Ledger(LedgerError::UnknownCategory(_))));
        assert_eq!(ledger.category(), "team-members");
        assert_eq!(run_line(&mut ledger, "quit").await.unwrap(), "quit");
    }
}
