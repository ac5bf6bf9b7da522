use clap::{Args, Parser, Subcommand};
use engine::DEFAULT_CATEGORY;

#[derive(Debug, Parser)]
#[command(name = "stratify")]
#[command(about = "Business ledger: team members, bills and detailed transactions")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Use an in-process store instead of Firestore (data is lost on exit).
    #[arg(long, global = true)]
    pub memory: bool,
    /// Override log level (e.g. debug).
    #[arg(long, global = true)]
    pub level: Option<String>,
    /// Override the Firestore project id.
    #[arg(long, global = true)]
    pub project_id: Option<String>,
    /// Override the Firestore REST root (e.g. an emulator).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available categories.
    Categories,
    /// Show the records of a category with their total.
    List(CategoryArgs),
    /// Add a record.
    Add(AddArgs),
    /// Edit the record at INDEX.
    Edit(EditArgs),
    /// Delete the record at INDEX.
    Delete(IndexArgs),
    /// Print the running total of a category.
    Total(CategoryArgs),
    /// Write the rendered table of a category as CSV.
    Export(ExportArgs),
    /// Send a message through the contact endpoint.
    Contact(ContactArgs),
    /// Interactive session keeping one draft across commands.
    Shell(CategoryArgs),
}

#[derive(Args, Debug)]
pub struct CategoryArgs {
    #[arg(short, long, default_value = DEFAULT_CATEGORY)]
    pub category: String,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub category: CategoryArgs,
    /// Field assignment, repeatable: `-f name=Rent -f amount=100`.
    #[arg(short = 'f', long = "field", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[command(flatten)]
    pub category: CategoryArgs,
    pub index: usize,
    #[arg(short = 'f', long = "field", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    #[command(flatten)]
    pub category: CategoryArgs,
    pub index: usize,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub category: CategoryArgs,
    /// Output file; stdout when absent.
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args, Debug)]
pub struct ContactArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub message: String,
}

pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("description=a=b").unwrap(),
            ("description".to_string(), "a=b".to_string())
        );
        assert!(parse_assignment("amount").is_err());
        assert!(parse_assignment("=5").is_err());
    }

    #[test]
    fn add_collects_repeated_fields() {
        let cli = Cli::try_parse_from([
            "stratify", "add", "-c", "bills", "-f", "name=Rent", "-f", "amount=100",
        ])
        .unwrap();
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.category.category, "bills");
                assert_eq!(args.fields.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn category_defaults_to_bills() {
        let cli = Cli::try_parse_from(["stratify", "total"]).unwrap();
        assert!(matches!(cli.command, Command::Total(args) if args.category == "bills"));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
