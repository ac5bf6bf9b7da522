use std::{io::Write, sync::Arc};

use api_types::contact::ContactMessage;
use engine::{DocumentStore, Ledger, MemoryStore};
use remote::{ContactClient, FirestoreStore};
use tracing::info;

use crate::{
    cli::{Command, ExportArgs},
    error::{AppError, Result},
    settings::Settings,
    shell, view,
};

type SharedStore = Arc<dyn DocumentStore>;

pub async fn run(command: Command, settings: &Settings, memory: bool) -> Result<()> {
    match command {
        Command::Categories => {
            print!("{}", view::categories(&engine::SchemaRegistry::builtin()));
        }
        Command::List(args) => {
            let ledger = open_ledger(settings, memory, &args.category).await?;
            print!("{}", view::table(&ledger));
        }
        Command::Add(args) => {
            let mut ledger = open_ledger(settings, memory, &args.category.category).await?;
            ledger.begin_create();
            let index = save_draft(&mut ledger, &args.fields).await?;
            info!(category = ledger.category(), index, "record added");
            print!("{}", view::table(&ledger));
        }
        Command::Edit(args) => {
            let mut ledger = open_ledger(settings, memory, &args.category.category).await?;
            ledger.begin_edit(args.index)?;
            let index = save_draft(&mut ledger, &args.fields).await?;
            info!(category = ledger.category(), index, "record updated");
            print!("{}", view::table(&ledger));
        }
        Command::Delete(args) => {
            let mut ledger = open_ledger(settings, memory, &args.category.category).await?;
            match ledger.delete(args.index).await? {
                Some(_) => info!(category = ledger.category(), index = args.index, "record deleted"),
                None => {
                    return Err(AppError::Usage(format!(
                        "record {} has no identifier, nothing deleted",
                        args.index
                    )));
                }
            }
            print!("{}", view::table(&ledger));
        }
        Command::Total(args) => {
            let ledger = open_ledger(settings, memory, &args.category).await?;
            println!("{}", view::total(&ledger));
        }
        Command::Export(args) => export(settings, memory, args).await?,
        Command::Contact(args) => {
            let contact = settings
                .contact
                .as_ref()
                .ok_or_else(|| AppError::Usage("contact.endpoint is not configured".to_string()))?;
            ContactClient::new(&contact.endpoint)?
                .send(&ContactMessage {
                    email: args.email,
                    message: args.message,
                })
                .await?;
            println!("message sent");
        }
        Command::Shell(args) => {
            let mut ledger = open_ledger(settings, memory, &args.category).await?;
            shell::run(&mut ledger).await?;
        }
    }
    Ok(())
}

fn open_store(settings: &Settings, memory: bool) -> Result<SharedStore> {
    if memory {
        info!("using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let mut builder = FirestoreStore::builder()
        .project_id(&settings.store.project_id)
        .api_key(settings.store.api_key.clone())
        .id_token(settings.store.id_token.clone());
    if let Some(base_url) = &settings.store.base_url {
        builder = builder.base_url(base_url);
    }
    Ok(Arc::new(builder.build()?))
}

async fn open_ledger(settings: &Settings, memory: bool, category: &str) -> Result<Ledger<SharedStore>> {
    let store = open_store(settings, memory)?;
    let mut ledger = Ledger::builder(store).category(category).build()?;
    ledger.load().await?;
    Ok(ledger)
}

/// Applies `assignments` to the open draft, validates it and submits it.
async fn save_draft<S: DocumentStore>(
    ledger: &mut Ledger<S>,
    assignments: &[(String, String)],
) -> Result<usize> {
    for (name, raw) in assignments {
        let value = view::input_value(ledger.schema(), name, raw)?;
        ledger.update_draft_field(name.clone(), value)?;
    }
    ledger.validate_draft()?;
    Ok(ledger.submit().await?)
}

async fn export(settings: &Settings, memory: bool, args: ExportArgs) -> Result<()> {
    let ledger = open_ledger(settings, memory, &args.category.category).await?;
    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    let rows = write_csv(&ledger, sink)?;
    if let Some(path) = &args.output {
        info!(category = ledger.category(), rows, path = %path, "exported");
    }
    Ok(())
}

fn write_csv<S: DocumentStore, W: Write>(ledger: &Ledger<S>, sink: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(ledger.schema().columns())?;
    let rows = ledger.rows();
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}
