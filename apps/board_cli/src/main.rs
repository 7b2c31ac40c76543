use anyhow::{anyhow, Context, Result};
use board_core::{
    projection::{project, ViewFilter},
    settings::load_settings,
    BoardClient, CommandKind, LOAD_FAILURE_TEXT, NO_ACTIVITIES_TEXT,
};
use clap::{Parser, Subcommand};
use shared::domain::{Activity, ActivityCatalog, SortKey};
use url::Url;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "name")]
        sort: SortKey,
        #[arg(long)]
        json: bool,
    },
    Signup {
        activity: String,
        email: String,
    },
    Unregister {
        activity: String,
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    let server_url = cli
        .server_url
        .unwrap_or_else(|| load_settings().server_url);
    let server_url =
        Url::parse(&server_url).with_context(|| format!("invalid server url '{server_url}'"))?;
    let client = BoardClient::new(server_url);

    match cli.command {
        Command::List {
            category,
            search,
            sort,
            json,
        } => {
            let snapshot = client.refresh_catalog().await.context(LOAD_FAILURE_TEXT)?;
            let filter = ViewFilter {
                category: category.unwrap_or_default(),
                search: search.unwrap_or_default(),
                sort,
            };
            let entries = project(&snapshot.catalog, &filter);

            if json {
                let view: ActivityCatalog = entries
                    .iter()
                    .map(|(name, activity)| (name.to_string(), (*activity).clone()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }

            if entries.is_empty() {
                println!("{NO_ACTIVITIES_TEXT}");
                return Ok(());
            }
            for (name, activity) in entries {
                print_card(name, activity);
            }
        }
        Command::Signup { activity, email } => {
            let receipt = client
                .sign_up(&activity, &email)
                .await
                .map_err(|err| anyhow!(err.user_message(CommandKind::SignUp)))?;
            println!("{}", receipt.message);
        }
        Command::Unregister { activity, email } => {
            let receipt = client
                .unregister(&activity, &email)
                .await
                .map_err(|err| anyhow!(err.user_message(CommandKind::Unregister)))?;
            println!("{}", receipt.message);
        }
    }

    Ok(())
}

fn print_card(name: &str, activity: &Activity) {
    println!("{name}");
    println!("  {}", activity.description);
    println!("  Schedule: {}", activity.schedule);
    println!("  Max Participants: {}", activity.max_participants);
    println!("  Category: {}", activity.category_label());
    if activity.participants.is_empty() {
        println!("  No participants yet");
    } else {
        println!("  Participants:");
        for participant in &activity.participants {
            println!("    - {participant}");
        }
    }
    println!();
}
