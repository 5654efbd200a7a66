use anyhow::{Context, Result, bail};
use booking_quote::{
    clients::{COLLECTION_LISTINGS, DocumentStore, fs::FsDocumentStore, memory::StaticAuth},
    config::Settings,
    handlers::{
        listing_edit::{handle_listing_publish, handle_listing_update},
        quote::handle_quote,
    },
    models::listing::{FIELD_PRICE, Listing},
};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value, json};
use tracing::info;

fn init_tracing() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
}

#[derive(Parser)]
#[command(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Args {
    #[arg(long, help = "(Optional) Sets the config file path.", required = false)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Prints the quote for a price and participant count.
    Quote {
        #[arg(long, help = "Unit price, as entered on the listing.")]
        price: String,

        #[arg(long, help = "Requested participant count.", default_value_t = 1)]
        quantity: i64,

        #[arg(long, help = "(Optional) Participant cap, defaults to the configured maximum.")]
        max_participants: Option<u32>,

        #[arg(long, help = "(Optional) Overrides the configured tax rate.")]
        tax_rate: Option<f64>,
    },

    /// Host-side listing edits against a local document directory.
    Listing {
        #[arg(long, help = "Adds the document store directory.", required = true)]
        store: String,

        #[arg(long, help = "Acts as this host user id.", required = true)]
        user: String,

        #[command(subcommand)]
        action: ListingAction,
    },
}

#[derive(Subcommand)]
pub enum ListingAction {
    Show { id: String },
    Set {
        id: String,
        #[arg(long, help = "JSON object patch; null values clear fields.")]
        patch: String,
    },
    Publish { id: String },
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn listing_json(listing: &Listing) -> Value {
    json!({ "id": listing.id, "listing": Value::Object(listing.fields.clone()) })
}

async fn run_listing(store: FsDocumentStore, user: String, action: ListingAction) -> Result<()> {
    let auth = StaticAuth::signed_in(&user, None);

    match action {
        ListingAction::Show { id } => {
            let doc = store
                .get(COLLECTION_LISTINGS, &id)
                .await?
                .with_context(|| format!("listing {id} not found in {}", store.root().display()))?;
            print_json(&listing_json(&Listing::from_document(id, doc)))
        }
        ListingAction::Set { id, patch } => {
            let patch: Map<String, Value> = match serde_json::from_str::<Value>(&patch)? {
                Value::Object(patch) => patch,
                _ => bail!("--patch must be a JSON object"),
            };
            let listing = handle_listing_update(&store, &auth, &id, patch).await?;
            print_json(&listing_json(&listing))
        }
        ListingAction::Publish { id } => {
            let listing = handle_listing_publish(&store, &auth, &id).await?;
            print_json(&listing_json(&listing))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let settings = Settings::load(&args.config)?;

    info!("Starting");

    match args.command {
        Command::Quote {
            price,
            quantity,
            max_participants,
            tax_rate,
        } => {
            let settings = match tax_rate {
                Some(rate) => settings.with_tax_rate(rate)?,
                None => settings,
            };
            let settings = match max_participants {
                Some(max) => settings.with_max_participants(max),
                None => settings,
            };

            let mut fields = Map::new();
            fields.insert(FIELD_PRICE.to_string(), Value::String(price));
            let listing = Listing::from_document("cli", fields);

            let priced = handle_quote(&listing, quantity, &settings);
            print_json(&json!({
                "quantity": priced.quantity,
                "quote": priced.quote,
                "displayTotal": priced.quote.display_total_string(),
                "currency": settings.currency,
            }))
        }
        Command::Listing {
            store,
            user,
            action,
        } => run_listing(FsDocumentStore::new(store), user, action).await,
    }
}
