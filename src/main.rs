use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use estate_pilot::api::ApiClient;
use estate_pilot::config::AppConfig;
use estate_pilot::contact::{ContactDialog, SubmitOutcome};
use estate_pilot::listing::{
    property_type_choice, LandingView, PropertyDetailView, PropertyListView, SortKey, PROPERTY_TYPES,
};
use estate_pilot::models::{format_price, PropertyRecord};
use estate_pilot::telemetry;
use estate_pilot::theme::{BodyClasses, FilePreferenceStore, StaticColorScheme, ThemeController};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "estate-pilot",
    about = "Browse listings, register interest and manage the theme preference",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the featured listings from the landing page
    Featured,
    /// List properties with optional filtering and sorting
    List(ListArgs),
    /// Show a single property
    Show {
        /// Property id
        id: String,
    },
    /// Run a server-side search
    Search {
        term: String,
    },
    /// Register interest in a property
    Contact(ContactArgs),
    /// Show or change the light/dark theme preference
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Match against city, district or property type
    #[arg(long, default_value = "")]
    search: String,
    /// Only this property type (all, apartment, villa, office, land)
    #[arg(long = "type")]
    property_type: Option<String>,
    /// newest, price_asc, price_desc or area_desc
    #[arg(long, default_value = "newest")]
    sort: String,
}

#[derive(Args, Debug)]
struct ContactArgs {
    property_id: i64,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    confirm_phone: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    confirm_email: String,
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    /// Print the current theme
    Show,
    /// Flip between light and dark
    Toggle,
    /// Choose a theme explicitly
    Set { mode: ThemeMode },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeMode {
    Dark,
    Light,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.telemetry).context("Failed to initialise logging")?;

    match cli.command {
        Command::Featured => featured(&config).await,
        Command::List(args) => list(&config, args).await,
        Command::Show { id } => show(&config, &id).await,
        Command::Search { term } => search(&config, &term).await,
        Command::Contact(args) => contact(&config, args).await,
        Command::Theme { command } => theme(&config, command),
    }
}

async fn featured(config: &AppConfig) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.api)?;
    let mut view = LandingView::default();
    view.load(&client).await;
    if let Some(error) = view.error() {
        bail!("{}", error);
    }

    print_records(view.featured_preview());
    Ok(())
}

async fn list(config: &AppConfig, args: ListArgs) -> anyhow::Result<()> {
    let selected_type = match args.property_type.as_deref() {
        None => None,
        Some(input) => match property_type_choice(input) {
            Some(choice) => choice.map(str::to_string),
            None => {
                let allowed: Vec<&str> = PROPERTY_TYPES
                    .iter()
                    .map(|(_, value)| value.unwrap_or("all"))
                    .collect();
                bail!(
                    "Unknown property type '{}', expected one of: {}",
                    input,
                    allowed.join(", ")
                );
            }
        },
    };

    let client = ApiClient::new(&config.api)?;
    let mut view = PropertyListView::new();
    view.filter.search_query = args.search;
    view.filter.selected_type = selected_type;
    view.filter.sort_key = args.sort.parse::<SortKey>().unwrap_or_default();

    view.load(&client).await;
    if let Some(error) = view.error() {
        bail!("{}", error);
    }

    let filtered = view.filtered();
    info!(
        "Showing {} of {} properties ({})",
        filtered.len(),
        view.properties().len(),
        view.filter.sort_key.label()
    );
    print_records(&filtered);
    Ok(())
}

async fn search(config: &AppConfig, term: &str) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.api)?;
    let mut view = PropertyListView::new();
    view.search(&client, term).await;
    if let Some(error) = view.error() {
        bail!("{}", error);
    }

    print_records(view.properties());
    Ok(())
}

async fn show(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.api)?;
    let mut view = PropertyDetailView::default();
    view.open(&client, id).await;
    if let Some(error) = view.error() {
        bail!("{}", error);
    }

    if let Some(property) = view.property() {
        let record = &property.record;
        println!("#{} {} in {}", record.id, record.property_type, record.district);
        println!("   {}", property.full_address());
        println!("   {} · {} m² · {:?}", property.formatted_price(), record.area, record.severity());
        println!(
            "   {} rooms, {} bathrooms, floor {}",
            property.rooms, property.bathrooms, property.floor_number
        );
        if !property.finishing_type.is_empty() {
            println!("   Finishing: {}", property.finishing_type);
        }
    }
    Ok(())
}

async fn contact(config: &AppConfig, args: ContactArgs) -> anyhow::Result<()> {
    let client = ApiClient::new(&config.api)?;
    let mut dialog = ContactDialog::new(args.property_id);
    dialog.show();
    dialog.form.name = args.name;
    dialog.form.phone = args.phone;
    dialog.form.confirm_phone = args.confirm_phone;
    dialog.form.email = args.email;
    dialog.form.confirm_email = args.confirm_email;

    match dialog.submit(&client).await {
        SubmitOutcome::Sent(notification) => {
            println!("{} {}", notification.summary, notification.detail);
            Ok(())
        }
        SubmitOutcome::Failed(notification) => bail!("{}", notification.detail),
        SubmitOutcome::Invalid => {
            let errors = dialog.form.validate();
            for (field, field_errors) in &errors.fields {
                let names: Vec<&str> = field_errors.iter().collect();
                eprintln!("{}: {}", field, names.join(", "));
            }
            bail!("Contact form is invalid")
        }
    }
}

fn theme(config: &AppConfig, command: ThemeCommand) -> anyhow::Result<()> {
    let store = Arc::new(FilePreferenceStore::new(&config.preferences.path));
    let signal = StaticColorScheme::new(config.preferences.prefers_dark);
    let body = BodyClasses::new();
    let controller = ThemeController::initialize(store, &signal, Arc::new(body.clone()));

    match command {
        ThemeCommand::Show => {}
        ThemeCommand::Toggle => {
            controller.toggle();
        }
        ThemeCommand::Set { mode } => controller.set_explicit(matches!(mode, ThemeMode::Dark)),
    }

    let classes: Vec<String> = body.snapshot().into_iter().collect();
    println!(
        "{} ({:?}) body classes: [{}]",
        if controller.is_dark() { "dark" } else { "light" },
        controller.origin(),
        classes.join(" ")
    );
    println!("{} [{}]", controller.toggle_label(), controller.toggle_icon());
    if !controller.is_persisted() {
        bail!(
            "Theme preference could not be saved to {}",
            config.preferences.path.display()
        );
    }
    controller.shutdown();
    Ok(())
}

fn print_records(records: &[PropertyRecord]) {
    for (i, property) in records.iter().enumerate() {
        println!(
            "{}. {} in {}, {} ({})",
            i + 1,
            property.property_type,
            property.district,
            property.city,
            format_price(property.price)
        );
        println!("   {} m² · {}", property.area, property.status);
        println!("   ID: {}", property.id);
        println!();
    }
}
