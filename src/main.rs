use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use school_invoice::config::{self, config_dir, load_config, load_draft, save_draft};
use school_invoice::{
    coerce_number, compute_total, discounted_value, present_for_print, render, Config, Draft,
    InvoiceError, InvoiceSnapshot, ItemEdit, LineItem, PrintHost, Result, StudentInfo,
    SystemBrowser,
};

#[derive(Parser)]
#[command(name = "school-invoice")]
#[command(version, about = "Student invoice builder with printable HTML output", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config or ~/.school-invoice)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Set student details (an empty value clears the field)
    Student {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        phone: Option<String>,
    },

    /// Add a line item
    AddItem {
        #[command(flatten)]
        fields: ItemFields,
    },

    /// Change fields of a line item
    UpdateItem {
        /// Item id as shown by 'show'
        id: u64,

        #[command(flatten)]
        fields: ItemFields,
    },

    /// Remove a line item (the last item cannot be removed)
    RemoveItem {
        /// Item id as shown by 'show'
        id: u64,
    },

    /// Set the remark printed under the items table
    Remark {
        /// Remark text for this invoice
        #[arg(required_unless_present = "reset")]
        text: Option<String>,

        /// Go back to the school's default remark
        #[arg(long, conflicts_with = "text")]
        reset: bool,
    },

    /// Preview the invoice being prepared
    Show {
        /// Print the preview as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the invoice to an HTML file (stdout by default)
    Render {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the rendered file with the system browser
        #[arg(long, requires = "output")]
        open: bool,
    },

    /// Render the invoice and send it to the browser's print dialog
    Print,
}

#[derive(clap::Args)]
struct ItemFields {
    /// Course or service description
    #[arg(short, long)]
    description: Option<String>,

    /// Discount in percent (non-numeric values count as 0)
    #[arg(long, allow_hyphen_values = true)]
    discount: Option<String>,

    /// Amount (non-numeric values count as 0)
    #[arg(short, long, allow_hyphen_values = true)]
    amount: Option<String>,
}

impl ItemFields {
    fn to_edit(&self) -> ItemEdit {
        ItemEdit {
            description: self.description.clone(),
            discount: self.discount.as_deref().map(coerce_number),
            amount: self.amount.as_deref().map(coerce_number),
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Student { name, email, phone } => cmd_student(&cfg_dir, name, email, phone),
        Commands::AddItem { fields } => cmd_add_item(&cfg_dir, &fields),
        Commands::UpdateItem { id, fields } => cmd_update_item(&cfg_dir, id, &fields),
        Commands::RemoveItem { id } => cmd_remove_item(&cfg_dir, id),
        Commands::Remark { text, reset } => cmd_remark(&cfg_dir, text, reset),
        Commands::Show { json } => cmd_show(&cfg_dir, json),
        Commands::Render { output, open } => cmd_render(&cfg_dir, output, open),
        Commands::Print => cmd_print(&cfg_dir),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    config::init_config_dir(cfg_dir)?;

    println!("Initialized school-invoice config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your school details:   $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Fill in the student:        school-invoice student --name <name>");
    println!("  3. Add course items:           school-invoice add-item -d <text> -a <amount>");
    println!();
    println!("Then preview and print:");
    println!("  school-invoice show");
    println!("  school-invoice print");

    Ok(())
}

/// Empty strings clear a field
fn field_value(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn cmd_student(
    cfg_dir: &Path,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
) -> Result<()> {
    let mut draft = load_draft(cfg_dir)?;

    if name.is_none() && email.is_none() && phone.is_none() {
        print_student(&draft.student, "(not set)");
        return Ok(());
    }

    if let Some(name) = name {
        draft.student.name = field_value(name);
    }
    if let Some(email) = email {
        draft.student.email = field_value(email);
    }
    if let Some(phone) = phone {
        draft.student.phone = field_value(phone);
    }

    save_draft(cfg_dir, &draft)?;
    println!("Updated student details");
    print_student(&draft.student, "(not set)");
    Ok(())
}

fn print_student(student: &StudentInfo, missing: &str) {
    println!("  Name:  {}", student.name().unwrap_or(missing));
    println!("  Email: {}", student.email().unwrap_or(missing));
    println!("  Phone: {}", student.phone().unwrap_or(missing));
}

fn cmd_add_item(cfg_dir: &Path, fields: &ItemFields) -> Result<()> {
    let mut draft = load_draft(cfg_dir)?;

    let (items, id) = draft.items.add();
    draft.items = items.update(id, &fields.to_edit())?;
    save_draft(cfg_dir, &draft)?;

    println!("Added item #{id}");
    Ok(())
}

fn cmd_update_item(cfg_dir: &Path, id: u64, fields: &ItemFields) -> Result<()> {
    let mut draft = load_draft(cfg_dir)?;
    let edit = fields.to_edit();

    if edit.is_empty() {
        // still reject unknown ids
        draft.items.update(id, &edit)?;
        println!("Nothing to update. Use --description, --discount or --amount.");
        return Ok(());
    }

    draft.items = draft.items.update(id, &edit)?;
    save_draft(cfg_dir, &draft)?;

    println!("Updated item #{id}");
    Ok(())
}

fn cmd_remove_item(cfg_dir: &Path, id: u64) -> Result<()> {
    let mut draft = load_draft(cfg_dir)?;

    draft.items = draft.items.remove(id)?;
    save_draft(cfg_dir, &draft)?;

    println!("Removed item #{id} ({} left)", draft.items.len());
    Ok(())
}

fn cmd_remark(cfg_dir: &Path, text: Option<String>, reset: bool) -> Result<()> {
    let mut draft = load_draft(cfg_dir)?;

    draft.remark = if reset { None } else { text.and_then(field_value) };
    save_draft(cfg_dir, &draft)?;

    match &draft.remark {
        Some(remark) => println!("Remark set: {remark}"),
        None => println!("Remark reset to the school default"),
    }
    Ok(())
}

// Table row struct for tabled
#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "NO")]
    no: usize,
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "DISCOUNT")]
    discount: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "NET")]
    net: String,
}

#[derive(Serialize)]
struct Preview<'a> {
    student: &'a StudentInfo,
    items: &'a [LineItem],
    remark: &'a str,
    total: f64,
    ready: bool,
    problems: Vec<String>,
}

/// Live preview of the draft, including anything that would block printing
fn cmd_show(cfg_dir: &Path, json: bool) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let draft = load_draft(cfg_dir)?;

    let total = compute_total(&draft.items);
    let problems: Vec<String> = match draft.student.validate(&config.validation) {
        Ok(()) => Vec::new(),
        Err(InvoiceError::Validation(errors)) => {
            errors.iter().map(ToString::to_string).collect()
        }
        Err(e) => return Err(e),
    };

    if json {
        let preview = Preview {
            student: &draft.student,
            items: draft.items.as_slice(),
            remark: draft.remark_or(&config.school.remark),
            total,
            ready: problems.is_empty(),
            problems,
        };
        let out = serde_json::to_string_pretty(&preview)?;
        println!("{out}");
        return Ok(());
    }

    let symbol = &config.invoice.currency_symbol;

    println!("Student");
    print_student(&draft.student, &config.invoice.placeholder);
    println!();

    let rows: Vec<ItemRow> = draft
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| ItemRow {
            no: i + 1,
            id: item.id,
            description: item.description.clone(),
            discount: format!("{}%", item.discount),
            amount: format!("{symbol}{:.2}", item.amount),
            net: format!("{symbol}{:.2}", discounted_value(item)),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!("Total:  {symbol}{total:.2}");
    println!("Remark: {}", draft.remark_or(&config.school.remark));

    if !problems.is_empty() {
        println!();
        println!("Not ready to print:");
        for problem in &problems {
            println!("  - {problem}");
        }
    }

    Ok(())
}

/// Validate the draft and render it with today's date
fn render_draft(cfg_dir: &Path) -> Result<(Config, Draft, String)> {
    let config = load_config(cfg_dir)?;
    let draft = load_draft(cfg_dir)?;

    let today = chrono::Local::now().date_naive();
    let snapshot = InvoiceSnapshot::capture(&draft, &config, today)?;
    tracing::info!(
        items = snapshot.items.len(),
        total = snapshot.total,
        "rendering invoice"
    );
    let html = render(&snapshot);

    Ok((config, draft, html))
}

fn cmd_render(cfg_dir: &Path, output: Option<PathBuf>, open: bool) -> Result<()> {
    let (config, draft, html) = render_draft(cfg_dir)?;

    let Some(path) = output else {
        print!("{html}");
        return Ok(());
    };

    std::fs::write(&path, &html)?;

    let total = compute_total(&draft.items);
    println!("Rendered invoice");
    println!("  Items:  {}", draft.items.len());
    println!("  Total:  {}{:.2}", config.invoice.currency_symbol, total);
    println!("  Saved:  {}", path.display());

    if open {
        SystemBrowser.present(&path)?;
    }

    Ok(())
}

fn cmd_print(cfg_dir: &Path) -> Result<()> {
    let (config, _, html) = render_draft(cfg_dir)?;

    let grace = Duration::from_millis(config.print.cleanup_delay_ms);
    present_for_print(&SystemBrowser, &html, grace)?;

    println!("Sent invoice to the print dialog");
    Ok(())
}
