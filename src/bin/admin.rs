//! Administrative console. Talks to the database directly and deliberately
//! bypasses the API access gate; run it where the database is trusted.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trade_network_api::storage::{self, contacts, employees, nodes, products};
use trade_network_api::NetworkService;

#[derive(Parser)]
#[command(name = "admin", about = "Trade network administrative console")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List network nodes, searchable by name or contact city.
    Nodes {
        /// Substring match on node name or contact city.
        #[arg(long)]
        search: Option<String>,
        /// Exact filter on the contact's country.
        #[arg(long)]
        country: Option<String>,
        /// Exact filter on the contact's city.
        #[arg(long)]
        city: Option<String>,
    },
    /// List contacts, searchable by email, country or city.
    Contacts {
        #[arg(long)]
        search: Option<String>,
    },
    /// List products, searchable by name or model.
    Products {
        #[arg(long)]
        search: Option<String>,
    },
    /// Reset the supplier debt of the selected nodes to 0.
    ClearDebt {
        /// Node ids to clear.
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Manage employee accounts (API callers).
    #[command(subcommand)]
    Employee(EmployeeCommand),
}

#[derive(Subcommand)]
enum EmployeeCommand {
    List,
    /// Provision an account with an API token.
    Add {
        username: String,
        token: String,
        /// Create the account in the inactive state.
        #[arg(long)]
        inactive: bool,
    },
    Activate {
        username: String,
    },
    Deactivate {
        username: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let pool = storage::connect_pool().await?;

    match cli.command {
        Command::Nodes { search, country, city } => {
            let listed = nodes::admin_search(
                &pool,
                search.as_deref(),
                country.as_deref(),
                city.as_deref(),
            )
            .await?;
            println!("{:>5}  {:<30} {:<10} {:>9} {:>12}  {}", "id", "name", "level", "supplier", "debt", "contact");
            for node in listed {
                println!(
                    "{:>5}  {:<30} {:<10} {:>9} {:>12}  {} ({}, {})",
                    node.id,
                    node.name,
                    format!("{:?}", node.level),
                    node.supplier.map_or("-".to_string(), |s| s.to_string()),
                    node.debt,
                    node.contact.email,
                    node.contact.country,
                    node.contact.city,
                );
            }
        }
        Command::Contacts { search } => {
            for contact in contacts::search(&pool, search.as_deref()).await? {
                println!(
                    "{:>5}  {} - {} - {} - {} - {}",
                    contact.id,
                    contact.email,
                    contact.country,
                    contact.city,
                    contact.street,
                    contact.building_number,
                );
            }
        }
        Command::Products { search } => {
            for product in products::search(&pool, search.as_deref()).await? {
                println!(
                    "{:>5}  {} - {} - {} (node {})",
                    product.id, product.name, product.model, product.market_date, product.network_node,
                );
            }
        }
        Command::ClearDebt { ids } => {
            let cleared = NetworkService::new(pool).clear_debt(&ids).await?;
            println!("cleared debt on {cleared} node(s)");
        }
        Command::Employee(cmd) => match cmd {
            EmployeeCommand::List => {
                for employee in employees::list(&pool).await? {
                    println!(
                        "{:>5}  {:<20} {}",
                        employee.id,
                        employee.username,
                        if employee.is_active { "active" } else { "inactive" },
                    );
                }
            }
            EmployeeCommand::Add { username, token, inactive } => {
                let employee = employees::create(&pool, &username, &token, !inactive).await?;
                println!("created employee {} (id {})", employee.username, employee.id);
            }
            EmployeeCommand::Activate { username } => {
                if employees::set_active(&pool, &username, true).await? == 0 {
                    anyhow::bail!("no employee named '{username}'");
                }
                println!("activated {username}");
            }
            EmployeeCommand::Deactivate { username } => {
                if employees::set_active(&pool, &username, false).await? == 0 {
                    anyhow::bail!("no employee named '{username}'");
                }
                println!("deactivated {username}");
            }
        },
    }

    Ok(())
}
