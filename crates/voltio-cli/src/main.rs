use clap::{Parser, Subcommand};
use uuid::Uuid;

use voltio_core::{progress_percent, OrderStatus};
use voltio_db::{CatalogSeed, CategorySeed, ProductSeed};

#[derive(Debug, Parser)]
#[command(name = "voltio-cli")]
#[command(about = "Voltio storefront admin tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Upsert the demo catalog into the database.
    Seed,
    /// List the full catalog, including out-of-stock products.
    Products,
    /// Order management.
    Orders {
        #[command(subcommand)]
        command: OrderCommands,
    },
}

#[derive(Debug, Subcommand)]
enum OrderCommands {
    /// List recent orders, newest first.
    List {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Move an order to a new lifecycle status.
    SetStatus { order_id: Uuid, status: OrderStatus },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let pool = voltio_db::connect_pool_from_env().await?;
    voltio_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Seed => {
            let count = voltio_db::seed_catalog(&pool, &demo_catalog()).await?;
            println!("seeded {count} products");
        }
        Commands::Products => {
            let products = voltio_db::list_all_products(&pool).await?;
            for p in &products {
                println!(
                    "{:>4}  {:<40}  ${:>9}  stock {:>3}  {}",
                    p.id,
                    p.name,
                    p.price,
                    p.stock,
                    p.category_name.as_deref().unwrap_or("-"),
                );
            }
            println!("{} product(s)", products.len());
        }
        Commands::Orders { command } => match command {
            OrderCommands::List { limit } => {
                let orders = voltio_db::list_recent_orders(&pool, limit.clamp(1, 200)).await?;
                if orders.is_empty() {
                    println!("no orders");
                }
                for order in orders {
                    let progress = order.order.status().map(progress_percent).unwrap_or(0);
                    println!(
                        "{}  {:>10}  {:>3}%  ${}  {} item(s)  {}",
                        order.order.id,
                        order.order.status,
                        progress,
                        order.order.total,
                        order.items.len(),
                        order.order.created_at.format("%Y-%m-%d %H:%M"),
                    );
                }
            }
            OrderCommands::SetStatus { order_id, status } => {
                let order = voltio_db::update_order_status(&pool, order_id, status).await?;
                println!("order {} is now {}", order.id, order.status);
            }
        },
    }

    Ok(())
}

fn demo_catalog() -> CatalogSeed {
    CatalogSeed {
        categories: vec![
            CategorySeed {
                name: "Audio".to_string(),
                slug: "audio".to_string(),
                description: Some("Parlantes y audífonos".to_string()),
                products: vec![
                    ProductSeed {
                        name: "Parlante Bluetooth Voltio Mini".to_string(),
                        slug: "parlante-bluetooth-voltio-mini".to_string(),
                        description: Some("Parlante portátil con 12 horas de batería".to_string()),
                        price: 89_000,
                        image_url: Some("/img/parlante-mini.jpg".to_string()),
                        stock: 25,
                        is_featured: true,
                    },
                    ProductSeed {
                        name: "Audífonos inalámbricos Pro".to_string(),
                        slug: "audifonos-inalambricos-pro".to_string(),
                        description: Some("Cancelación activa de ruido".to_string()),
                        price: 320_000,
                        image_url: Some("/img/audifonos-pro.jpg".to_string()),
                        stock: 12,
                        is_featured: true,
                    },
                ],
            },
            CategorySeed {
                name: "Computación".to_string(),
                slug: "computacion".to_string(),
                description: Some("Periféricos y accesorios de cómputo".to_string()),
                products: vec![
                    ProductSeed {
                        name: "Teclado mecánico 60%".to_string(),
                        slug: "teclado-mecanico-60".to_string(),
                        description: Some("Switches rojos, retroiluminación RGB".to_string()),
                        price: 245_000,
                        image_url: Some("/img/teclado-60.jpg".to_string()),
                        stock: 18,
                        is_featured: false,
                    },
                    ProductSeed {
                        name: "Mouse ergonómico vertical".to_string(),
                        slug: "mouse-ergonomico-vertical".to_string(),
                        description: None,
                        price: 125_000,
                        image_url: Some("/img/mouse-vertical.jpg".to_string()),
                        stock: 30,
                        is_featured: false,
                    },
                ],
            },
            CategorySeed {
                name: "Hogar inteligente".to_string(),
                slug: "hogar-inteligente".to_string(),
                description: None,
                products: vec![ProductSeed {
                    name: "Bombillo WiFi multicolor".to_string(),
                    slug: "bombillo-wifi-multicolor".to_string(),
                    description: Some("Compatible con asistentes de voz".to_string()),
                    price: 48_000,
                    image_url: None,
                    stock: 50,
                    is_featured: true,
                }],
            },
        ],
    }
}
