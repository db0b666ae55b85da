// src/bin/populate.rs

//! Seeds the demo categories and pages. Safe to run repeatedly.

use rango::db;
use rango::models::category::NewCategory;
use rango::models::page::NewPage;
use rango::services::{interaction, ranking};
use sqlx::SqlitePool;
use tracing_subscriber::EnvFilter;

const SEED: &[(&str, i64, i64, &[(&str, &str)])] = &[
    (
        "Python",
        128,
        64,
        &[
            ("Official Python Tutorial", "http://docs.python.org/2/tutorial/"),
            ("How to think like a computer scientist", "http://www.greenteapress.com/thinkpython/"),
            ("Learn Python in 10 Minutos", "http://www.korokithakis.net/tutorials/python/"),
        ],
    ),
    (
        "Django",
        64,
        32,
        &[
            ("Official Django Tutorial", "http://docs.djangoproject.com/en/1.6/intro/tutorial01/"),
            ("Django Rocks", "http://djangorocks.com/"),
            ("How to tango with Django", "http://tangowithdjango/"),
        ],
    ),
    (
        "Other Frameworks",
        32,
        16,
        &[
            ("Bottle", "http://bottlepy.org/docs/dev/"),
            ("Flask", "http://flask.pocoo.org/"),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://rango.db".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Rango population script...");

    let pool = db::connect(&database_url, 1).await?;
    db::migrate(&pool).await?;

    populate(&pool).await?;

    for category in ranking::top_categories(&pool, 0).await? {
        for page in ranking::top_pages_for_category(&pool, category.category.id, 0).await? {
            println!("{} - {}", category.category.name, page.title);
        }
    }

    Ok(())
}

async fn populate(pool: &SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    for (name, views, likes, pages) in SEED {
        let (category, _) =
            interaction::add_category(pool, &NewCategory::new(*name, *views, *likes)).await?;

        for (title, url) in *pages {
            interaction::add_page(pool, &NewPage::new(category.id, *title, *url)).await?;
        }
    }
    Ok(())
}
