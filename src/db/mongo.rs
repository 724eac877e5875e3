use bson::doc;
use mongodb::{
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};
use std::sync::Arc;
use std::time::Duration;

use crate::models::destination::Destination;
use crate::models::itinerary::{Itinerary, ItineraryItem};
use crate::models::user::User;

pub const ITINERARIES: &str = "Itineraries";
pub const ITINERARY_ITEMS: &str = "ItineraryItems";
pub const DESTINATIONS: &str = "Destinations";
pub const USERS: &str = "Users";

/// Shared handle to the store. Cloned into every worker through `web::Data`.
#[derive(Clone)]
pub struct Store {
    client: Arc<Client>,
    database: String,
}

impl Store {
    pub fn new(client: Arc<Client>, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }

    pub fn database(&self) -> Database {
        self.client.database(&self.database)
    }

    pub fn itineraries(&self) -> Collection<Itinerary> {
        self.database().collection(ITINERARIES)
    }

    pub fn itinerary_items(&self) -> Collection<ItineraryItem> {
        self.database().collection(ITINERARY_ITEMS)
    }

    pub fn destinations(&self) -> Collection<Destination> {
        self.database().collection(DESTINATIONS)
    }

    pub fn users(&self) -> Collection<User> {
        self.database().collection(USERS)
    }

    /// Unique emails back the register conflict check; items are read per
    /// itinerary in day order.
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users().create_index(unique_email).await?;

        let items_by_day = IndexModel::builder()
            .keys(doc! { "itinerary_id": 1, "day": 1, "position": 1 })
            .build();
        self.itinerary_items().create_index(items_by_day).await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.database().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, mongodb::error::Error> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);
    client_options.app_name = Some("trip-planner-api".to_string());

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    // A failed ping is not fatal; the pool retries on first use
    match client.database("admin").run_command(doc! { "ping": 1 }).await {
        Ok(_) => log::info!("Connected to MongoDB and verified with ping"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping failed: {}", e);
        }
    }

    Ok(Arc::new(client))
}
