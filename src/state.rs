use crate::auth::UserDirectory;
use crate::ledger::Ledger;
use crate::models::Theme;
use crate::storage::{self, Store};
use crate::weather::WeatherClient;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub ledger: Arc<Mutex<Ledger>>,
    pub users: Arc<Mutex<UserDirectory>>,
    pub theme: Arc<Mutex<Theme>>,
    pub weather: WeatherClient,
}

impl AppState {
    pub async fn load(store: Store, weather: WeatherClient) -> Self {
        let ledger = Ledger::load(store.clone()).await;
        let users = UserDirectory::load(store.clone()).await;
        let theme = store.read_value(storage::THEME).await.unwrap_or_default();
        Self {
            store,
            ledger: Arc::new(Mutex::new(ledger)),
            users: Arc::new(Mutex::new(users)),
            theme: Arc::new(Mutex::new(theme)),
            weather,
        }
    }
}
