// 🔑 Client Registry - static credential allow-list
// Loaded once at startup, read-only afterwards.

use crate::money::Money;
use serde::Serialize;

/// A contracted client and the credential it presents.
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub name: String,

    #[serde(skip_serializing)]
    pub api_key: String,

    /// Informational only, never enforced
    pub monthly_contract: Money,

    /// Declared services. Not enforced: any valid key may submit any category.
    pub services: Vec<String>,
}

impl Client {
    pub fn new(name: &str, api_key: &str, monthly_contract: Money, services: &[&str]) -> Self {
        Client {
            name: name.to_string(),
            api_key: api_key.to_string(),
            monthly_contract,
            services: services.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientRegistry {
    clients: Vec<Client>,
}

impl ClientRegistry {
    pub fn from_clients(clients: Vec<Client>) -> Self {
        ClientRegistry { clients }
    }

    /// The three contracted government clients.
    pub fn builtin() -> Self {
        ClientRegistry::from_clients(vec![
            Client::new(
                "Apex",
                "APEX-2024-GOV-SAAS",
                Money::from_cents(7_500_000),
                &["delivery_tracking", "soil_analysis"],
            ),
            Client::new(
                "LEDA",
                "LEDA-RURAL-DEV",
                Money::from_cents(5_000_000),
                &["livestock_monitoring", "gps_tracking"],
            ),
            Client::new(
                "Government_Agriculture",
                "GOV-AGRIC-SAAS-2024",
                Money::from_cents(2_257_500),
                &["all_data_aggregation", "subsidy_processing"],
            ),
        ])
    }

    /// Exact-match lookup by credential.
    pub fn authorize(&self, api_key: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.api_key == api_key)
    }

    pub fn names(&self) -> Vec<&str> {
        self.clients.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
