use serde::{Deserialize, Serialize};

/// The 27 Brazilian federative unit codes.
pub const UF_CODES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

pub const VENUE_TYPES: [&str; 5] = ["balada", "bar", "restaurante", "conveniencia", "tabacaria"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub cnpj: String,
    pub name: String,
    pub state: String,
    pub city: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub operating_hours: String,
    pub postal_code: String,
    pub street_number: String,
    pub endereco: String,
}

/// A restaurant record before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantDraft {
    pub cnpj: String,
    pub name: String,
    pub state: String,
    pub city: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub operating_hours: String,
    pub postal_code: String,
    pub street_number: String,
    pub endereco: String,
}

impl RestaurantDraft {
    pub fn into_restaurant(self, id: i64) -> Restaurant {
        Restaurant {
            id,
            cnpj: self.cnpj,
            name: self.name,
            state: self.state,
            city: self.city,
            kind: self.kind,
            operating_hours: self.operating_hours,
            postal_code: self.postal_code,
            street_number: self.street_number,
            endereco: self.endereco,
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

pub fn is_valid_uf(code: &str) -> bool {
    UF_CODES.contains(&code)
}

pub fn is_valid_venue_type(value: &str) -> bool {
    VENUE_TYPES.contains(&value)
}
