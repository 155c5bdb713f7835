use serde::{Deserialize, Serialize};

/// Core listing record as served by the list and search endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    #[serde(rename = "propertyId")]
    pub id: i64,
    pub price: f64,
    pub area: f64,
    pub property_type: String,
    pub status: String,
    pub city: String,
    pub district: String,
}

impl PropertyRecord {
    /// Parsed listing status, if the label is one we know
    pub fn listing_status(&self) -> Option<ListingStatus> {
        ListingStatus::parse(&self.status)
    }

    pub fn severity(&self) -> Severity {
        ListingStatus::severity_of(&self.status)
    }
}

/// Listing record extended with the fields only the detail endpoint returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub record: PropertyRecord,
    #[serde(default)]
    pub property_status: String,
    #[serde(default)]
    pub finishing_type: String,
    #[serde(default)]
    pub rooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub governorate: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub building_number: u32,
    #[serde(default)]
    pub floor_number: i32,
    #[serde(default)]
    pub apartment_number: u32,
}

impl PropertyDetail {
    /// Street, district, city, governorate and country, skipping blanks
    pub fn full_address(&self) -> String {
        [
            self.street.as_str(),
            self.record.district.as_str(),
            self.record.city.as_str(),
            self.governorate.as_str(),
            self.country.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn formatted_price(&self) -> String {
        format_price(self.record.price)
    }
}

/// Lifecycle of a listing on the market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Sold,
    Rented,
    Pending,
}

impl ListingStatus {
    /// Case-insensitive parse; also accepts the Arabic labels the detail endpoint uses.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "available" | "متاحة" => Some(Self::Available),
            "sold" | "مباعة" => Some(Self::Sold),
            "rented" | "مؤجرة" => Some(Self::Rented),
            "pending" | "معلقة" => Some(Self::Pending),
            _ => None,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Available => Severity::Success,
            Self::Sold => Severity::Danger,
            Self::Rented => Severity::Warn,
            Self::Pending => Severity::Info,
        }
    }

    pub fn severity_of(label: &str) -> Severity {
        Self::parse(label)
            .map(Self::severity)
            .unwrap_or(Severity::Secondary)
    }
}

/// Display severity used for status tags and notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warn,
    Danger,
    Info,
    Secondary,
}

/// Payload for registering buyer interest in a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Wire body for the contact endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerContact<'a> {
    pub property_id: i64,
    #[serde(flatten)]
    pub contact: &'a ContactRequest,
}

/// Formats a price as whole Egyptian pounds, e.g. `EGP 1,250,000`
pub fn format_price(price: f64) -> String {
    let whole = price.max(0.0).round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("EGP {}", grouped)
}
