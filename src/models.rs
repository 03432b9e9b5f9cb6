use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Reads a JSON `null` as the field's default instead of rejecting it.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// String-valued API enum that keeps values it does not know verbatim.
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal,)*
        }
        default = $default:expr;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)*
            Other(String),
        }

        impl $name {
            /// The value as sent by the API.
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)*
                    $name::Other(raw) => raw.as_str(),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $default
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => $name::$variant,)*
                    _ => $name::Other(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Tracking API response: every shipment matching the query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipmentsResult {
    #[serde(deserialize_with = "null_default")]
    pub shipments: Vec<Shipment>,
    /// Links to further matches that were not returned inline; not followed automatically.
    #[serde(
        rename = "possibleAdditionalShipmentsUrl",
        deserialize_with = "null_default"
    )]
    pub possible_additional_shipments_url: Vec<String>,
}

impl ShipmentsResult {
    pub fn is_empty(&self) -> bool {
        self.shipments.is_empty()
    }
}

/// A single shipment with its details and complete event history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Shipment {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub service: ServiceType,
    #[serde(deserialize_with = "null_default")]
    pub origin: Place,
    #[serde(deserialize_with = "null_default")]
    pub destination: Place,
    #[serde(deserialize_with = "null_default")]
    pub status: ShipmentEvent,
    pub estimated_time_of_delivery: Value,
    #[serde(deserialize_with = "null_default")]
    pub estimated_delivery_time_frame: EstimatedDeliveryTimeFrame,
    pub estimated_time_of_delivery_remark: Value,
    #[serde(deserialize_with = "null_default")]
    pub details: ShipmentDetails,
    /// As returned by the API, oldest first.
    #[serde(deserialize_with = "null_default")]
    pub events: Vec<ShipmentEvent>,
}

api_enum! {
    ServiceType {
        Freight => "freight",
        Express => "express",
        ParcelDe => "parcel-de",
        ParcelNl => "parcel-nl",
        ParcelPl => "parcel-pl",
        Dsc => "dsc",
        Dgf => "dgf",
        Ecommerce => "ecommerce",
    }
    default = ServiceType::Other(String::new());
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EstimatedDeliveryTimeFrame {
    pub estimated_from: Value,
    pub estimated_through: Value,
}

/// Checkpoint in a shipment's journey (a.k.a. milestone or status history entry).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipmentEvent {
    pub timestamp: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "null_default")]
    pub location: Place,
    #[serde(deserialize_with = "null_default")]
    pub status_code: StatusCode,
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(deserialize_with = "null_default")]
    pub remark: String,
    #[serde(deserialize_with = "null_default")]
    pub next_steps: String,
}

impl ShipmentEvent {
    /// Outcome of a shipment whose journey has ended, `None` while it is still moving.
    pub fn final_status(&self) -> Option<&'static str> {
        match self.status_code {
            StatusCode::Delivered => Some("DELIVERED"),
            StatusCode::Failure => Some("NOT_DELIVERED"),
            _ => None,
        }
    }
}

api_enum! {
    /// An event without a status code counts as `Unknown`.
    StatusCode {
        PreTransit => "pre-transit",
        Transit => "transit",
        Delivered => "delivered",
        Failure => "failure",
        Unknown => "unknown",
    }
    default = StatusCode::Unknown;
}

impl StatusCode {
    pub fn is_final(&self) -> bool {
        matches!(self, StatusCode::Delivered | StatusCode::Failure)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipmentDetails {
    #[serde(deserialize_with = "null_default")]
    pub carrier: Organization,
    #[serde(deserialize_with = "null_default")]
    pub product: Product,
    #[serde(deserialize_with = "null_default")]
    pub receiver: Person,
    #[serde(deserialize_with = "null_default")]
    pub sender: Person,
    #[serde(deserialize_with = "null_default")]
    pub proof_of_delivery: ProofOfDelivery,
    #[serde(deserialize_with = "null_default")]
    pub total_number_of_pieces: u32,
    #[serde(deserialize_with = "null_default")]
    pub piece_ids: Vec<String>,
    /// http://schema.org/weight
    pub weight: Value,
    /// http://schema.org/cargoVolume
    pub volume: Value,
    #[serde(deserialize_with = "null_default")]
    pub loading_meters: f32,
    #[serde(deserialize_with = "null_default")]
    pub dimensions: Dimensions,
    #[serde(deserialize_with = "null_default")]
    pub references: Vec<Reference>,
    #[serde(rename = "dgf:routes", deserialize_with = "null_default")]
    pub dgf_routes: Vec<DgfRoute>,
}

/// Each side is a http://schema.org/QuantitativeValue, kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: Value,
    pub height: Value,
    pub length: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProofOfDelivery {
    pub timestamp: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "null_default")]
    pub document_url: String,
    // decoded but not yet part of the public model
    #[allow(dead_code)]
    #[serde(skip_serializing)]
    signed: Option<Person>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    #[serde(deserialize_with = "null_default")]
    pub number: String,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: ReferenceType,
}

api_enum! {
    ReferenceType {
        CustomerReference => "customer-reference",
        CustomerConfirmationNumber => "customer-confirmation-number",
        LocalTrackingNumber => "local-tracking-number",
        EcommerceNumber => "ecommerce-number",
        Housebill => "housebill",
        Masterbill => "masterbill",
        ContainerNumber => "container-number",
        DomesticConsignmentId => "domestic-consignment-id",
    }
    default = ReferenceType::Other(String::new());
}

/// Freight leg, only present on `dgf` shipments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DgfRoute {
    #[serde(rename = "dgf:vesselName", deserialize_with = "null_default")]
    pub vessel_name: String,
    #[serde(rename = "dgf:voyageFlightNumber", deserialize_with = "null_default")]
    pub voyage_flight_number: String,
    #[serde(rename = "dgf:airportOfDeparture", deserialize_with = "null_default")]
    pub airport_of_departure: DgfAirport,
    #[serde(rename = "dgf:airportOfDestination", deserialize_with = "null_default")]
    pub airport_of_destination: DgfAirport,
    #[serde(rename = "dgf:estimatedDepartureDate")]
    pub estimated_departure_date: Option<DateTime<FixedOffset>>,
    #[serde(rename = "dgf:estimatedArrivalDate")]
    pub estimated_arrival_date: Option<DateTime<FixedOffset>>,
    #[serde(rename = "dgf:placeOfAcceptance", deserialize_with = "null_default")]
    pub place_of_acceptance: DgfLocation,
    #[serde(rename = "dgf:portOfLoading", deserialize_with = "null_default")]
    pub port_of_loading: DgfLocation,
    #[serde(rename = "dgf:portOfUnloading", deserialize_with = "null_default")]
    pub port_of_unloading: DgfLocation,
    #[serde(rename = "dgf:placeOfDelivery", deserialize_with = "null_default")]
    pub place_of_delivery: DgfLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DgfAirport {
    #[serde(rename = "dgf:locationName", deserialize_with = "null_default")]
    pub location_name: String,
    #[serde(rename = "dgf:locationCode", deserialize_with = "null_default")]
    pub location_code: String,
    #[serde(rename = "countryCode", deserialize_with = "null_default")]
    pub country_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DgfLocation {
    #[serde(rename = "dgf:locationName", deserialize_with = "null_default")]
    pub location_name: String,
}

/// http://schema.org/Person
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    #[serde(deserialize_with = "null_default")]
    pub family_name: String,
    #[serde(deserialize_with = "null_default")]
    pub given_name: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
}

/// https://gs1.org/voc/Place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    #[serde(deserialize_with = "null_default")]
    pub address: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    #[serde(deserialize_with = "null_default")]
    pub country_code: String,
    #[serde(deserialize_with = "null_default")]
    pub postal_code: String,
    #[serde(deserialize_with = "null_default")]
    pub address_locality: String,
    #[serde(deserialize_with = "null_default")]
    pub street_address: String,
}

/// https://gs1.org/voc/Organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Organization {
    #[serde(deserialize_with = "null_default")]
    pub organization_name: String,
}

/// https://gs1.org/voc/Product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    #[serde(deserialize_with = "null_default")]
    pub product_name: String,
}

/// RFC 7807 problem returned with every non-200 response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemDetail {
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub status: u16,
    #[serde(deserialize_with = "null_default")]
    pub detail: String,
    #[serde(deserialize_with = "null_default")]
    pub instance: String,
}
