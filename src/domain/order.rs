//! Order domain model
//!
//! An order is a single financial transaction tied to a course purchase.
//! Orders are immutable once fetched; a new fetch replaces the whole
//! collection.

use super::course::{Course, DEFAULT_INVOICE_PREFIX};
use super::ids::OrderId;
use super::wire::{
    deserialize_integer, deserialize_optional_text, deserialize_text, deserialize_timestamp,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Order payment status
///
/// The set is closed. Anything the service sends outside of it is kept as
/// [`OrderStatus::Unknown`] so it can be detected instead of silently
/// falling through to a default badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Created, not paid
    Unpaid,
    /// Invoice issued to the client
    Invoiced,
    /// Paid; the stored amount is in minor currency units
    Paid,
    /// Cancelled by staff or client
    Cancelled,
    /// Any value outside the closed set (raw wire value kept)
    Unknown(String),
}

impl OrderStatus {
    /// All known statuses, in display order
    pub const KNOWN: [OrderStatus; 4] = [
        OrderStatus::Unpaid,
        OrderStatus::Invoiced,
        OrderStatus::Paid,
        OrderStatus::Cancelled,
    ];

    /// Parse a wire value; never fails
    ///
    /// Accepts the canonical literals case-insensitively and the legacy
    /// Russian labels the service used to emit.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_uppercase().as_str() {
            "UNPAID" | "НЕ ОПЛАЧЕНО" => OrderStatus::Unpaid,
            "INVOICED" | "ВЫСТАВЛЕНО" => OrderStatus::Invoiced,
            "PAID" | "ОПЛАЧЕНО" => OrderStatus::Paid,
            "CANCELLED" | "CANCELED" | "ОТМЕНЕНО" => OrderStatus::Cancelled,
            _ => OrderStatus::Unknown(trimmed.to_string()),
        }
    }

    /// Canonical wire literal
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Unpaid => "UNPAID",
            OrderStatus::Invoiced => "INVOICED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Unknown(raw) => raw,
        }
    }

    /// True for values outside the closed set
    pub fn is_unknown(&self) -> bool {
        matches!(self, OrderStatus::Unknown(_))
    }

    /// Display badge for this status
    pub fn badge(&self) -> Badge {
        match self {
            OrderStatus::Unpaid => Badge::new("UNPAID", BadgeTone::Danger),
            OrderStatus::Invoiced => Badge::new("INVOICED", BadgeTone::Warning),
            OrderStatus::Paid => Badge::new("PAID", BadgeTone::Success),
            OrderStatus::Cancelled => Badge::new("CANCELLED", BadgeTone::Muted),
            OrderStatus::Unknown(_) => Badge::new(NO_DATA, BadgeTone::Neutral),
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Unknown(String::new())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OrderStatus {
    fn from(raw: &str) -> Self {
        OrderStatus::parse(raw)
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| OrderStatus::parse(&s)).unwrap_or_default())
    }
}

/// Payment provider an order was paid through
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentType {
    Payme,
    Click,
    Uzum,
    /// Provider outside the known set (raw wire value kept)
    Unknown(String),
}

impl PaymentType {
    /// Parse a wire value case-insensitively; never fails
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_uppercase().as_str() {
            "PAYME" => PaymentType::Payme,
            "CLICK" => PaymentType::Click,
            "UZUM" => PaymentType::Uzum,
            _ => PaymentType::Unknown(trimmed.to_string()),
        }
    }

    /// Canonical wire literal
    pub fn as_str(&self) -> &str {
        match self {
            PaymentType::Payme => "PAYME",
            PaymentType::Click => "CLICK",
            PaymentType::Uzum => "UZUM",
            PaymentType::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for PaymentType {
    fn from(raw: &str) -> Self {
        PaymentType::parse(raw)
    }
}

impl Serialize for PaymentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PaymentType::parse(&raw))
    }
}

/// Placeholder shown for missing values and unknown statuses
pub const NO_DATA: &str = "no data";

/// Visual tone of a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Danger,
    Warning,
    Success,
    Muted,
    Neutral,
}

impl BadgeTone {
    /// Background colour of the badge (sRGB)
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            BadgeTone::Danger => [0xfe, 0xe2, 0xe2],
            BadgeTone::Warning => [0xfe, 0xf9, 0xc3],
            BadgeTone::Success => [0xdc, 0xfc, 0xe7],
            BadgeTone::Muted => [0xe5, 0xe7, 0xeb],
            BadgeTone::Neutral => [0xff, 0xff, 0xff],
        }
    }
}

/// Status badge: a label plus a tone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

impl Badge {
    fn new(label: &'static str, tone: BadgeTone) -> Self {
        Self { label, tone }
    }
}

/// A single order record, as served by `GET /orders`
///
/// Decoding goes through a lenient raw record: a malformed field degrades to
/// an empty value rather than rejecting the whole order list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OrderRecord")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,

    #[serde(rename = "invoiceNumber")]
    pub invoice_number: String,

    #[serde(rename = "clientName")]
    pub client_name: String,

    #[serde(rename = "clientPhone")]
    pub client_phone: String,

    /// Telegram handle, when the client left one
    #[serde(rename = "tgUsername", skip_serializing_if = "Option::is_none")]
    pub tg_username: Option<String>,

    /// Stored amount: minor units for PAID orders, major units otherwise.
    /// Use [`Order::display_amount`] for anything shown to a person.
    pub amount: i64,

    pub status: OrderStatus,

    #[serde(rename = "paymentType", skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,

    #[serde(rename = "create_time", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(rename = "course_id", skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
}

/// Order as it arrives on the wire
///
/// The service sends the creation time as `create_time`, `createdAt` or
/// both, as RFC 3339 or epoch milliseconds.
#[derive(Deserialize)]
struct OrderRecord {
    #[serde(rename = "_id")]
    id: OrderId,

    #[serde(rename = "invoiceNumber", default, deserialize_with = "deserialize_text")]
    invoice_number: String,

    #[serde(rename = "clientName", default, deserialize_with = "deserialize_text")]
    client_name: String,

    #[serde(rename = "clientPhone", default, deserialize_with = "deserialize_text")]
    client_phone: String,

    #[serde(rename = "tgUsername", default, deserialize_with = "deserialize_optional_text")]
    tg_username: Option<String>,

    #[serde(default, deserialize_with = "deserialize_integer")]
    amount: i64,

    #[serde(default, deserialize_with = "deserialize_text")]
    status: String,

    #[serde(rename = "paymentType", default, deserialize_with = "deserialize_optional_text")]
    payment_type: Option<String>,

    #[serde(default, deserialize_with = "deserialize_timestamp")]
    create_time: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt", default, deserialize_with = "deserialize_timestamp")]
    created_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_course")]
    course_id: Option<Course>,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            invoice_number: record.invoice_number,
            client_name: record.client_name,
            client_phone: record.client_phone,
            tg_username: record.tg_username,
            amount: record.amount,
            status: OrderStatus::parse(&record.status),
            payment_type: record.payment_type.as_deref().map(PaymentType::parse),
            created_at: record.create_time.or(record.created_at),
            course: record.course_id,
        }
    }
}

impl Order {
    /// Creates a new builder for constructing an Order
    pub fn builder() -> OrderBuilder {
        OrderBuilder::default()
    }

    /// Amount as shown to a person
    ///
    /// PAID orders store minor units and are divided by 100; every other
    /// status stores major units and is shown unchanged.
    pub fn display_amount(&self) -> f64 {
        if self.status == OrderStatus::Paid {
            self.amount as f64 / 100.0
        } else {
            self.amount as f64
        }
    }

    /// Formatted amount with currency, or [`NO_DATA`] when the amount is zero
    pub fn formatted_amount(&self, currency: &str) -> String {
        if self.amount == 0 {
            return NO_DATA.to_string();
        }
        format!("{} {currency}", self.display_amount())
    }

    /// Course title, when the order references a course
    pub fn course_title(&self) -> Option<&str> {
        self.course.as_ref().map(|c| c.title.as_str())
    }

    /// Invoice number with the course prefix (`"U"` when unknown)
    pub fn invoice_label(&self) -> String {
        let prefix = self
            .course
            .as_ref()
            .map(|c| c.prefix.as_str())
            .unwrap_or(DEFAULT_INVOICE_PREFIX);
        format!("{prefix}{}", self.invoice_number)
    }

    /// Whether a contract PDF may be generated for this order
    ///
    /// Only paid orders are eligible. The affordance is disabled, not hidden,
    /// for every other status.
    pub fn is_contract_eligible(&self) -> bool {
        self.status == OrderStatus::Paid
    }
}

/// Builder for constructing Order instances
#[derive(Debug, Default)]
pub struct OrderBuilder {
    id: Option<OrderId>,
    invoice_number: Option<String>,
    client_name: Option<String>,
    client_phone: Option<String>,
    tg_username: Option<String>,
    amount: i64,
    status: OrderStatus,
    payment_type: Option<PaymentType>,
    created_at: Option<DateTime<Utc>>,
    course: Option<Course>,
}

impl OrderBuilder {
    /// Creates a new OrderBuilder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn invoice_number(mut self, invoice_number: impl Into<String>) -> Self {
        self.invoice_number = Some(invoice_number.into());
        self
    }

    pub fn client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    pub fn client_phone(mut self, client_phone: impl Into<String>) -> Self {
        self.client_phone = Some(client_phone.into());
        self
    }

    pub fn tg_username(mut self, tg_username: impl Into<String>) -> Self {
        self.tg_username = Some(tg_username.into());
        self
    }

    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn payment_type(mut self, payment_type: PaymentType) -> Self {
        self.payment_type = Some(payment_type);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn course(mut self, course: Course) -> Self {
        self.course = Some(course);
        self
    }

    /// Builds the Order
    ///
    /// # Errors
    ///
    /// Returns an error if the id is missing
    pub fn build(self) -> Result<Order, String> {
        Ok(Order {
            id: self.id.ok_or("id is required")?,
            invoice_number: self.invoice_number.unwrap_or_default(),
            client_name: self.client_name.unwrap_or_default(),
            client_phone: self.client_phone.unwrap_or_default(),
            tg_username: self.tg_username,
            amount: self.amount,
            status: self.status,
            payment_type: self.payment_type,
            created_at: self.created_at,
            course: self.course,
        })
    }
}

/// `course_id` is populated by the service; a bare id string, or an object
/// without a usable id, means the course was not joined and is treated as
/// absent.
fn deserialize_course<'de, D>(deserializer: D) -> Result<Option<Course>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        value @ serde_json::Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}
