//! Wire records returned by the storefront backend.
//!
//! The backend is loose about JSON types: ids, quantities and prices arrive
//! as numbers or numeric strings depending on the endpoint, and failure
//! responses often carry an empty string where an object is expected. The
//! helpers in [`de`] absorb that so the rest of the crate sees plain types.

use crate::session::Session;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `status` value the backend uses for success.
pub const STATUS_OK: i64 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[default]
    Consumer,
    Business,
}

impl UserType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "2" => UserType::Business,
            _ => UserType::Consumer,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            UserType::Consumer => 1,
            UserType::Business => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Consumer => "Customer",
            UserType::Business => "B2B Customer",
        }
    }
}

/// Generic envelope: `{status, message?, result?, image_url?}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct ApiResponse<T> {
    #[serde(default, deserialize_with = "de::int")]
    pub status: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(default = "Option::default", deserialize_with = "de::lenient")]
    pub result: Option<T>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub image_url: Option<String>,
}

/// Accessors shared by every response shape carrying `status`/`message`.
pub trait StatusReply {
    fn status(&self) -> i64;
    fn message(&self) -> Option<&str>;

    fn is_ok(&self) -> bool {
        self.status() == STATUS_OK
    }

    /// Backend message, or `fallback` when it sent none.
    fn message_or(&self, fallback: &str) -> String {
        self.message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

macro_rules! status_reply {
    ($($ty:ty),* $(,)?) => {
        $(impl StatusReply for $ty {
            fn status(&self) -> i64 {
                self.status
            }

            fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }
        })*
    };
}

impl<T> StatusReply for ApiResponse<T> {
    fn status(&self) -> i64 {
        self.status
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

status_reply!(
    LoginResponse,
    BannerResponse,
    CategoryResponse,
    ProductResponse,
    AreaResponse,
    OrderListResponse,
    MinimumOrderResponse,
    CartResponse,
);

/// User fields as they appear in login and OTP-verification payloads.
///
/// Login answers with `user_id`/`username`; verification nests `id`/`name`
/// under `result`. Both spellings are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default, alias = "id", deserialize_with = "de::opt_string")]
    pub user_id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "de::opt_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub user_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub minimum_qty: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub pincode: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub area: Option<String>,
}

impl UserPayload {
    /// Session to persist, if the payload identifies a user.
    pub fn to_session(&self) -> Option<Session> {
        let user_id = self.user_id.clone().filter(|id| !id.trim().is_empty())?;
        Some(Session {
            user_id,
            name: self.username.clone().unwrap_or_default(),
            user_type: self
                .user_type
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "1".to_string()),
            token: self.token.clone().unwrap_or_default(),
            minimum_qty: self.minimum_qty,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "de::int")]
    pub status: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(default = "Option::default", deserialize_with = "de::lenient")]
    pub result: Option<UserPayload>,
    #[serde(flatten)]
    pub user: UserPayload,
}

impl LoginResponse {
    /// Session carried by the response; the nested `result` wins over top-level fields.
    pub fn session(&self) -> Option<Session> {
        self.result
            .as_ref()
            .and_then(UserPayload::to_session)
            .or_else(|| self.user.to_session())
    }

    /// Success status alone is not enough; the reply must also name the user.
    pub fn logged_in(&self) -> bool {
        self.is_ok() && self.session().is_some()
    }
}

impl ApiResponse<UserPayload> {
    /// Session carried by an OTP-verification reply.
    pub fn session(&self) -> Option<Session> {
        self.result.as_ref().and_then(UserPayload::to_session)
    }

    pub fn logged_in(&self) -> bool {
        self.is_ok() && self.session().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub sub_name: Option<String>,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubCategory {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub short_desc: Option<String>,
    #[serde(default)]
    pub image: String,
}

/// `result` of `GetSubCategoryBB`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubCategoryList {
    #[serde(default)]
    pub subcategories: Vec<SubCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default)]
    pub product_size: String,
    #[serde(default, deserialize_with = "de::decimal")]
    pub sales_price: Decimal,
    #[serde(default, deserialize_with = "de::decimal")]
    pub regular_price: Decimal,
    #[serde(default, deserialize_with = "de::decimal")]
    pub offer_price: Decimal,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub state_gst: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub central_gst: Option<String>,
    /// Quantity of this variant already in the user's cart.
    #[serde(default, deserialize_with = "de::int")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub available_stock: i64,
}

impl ProductVariant {
    pub fn in_stock(&self) -> bool {
        self.available_stock > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default)]
    pub eng_name: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub tml_name: Option<String>,
    #[serde(default)]
    pub pro_image: String,
    #[serde(default)]
    pub list_product: Vec<ProductVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub product_id: i64,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_image: String,
    #[serde(default, deserialize_with = "de::decimal")]
    pub sales_price: Decimal,
    #[serde(default, deserialize_with = "de::decimal")]
    pub regular_price: Decimal,
    #[serde(default, deserialize_with = "de::decimal")]
    pub offer_price: Decimal,
    #[serde(default, deserialize_with = "de::int")]
    pub quantity: i64,
    #[serde(default)]
    pub product_size: String,
}

/// `GetCartDetails` reply. Lines that fail to parse are dropped, the rest are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartResponse {
    #[serde(default, deserialize_with = "de::int")]
    pub status: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(default = "Vec::new", deserialize_with = "de::lenient_vec")]
    pub result: Vec<CartItem>,
}

impl CartResponse {
    /// Lines of a successful reply; nothing otherwise.
    pub fn into_lines(self) -> Vec<CartItem> {
        if self.is_ok() {
            self.result
        } else {
            Vec::new()
        }
    }
}

/// `result` of `GetDeliveryCharge`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryInfo {
    #[serde(default = "Option::default", deserialize_with = "de::lenient")]
    pub area: Option<DeliveryArea>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryArea {
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub delivery_charge: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "0" | "pending" => OrderStatus::Pending,
            "1" | "processing" => OrderStatus::Processing,
            "2" | "delivered" => OrderStatus::Delivered,
            "3" | "cancelled" | "canceled" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(code.trim().to_string()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => f.write_str("Pending"),
            OrderStatus::Processing => f.write_str("Processing"),
            OrderStatus::Delivered => f.write_str("Delivered"),
            OrderStatus::Cancelled => f.write_str("Cancelled"),
            OrderStatus::Other(raw) => write!(f, "Status {raw}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    #[serde(default, deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_image: String,
    #[serde(default, deserialize_with = "de::int")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "de::decimal")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::string")]
    pub order_number: String,
    #[serde(default, deserialize_with = "de::decimal")]
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "de::decimal")]
    pub delivery_charge: Decimal,
    #[serde(default, deserialize_with = "de::string")]
    pub status: String,
    #[serde(default, deserialize_with = "de::string")]
    pub created_at: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_code(&self.status)
    }

    /// `created_at` as `dd Mon yyyy`, or the raw value when it is not a backend timestamp.
    pub fn placed_on(&self) -> String {
        let raw = self.created_at.trim();
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.date())
            .or_else(|_| chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .map(|d| d.format("%d %b %Y").to_string())
            .unwrap_or_else(|_| raw.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub slider: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BannerResponse {
    #[serde(default, deserialize_with = "de::int")]
    pub status: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(default = "Vec::new", deserialize_with = "de::lenient_vec")]
    pub sliders: Vec<Banner>,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryResponse {
    #[serde(default, deserialize_with = "de::int")]
    pub status: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(default = "Vec::new", deserialize_with = "de::lenient_vec")]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductResponse {
    #[serde(default, deserialize_with = "de::int")]
    pub status: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(default = "Vec::new", deserialize_with = "de::lenient_vec")]
    pub products: Vec<Product>,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Area {
    #[serde(deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default, alias = "area_name")]
    pub name: String,
}

/// `GetArea` lists areas under `products`.
#[derive(Debug, Clone, Deserialize)]
pub struct AreaResponse {
    #[serde(default, deserialize_with = "de::int")]
    pub status: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(default = "Vec::new", alias = "areas", deserialize_with = "de::lenient_vec")]
    pub products: Vec<Area>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderListResponse {
    #[serde(default, deserialize_with = "de::int")]
    pub status: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(default = "Vec::new", alias = "orders", deserialize_with = "de::lenient_vec")]
    pub result: Vec<Order>,
}

/// `GetMinimumOrder` reply. The amount is read from the top level or from `result`.
#[derive(Debug, Clone, Deserialize)]
pub struct MinimumOrderResponse {
    #[serde(default, deserialize_with = "de::int")]
    pub status: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub message: Option<String>,
    #[serde(
        default,
        alias = "min_order",
        alias = "minimum_amount",
        deserialize_with = "de::opt_decimal"
    )]
    pub minimum_order: Option<Decimal>,
    #[serde(default = "Option::default", deserialize_with = "de::lenient")]
    pub result: Option<MinimumOrderResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinimumOrderResult {
    #[serde(
        default,
        alias = "min_order",
        alias = "minimum_amount",
        deserialize_with = "de::opt_decimal"
    )]
    pub minimum_order: Option<Decimal>,
}

impl MinimumOrderResponse {
    pub fn amount(&self) -> Option<Decimal> {
        self.minimum_order
            .or_else(|| self.result.as_ref().and_then(|r| r.minimum_order))
    }
}

/// Profile record returned by `MyProfile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub mobile: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub landmark: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub area: Option<String>,
}

/// Lenient field deserializers.
pub mod de {
    use rust_decimal::Decimal;
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    fn value_to_string(v: Value) -> Option<String> {
        match v {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(value_to_string(Value::deserialize(d)?))
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(value_to_string(Value::deserialize(d)?).unwrap_or_default())
    }

    fn parse_int<E: Error>(v: Value) -> Result<Option<i64>, E> {
        match v {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(i64::from(b))),
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| E::custom(format!("number out of range: {n}"))),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => {
                let t = s.trim();
                t.parse::<i64>()
                    .or_else(|_| t.parse::<f64>().map(|f| f as i64))
                    .map(Some)
                    .map_err(|_| E::custom(format!("expected integer, got {s:?}")))
            }
            other => Err(E::custom(format!("expected integer, got {other}"))),
        }
    }

    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        Ok(parse_int::<D::Error>(Value::deserialize(d)?)?.unwrap_or(0))
    }

    pub fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        parse_int::<D::Error>(Value::deserialize(d)?)
    }

    fn parse_decimal<E: Error>(v: Value) -> Result<Option<Decimal>, E> {
        let raw = match v {
            Value::Null => return Ok(None),
            Value::Number(n) => n.to_string(),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().to_string(),
            other => return Err(E::custom(format!("expected amount, got {other}"))),
        };
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map(Some)
            .map_err(|e| E::custom(format!("invalid amount {raw:?}: {e}")))
    }

    pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        Ok(parse_decimal::<D::Error>(Value::deserialize(d)?)?.unwrap_or_default())
    }

    pub fn opt_decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        parse_decimal::<D::Error>(Value::deserialize(d)?)
    }

    /// `None` for null, empty strings, or anything that does not fit `T`.
    pub fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let v = Value::deserialize(d)?;
        if v.is_null() {
            return Ok(None);
        }
        Ok(serde_json::from_value(v).ok())
    }

    /// Empty vector for null or mistyped lists; records that fail to parse are dropped.
    pub fn lenient_vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(d)? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect()),
            _ => Ok(Vec::new()),
        }
    }
}
