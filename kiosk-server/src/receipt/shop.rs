//! Shop identity printed on every receipt

/// Header, labels and footer for receipts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopProfile {
    pub name: String,
    pub tagline: String,
    pub address: String,
    pub phone: String,
    /// Printed after "Sales Ref:"
    pub sales_ref: String,
    /// Prefix for money values, e.g. "Rs"
    pub currency: String,
    pub footer: String,
    /// Image printed above the header, if any
    pub logo_path: Option<String>,
}

impl Default for ShopProfile {
    fn default() -> Self {
        Self {
            name: "The Cadbury".to_string(),
            tagline: "Taste the Magic at The Cadbury.".to_string(),
            address: "No 395/10A, Galle Road, Colombo 03".to_string(),
            phone: "Tel: 070 025 2511".to_string(),
            sales_ref: "Manager".to_string(),
            currency: "Rs".to_string(),
            footer: "THANK YOU PLEASE COME AGAIN!".to_string(),
            logo_path: None,
        }
    }
}
