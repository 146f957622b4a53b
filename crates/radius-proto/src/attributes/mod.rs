mod attribute;
mod types;

pub use attribute::{Attribute, AttributeValue, VENDOR_SPECIFIC};
pub use types::StandardAttribute;
