//! Built-in field types.

mod color;
mod lightswitch;
mod number;
mod plain_text;

pub use color::{ColorField, ColorFieldType, DEFAULT_COLOR};
pub use lightswitch::{LightswitchField, LightswitchFieldType};
pub use number::{NumberField, NumberFieldType, MAX_DECIMALS};
pub use plain_text::{PlainTextField, PlainTextFieldType};
