//! Integer or fixed-point decimal field with optional bounds.

use serde_json::{Number, Value};

use crate::error::{FieldsError, Result};
use crate::field::{Field, FieldFactory, Settings};
use crate::types::{ColumnType, FieldDef};

/// Largest supported number of decimal places.
pub const MAX_DECIMALS: u32 = 10;

const DECIMAL_PRECISION: u8 = 12;

#[derive(Debug, Default, Clone, Copy)]
pub struct NumberFieldType;

impl FieldFactory for NumberFieldType {
    fn type_id(&self) -> &'static str {
        "Number"
    }

    fn display_name(&self) -> &'static str {
        "Number"
    }

    fn create(&self, def: &FieldDef) -> Result<Box<dyn Field>> {
        Ok(Box::new(NumberField::from_def(def)?))
    }
}

/// Integer or fixed-point number with optional bounds.
#[derive(Debug, Clone)]
pub struct NumberField {
    def: FieldDef,
    min: Option<f64>,
    max: Option<f64>,
    decimals: u32,
    default_value: Option<f64>,
}

impl NumberField {
    pub fn from_def(def: &FieldDef) -> Result<Self> {
        let settings = Settings::new(def);
        let min = settings.f64("min")?;
        let max = settings.f64("max")?;
        let decimals = settings.u32("decimals")?.unwrap_or(0);
        let default_value = settings.f64("defaultValue")?;

        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(FieldsError::configuration(
                    &def.handle,
                    format!("min ({min}) is greater than max ({max})"),
                ));
            }
        }
        if decimals > MAX_DECIMALS {
            return Err(FieldsError::configuration(
                &def.handle,
                format!("decimals must be at most {MAX_DECIMALS}, got {decimals}"),
            ));
        }

        Ok(Self {
            def: def.clone(),
            min,
            max,
            decimals,
            default_value,
        })
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    fn to_json_number(&self, n: f64) -> Value {
        if self.decimals == 0 && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            return Value::from(n as i64);
        }
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl Field for NumberField {
    fn def(&self) -> &FieldDef {
        &self.def
    }

    fn display_name(&self) -> &'static str {
        "Number"
    }

    fn content_column_type(&self) -> ColumnType {
        if self.decimals == 0 {
            ColumnType::Integer
        } else {
            ColumnType::Decimal {
                precision: DECIMAL_PRECISION,
                // Bounded by MAX_DECIMALS at construction.
                scale: self.decimals as u8,
            }
        }
    }

    fn default_value(&self) -> Value {
        match self.default_value {
            Some(n) => self.to_json_number(n),
            None => Value::String(String::new()),
        }
    }

    /// Numeric strings become numbers; anything unparseable is kept as is.
    fn normalize_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => match s.trim().replace(',', "").parse::<f64>() {
                Ok(n) => self.to_json_number(n),
                Err(_) => value.clone(),
            },
            other => other.clone(),
        }
    }

    fn input_template(&self) -> &'static str {
        "_includes/forms/number"
    }

    fn input_params(&self, _value: &Value) -> liquid::Object {
        let mut params = liquid::Object::new();
        if let Some(min) = self.min {
            params.insert("min".into(), liquid::model::Value::scalar(min));
        }
        if let Some(max) = self.max {
            params.insert("max".into(), liquid::model::Value::scalar(max));
        }
        let step = if self.decimals == 0 {
            "1".to_string()
        } else {
            format!("{:.*}", self.decimals as usize, 10f64.powi(-(self.decimals as i32)))
        };
        params.insert("step".into(), liquid::model::Value::scalar(step));
        params
    }
}
