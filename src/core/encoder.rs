use crate::utils::error::PriceError;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct EncoderClasses {
    #[serde(alias = "classes_")]
    classes: Vec<String>,
}

/// Label encoder: category string -> index in the trained `classes` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "EncoderClasses")]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Result<Self, PriceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if index.insert(class.clone(), code).is_some() {
                return Err(PriceError::InvalidArtifact {
                    message: format!("duplicate label encoder class '{}'", class),
                });
            }
        }
        Ok(Self { classes, index })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// 將 JSON 值轉為類別標籤；null、陣列、物件無法對應任何類別
    pub fn label_of(value: &serde_json::Value) -> Option<Cow<'_, str>> {
        match value {
            serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            serde_json::Value::Number(n) => Some(Cow::Owned(n.to_string())),
            serde_json::Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    pub fn encode_value(&self, value: &serde_json::Value) -> Option<usize> {
        Self::label_of(value).and_then(|label| self.encode(&label))
    }
}

impl TryFrom<EncoderClasses> for LabelEncoder {
    type Error = PriceError;

    fn try_from(raw: EncoderClasses) -> Result<Self, Self::Error> {
        Self::new(raw.classes)
    }
}
