use serde::de::DeserializeOwned;
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradingLutFormat {
    #[default]
    #[serde(rename = "ARGBHalf")]
    ArgbHalf,
    #[serde(rename = "ARGBFloat")]
    ArgbFloat,
    #[serde(rename = "ARGB2101010")]
    Argb2101010,
}

/// Color grading settings shared by every camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalPostProcessSettings {
    #[serde(rename = "m_LutSize")]
    pub lut_size: u32,
    #[serde(rename = "lutFormat")]
    pub lut_format: GradingLutFormat,
}

impl GlobalPostProcessSettings {
    pub const LUT_SIZE_PROPERTY: &'static str = "m_LutSize";
    pub const LUT_FORMAT_PROPERTY: &'static str = "lutFormat";
}

impl Default for GlobalPostProcessSettings {
    fn default() -> Self {
        Self {
            lut_size: 32,
            lut_format: GradingLutFormat::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PropertyError {
    #[error("missing property: {0}")]
    MissingProperty(String),
    #[error("property {0} is not an object")]
    NotAnObject(String),
    #[error("serialization error for {0}: {1:?}")]
    SerializationError(String, serde_json::Error),
}

/// Handle to a property of a serialized document, addressed by JSON pointer.
///
/// The handle does not own the document, every access takes it explicitly.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct SerializedProperty {
    pointer: String,
}

impl SerializedProperty {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Name of the addressed property, empty for the root.
    pub fn name(&self) -> String {
        self.pointer
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .replace("~1", "/")
            .replace("~0", "~")
    }

    pub fn find_property_relative(&self, name: &str) -> Self {
        let escaped = name.replace('~', "~0").replace('/', "~1");
        Self {
            pointer: format!("{}/{escaped}", self.pointer),
        }
    }

    pub fn get<'a>(
        &self,
        document: &'a serde_json::Value,
    ) -> Result<&'a serde_json::Value, PropertyError> {
        document
            .pointer(&self.pointer)
            .ok_or_else(|| PropertyError::MissingProperty(self.pointer.clone()))
    }

    pub fn get_as<T: DeserializeOwned>(
        &self,
        document: &serde_json::Value,
    ) -> Result<T, PropertyError> {
        serde_json::from_value(self.get(document)?.clone())
            .map_err(|err| PropertyError::SerializationError(self.pointer.clone(), err))
    }

    /// Writes `value`, creating the property when its parent object exists.
    pub fn set<T: serde::Serialize>(
        &self,
        document: &mut serde_json::Value,
        value: T,
    ) -> Result<(), PropertyError> {
        let value = serde_json::to_value(value)
            .map_err(|err| PropertyError::SerializationError(self.pointer.clone(), err))?;

        let Some((parent, _)) = self.pointer.rsplit_once('/') else {
            *document = value;
            return Ok(());
        };

        let object = document
            .pointer_mut(parent)
            .ok_or_else(|| PropertyError::MissingProperty(parent.to_owned()))?
            .as_object_mut()
            .ok_or_else(|| PropertyError::NotAnObject(parent.to_owned()))?;

        object.insert(self.name(), value);
        Ok(())
    }
}

pub struct SerializedGlobalPostProcessSettings {
    pub root: SerializedProperty,
    pub lut_size: SerializedProperty,
    pub lut_format: SerializedProperty,
}

impl SerializedGlobalPostProcessSettings {
    pub fn new(root: SerializedProperty) -> Self {
        Self {
            lut_size: root.find_property_relative(GlobalPostProcessSettings::LUT_SIZE_PROPERTY),
            lut_format: root.find_property_relative(GlobalPostProcessSettings::LUT_FORMAT_PROPERTY),
            root,
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let settings: GlobalPostProcessSettings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(settings, GlobalPostProcessSettings::default());
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({ "m_LutSize": 32, "lutFormat": "ARGBHalf" })
        );
    }

    #[test]
    fn test_serialized_properties() {
        let mut document = json!({
            "m_PostProcessSettings": GlobalPostProcessSettings::default()
        });

        let root = SerializedProperty::root().find_property_relative("m_PostProcessSettings");
        let serialized = SerializedGlobalPostProcessSettings::new(root);
        assert_eq!(serialized.lut_size.pointer(), "/m_PostProcessSettings/m_LutSize");

        assert_eq!(serialized.lut_size.get(&document).unwrap(), &json!(32));
        serialized.lut_size.set(&mut document, 64u32).unwrap();
        serialized
            .lut_format
            .set(&mut document, GradingLutFormat::ArgbFloat)
            .unwrap();

        let settings: GlobalPostProcessSettings = serialized.root.get_as(&document).unwrap();
        assert_eq!(settings.lut_size, 64);
        assert_eq!(settings.lut_format, GradingLutFormat::ArgbFloat);
    }

    #[test]
    fn test_missing_property() {
        let document = json!({});
        let property = SerializedProperty::root()
            .find_property_relative("a/b")
            .find_property_relative("c");
        assert_eq!(property.pointer(), "/a~1b/c");
        assert!(matches!(
            property.get(&document),
            Err(PropertyError::MissingProperty(_))
        ));

        let mut document = document;
        assert!(property.set(&mut document, 1).is_err());
    }
}
