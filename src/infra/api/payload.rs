//! Request bodies. Multipart fields are kept in an owned, inspectable form
//! until the moment of sending because `reqwest`'s form cannot be cloned or
//! read back.

use reqwest::multipart::{Form, Part};

use crate::domain::uploads::Upload;

use super::error::ApiError;

#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartFields),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PartValue {
    Text(String),
    File(Upload),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartFields {
    parts: Vec<(&'static str, PartValue)>,
}

impl MultipartFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.parts.push((name, PartValue::Text(value.into())));
        self
    }

    /// Adds the field only when a value is present.
    #[must_use]
    pub fn opt_text(self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    /// Adds the file part only when an upload is present.
    #[must_use]
    pub fn opt_file(mut self, name: &'static str, upload: Option<&Upload>) -> Self {
        if let Some(upload) = upload {
            self.parts.push((name, PartValue::File(upload.clone())));
        }
        self
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parts.iter().map(|(name, _)| *name)
    }

    /// Text value of the first field called `name`.
    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(field, value)| match value {
            PartValue::Text(text) if *field == name => Some(text.as_str()),
            _ => None,
        })
    }

    pub(crate) fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.parts {
            form = match value {
                PartValue::Text(text) => form.text(name, text),
                PartValue::File(upload) => {
                    let part = Part::bytes(upload.bytes)
                        .file_name(upload.file_name)
                        .mime_str(&upload.content_type)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_skipped() {
        let upload = Upload::new("a.png", "image/png", vec![1, 2, 3]);
        let fields = MultipartFields::new()
            .text("descripcion", "hola")
            .text("es_autor", "true")
            .opt_text("slug", None::<String>)
            .opt_file("avatar", Some(&upload))
            .opt_file("imagen", None);

        let names: Vec<_> = fields.names().collect();
        assert_eq!(names, vec!["descripcion", "es_autor", "avatar"]);
        assert_eq!(fields.text_value("es_autor"), Some("true"));
        assert_eq!(fields.text_value("avatar"), None);
    }

    #[test]
    fn invalid_mime_is_rejected_when_building_form() {
        let upload = Upload::new("a.bin", "not a mime", vec![1]);
        let fields = MultipartFields::new().opt_file("avatar", Some(&upload));
        assert!(fields.into_form().is_err());
    }
}
