//! Editing artworks by property name.
//!
//! Editors address node fields by name (for undo entries, multi-selection and
//! form bindings). [`ArtworkProperty`] enumerates the settable fields of an
//! [`ArtworkNode`], [`PropertyValue`] carries their values, and the [`Editor`]
//! trait is the seam to the host's selection and command history.

pub mod panel;

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::artwork::{ArtworkNode, PendingLoad, Projection};

pub use panel::{FieldSpec, FieldView, InputKind, PropertyPanel};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtworkProperty {
    Src,
    Width,
    Height,
    Projection,
    Title,
    Artist,
    Medium,
    Style,
    Year,
    Description,
    Url,
}

impl ArtworkProperty {
    pub const ALL: [ArtworkProperty; 11] = [
        Self::Src,
        Self::Width,
        Self::Height,
        Self::Projection,
        Self::Title,
        Self::Artist,
        Self::Medium,
        Self::Style,
        Self::Year,
        Self::Description,
        Self::Url,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Src => "src",
            Self::Width => "width",
            Self::Height => "height",
            Self::Projection => "projection",
            Self::Title => "title",
            Self::Artist => "artist",
            Self::Medium => "medium",
            Self::Style => "style",
            Self::Year => "year",
            Self::Description => "description",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for ArtworkProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArtworkProperty {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|property| property.name() == s)
            .ok_or_else(|| PropertyError::UnknownProperty(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Number(f32),
    Projection(Projection),
}

impl PropertyValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Projection(_) => "projection",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<f32> for PropertyValue {
    fn from(number: f32) -> Self {
        Self::Number(number)
    }
}

impl From<Projection> for PropertyValue {
    fn from(projection: Projection) -> Self {
        Self::Projection(projection)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error("unknown property {0:?}")]
    UnknownProperty(String),
    #[error("property {property} expects a {expected} value, got a {actual} value")]
    TypeMismatch {
        property: ArtworkProperty,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("nothing is selected")]
    NoSelection,
    #[error("property {0} is not part of this panel")]
    NotInPanel(ArtworkProperty),
}

fn mismatch(property: ArtworkProperty, expected: &'static str, value: &PropertyValue) -> PropertyError {
    PropertyError::TypeMismatch {
        property,
        expected,
        actual: value.kind(),
    }
}

impl ArtworkNode {
    pub fn get_property(&self, property: ArtworkProperty) -> PropertyValue {
        let text = |s: &str| PropertyValue::Text(s.to_string());
        match property {
            ArtworkProperty::Src => text(self.src().unwrap_or_default()),
            ArtworkProperty::Width => PropertyValue::Number(self.width()),
            ArtworkProperty::Height => PropertyValue::Number(self.height()),
            ArtworkProperty::Projection => PropertyValue::Projection(self.projection()),
            ArtworkProperty::Title => text(self.title()),
            ArtworkProperty::Artist => text(self.artist()),
            ArtworkProperty::Medium => text(self.medium()),
            ArtworkProperty::Style => text(self.style()),
            ArtworkProperty::Year => text(self.year()),
            ArtworkProperty::Description => text(self.description()),
            ArtworkProperty::Url => text(self.url()),
        }
    }

    /**
     * Applies a single field change the way the typed mutators do. Setting `src` starts a
     * load and hands it back; every other field applies immediately.
     */
    pub fn set_property(
        &mut self,
        property: ArtworkProperty,
        value: PropertyValue,
    ) -> Result<Option<PendingLoad>, PropertyError> {
        match (property, &value) {
            (ArtworkProperty::Src, PropertyValue::Text(src)) => return Ok(Some(self.set_source(src))),
            (ArtworkProperty::Width, PropertyValue::Number(width)) => self.set_width(*width),
            (ArtworkProperty::Height, PropertyValue::Number(height)) => self.set_height(*height),
            (ArtworkProperty::Projection, PropertyValue::Projection(projection)) => {
                self.set_projection(*projection)
            }
            // forms hand projections over as their string form
            (ArtworkProperty::Projection, PropertyValue::Text(text)) => {
                let projection = text
                    .parse::<Projection>()
                    .map_err(|_| mismatch(property, "projection", &value))?;
                self.set_projection(projection)
            }
            (ArtworkProperty::Title, PropertyValue::Text(text)) => self.set_title(text),
            (ArtworkProperty::Artist, PropertyValue::Text(text)) => self.set_artist(text),
            (ArtworkProperty::Medium, PropertyValue::Text(text)) => self.set_medium(text),
            (ArtworkProperty::Style, PropertyValue::Text(text)) => self.set_style(text),
            (ArtworkProperty::Year, PropertyValue::Text(text)) => self.set_year(text),
            (ArtworkProperty::Description, PropertyValue::Text(text)) => self.set_description(text),
            (ArtworkProperty::Url, PropertyValue::Text(text)) => self.set_url(text),
            (ArtworkProperty::Width | ArtworkProperty::Height, _) => {
                return Err(mismatch(property, "number", &value));
            }
            (ArtworkProperty::Projection, _) => return Err(mismatch(property, "projection", &value)),
            _ => return Err(mismatch(property, "text", &value)),
        }
        Ok(None)
    }
}

/// The host editor: current selection plus an undoable "set property" command.
pub trait Editor {
    /// Value of `property` on the selected artwork, or `None` without a selection.
    fn get_property_selected(&self, property: ArtworkProperty) -> Option<PropertyValue>;

    /// Sets `property` on the selection through the command history.
    fn set_property_selected(
        &mut self,
        property: ArtworkProperty,
        value: PropertyValue,
    ) -> Result<(), PropertyError>;
}
