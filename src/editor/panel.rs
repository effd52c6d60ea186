//! Declarative property form for artwork nodes.
//!
//! The panel owns no values. [`PropertyPanel::view`] reads every field from
//! the current selection through the [`Editor`] each time it is called, and
//! [`PropertyPanel::on_change`] turns one input change into exactly one
//! "set property on selection" command. Widget toolkits render the returned
//! [`FieldView`]s however they like.

use log::debug;

use crate::{
    artwork::Projection,
    editor::{ArtworkProperty, Editor, PropertyError, PropertyValue},
};

#[derive(Clone, Debug, PartialEq)]
pub enum InputKind {
    /// Image picker producing a source URI.
    Image,
    Numeric {
        min: f32,
        small_step: f32,
        medium_step: f32,
        large_step: f32,
        unit: &'static str,
    },
    Text,
    Choice(&'static [Projection]),
}

const LENGTH: InputKind = InputKind::Numeric {
    min: 0.0,
    small_step: 0.1,
    medium_step: 1.0,
    large_step: 10.0,
    unit: "m",
};

#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub property: ArtworkProperty,
    pub label: &'static str,
    pub kind: InputKind,
}

impl FieldSpec {
    const fn new(property: ArtworkProperty, label: &'static str, kind: InputKind) -> Self {
        Self {
            property,
            label,
            kind,
        }
    }

    /// Checks `value` against the input kind; lengths below the minimum are clamped.
    fn accept(&self, value: PropertyValue) -> Result<PropertyValue, PropertyError> {
        let mismatch = |expected: &'static str, value: &PropertyValue| PropertyError::TypeMismatch {
            property: self.property,
            expected,
            actual: value.kind(),
        };
        match (&self.kind, value) {
            (InputKind::Numeric { min, .. }, PropertyValue::Number(n)) => {
                Ok(PropertyValue::Number(if n < *min || n.is_nan() { *min } else { n }))
            }
            (InputKind::Image | InputKind::Text, value @ PropertyValue::Text(_)) => Ok(value),
            (InputKind::Choice(options), PropertyValue::Projection(p)) if options.contains(&p) => {
                Ok(PropertyValue::Projection(p))
            }
            (InputKind::Choice(options), PropertyValue::Text(text)) => text
                .parse::<Projection>()
                .ok()
                .filter(|p| options.contains(p))
                .map(PropertyValue::Projection)
                .ok_or_else(|| mismatch("projection", &PropertyValue::Text(text))),
            (InputKind::Numeric { .. }, value) => Err(mismatch("number", &value)),
            (InputKind::Choice(_), value) => Err(mismatch("projection", &value)),
            (_, value) => Err(mismatch("text", &value)),
        }
    }
}

/// One field of the form with the selection's current value.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldView {
    pub property: ArtworkProperty,
    pub label: &'static str,
    pub kind: InputKind,
    pub value: PropertyValue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyPanel {
    pub description: &'static str,
    pub icon: &'static str,
    fields: Vec<FieldSpec>,
}

impl PropertyPanel {
    pub fn artwork() -> Self {
        use ArtworkProperty as P;
        Self {
            description: "Add an artwork image.",
            icon: "image",
            fields: vec![
                FieldSpec::new(P::Src, "Artwork Url", InputKind::Image),
                FieldSpec::new(P::Width, "Width", LENGTH),
                FieldSpec::new(P::Height, "Height", LENGTH),
                FieldSpec::new(
                    P::Projection,
                    "Projection",
                    InputKind::Choice(&[Projection::Flat, Projection::Equirectangular360]),
                ),
                FieldSpec::new(P::Title, "Artwork Title", InputKind::Text),
                FieldSpec::new(P::Artist, "Artwork Artist", InputKind::Text),
                FieldSpec::new(P::Medium, "Artwork Medium", InputKind::Text),
                FieldSpec::new(P::Style, "Artwork Style", InputKind::Text),
                FieldSpec::new(P::Year, "Artwork Year", InputKind::Text),
                FieldSpec::new(P::Description, "Description", InputKind::Text),
                FieldSpec::new(P::Url, "Website Url", InputKind::Text),
            ],
        }
    }

    /// Drops the field for `property`, e.g. for hosts that manage it themselves.
    pub fn without(mut self, property: ArtworkProperty) -> Self {
        self.fields.retain(|field| field.property != property);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, property: ArtworkProperty) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.property == property)
    }

    /// The form as it should be shown right now. Errors without a selection.
    pub fn view(&self, editor: &impl Editor) -> Result<Vec<FieldView>, PropertyError> {
        self.fields
            .iter()
            .map(|field| {
                let value = editor
                    .get_property_selected(field.property)
                    .ok_or(PropertyError::NoSelection)?;
                Ok(FieldView {
                    property: field.property,
                    label: field.label,
                    kind: field.kind.clone(),
                    value,
                })
            })
            .collect()
    }

    pub fn on_change(
        &self,
        editor: &mut impl Editor,
        property: ArtworkProperty,
        value: PropertyValue,
    ) -> Result<(), PropertyError> {
        let field = self
            .field(property)
            .ok_or(PropertyError::NotInPanel(property))?;
        let value = field.accept(value)?;
        debug!("{} changed to {:?}", field.label, value);
        editor.set_property_selected(property, value)
    }
}
