use super::Transformation;
use crate::field::{Field, FieldRegistry, FieldType};

const BASE: &[Transformation] = &[Transformation::Copy, Transformation::Set];

const ARITHMETIC: &[Transformation] = &[
    Transformation::Copy,
    Transformation::Set,
    Transformation::Add,
    Transformation::Subtract,
];

/// The transformations a source field of the given type supports.
///
/// Every type supports `copy` and `set`; only number, currency and date add `add`/`subtract`.
pub fn available_transformations(source_type: FieldType) -> &'static [Transformation] {
    match source_type {
        FieldType::Number | FieldType::Currency | FieldType::Date => ARITHMETIC,
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Email
        | FieldType::Select
        | FieldType::Dropdown
        | FieldType::YesNo
        | FieldType::Checkbox
        | FieldType::User
        | FieldType::Users
        | FieldType::Id => BASE,
    }
}

/// Like [`available_transformations`], for a source that may not be chosen or may not resolve.
pub fn transformations_for_source(
    registry: &dyn FieldRegistry,
    source_field: Option<&str>,
) -> &'static [Transformation] {
    source_field
        .and_then(|id| registry.field_type(id))
        .map_or(BASE, available_transformations)
}

/// Whether a target field type may receive a source field type under a transformation.
pub fn is_compatible(source: FieldType, transformation: Transformation, target: FieldType) -> bool {
    match transformation {
        Transformation::Set => true,
        Transformation::Copy => {
            source == target
                || target == FieldType::Text
                || (source.is_numeric() && target.is_numeric())
        }
        Transformation::Add | Transformation::Subtract => {
            (source.is_numeric() && target.is_numeric())
                || (source == FieldType::Date && target == FieldType::Date)
        }
    }
}

/// Filters `all_fields` down to the valid targets for a source and transformation.
///
/// Without a source there is nothing to constrain against, so every field is returned.
pub fn compatible_targets<'f>(
    source_field: Option<&Field>,
    transformation: Transformation,
    all_fields: impl IntoIterator<Item = &'f Field>,
) -> Vec<&'f Field> {
    match source_field {
        None => all_fields.into_iter().collect(),
        Some(source) => all_fields
            .into_iter()
            .filter(|target| is_compatible(source.field_type, transformation, target.field_type))
            .collect(),
    }
}
