//! Request shapes and required-field validation.
//!
//! Validation happens here, before the core is called; a missing or blank
//! required field becomes `ServiceError::ValidationRequired`.

use randocube_core::{Item, ItemId, Priority, RequiredField, ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.trim().is_empty())
}

fn required(value: Option<&str>, field: RequiredField) -> ServiceResult<&str> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ServiceError::ValidationRequired(field)),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCategoryRequest {
    pub category: Option<String>,
}

impl AddCategoryRequest {
    pub fn validate(&self) -> ServiceResult<&str> {
        required(self.category.as_deref(), RequiredField::Category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCategoryRequest {
    pub old_category: Option<String>,
    pub new_category: Option<String>,
}

impl EditCategoryRequest {
    /// A blank old name cannot match anything, so it reports as not found.
    pub fn validate(&self) -> ServiceResult<(&str, &str)> {
        let old = self.old_category.as_deref();
        if !has_text(old) {
            return Err(ServiceError::CategoryNotFound(
                old.unwrap_or_default().to_string(),
            ));
        }
        let new = required(self.new_category.as_deref(), RequiredField::Category)?;
        Ok((old.unwrap_or_default(), new))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCategoryRequest {
    pub category: Option<String>,
    pub migrate_to: Option<String>,
}

impl RemoveCategoryRequest {
    pub fn validate(&self) -> ServiceResult<(&str, Option<&str>)> {
        let category = required(self.category.as_deref(), RequiredField::Category)?;
        Ok((category, self.migrate_to.as_deref()))
    }
}

/// Item fields as submitted by a caller; everything is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    pub id: Option<ItemId>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveItemRequest {
    pub item: Option<ItemInput>,
    pub ignore_duplicate: Option<bool>,
}

impl SaveItemRequest {
    /// Checks required fields in order: item, title, category, priority.
    pub fn validate(&self) -> ServiceResult<(Item, bool)> {
        let input = self
            .item
            .as_ref()
            .ok_or(ServiceError::ValidationRequired(RequiredField::Item))?;
        let title = required(input.title.as_deref(), RequiredField::Title)?;
        let category = required(input.category.as_deref(), RequiredField::Category)?;
        let priority = input
            .priority
            .ok_or(ServiceError::ValidationRequired(RequiredField::Priority))?;

        let mut item = Item::draft(title, category, priority);
        item.id = input.id;
        Ok((item, self.ignore_duplicate.unwrap_or(false)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub id: Option<ItemId>,
}

impl RemoveItemRequest {
    pub fn validate(&self) -> ServiceResult<ItemId> {
        self.id
            .ok_or(ServiceError::ValidationRequired(RequiredField::Id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkCompletedRequest {
    pub id: Option<ItemId>,
    pub unmark: Option<bool>,
}

impl MarkCompletedRequest {
    pub fn validate(&self) -> ServiceResult<(ItemId, bool)> {
        let id = self
            .id
            .ok_or(ServiceError::ValidationRequired(RequiredField::Id))?;
        Ok((id, self.unmark.unwrap_or(false)))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EditCategoryRequest, ItemInput, MarkCompletedRequest, RemoveCategoryRequest,
        SaveItemRequest,
    };
    use randocube_core::{ErrorKind, Priority};

    #[test]
    fn save_request_checks_fields_in_order() {
        let missing_item = SaveItemRequest::default().validate().unwrap_err();
        assert_eq!(missing_item.to_string(), "Item is required for this operation");

        let mut request = SaveItemRequest {
            item: Some(ItemInput {
                title: Some("  ".to_string()),
                ..ItemInput::default()
            }),
            ignore_duplicate: None,
        };
        assert_eq!(
            request.validate().unwrap_err().to_string(),
            "Title is required for this operation"
        );

        if let Some(input) = request.item.as_mut() {
            input.title = Some("Dune".to_string());
        }
        assert_eq!(
            request.validate().unwrap_err().to_string(),
            "Category is required for this operation"
        );

        if let Some(input) = request.item.as_mut() {
            input.category = Some("Books".to_string());
        }
        assert_eq!(
            request.validate().unwrap_err().to_string(),
            "Priority is required for this operation"
        );

        if let Some(input) = request.item.as_mut() {
            input.priority = Some(Priority::Low);
        }
        let (item, ignore_duplicate) = request.validate().unwrap();
        assert_eq!(item.title, "Dune");
        assert_eq!(item.id, None);
        assert!(!ignore_duplicate);
    }

    #[test]
    fn edit_request_with_blank_old_name_is_not_found() {
        let request = EditCategoryRequest {
            old_category: Some(" ".to_string()),
            new_category: Some("Novels".to_string()),
        };
        assert_eq!(request.validate().unwrap_err().kind(), ErrorKind::CategoryNotFound);

        let request = EditCategoryRequest {
            old_category: Some("Books".to_string()),
            new_category: None,
        };
        assert_eq!(
            request.validate().unwrap_err().kind(),
            ErrorKind::ValidationRequired
        );
    }

    #[test]
    fn optional_flags_default_to_false_and_migration_passes_through() {
        let (id, unmark) = MarkCompletedRequest {
            id: Some(3),
            unmark: None,
        }
        .validate()
        .unwrap();
        assert_eq!((id, unmark), (3, false));

        let request = RemoveCategoryRequest {
            category: Some("Movies".to_string()),
            migrate_to: Some("Film".to_string()),
        };
        assert_eq!(request.validate().unwrap(), ("Movies", Some("Film")));
    }

    #[test]
    fn requests_deserialize_from_camel_case_json() {
        let request: SaveItemRequest = serde_json::from_str(
            r#"{"item": {"title": "Catan", "category": "Board Games", "priority": "HIGH"},
                "ignoreDuplicate": true}"#,
        )
        .unwrap();
        let (item, ignore_duplicate) = request.validate().unwrap();
        assert_eq!(item.priority, Priority::High);
        assert!(ignore_duplicate);
    }
}
