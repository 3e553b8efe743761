//! Error taxonomy for a pagination run.
//!
//! Both classes are fatal for the run: no pages are produced and the caller
//! surfaces "unable to paginate this document". Oversized blocks and children
//! that do not fit an empty page are packing policies, not errors.

use thiserror::Error;

use crate::layout::columns::SidebarPolicy;

/// The page or layout configuration cannot produce any valid page plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("usable page height must be positive, got {usable_height}")]
    NonPositiveUsableHeight { usable_height: f32 },

    #[error(
        "sidebar content needs {required}px but the sidebar track only has {available}px ({policy:?})"
    )]
    SidebarOverflow {
        required: f32,
        available: f32,
        policy: SidebarPolicy,
    },

    #[error("block id '{0}' appears more than once in the same run")]
    DuplicateBlockId(String),

    #[error("invalid page setup: {0}")]
    InvalidPageSetup(String),

    #[error(
        "continuation marker height must be at least 0 and below the usable height {usable_height}, got {value}"
    )]
    InvalidMarkerHeight { value: f32, usable_height: f32 },
}

/// A block reached the packer without a usable height.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasurementError {
    #[error("block '{block_id}'{} was not measured", fragment_suffix(.fragment_id))]
    Missing {
        block_id: String,
        fragment_id: Option<String>,
    },

    #[error("block '{block_id}'{} measured to invalid height {value}", fragment_suffix(.fragment_id))]
    InvalidHeight {
        block_id: String,
        fragment_id: Option<String>,
        value: f32,
    },

    #[error("block '{block_id}' has invalid margin {value}")]
    InvalidMargin { block_id: String, value: f32 },
}

/// Any failure of a single pagination run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaginationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Measurement(#[from] MeasurementError),
}

fn fragment_suffix(fragment_id: &Option<String>) -> String {
    match fragment_id {
        Some(id) => format!(" (child '{id}')"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message_names_fragment() {
        let err = MeasurementError::Missing {
            block_id: "exp-1".to_string(),
            fragment_id: Some("exp-1-0".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "block 'exp-1' (child 'exp-1-0') was not measured"
        );
    }

    #[test]
    fn test_pagination_error_is_transparent() {
        let err: PaginationError = ConfigurationError::NonPositiveUsableHeight {
            usable_height: 0.0,
        }
        .into();
        assert_eq!(err.to_string(), "usable page height must be positive, got 0");
    }
}
