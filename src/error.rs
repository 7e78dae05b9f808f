//! Record-level failures raised while turning raw rows into typed deliveries

/// A delivery row that cannot be enriched because a structural field is broken.
///
/// Unrecognized category values are not errors; they score with a neutral multiplier.
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("delivery {delivery_id}: missing required field `{field}`")]
    MissingField {
        delivery_id: i64,
        field: &'static str,
    },

    #[error("delivery id must be positive, got {0}")]
    InvalidId(i64),

    #[error("delivery {delivery_id}: unparseable pickup timestamp {value:?}")]
    InvalidTimestamp {
        delivery_id: i64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
