use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::hardware::ClampId;
use crate::errors::DomainError;

catalog_id!(WheelchairId);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wheelchair {
    pub id: WheelchairId,
    pub model: String,
    pub frame_clamp_ids: BTreeSet<ClampId>,
    pub mount_location: Option<String>,
}

/// Parses the catalog's comma-delimited frame clamp column (`"1, 3"`).
pub fn parse_frame_clamp_ids(raw: &str) -> Result<BTreeSet<ClampId>, DomainError> {
    let mut ids = BTreeSet::new();
    for part in raw.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidRecord(format!(
                "frame clamp list `{raw}` contains an empty entry"
            )));
        }
        let id = trimmed.parse::<i64>().map_err(|_| {
            DomainError::InvalidRecord(format!(
                "frame clamp list `{raw}` contains non-numeric id `{trimmed}`"
            ))
        })?;
        ids.insert(ClampId(id));
    }
    Ok(ids)
}
