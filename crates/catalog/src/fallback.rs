//! Static placeholder entries served when the upstream is unreachable.
//!
//! The shape mirrors the fields clients actually render from RAWG search
//! results, so a degraded response stays drop-in compatible.

use serde_json::{json, Value};

/// Placeholder search results returned in degraded mode.
pub fn fallback_search_results() -> Value {
    json!({
        "count": 3,
        "results": [
            {
                "id": 0,
                "name": "Catalog temporarily unavailable",
                "released": null,
                "background_image": null,
                "rating": 0.0,
                "placeholder": true
            },
            {
                "id": -1,
                "name": "Browse the local PlayScore catalog instead",
                "released": null,
                "background_image": null,
                "rating": 0.0,
                "placeholder": true
            },
            {
                "id": -2,
                "name": "Try again in a few minutes",
                "released": null,
                "background_image": null,
                "rating": 0.0,
                "placeholder": true
            }
        ]
    })
}

/// Placeholder detail entry returned in degraded mode.
pub fn fallback_detail(rawg_id: i64) -> Value {
    json!({
        "id": rawg_id,
        "name": "Catalog temporarily unavailable",
        "description_raw": "Game metadata could not be fetched from the upstream catalog.",
        "released": null,
        "background_image": null,
        "rating": 0.0,
        "placeholder": true
    })
}
